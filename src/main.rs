#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    agrisustain_lib::run().await?;
    Ok(())
}
