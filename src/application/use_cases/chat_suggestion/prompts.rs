use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub(crate) const MAX_INPUT_CHARS: usize = 300;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,;:?!-]").unwrap());

pub(crate) const SYSTEM_PROMPT: &str = concat!(
    "Rispondi solo come esperto di agricoltura sostenibile. ",
    "Dai consigli pratici e realistici per ottimizzare i consumi e ridurre il carbon footprint aziendale. ",
    "Personalizza i suggerimenti in base ai valori attuali dei sensori e del carbon footprint forniti, ",
    "spiegando sempre il motivo di ogni consiglio rispetto a questi dati. ",
    "Non rispondere a domande fuori tema e non inventare dati. ",
    "Se la domanda non riguarda la sostenibilità o l'ottimizzazione dei consumi, rispondi in modo gentile ",
    "che puoi aiutare solo su strategie per ridurre il carbon footprint in agricoltura. ",
    "Non fornire risposte generiche o vaghe, ma sii specifico e pratico. ",
    "Rispondi in italiano e non ripetere il testo della domanda dell'utente."
);

/// Drops markup and control characters, then caps the length.
pub(crate) fn safe_text(text: &str) -> String {
    UNSAFE_CHARS
        .replace_all(text, "")
        .chars()
        .take(MAX_INPUT_CHARS)
        .collect()
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "?".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn sensors_line(sensors: &Map<String, Value>) -> String {
    if sensors.is_empty() {
        return String::new();
    }
    format!(
        "I dati attuali del suolo sono: salinità {} dS/m, pH {}, umidità {}%, sostanza organica {}%.",
        display_value(sensors.get("salinity")),
        display_value(sensors.get("ph")),
        display_value(sensors.get("soil_moisture")),
        display_value(sensors.get("organic_matter")),
    )
}

/// Empty unless the footprint carries a total.
pub(crate) fn footprint_line(footprint: Option<&Value>) -> String {
    let Some(Value::Object(footprint)) = footprint else {
        return String::new();
    };
    let Some(total) = footprint.get("totale_kgCO2eq") else {
        return String::new();
    };

    let details = footprint
        .get("dettaglio")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .map(|line| {
                    format!(
                        "{}: {} kg CO₂eq",
                        display_value(line.get("parametro")),
                        display_value(line.get("co2"))
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    format!(
        "Il carbon footprint stimato dell'azienda è di {} kg CO₂eq. Dettaglio: {}",
        display_value(Some(total)),
        details
    )
}

pub(crate) fn build_user_prompt(
    user_input: &str,
    sensors: &Map<String, Value>,
    footprint: Option<&Value>,
) -> String {
    format!(
        "{}\n{}\n{}",
        safe_text(user_input),
        sensors_line(sensors),
        footprint_line(footprint)
    )
}

pub(crate) fn prompt_hash(system: &str, user: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(system.as_bytes());
    hasher.update(b"\n");
    hasher.update(user.as_bytes());
    hex::encode(hasher.finalize())
}
