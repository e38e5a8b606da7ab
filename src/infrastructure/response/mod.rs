use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

/// Role markers and sequence tokens from chat templates that small models
/// tend to leak into their output.
static TEMPLATE_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\|(?:system|user|assistant|im_start|im_end|eot_id)\|>|</?s>").unwrap());

/// Anything after the model starts a new user turn is a hallucinated dialogue.
static NEXT_TURN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\|user\|>[\s\S]*$").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans a model answer before it is shown on the dashboard.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();

    cleaned = NEXT_TURN_PATTERN.replace(&cleaned, "").to_string();
    cleaned = TEMPLATE_TOKEN_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_template_tokens() {
        let input = "<|assistant|>\nRiduci le irrigazioni.</s>";
        assert_eq!(clean_llm_response(input), "Riduci le irrigazioni.");
    }

    #[test]
    fn test_cut_hallucinated_next_turn() {
        let input = "Usa compost maturo.</s>\n<|user|>\nE il pH?</s>\n<|assistant|>\nAltro";
        assert_eq!(clean_llm_response(input), "Usa compost maturo.");
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "Line 1\n\n\n\n\nLine 2";
        assert_eq!(clean_llm_response(input), "Line 1\n\nLine 2");
    }

    #[test]
    fn test_clean_preserves_normal_text() {
        let input = "Con salinità 1.2 dS/m non serve lisciviare.";
        assert_eq!(clean_llm_response(input), input);
    }
}
