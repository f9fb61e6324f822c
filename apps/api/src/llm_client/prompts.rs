// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Rating scale shared by every prompt that scores skills.
pub const RATING_SCALE_INSTRUCTION: &str = "\
    Ratings are integers from 1 to 5: \
    1 = beginner (mentioned once, no visible work), \
    2 = novice (small exercises or coursework), \
    3 = intermediate (used in at least one non-trivial project), \
    4 = advanced (several substantial projects or sustained use), \
    5 = expert (deep, repeated, publicly verifiable work). \
    Every rating MUST carry a short, concrete evidence sentence. Never leave evidence empty.";

/// Wraps untrusted fetched text so the model treats it as data.
pub fn quoted_block(label: &str, content: &str) -> String {
    if content.trim().is_empty() {
        format!("<{label}>\n(not provided)\n</{label}>")
    } else {
        format!("<{label}>\n{}\n</{label}>", content.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_block_marks_empty_content() {
        assert_eq!(
            quoted_block("linkedin", "   "),
            "<linkedin>\n(not provided)\n</linkedin>"
        );
    }

    #[test]
    fn test_quoted_block_trims_content() {
        assert_eq!(quoted_block("x", "\n hi \n"), "<x>\nhi\n</x>");
    }
}
