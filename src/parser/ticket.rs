use regex::{Regex, RegexBuilder};

/// Default issue tracker project code
pub const DEFAULT_PROJECT_CODE: &str = "SI";

/// Extracts an issue tracker ticket identifier (e.g. `SI-123`) from a commit message
///
/// The pattern accepts any number of leading `[` without requiring a closing
/// bracket, and the brackets become part of the match: `"[si-9] fix"` yields
/// `"[SI-9"`.
#[derive(Debug, Clone)]
pub struct TicketExtractor {
    pattern: Regex,
}

impl TicketExtractor {
    pub fn new(project_code: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(&format!(r"\[*(?:{})-\d+", regex::escape(project_code)))
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    /// First ticket identifier in `message`, uppercased, or an empty string
    pub fn extract(&self, message: &str) -> String {
        self.pattern
            .find(message)
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TicketExtractor {
        TicketExtractor::new(DEFAULT_PROJECT_CODE).unwrap()
    }

    #[test]
    fn test_extracts_ticket() {
        let extractor = extractor();
        assert_eq!(extractor.extract("fix SI-123: done"), "SI-123");
    }

    #[test]
    fn test_no_ticket() {
        let extractor = extractor();
        assert_eq!(extractor.extract("refactor the parser"), "");
        assert_eq!(extractor.extract(""), "");
    }

    #[test]
    fn test_case_insensitive_and_uppercased() {
        let extractor = extractor();
        assert_eq!(extractor.extract("si-42 lower case"), "SI-42");
    }

    #[test]
    fn test_first_match_wins() {
        let extractor = extractor();
        assert_eq!(extractor.extract("SI-1 and SI-2"), "SI-1");
    }

    #[test]
    fn test_unbalanced_leading_bracket_kept() {
        let extractor = extractor();
        assert_eq!(extractor.extract("[si-9] fix"), "[SI-9");
        assert_eq!(extractor.extract("[[SI-10 no closing bracket"), "[[SI-10");
    }

    #[test]
    fn test_requires_digits() {
        let extractor = extractor();
        assert_eq!(extractor.extract("SI-abc"), "");
    }

    #[test]
    fn test_custom_project_code() {
        let extractor = TicketExtractor::new("PROJ").unwrap();
        assert_eq!(extractor.extract("PROJ-77 tweak"), "PROJ-77");
        assert_eq!(extractor.extract("SI-77 tweak"), "");
    }

    #[test]
    fn test_project_code_is_escaped() {
        let extractor = TicketExtractor::new("A.B").unwrap();
        assert_eq!(extractor.extract("AxB-1"), "");
        assert_eq!(extractor.extract("A.B-1"), "A.B-1");
    }

    #[test]
    fn test_embedded_in_word() {
        let extractor = extractor();
        assert_eq!(extractor.extract("refs:SI-5"), "SI-5");
    }
}
