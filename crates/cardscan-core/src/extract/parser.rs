//! Line-scan contact parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::contact::{ContactField, ContactFields};
use crate::ocr::OcrResult;

use super::rules::{default_rules, FieldExtractor, FieldRule};
use super::ContactExtractor;

/// Where a field value was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSource {
    /// Field that was filled.
    pub field: ContactField,
    /// Index into the candidate lines.
    pub line: usize,
    /// The candidate line the value was taken from.
    pub text: String,
    /// Byte range of the value within `text`.
    pub span: Option<(usize, usize)>,
}

/// Result of contact extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub fields: ContactFields,
    /// Raw input text.
    pub raw_text: String,
    /// Source line of every filled field, in fill order.
    pub sources: Vec<FieldSource>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Source of a filled field.
    pub fn source_of(&self, field: ContactField) -> Option<&FieldSource> {
        self.sources.iter().find(|s| s.field == field)
    }
}

/// Split text into trimmed, non-empty lines, keeping their order.
pub fn candidate_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|l| l.trim_matches(is_trimmed))
        .filter(|l| !l.is_empty())
        .collect()
}

/// Characters stripped from both ends of a line: Unicode white space and the
/// byte order mark, but not NEL (U+0085).
fn is_trimmed(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Contact parser scanning lines against a table of field rules.
///
/// Each field takes the match from the first line its rule accepts and is
/// never overwritten. Fields are independent, so one line may fill several.
#[derive(Debug, Clone)]
pub struct ContactParser {
    rules: Vec<FieldRule>,
}

impl ContactParser {
    /// Create a parser with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Replace the rule for a field, or append it if the field has none.
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        match self.rules.iter_mut().find(|r| r.field() == rule.field()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Drop the rule for a field so it always stays empty.
    pub fn without_field(mut self, field: ContactField) -> Self {
        self.rules.retain(|r| r.field() != field);
        self
    }

    /// Rules in scan order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Parse contact fields from text.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing contact from {} characters of text", text.len());

        let lines = candidate_lines(text);
        let mut fields = ContactFields::default();
        let mut sources = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            for rule in &self.rules {
                let slot = fields.slot_mut(rule.field());
                if !slot.is_empty() {
                    continue;
                }

                if let Some(m) = rule.extract(line) {
                    debug!("Line {} filled {}: {:?}", index, rule.field(), m.value);
                    *slot = m.value;
                    sources.push(FieldSource {
                        field: rule.field(),
                        line: index,
                        text: (*line).to_string(),
                        span: m.position,
                    });
                }
            }
        }

        let warnings: Vec<String> = fields
            .missing()
            .into_iter()
            .map(|f| format!("Could not extract {}", f.label()))
            .collect();

        debug!(
            "Extracted {} of {} fields from {} lines",
            sources.len(),
            ContactField::ALL.len(),
            lines.len()
        );

        ExtractionResult {
            fields,
            raw_text: text.to_string(),
            sources,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for ContactParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactExtractor for ContactParser {
    fn extract(&self, ocr_result: &OcrResult) -> ContactFields {
        debug!(
            "Extracting contact from {} OCR boxes",
            ocr_result.boxes.len()
        );
        self.parse(&ocr_result.text).fields
    }

    fn extract_from_text(&self, text: &str) -> ContactFields {
        self.parse(text).fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use regex::Regex;

    const CLEAN_CARD: &str = "John Smith\nSenior Manager\nAcme Corp\njohn.smith@acme.com\n(555) 123-4567\n123 Main Street\n";

    #[test]
    fn test_clean_card() {
        let fields = ContactParser::new().extract_from_text(CLEAN_CARD);

        assert_eq!(
            fields,
            ContactFields {
                name: "John Smith".to_string(),
                job_title: "Manager".to_string(),
                company_name: "John Smith".to_string(),
                email: "john.smith@acme.com".to_string(),
                phone_number: "(555) 123-4567".to_string(),
                address: "123 Main Street".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_input() {
        let parser = ContactParser::new();

        for text in ["", "   ", "\n\n\n", " \t \n  \r\n"] {
            let result = parser.parse(text);
            assert_eq!(result.fields, ContactFields::default());
            assert!(result.sources.is_empty());
            assert_eq!(result.warnings.len(), 6);
        }
    }

    #[test]
    fn test_no_matches() {
        let fields = ContactParser::new().extract_from_text("###\n???\n");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let text = "first@example.com\nsecond@example.com";
        let result = ContactParser::new().parse(text);

        assert_eq!(result.fields.email, "first@example.com");
        assert_eq!(result.source_of(ContactField::Email).unwrap().line, 0);
    }

    #[test]
    fn test_source_span_points_at_value() {
        let result = ContactParser::new().parse("Mary Jones | CTO");
        let source = result.source_of(ContactField::JobTitle).unwrap();

        assert_eq!(source.span, Some((13, 16)));
        let (start, end) = source.span.unwrap();
        assert_eq!(&source.text[start..end], "CTO");
    }

    #[test]
    fn test_line_fills_several_fields() {
        let result = ContactParser::new().parse("   Jane Doe   ");

        assert_eq!(result.fields.name, "Jane Doe");
        assert_eq!(result.fields.company_name, "Jane Doe");
        assert_eq!(result.source_of(ContactField::Name).unwrap().text, "Jane Doe");
        assert_eq!(result.source_of(ContactField::CompanyName).unwrap().line, 0);
    }

    #[test]
    fn test_value_is_matched_substring() {
        let fields = ContactParser::new()
            .extract_from_text("Call me at 555.987.6543 anytime\nOffice: 9 Oak Rd, Springfield");

        assert_eq!(fields.phone_number, "555.987.6543");
        assert_eq!(fields.address, "9 Oak Rd");
    }

    #[test]
    fn test_candidate_lines() {
        let lines = candidate_lines("  a \n\n\t\nb\r\n   c");
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_candidate_lines_strip_byte_order_mark() {
        let lines = candidate_lines("\u{feff}\n\u{feff}Jane Doe\u{a0}\njane@doe.org");
        assert_eq!(lines, vec!["Jane Doe", "jane@doe.org"]);

        let result = ContactParser::new().parse("\u{feff}\njane@doe.org");
        assert_eq!(result.source_of(ContactField::Email).unwrap().line, 0);
    }

    #[test]
    fn test_candidate_lines_keep_next_line_char() {
        assert_eq!(candidate_lines("\u{85}"), vec!["\u{85}"]);
    }

    #[test]
    fn test_accented_letters_end_words() {
        let parser = ContactParser::new();

        let fields = parser.extract_from_text("Müller GmbH");
        assert_eq!(fields.company_name, "M");

        let fields = parser.extract_from_text("John Smithé");
        assert_eq!(fields.name, "John Smith");
        assert_eq!(fields.company_name, "John Smith");

        let fields = parser.extract_from_text("Senior Engineeré");
        assert_eq!(fields.job_title, "Engineer");

        let fields = parser.extract_from_text("ana@acme.comé");
        assert_eq!(fields.email, "ana@acme.com");
    }

    #[test]
    fn test_deterministic() {
        let parser = ContactParser::new();
        let noisy = "~~ ACME Widgets ~~\n\nMary Jones | CTO\nmary@acme.io  tel 555 222 3333\n77 Sunset Blvd";

        let a = parser.extract_from_text(noisy);
        let b = parser.extract_from_text(noisy);
        assert_eq!(a, b);
        assert_eq!(a.company_name, "ACME Widgets");
        assert_eq!(a.name, "Mary Jones");
        assert_eq!(a.job_title, "CTO");
        assert_eq!(a.email, "mary@acme.io");
        assert_eq!(a.phone_number, "555 222 3333");
        assert_eq!(a.address, "77 Sunset Blvd");
    }

    #[test]
    fn test_replace_rule() {
        let parser = ContactParser::new().with_rule(FieldRule::new(
            ContactField::CompanyName,
            Regex::new(r"\b[A-Z][A-Za-z]*\s(?:Corp|Inc|LLC|Ltd)\b").unwrap(),
        ));

        let fields = parser.extract_from_text(CLEAN_CARD);
        assert_eq!(fields.company_name, "Acme Corp");
        assert_eq!(fields.name, "John Smith");
        assert_eq!(parser.rules().len(), 6);
    }

    #[test]
    fn test_without_field() {
        let parser = ContactParser::new().without_field(ContactField::CompanyName);
        let fields = parser.extract_from_text(CLEAN_CARD);

        assert_eq!(fields.company_name, "");
        assert_eq!(fields.email, "john.smith@acme.com");
    }

    #[test]
    fn test_extract_from_ocr_result() {
        let ocr = OcrResult::from_text("Bob Stone\nbob@stone.dev");
        let fields = ContactParser::new().extract(&ocr);

        assert_eq!(fields.name, "Bob Stone");
        assert_eq!(fields.email, "bob@stone.dev");
    }
}
