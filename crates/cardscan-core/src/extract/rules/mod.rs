//! Rule-based field extractors for business cards.

pub mod patterns;

use regex::Regex;

use crate::models::contact::ContactField;

use patterns::{COMPANY_NAME, EMAIL, JOB_TITLE, PERSON_NAME, PHONE, STREET_ADDRESS};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A matched value and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the matched text.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// A field paired with the pattern that recognizes it.
///
/// The value of a match is the matched substring, not the whole line.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: ContactField,
    pattern: Regex,
}

impl FieldRule {
    /// Create a rule from a compiled pattern.
    pub fn new(field: ContactField, pattern: Regex) -> Self {
        Self { field, pattern }
    }

    /// Built-in rule for a field.
    pub fn builtin(field: ContactField) -> Self {
        let pattern = match field {
            ContactField::Name => &*PERSON_NAME,
            ContactField::JobTitle => &*JOB_TITLE,
            ContactField::CompanyName => &*COMPANY_NAME,
            ContactField::Email => &*EMAIL,
            ContactField::PhoneNumber => &*PHONE,
            ContactField::Address => &*STREET_ADDRESS,
        };
        Self::new(field, pattern.clone())
    }

    /// Field this rule fills.
    pub fn field(&self) -> ContactField {
        self.field
    }

    /// Pattern this rule applies.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Whether the rule matches anywhere in the text.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl FieldExtractor for FieldRule {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern.find_iter(text).find(|m| !m.is_empty()).map(|m| {
            ExtractionMatch::new(m.as_str().to_string()).with_position(m.start(), m.end())
        })
    }
}

/// The built-in rule table, in scan order.
pub fn default_rules() -> Vec<FieldRule> {
    [
        ContactField::Email,
        ContactField::PhoneNumber,
        ContactField::Name,
        ContactField::JobTitle,
        ContactField::CompanyName,
        ContactField::Address,
    ]
    .into_iter()
    .map(FieldRule::builtin)
    .collect()
}

fn first_match(field: ContactField, text: &str) -> Option<String> {
    FieldRule::builtin(field).extract(text).map(|m| m.value)
}

/// Extract the first email address from text.
pub fn extract_email(text: &str) -> Option<String> {
    first_match(ContactField::Email, text)
}

/// Extract the first US style phone number from text.
pub fn extract_phone_number(text: &str) -> Option<String> {
    first_match(ContactField::PhoneNumber, text)
}

/// Extract the first "First Last" style name from text.
pub fn extract_name(text: &str) -> Option<String> {
    first_match(ContactField::Name, text)
}

/// Extract the first known job title word from text.
pub fn extract_job_title(text: &str) -> Option<String> {
    first_match(ContactField::JobTitle, text)
}

/// Extract the first run of capitalized words from text.
pub fn extract_company_name(text: &str) -> Option<String> {
    first_match(ContactField::CompanyName, text)
}

/// Extract the first "number word suffix" street address from text.
pub fn extract_address(text: &str) -> Option<String> {
    first_match(ContactField::Address, text)
}
