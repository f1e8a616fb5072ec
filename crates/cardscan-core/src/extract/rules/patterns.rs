//! Recognition patterns for business card fields.
//!
//! Every pattern matches a substring of a single trimmed line. Digits are
//! spelled `[0-9]` so only ASCII digits count, and word boundaries are
//! ASCII `(?-u:\b)`: an accented letter ends a word.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // local@domain.tld
    pub static ref EMAIL: Regex = Regex::new(
        r"(?i)(?-u:\b)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}(?-u:\b)"
    ).unwrap();

    // US style: (555) 123-4567, 555.123.4567, 5551234567
    pub static ref PHONE: Regex = Regex::new(
        r"\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}"
    ).unwrap();

    // Two or more capitalized words: "First Last"
    pub static ref PERSON_NAME: Regex = Regex::new(
        r"(?-u:\b)[A-Z][a-z]+(?:\s[A-Z][a-z]+)+(?-u:\b)"
    ).unwrap();

    pub static ref JOB_TITLE: Regex = Regex::new(
        r"(?i)(?-u:\b)(?:Manager|Engineer|Developer|Consultant|Director|Designer|Officer|CEO|CTO|CFO|President|Vice President)(?-u:\b)"
    ).unwrap();

    // One or more capitalized words, mixed case allowed. Overlaps PERSON_NAME.
    pub static ref COMPANY_NAME: Regex = Regex::new(
        r"(?-u:\b)[A-Z][a-zA-Z]*(?:\s[A-Z][a-zA-Z]*)*(?-u:\b)"
    ).unwrap();

    pub static ref STREET_ADDRESS: Regex = Regex::new(
        r"(?i)[0-9]{1,5}\s[A-Za-z0-9_]+\s(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl)(?-u:\b)"
    ).unwrap();
}
