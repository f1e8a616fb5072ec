//! Contact data models for scanned business cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the six fields extracted from a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    Name,
    JobTitle,
    CompanyName,
    Email,
    PhoneNumber,
    Address,
}

impl ContactField {
    /// All fields, in record order.
    pub const ALL: [ContactField; 6] = [
        ContactField::Name,
        ContactField::JobTitle,
        ContactField::CompanyName,
        ContactField::Email,
        ContactField::PhoneNumber,
        ContactField::Address,
    ];

    /// JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::JobTitle => "jobTitle",
            ContactField::CompanyName => "companyName",
            ContactField::Email => "email",
            ContactField::PhoneNumber => "phoneNumber",
            ContactField::Address => "address",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::JobTitle => "job title",
            ContactField::CompanyName => "company name",
            ContactField::Email => "email",
            ContactField::PhoneNumber => "phone number",
            ContactField::Address => "address",
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Fields extracted from the text of one card.
///
/// A field that was not found is an empty string; the shape is always complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFields {
    /// Person's full name.
    pub name: String,

    /// Role or title token.
    pub job_title: String,

    /// Organization name.
    pub company_name: String,

    /// Email address.
    pub email: String,

    /// Phone number.
    pub phone_number: String,

    /// Street address.
    pub address: String,
}

impl ContactFields {
    /// Value of a field.
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::JobTitle => &self.job_title,
            ContactField::CompanyName => &self.company_name,
            ContactField::Email => &self.email,
            ContactField::PhoneNumber => &self.phone_number,
            ContactField::Address => &self.address,
        }
    }

    /// Mutable slot of a field.
    pub fn slot_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::JobTitle => &mut self.job_title,
            ContactField::CompanyName => &mut self.company_name,
            ContactField::Email => &mut self.email,
            ContactField::PhoneNumber => &mut self.phone_number,
            ContactField::Address => &mut self.address,
        }
    }

    /// Whether a field holds a value.
    pub fn has(&self, field: ContactField) -> bool {
        !self.get(field).is_empty()
    }

    /// Whether no field was extracted.
    pub fn is_empty(&self) -> bool {
        ContactField::ALL.iter().all(|f| !self.has(*f))
    }

    /// Fields that are still empty.
    pub fn missing(&self) -> Vec<ContactField> {
        ContactField::ALL
            .iter()
            .copied()
            .filter(|f| !self.has(*f))
            .collect()
    }
}

/// A card about to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    /// Extracted fields.
    #[serde(flatten)]
    pub fields: ContactFields,

    /// Reference to the stored source image.
    pub image: String,
}

impl NewContact {
    pub fn new(fields: ContactFields, image: impl Into<String>) -> Self {
        Self {
            fields,
            image: image.into(),
        }
    }
}

/// A stored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// Store-assigned identifier, increasing in insertion order.
    pub id: i64,

    /// Extracted fields.
    #[serde(flatten)]
    pub fields: ContactFields,

    /// Reference to the stored source image.
    pub image: String,

    /// Insertion time.
    pub created_at: DateTime<Utc>,
}
