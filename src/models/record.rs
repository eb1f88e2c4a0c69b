// src/models/record.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::CanonError;
use crate::models::matching::{DepartmentResult, TitleResult};
use crate::utils::constants::{
    WEIGHT_DEPARTMENT, WEIGHT_EMAIL, WEIGHT_NAME, WEIGHT_PHONE, WEIGHT_TITLE,
};
use crate::utils::text::collapse_whitespace;

static NAME_SUFFIXES: [&str; 8] = ["jr", "sr", "ii", "iii", "iv", "phd", "md", "esq"];

static EXTENSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:ext\.?|extension|x|#)\s*(\d{1,6})\s*$").unwrap());

//------------------------------------------------------------------------------
// FIELD RESULTS
//------------------------------------------------------------------------------

/// Which field of a contact record a weight or trace entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    Name,
    Email,
    Phone,
    Department,
    Title,
}

impl RecordField {
    pub const ALL: [RecordField; 5] = [
        RecordField::Name,
        RecordField::Email,
        RecordField::Phone,
        RecordField::Department,
        RecordField::Title,
    ];
}

/// Person name split into components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameFields {
    pub full: Option<String>,
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
    /// Inferred gender, if an upstream step produced one
    pub gender: Option<String>,
}

impl NameFields {
    /// Split a display name into first/middle/last. Handles "Last, First"
    /// ordering and drops trailing generational suffixes.
    pub fn from_full(full: &str) -> Self {
        let cleaned = collapse_whitespace(full);
        if cleaned.is_empty() {
            return Self::default();
        }

        let reordered = match cleaned.split_once(',') {
            Some((last, rest)) if !rest.trim().is_empty() && !is_suffix(rest) => {
                format!("{} {}", rest.trim(), last.trim())
            }
            _ => cleaned.replace(',', " "),
        };

        let mut tokens: Vec<&str> = reordered.split_whitespace().collect();
        while tokens.len() > 1 && tokens.last().map(|t| is_suffix(t)).unwrap_or(false) {
            tokens.pop();
        }

        let (first, middle, last) = match tokens.len() {
            0 => (None, None, None),
            1 => (Some(tokens[0].to_string()), None, None),
            2 => (Some(tokens[0].to_string()), None, Some(tokens[1].to_string())),
            n => (
                Some(tokens[0].to_string()),
                Some(tokens[1..n - 1].join(" ")),
                Some(tokens[n - 1].to_string()),
            ),
        };

        Self {
            full: Some(cleaned),
            first,
            middle,
            last,
            gender: None,
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}

fn is_suffix(token: &str) -> bool {
    let bare: String = token
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    NAME_SUFFIXES.contains(&bare.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailFields {
    /// Lowercased, trimmed address
    pub normalized: String,
}

impl EmailFields {
    pub fn new(raw: &str) -> Self {
        Self {
            normalized: raw.trim().to_lowercase(),
        }
    }
}

/// Phone number in canonical forms. The extension never takes part in scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneFields {
    pub e164: Option<String>,
    pub pretty: Option<String>,
    pub extension: Option<String>,
}

impl PhoneFields {
    /// Derive US E.164 and pretty forms from free text ("(555) 123-4567 x12").
    pub fn from_digits(raw: &str) -> Self {
        let captures = EXTENSION_PATTERN.captures(raw);
        let (number, extension) = match captures {
            Some(caps) => {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(raw.len());
                (&raw[..start], caps.get(1).map(|m| m.as_str().to_string()))
            }
            None => (raw, None),
        };

        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        let national = match digits.len() {
            10 => Some(digits.clone()),
            11 if digits.starts_with('1') => Some(digits[1..].to_string()),
            _ => None,
        };

        match national {
            Some(n) => Self {
                e164: Some(format!("+1{}", n)),
                pretty: Some(format!("({}) {}-{}", &n[..3], &n[3..6], &n[6..])),
                extension,
            },
            None if (11..=15).contains(&digits.len()) => Self {
                e164: Some(format!("+{}", digits)),
                pretty: None,
                extension,
            },
            None => Self {
                e164: None,
                pretty: None,
                extension,
            },
        }
    }

    pub fn is_present(&self) -> bool {
        self.e164.is_some() || self.pretty.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentFields {
    pub canonical: Option<String>,
    pub normalized: Option<String>,
}

impl From<&DepartmentResult> for DepartmentFields {
    fn from(result: &DepartmentResult) -> Self {
        Self {
            canonical: result.display_value().map(str::to_string),
            normalized: result.normalized.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleFields {
    pub canonical: Option<String>,
    /// Cleaned title before canonicalization
    pub cleaned: Option<String>,
}

impl From<&TitleResult> for TitleFields {
    fn from(result: &TitleResult) -> Self {
        Self {
            canonical: result.canonical.clone(),
            cleaned: result.normalized.clone(),
        }
    }
}

/// Upstream-normalized contact record; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: Option<NameFields>,
    pub email: Option<EmailFields>,
    pub phone: Option<PhoneFields>,
    pub department: Option<DepartmentFields>,
    pub title: Option<TitleFields>,
}

impl ContactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, full: &str) -> Self {
        self.name = Some(NameFields::from_full(full));
        self
    }

    pub fn with_name_fields(mut self, name: NameFields) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(EmailFields::new(email));
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(PhoneFields::from_digits(phone));
        self
    }

    pub fn with_department(mut self, department: impl Into<DepartmentFields>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<TitleFields>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Stable text form used as a deduplication key by the bulk runner.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default().to_lowercase()
    }
}

impl From<&str> for DepartmentFields {
    fn from(canonical: &str) -> Self {
        Self {
            canonical: Some(canonical.to_string()),
            normalized: Some(canonical.to_string()),
        }
    }
}

impl From<&str> for TitleFields {
    fn from(canonical: &str) -> Self {
        Self {
            canonical: Some(canonical.to_string()),
            cleaned: Some(canonical.to_string()),
        }
    }
}

//------------------------------------------------------------------------------
// WEIGHTS AND SCORES
//------------------------------------------------------------------------------

/// Per-field weights. Validated on construction, immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    name: f64,
    email: f64,
    phone: f64,
    department: f64,
    title: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            name: WEIGHT_NAME,
            email: WEIGHT_EMAIL,
            phone: WEIGHT_PHONE,
            department: WEIGHT_DEPARTMENT,
            title: WEIGHT_TITLE,
        }
    }
}

impl SimilarityWeights {
    /// Start from the defaults and replace the listed fields.
    pub fn with_overrides(overrides: &[(RecordField, f64)]) -> Result<Self, CanonError> {
        let mut weights = Self::default();
        for (field, weight) in overrides {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(CanonError::invalid("weight", format!("{:?}={}", field, weight)));
            }
            match field {
                RecordField::Name => weights.name = *weight,
                RecordField::Email => weights.email = *weight,
                RecordField::Phone => weights.phone = *weight,
                RecordField::Department => weights.department = *weight,
                RecordField::Title => weights.title = *weight,
            }
        }
        Ok(weights)
    }

    pub fn get(&self, field: RecordField) -> f64 {
        match field {
            RecordField::Name => self.name,
            RecordField::Email => self.email,
            RecordField::Phone => self.phone,
            RecordField::Department => self.department,
            RecordField::Title => self.title,
        }
    }

    /// Weight relative to its default, capped at 1.0, so penalties and floors
    /// never exceed their default magnitude.
    pub fn ratio(&self, field: RecordField) -> f64 {
        let default = Self::default().get(field);
        if default <= 0.0 {
            return 0.0;
        }
        (self.get(field) / default).min(1.0)
    }
}

/// One field's part in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContribution {
    pub field: RecordField,
    /// Field score in [0, 100]
    pub score: f64,
    pub weight: f64,
}

/// Bounded comparison score with the trace that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonScore {
    /// Final score in [0, 100]
    pub score: f64,
    pub contributions: Vec<FieldContribution>,
    /// Penalties and floors applied after the weighted average, in order
    pub adjustments: Vec<String>,
}
