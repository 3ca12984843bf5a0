/// Questionnaire answers
///
/// Option sets are closed enums; the view layer can bind them by label.
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::postal;

/// Label did not match any option of a field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {field} option: {value:?}")]
pub struct UnknownOption {
    pub field: &'static str,
    pub value: String,
}

fn parse_label<T: Copy>(
    field: &'static str,
    options: &[T],
    label: impl Fn(T) -> &'static str,
    value: &str,
) -> Result<T, UnknownOption> {
    let wanted = value.trim();
    options
        .iter()
        .copied()
        .find(|option| label(*option).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| UnknownOption {
            field,
            value: value.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimResponse {
    Yes,
    No,
    #[serde(rename = "Not Sure")]
    NotSure,
}

impl ClaimResponse {
    pub const ALL: [ClaimResponse; 3] =
        [ClaimResponse::Yes, ClaimResponse::No, ClaimResponse::NotSure];

    pub fn label(self) -> &'static str {
        match self {
            ClaimResponse::Yes => "Yes",
            ClaimResponse::No => "No",
            ClaimResponse::NotSure => "Not Sure",
        }
    }
}

impl FromStr for ClaimResponse {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("claim response", &Self::ALL, Self::label, s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55-64")]
    From55To64,
    #[serde(rename = "65+")]
    Over65,
}

impl AgeRange {
    pub const ALL: [AgeRange; 6] = [
        AgeRange::From18To24,
        AgeRange::From25To34,
        AgeRange::From35To44,
        AgeRange::From45To54,
        AgeRange::From55To64,
        AgeRange::Over65,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeRange::From18To24 => "18-24",
            AgeRange::From25To34 => "25-34",
            AgeRange::From35To44 => "35-44",
            AgeRange::From45To54 => "45-54",
            AgeRange::From55To64 => "55-64",
            AgeRange::Over65 => "65+",
        }
    }
}

impl FromStr for AgeRange {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("age range", &Self::ALL, Self::label, s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeRange {
    #[serde(rename = "Under $25,000")]
    Under25k,
    #[serde(rename = "$25,000 - $50,000")]
    From25kTo50k,
    #[serde(rename = "$50,000 - $75,000")]
    From50kTo75k,
    #[serde(rename = "$75,000 - $100,000")]
    From75kTo100k,
    #[serde(rename = "Over $100,000")]
    Over100k,
}

impl IncomeRange {
    pub const ALL: [IncomeRange; 5] = [
        IncomeRange::Under25k,
        IncomeRange::From25kTo50k,
        IncomeRange::From50kTo75k,
        IncomeRange::From75kTo100k,
        IncomeRange::Over100k,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncomeRange::Under25k => "Under $25,000",
            IncomeRange::From25kTo50k => "$25,000 - $50,000",
            IncomeRange::From50kTo75k => "$50,000 - $75,000",
            IncomeRange::From75kTo100k => "$75,000 - $100,000",
            IncomeRange::Over100k => "Over $100,000",
        }
    }
}

impl FromStr for IncomeRange {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("income range", &Self::ALL, Self::label, s)
    }
}

/// Everything the visitor has entered so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormAnswers {
    pub claim_response: Option<ClaimResponse>,

    /// Digits only, at most five
    postal_code: String,

    /// Present iff `postal_code` is five digits with a known prefix
    detected_region: Option<&'static str>,

    pub age_range: Option<AgeRange>,
    pub income_range: Option<IncomeRange>,
}

impl FormAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn detected_region(&self) -> Option<&'static str> {
        self.detected_region
    }

    /// Store sanitized input and re-derive the region hint
    pub fn set_postal_code(&mut self, raw: &str) {
        self.postal_code = postal::sanitize(raw);
        self.detected_region = postal::region_hint(&self.postal_code);
    }

    pub fn has_details(&self) -> bool {
        self.age_range.is_some() && self.income_range.is_some()
    }
}
