use serde::{Deserialize, Serialize};
use std::fmt;

/// identifier of a saved property; listings use their numeric id rendered as text
pub type PropertyId = String;

/// property categories shown in the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PropertyType {
    #[default]
    Rumah,
    Apartemen,
    Ruko,
    Kost,
}

impl PropertyType {
    /// map a category name, falling back to `Rumah` for unknown names
    pub fn from_category_name(name: &str) -> Self {
        match name.trim() {
            "Apartemen" => PropertyType::Apartemen,
            "Ruko" => PropertyType::Ruko,
            "Kost" => PropertyType::Kost,
            _ => PropertyType::Rumah,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Rumah => "Rumah",
            PropertyType::Apartemen => "Apartemen",
            PropertyType::Ruko => "Ruko",
            PropertyType::Kost => "Kost",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// fields of the kpr form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanField {
    PropertyPrice,
    DownPayment,
    TermYears,
    AnnualRate,
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoanField::PropertyPrice => "property_price",
            LoanField::DownPayment => "down_payment",
            LoanField::TermYears => "term_years",
            LoanField::AnnualRate => "annual_rate",
        };
        f.write_str(name)
    }
}

/// bedroom/bathroom/area summary of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PropertySpecs {
    pub beds: u32,
    pub baths: u32,
    /// building area in m2
    pub area: u32,
}
