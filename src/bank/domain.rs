//! Core bank domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, html::parse_hex_color};

/// The color given to banks when none is chosen.
pub const DEFAULT_BANK_COLOR: &str = "#1d4ed8";

/// A validated, non-empty bank name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct BankName(String);

impl BankName {
    /// Create a bank name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyBankName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyBankName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a bank name without validation.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for BankName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for BankName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a bank.
pub type BankId = DatabaseId;

/// A financial institution, e.g. 'ANZ' or 'Kiwibank'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub id: BankId,
    pub name: BankName,
    /// The display color as a hex code, e.g. `#1a2b3c`.
    pub color: String,
    pub logo_url: Option<String>,
}

/// A validated bank that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBank {
    pub name: BankName,
    pub color: String,
    pub logo_url: Option<String>,
}

impl NewBank {
    /// A bank with the default color and no logo.
    pub fn new(name: BankName) -> Self {
        Self {
            name,
            color: DEFAULT_BANK_COLOR.to_owned(),
            logo_url: None,
        }
    }
}

/// Form data for bank creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct BankFormData {
    pub name: String,
    pub color: String,
    pub logo_url: Option<String>,
}

impl TryFrom<&BankFormData> for NewBank {
    type Error = Error;

    fn try_from(form: &BankFormData) -> Result<Self, Self::Error> {
        Ok(Self {
            name: BankName::new(&form.name)?,
            color: parse_hex_color(&form.color)?,
            logo_url: form
                .logo_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_owned),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        bank::{BankFormData, BankName, NewBank},
    };

    #[test]
    fn bank_name_cannot_be_blank() {
        assert_eq!(BankName::new("   "), Err(Error::EmptyBankName));
    }

    #[test]
    fn blank_logo_url_is_none() {
        let form = BankFormData {
            name: "ANZ".to_owned(),
            color: "#0000ff".to_owned(),
            logo_url: Some("  ".to_owned()),
        };

        let bank = NewBank::try_from(&form).unwrap();

        assert_eq!(bank.logo_url, None);
    }

    #[test]
    fn rejects_invalid_color() {
        let form = BankFormData {
            name: "ANZ".to_owned(),
            color: "#00f".to_owned(),
            logo_url: None,
        };

        assert_eq!(
            NewBank::try_from(&form),
            Err(Error::InvalidColor("#00f".to_owned()))
        );
    }
}
