//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, html::parse_hex_color};

/// The color given to categories when none is chosen.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A category for grouping transactions (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    /// An emoji or short code shown next to the name.
    pub icon: String,
    /// The display color as a hex code, e.g. `#1a2b3c`.
    pub color: String,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub color: String,
}

impl CategoryFormData {
    /// Validate the form, returning the category name, icon and color.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] or [Error::InvalidColor] for invalid fields.
    pub fn validate(&self) -> Result<(CategoryName, String, String), Error> {
        let name = CategoryName::new(&self.name)?;
        let color = parse_hex_color(&self.color)?;

        Ok((name, self.icon.trim().to_owned(), color))
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::{
        Error,
        category::{CategoryFormData, CategoryName},
    };

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CategoryName::new("\n\t \r"), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_name() {
        assert_eq!(
            CategoryName::new("  Groceries "),
            Ok(CategoryName::new_unchecked("Groceries"))
        );
    }

    #[test]
    fn form_rejects_bad_color() {
        let form = CategoryFormData {
            name: "Food".to_owned(),
            icon: "🍔".to_owned(),
            color: "blue".to_owned(),
        };

        assert_eq!(form.validate(), Err(Error::InvalidColor("blue".to_owned())));
    }
}
