//! Guessing the category of an imported transaction from its description.

use crate::category::{Category, CategoryId};

/// Words commonly found in bank statement descriptions and the category name they suggest.
const KEYWORDS: &[(&str, &str)] = &[
    ("supermarket", "Groceries"),
    ("grocer", "Groceries"),
    ("countdown", "Groceries"),
    ("walmart", "Groceries"),
    ("uber eats", "Dining"),
    ("restaurant", "Dining"),
    ("cafe", "Dining"),
    ("coffee", "Dining"),
    ("uber", "Transport"),
    ("taxi", "Transport"),
    ("fuel", "Transport"),
    ("petrol", "Transport"),
    ("parking", "Transport"),
    ("netflix", "Subscriptions"),
    ("spotify", "Subscriptions"),
    ("power", "Utilities"),
    ("electric", "Utilities"),
    ("water", "Utilities"),
    ("internet", "Utilities"),
    ("rent", "Housing"),
    ("mortgage", "Housing"),
    ("pharmacy", "Health"),
    ("doctor", "Health"),
    ("salary", "Salary"),
    ("payroll", "Salary"),
];

/// Assigns categories by matching descriptions against category names and keywords.
pub struct Categorizer {
    /// Lowercase category names, longest first.
    names: Vec<(String, CategoryId)>,
}

impl Categorizer {
    pub fn new(categories: &[Category]) -> Self {
        let mut names: Vec<_> = categories
            .iter()
            .map(|category| (category.name.as_ref().to_lowercase(), category.id))
            .collect();
        names.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self { names }
    }

    /// The category for `description`.
    ///
    /// A category whose name appears in the description wins, the longest name
    /// first. Otherwise the first keyword found in the description picks the
    /// category with the matching name, if that category exists.
    pub fn categorize(&self, description: &str) -> Option<CategoryId> {
        let description = description.to_lowercase();

        if let Some((_, id)) = self
            .names
            .iter()
            .find(|(name, _)| description.contains(name.as_str()))
        {
            return Some(*id);
        }

        KEYWORDS
            .iter()
            .filter(|(keyword, _)| description.contains(keyword))
            .find_map(|(_, category_name)| self.find_by_name(category_name))
    }

    fn find_by_name(&self, category_name: &str) -> Option<CategoryId> {
        let category_name = category_name.to_lowercase();

        self.names
            .iter()
            .find(|(name, _)| *name == category_name)
            .map(|(_, id)| *id)
    }
}
