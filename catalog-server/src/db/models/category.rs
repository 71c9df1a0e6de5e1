//! Category Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::utils::AppError;
use crate::utils::validation::{
    MAX_CATEGORY_DESC_LEN, MAX_CATEGORY_NAME_LEN, MIN_CATEGORY_NAME_LEN, validate_optional_text,
    validate_required_text,
};

pub type CategoryId = Thing;

/// Category model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    /// Unique case-insensitively
    pub name: String,
    /// URL-friendly form of the name
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Denormalized count of active products referencing this category.
    /// Maintained incrementally on product create/delete; may drift if
    /// an update fails partway (accepted eventual consistency).
    #[serde(default)]
    pub product_count: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<Thing>,
    #[serde(default)]
    pub created_at: Datetime,
}

fn default_true() -> bool {
    true
}

/// Derive a URL slug from a category name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Create category payload
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.name, "name", MIN_CATEGORY_NAME_LEN, MAX_CATEGORY_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_CATEGORY_DESC_LEN)?;
        Ok(())
    }
}

/// Update category payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_required_text(name, "name", MIN_CATEGORY_NAME_LEN, MAX_CATEGORY_NAME_LEN)?;
        }
        validate_optional_text(&self.description, "description", MAX_CATEGORY_DESC_LEN)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basics() {
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("  Electronics  "), "electronics");
        assert_eq!(slugify("Books!"), "books");
        assert_eq!(slugify("A  B"), "a-b");
    }

    #[test]
    fn name_length_bounds() {
        let ok = CategoryCreate {
            name: "Toys".to_string(),
            description: None,
        };
        assert!(ok.validate().is_ok());

        let short = CategoryCreate {
            name: "T".to_string(),
            description: None,
        };
        assert!(short.validate().is_err());

        let long_desc = CategoryCreate {
            name: "Toys".to_string(),
            description: Some("x".repeat(201)),
        };
        assert!(long_desc.validate().is_err());
    }
}
