//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::utils::AppError;
use crate::utils::validation::{
    MAX_BRAND_LEN, MAX_DESCRIPTION_LEN, MAX_PRODUCT_NAME_LEN, MAX_URL_LEN, MIN_DESCRIPTION_LEN,
    MIN_PRODUCT_NAME_LEN, validate_optional_text, validate_price_value, validate_required_text,
};

pub type ProductId = Thing;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    /// Admin-set price before any dynamic adjustment
    pub base_price: f64,
    /// Canonical catalog price; mirrors base_price on every price edit
    pub current_price: f64,
    #[serde(default)]
    pub stock: i64,
    /// Record link to category
    pub category: Thing,
    #[serde(default)]
    pub image: String,
    /// "upload" | "url"
    #[serde(default = "default_image_type")]
    pub image_type: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Global view counter, incremented atomically on every detail view
    #[serde(default)]
    pub visit_count: i64,
    #[serde(default)]
    pub created_by: Option<Thing>,
    #[serde(default)]
    pub created_at: Datetime,
    #[serde(default)]
    pub updated_at: Datetime,
}

fn default_true() -> bool {
    true
}

fn default_image_type() -> String {
    "url".to_string()
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub stock: i64,
    /// Category id ("category:xyz" or bare key)
    pub category: String,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
}

impl ProductCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.name, "name", MIN_PRODUCT_NAME_LEN, MAX_PRODUCT_NAME_LEN)?;
        validate_required_text(
            &self.description,
            "description",
            MIN_DESCRIPTION_LEN,
            MAX_DESCRIPTION_LEN,
        )?;
        validate_price_value(self.base_price, "basePrice")?;
        if self.stock < 0 {
            return Err(AppError::validation("stock must be a non-negative integer"));
        }
        validate_optional_text(&self.brand, "brand", MAX_BRAND_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)?;
        Ok(())
    }
}

/// Update product payload, every field optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_required_text(name, "name", MIN_PRODUCT_NAME_LEN, MAX_PRODUCT_NAME_LEN)?;
        }
        if let Some(ref description) = self.description {
            validate_required_text(
                description,
                "description",
                MIN_DESCRIPTION_LEN,
                MAX_DESCRIPTION_LEN,
            )?;
        }
        if let Some(base_price) = self.base_price {
            validate_price_value(base_price, "basePrice")?;
        }
        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err(AppError::validation("stock must be a non-negative integer"));
        }
        validate_optional_text(&self.brand, "brand", MAX_BRAND_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_payload() -> ProductCreate {
        ProductCreate {
            name: "Wireless Mouse".to_string(),
            description: "A reliable wireless mouse.".to_string(),
            base_price: 24.99,
            stock: 10,
            category: "category:abc".to_string(),
            image: Some("https://example.com/mouse.jpg".to_string()),
            brand: Some("Logi".to_string()),
            tags: None,
            is_featured: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(create_payload().validate().is_ok());
    }

    #[test]
    fn short_name_is_rejected() {
        let mut payload = create_payload();
        payload.name = "x".to_string();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut payload = create_payload();
        payload.base_price = -0.01;
        assert!(payload.validate().is_err());

        let update = ProductUpdate {
            base_price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn zero_price_is_allowed() {
        let mut payload = create_payload();
        payload.base_price = 0.0;
        assert!(payload.validate().is_ok());
    }
}
