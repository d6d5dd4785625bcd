//! The "add product" form.

use crate::error::{CatalogError, Result};
use crate::models::NewProduct;

/// Raw text of the six input controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub image: String,
}

impl ProductForm {
    /// Validate the inputs and build a create body stamped with `today`.
    ///
    /// Rating always starts at 0.
    pub fn to_new_product(&self, today: &str) -> Result<NewProduct> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("name is required".into()));
        }

        Ok(NewProduct {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            price: parse_price(&self.price)?,
            stock: parse_stock(&self.stock)?,
            image: self.image.trim().to_string(),
            rating: 0.0,
            last_updated: today.to_string(),
        })
    }

    /// Empty every control.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a non-negative, finite decimal price.
pub fn parse_price(raw: &str) -> Result<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CatalogError::InvalidInput(format!("price '{raw}' is not a number")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::InvalidInput(format!(
            "price must be a non-negative number, got '{raw}'"
        )));
    }
    Ok(price)
}

/// Parse a non-negative integer stock count.
pub fn parse_stock(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return Err(CatalogError::InvalidInput(format!(
            "stock cannot be negative, got '{raw}'"
        )));
    }
    trimmed
        .parse()
        .map_err(|_| CatalogError::InvalidInput(format!("stock '{raw}' is not a whole number")))
}
