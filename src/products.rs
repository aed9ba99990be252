//! Products

use thiserror::Error;

use crate::{prices::Price, promotions::PromotionKey};

/// Errors raised while constructing a product record.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Name is blank or the reserved word `null`.
    #[error("product name must not be blank or the reserved word \"null\"")]
    InvalidName,

    /// Price is zero.
    #[error("product price must be greater than zero")]
    ZeroPrice,
}

/// One inventory record: a product variant with its own stock count.
///
/// A product listed both with and without a promotion occupies two records
/// that share a name but track stock independently.
#[derive(Debug, Clone)]
pub struct Product {
    name: String,
    price: Price,
    quantity: u32,
    promotion: Option<PromotionKey>,
}

impl Product {
    /// Create a new product record.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if the name is blank or reserved, or the
    /// price is zero.
    pub fn new(
        name: impl Into<String>,
        price: Price,
        quantity: u32,
        promotion: Option<PromotionKey>,
    ) -> Result<Self, ProductError> {
        let name = name.into();

        if name.trim().is_empty() || name == "null" {
            return Err(ProductError::InvalidName);
        }

        if *price == 0 {
            return Err(ProductError::ZeroPrice);
        }

        Ok(Product {
            name,
            price,
            quantity,
            promotion,
        })
    }

    /// Product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Units currently in stock.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Key of the attached promotion, if any.
    pub fn promotion(&self) -> Option<PromotionKey> {
        self.promotion
    }

    /// Whether this record carries a promotion.
    pub fn has_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Remove units from stock.
    ///
    /// Returns `false` and leaves the record unchanged when more units are
    /// requested than are in stock.
    pub(crate) fn deduct(&mut self, units: u32) -> bool {
        match self.quantity.checked_sub(units) {
            Some(remaining) => {
                self.quantity = remaining;
                true
            }
            None => false,
        }
    }
}
