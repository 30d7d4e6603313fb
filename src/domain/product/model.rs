//! Product domain entities

use rust_decimal::Decimal;

use crate::domain::{Money, UserContext};

/// Price factor applied for preferred customers (5% off).
pub const PREFERRED_DISCOUNT_FACTOR: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub unit_price: Money,
    pub is_featured: bool,
}

impl Product {
    pub fn new(name: impl Into<String>, unit_price: Money, is_featured: bool) -> Self {
        Self {
            name: name.into(),
            unit_price,
            is_featured,
        }
    }

    /// Copy of this product carrying a different price.
    pub fn with_unit_price(&self, unit_price: Money) -> Self {
        Self {
            name: self.name.clone(),
            unit_price,
            is_featured: self.is_featured,
        }
    }

    /// Price this product for a particular customer.
    pub fn apply_discount_for(&self, user: &dyn UserContext) -> DiscountedProduct {
        let factor = if user.is_preferred() {
            PREFERRED_DISCOUNT_FACTOR
        } else {
            Decimal::ONE
        };

        DiscountedProduct {
            name: self.name.clone(),
            unit_price: &self.unit_price * factor,
        }
    }
}

/// A product priced for one customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountedProduct {
    pub name: String,
    pub unit_price: Money,
}

/// Data for a product that is not stored yet
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub unit_price: Money,
    pub is_featured: bool,
}
