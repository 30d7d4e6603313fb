//! Product entity: the persisted form of a catalog item

use sea_orm::entity::prelude::*;

use crate::domain::{Currency, Money, Product};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name: String,

    /// Price in major units, two fractional digits
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,

    /// Currency code (ISO 4217)
    #[sea_orm(column_type = "String(StringLen::N(5))")]
    pub currency: String,

    pub is_featured: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Map the stored row onto the domain product.
    pub fn to_domain(self) -> Product {
        Product {
            name: self.name,
            unit_price: Money::new(self.unit_price, Currency::new(self.currency)),
            is_featured: self.is_featured,
        }
    }
}
