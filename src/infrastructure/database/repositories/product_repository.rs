//! SeaORM implementation of ProductRepository and ProductCatalog

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, info};

use crate::domain::{
    DomainError, DomainResult, NewProduct, Product, ProductCatalog, ProductRepository,
};
use crate::infrastructure::database::entities::product;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StorageUnavailable(e.to_string())
}

pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn get_featured_products(&self) -> DomainResult<Vec<Product>> {
        let models = product::Entity::find()
            .filter(product::Column::IsFeatured.eq(true))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        debug!("Loaded {} featured products", models.len());
        Ok(models.into_iter().map(product::Model::to_domain).collect())
    }
}

#[async_trait]
impl ProductCatalog for SeaOrmProductRepository {
    async fn add_product(&self, p: NewProduct) -> DomainResult<i32> {
        let model = product::ActiveModel {
            name: Set(p.name),
            unit_price: Set(p.unit_price.amount()),
            currency: Set(p.unit_price.currency().code().to_string()),
            is_featured: Set(p.is_featured),
            ..Default::default()
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!("Product saved: {} ({})", result.name, result.id);
        Ok(result.id)
    }

    async fn count(&self) -> DomainResult<u64> {
        product::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::domain::{Currency, Money};
    use crate::infrastructure::database::migrator::Migrator;

    async fn repository() -> SeaOrmProductRepository {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmProductRepository::new(db)
    }

    fn new_product(name: &str, cents: i64, featured: bool) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            unit_price: Money::new(Decimal::new(cents, 2), Currency::usd()),
            is_featured: featured,
        }
    }

    #[tokio::test]
    async fn test_only_featured_products_are_returned() {
        let repo = repository().await;
        repo.add_product(new_product("Widget", 1050, true)).await.unwrap();
        repo.add_product(new_product("Gadget", 2500, false)).await.unwrap();
        repo.add_product(new_product("Gizmo", 499, true)).await.unwrap();

        let featured = repo.get_featured_products().await.unwrap();

        let names: Vec<&str> = featured.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gizmo"]);
        assert!(featured.iter().all(|p| p.is_featured));
        assert_eq!(featured[0].unit_price.amount(), Decimal::new(1050, 2));
        assert_eq!(featured[0].unit_price.currency(), &Currency::usd());
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let repo = repository().await;
        assert!(repo.get_featured_products().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_connection_reports_storage_unavailable() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db.clone().close().await.unwrap();
        let repo = SeaOrmProductRepository::new(db);

        let err = repo.get_featured_products().await.unwrap_err();
        assert!(matches!(err, DomainError::StorageUnavailable(_)));
    }
}
