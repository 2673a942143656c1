use std::sync::Arc;

use tracing::{info, warn};

use crate::db::ProductGateway;
use crate::error::{AppError, AppResult};
use crate::models::{CreateProduct, NewProduct, Product, UpdateProduct};

/// Business rules for products: validation, existence checks, partial updates.
#[derive(Clone)]
pub struct ProductService {
    gateway: Arc<dyn ProductGateway>,
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

impl ProductService {
    pub fn new(gateway: Arc<dyn ProductGateway>) -> Self {
        Self { gateway }
    }

    pub async fn add(&self, payload: CreateProduct) -> AppResult<Product> {
        let new = NewProduct::try_from(payload).inspect_err(|err| {
            warn!(error = %err, "Rejected product payload");
        })?;
        let product = self.gateway.insert(&new).await?;
        info!(id = product.id, name = %product.name, "Created product");
        Ok(product)
    }

    pub async fn get_all(&self) -> AppResult<Vec<Product>> {
        let products = self.gateway.fetch_all().await?;
        info!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// A missing product is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let product = self.gateway.fetch_by_id(id).await?;
        info!(id, found = product.is_some(), "Fetched product");
        Ok(product)
    }

    pub async fn update(&self, id: i64, changes: UpdateProduct) -> AppResult<Product> {
        let mut product = self.gateway.fetch_by_id(id).await?.ok_or_else(|| {
            warn!(id, "Cannot update missing product");
            not_found()
        })?;
        changes.validate()?;

        product.apply(&changes);
        let product = self.gateway.update(&product).await?;
        info!(id, product = %product, "Updated product");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let product = self.gateway.fetch_by_id(id).await?.ok_or_else(|| {
            warn!(id, "Cannot delete missing product");
            not_found()
        })?;

        // A concurrent delete may win between the fetch and this call.
        if !self.gateway.delete(product.id).await? {
            return Err(not_found());
        }
        info!(id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryGateway;

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryGateway::new()))
    }

    fn payload(name: &str) -> CreateProduct {
        CreateProduct {
            name: Some(name.to_string()),
            description: Some(Some("d".to_string())),
            price: Some(10.99),
            inventory: Some(100),
        }
    }

    #[tokio::test]
    async fn add_then_list_yields_one_product() {
        let svc = service();
        let created = svc.add(payload("Test Product")).await.unwrap();

        let all = svc.get_all().await.unwrap();
        assert_eq!(all, vec![created.clone()]);
        assert_eq!(created.name, "Test Product");
        assert_eq!(created.description.as_deref(), Some("d"));
        assert_eq!(created.price, 10.99);
        assert_eq!(created.inventory, 100);
    }

    #[tokio::test]
    async fn get_by_id_round_trips_and_misses_as_none() {
        let svc = service();
        let created = svc.add(payload("Lamp")).await.unwrap();
        assert_eq!(svc.get_by_id(created.id).await.unwrap(), Some(created));
        assert_eq!(svc.get_by_id(99999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn add_with_missing_fields_is_a_validation_error() {
        let svc = service();
        let err = svc
            .add(CreateProduct {
                name: Some("Incomplete".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref f) if f.len() == 3));
        assert!(svc.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_update_changes_only_name() {
        let svc = service();
        let created = svc.add(payload("Test Product")).await.unwrap();

        let updated = svc
            .update(
                created.id,
                UpdateProduct {
                    name: Some("Updated Name".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Updated Name");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.price, created.price);
        assert_eq!(updated.inventory, created.inventory);
        assert_eq!(svc.get_by_id(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let err = service()
            .update(99999, UpdateProduct::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Product not found"));
    }

    #[tokio::test]
    async fn update_missing_product_with_invalid_field_is_still_not_found() {
        let err = service()
            .update(
                99999,
                UpdateProduct {
                    price: Some(-1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_with_invalid_field_leaves_product_untouched() {
        let svc = service();
        let created = svc.add(payload("Stable")).await.unwrap();
        let err = svc
            .update(
                created.id,
                UpdateProduct {
                    price: Some(-1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(svc.get_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn delete_removes_product_and_second_delete_is_not_found() {
        let svc = service();
        let created = svc.add(payload("Doomed")).await.unwrap();

        svc.delete(created.id).await.unwrap();
        assert_eq!(svc.get_by_id(created.id).await.unwrap(), None);

        let err = svc.delete(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_name_fails_at_the_store() {
        let svc = service();
        svc.add(payload("Twin")).await.unwrap();
        let err = svc.add(payload("Twin")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
