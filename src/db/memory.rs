use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProductGateway;
use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, Product};

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Product>,
}

impl Table {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }
}

/// In-process store with the same contract as the PostgreSQL table:
/// ids start at 1 and are never reused, names are unique.
#[derive(Debug)]
pub struct MemoryGateway {
    table: RwLock<Table>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

fn duplicate_name() -> AppError {
    AppError::Conflict("Product name already exists".to_string())
}

#[async_trait]
impl ProductGateway for MemoryGateway {
    async fn insert(&self, product: &NewProduct) -> AppResult<Product> {
        let mut table = self.table.write().await;
        if table.name_taken(&product.name, None) {
            return Err(duplicate_name());
        }

        let id = table.next_id;
        table.next_id += 1;

        let row = Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            inventory: product.inventory,
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn fetch_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, product: &Product) -> AppResult<Product> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&product.id) {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        if table.name_taken(&product.name, Some(product.id)) {
            return Err(duplicate_name());
        }
        table.rows.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
