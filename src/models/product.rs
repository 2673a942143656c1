use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, FieldError};

pub const NAME_MAX_LEN: usize = 128;
pub const DESCRIPTION_MAX_LEN: usize = 1024;

/// Core product entity. Every key is serialized, `description` as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub inventory: i64,
}

impl Product {
    /// Copy every supplied field of `changes` over this product.
    pub fn apply(&mut self, changes: &UpdateProduct) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(inventory) = changes.inventory {
            self.inventory = inventory;
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Product {}>", self.name)
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Raw creation body. Keys are checked by [`NewProduct::try_from`].
#[derive(Debug, Default, Deserialize)]
pub struct CreateProduct {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub inventory: Option<i64>,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub inventory: i64,
}

impl TryFrom<CreateProduct> for NewProduct {
    type Error = AppError;

    fn try_from(payload: CreateProduct) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        if payload.name.is_none() {
            errors.push(FieldError::missing("name"));
        }
        if payload.description.is_none() {
            errors.push(FieldError::missing("description"));
        }
        if payload.price.is_none() {
            errors.push(FieldError::missing("price"));
        }
        if payload.inventory.is_none() {
            errors.push(FieldError::missing("inventory"));
        }

        check_fields(
            payload.name.as_deref(),
            payload.description.as_ref().and_then(|d| d.as_deref()),
            payload.price,
            payload.inventory,
            &mut errors,
        );

        match (payload.name, payload.description, payload.price, payload.inventory) {
            (Some(name), Some(description), Some(price), Some(inventory)) if errors.is_empty() => {
                Ok(NewProduct {
                    name,
                    description,
                    price,
                    inventory,
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Partial update body. Absent keys leave the stored value untouched;
/// `"description": null` clears the description.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub inventory: Option<i64>,
}

impl UpdateProduct {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        check_fields(
            self.name.as_deref(),
            self.description.as_ref().and_then(|d| d.as_deref()),
            self.price,
            self.inventory,
            &mut errors,
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn check_fields(
    name: Option<&str>,
    description: Option<&str>,
    price: Option<f64>,
    inventory: Option<i64>,
    errors: &mut Vec<FieldError>,
) {
    if let Some(name) = name {
        if name.trim().is_empty() {
            errors.push(FieldError::invalid("name", "name must not be empty"));
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.push(FieldError::invalid(
                "name",
                format!("name must be at most {} characters", NAME_MAX_LEN),
            ));
        }
    }
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            errors.push(FieldError::invalid(
                "description",
                format!("description must be at most {} characters", DESCRIPTION_MAX_LEN),
            ));
        }
    }
    if let Some(price) = price {
        if !price.is_finite() || price < 0.0 {
            errors.push(FieldError::invalid("price", "price must be >= 0"));
        }
    }
    if let Some(inventory) = inventory {
        if inventory < 0 {
            errors.push(FieldError::invalid("inventory", "inventory must be >= 0"));
        }
    }
}
