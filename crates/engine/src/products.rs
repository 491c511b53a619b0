//! The module contains the `Product` catalog entry and its entity.
//!
//! The catalog is read-only to the ledger: movements reference a product's
//! id and unit of measure, nothing here ever touches stock.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// `id` is a caller-chosen code (e.g. `"P001"`), uppercased at the boundary
/// so lookups are case-insensitive. It never changes once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub unit: String,
}

impl Product {
    pub fn new(id: &str, name: &str, unit: &str) -> Self {
        Self {
            id: normalize_id(id),
            name: name.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Canonical form of a product id: trimmed and uppercased.
pub fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movements::Entity")]
    Movements,
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.clone()),
            name: ActiveValue::Set(product.name.clone()),
            unit: ActiveValue::Set(product.unit.clone()),
        }
    }
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            unit: model.unit,
        }
    }
}
