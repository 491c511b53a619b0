//! Movement primitives.
//!
//! A `MovementRecord` is one immutable line of the ledger: a signed quantity
//! applied to a product, together with the materialized balance right after
//! it. Records are append-only; corrections happen by appending compensating
//! movements, never by editing history.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// One accepted, persisted stock movement.
///
/// `id` is assigned by the store in strictly increasing creation order and,
/// together with `created_at`, is the authoritative ordering key for balance
/// derivation. `effective_date` is the business date and may be backdated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: i64,
    pub product_id: String,
    /// Signed: positive for stock in, negative for stock out.
    pub quantity: i64,
    pub effective_date: NaiveDate,
    /// Running balance immediately after this movement. Never negative.
    pub stock_after: i64,
    pub created_at: DateTime<Utc>,
}

/// A movement that passed every validation rule and is ready to append.
///
/// `new_stock` was computed against `prior_stock` during validation; the
/// store re-checks `prior_stock` at write time so a stale check can never
/// slip a negative balance in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedMovement {
    pub product_id: String,
    pub quantity: i64,
    pub effective_date: NaiveDate,
    pub prior_stock: i64,
    pub new_stock: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: String,
    pub quantity: i64,
    pub effective_date: Date,
    pub stock_after: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MovementRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            effective_date: model.effective_date,
            stock_after: model.stock_after,
            created_at: model.created_at,
        }
    }
}

/// Builds the row for a validated movement. `id` stays unset so the store
/// assigns the next value in creation order.
pub(crate) fn new_row(validated: &ValidatedMovement, created_at: DateTime<Utc>) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        product_id: ActiveValue::Set(validated.product_id.clone()),
        quantity: ActiveValue::Set(validated.quantity),
        effective_date: ActiveValue::Set(validated.effective_date),
        stock_after: ActiveValue::Set(validated.new_stock),
        created_at: ActiveValue::Set(created_at),
    }
}
