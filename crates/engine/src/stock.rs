//! Stock calculator.
//!
//! The single authoritative answer to "how much is on hand": the
//! `stock_after` of a product's most recent ledger record, zero when the
//! product has no history. Both the validator and every read projection go
//! through [`latest_stock`]; the quantity column is never re-summed anywhere
//! else, so a continuity bug cannot hide behind two diverging calculations.

use sea_orm::{ConnectionTrait, DbErr, QueryFilter, QueryOrder, prelude::*};

use crate::movements;

/// Returns the current balance for `product_id`.
///
/// Pure read; works on a live connection or inside an open transaction so
/// the append path can re-check the balance it validated against.
pub(crate) async fn latest_stock<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
) -> Result<i64, DbErr> {
    let last = movements::Entity::find()
        .filter(movements::Column::ProductId.eq(product_id))
        .order_by_desc(movements::Column::Id)
        .one(db)
        .await?;

    Ok(last.map_or(0, |record| record.stock_after))
}
