//! Stock API endpoints

use api_types::stock::StockLevel;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Handle requests for the current balance of every catalog product.
pub async fn get(State(state): State<ServerState>) -> Result<Json<Vec<StockLevel>>, ServerError> {
    let levels = state.engine.stock_levels().await?;

    Ok(Json(
        levels
            .into_iter()
            .map(|(product, current_stock)| StockLevel {
                product_id: product.id,
                product_name: product.name,
                current_stock,
                unit: product.unit,
            })
            .collect(),
    ))
}
