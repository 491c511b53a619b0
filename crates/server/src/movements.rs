//! Movements API endpoints

use api_types::movement::{MovementNew, MovementView};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};
use engine::{MovementRecord, MovementRequest, Product};

fn view(record: MovementRecord, product: &Product) -> MovementView {
    MovementView {
        id: record.id,
        product_id: record.product_id,
        product_name: product.name.clone(),
        unit: product.unit.clone(),
        quantity: record.quantity,
        date: record.effective_date,
        stock_after: record.stock_after,
        created_at: record.created_at,
    }
}

/// Handle movement submissions. All rules live in the engine's validator;
/// this handler only translates between wire types and the engine.
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<MovementNew>,
) -> Result<(StatusCode, Json<MovementView>), ServerError> {
    let request = MovementRequest {
        product_id: payload.product_id,
        quantity: payload.quantity,
        effective_date: payload.date,
    };

    let record = state.engine.submit_movement(&request).await?;
    let product = state
        .engine
        .find_product(&record.product_id)
        .await?
        .ok_or_else(|| engine::EngineError::UnknownProduct(record.product_id.clone()))?;

    Ok((StatusCode::CREATED, Json(view(record, &product))))
}

/// Handle requests for the full movement history, business date descending.
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<MovementView>>, ServerError> {
    let rows = state.engine.movements().await?;

    Ok(Json(
        rows.into_iter()
            .map(|(record, product)| view(record, &product))
            .collect(),
    ))
}
