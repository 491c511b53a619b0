//! Product catalog API endpoints
//!
//! The ledger core only reads the catalog; these admin routes exist so an
//! installation can be seeded without touching the database directly.

use api_types::product::{ProductNew, ProductView};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

/// Handle requests for listing catalog products.
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProductView>>, ServerError> {
    let products = state.engine.products().await?;

    Ok(Json(
        products
            .into_iter()
            .map(|product| ProductView {
                id: product.id,
                name: product.name,
                unit: product.unit,
            })
            .collect(),
    ))
}

/// Handle requests for registering a new catalog product.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductNew>,
) -> Result<(StatusCode, Json<ProductView>), ServerError> {
    let (Some(id), Some(name), Some(unit)) = (payload.id, payload.name, payload.unit) else {
        return Err(ServerError::Generic(
            "id, name, and unit are required".to_string(),
        ));
    };

    let product = state.engine.new_product(&id, &name, &unit).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductView {
            id: product.id,
            name: product.name,
            unit: product.unit,
        }),
    ))
}
