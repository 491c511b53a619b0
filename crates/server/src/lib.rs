use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod movements;
mod products;
mod server;
mod stock;

pub mod types {
    pub mod movement {
        pub use api_types::movement::{MovementNew, MovementView};
    }

    pub mod stock {
        pub use api_types::stock::StockLevel;
    }

    pub mod product {
        pub use api_types::product::{ProductNew, ProductView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::UnknownProduct(_) => StatusCode::NOT_FOUND,
        EngineError::ProductExists(_) => StatusCode::CONFLICT,
        // A movement that exhausted its retry is reported as a store
        // problem, same as any other infrastructure failure.
        EngineError::ConcurrentModification | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::MissingField(_)
        | EngineError::InvalidQuantity(_)
        | EngineError::FutureDate(_)
        | EngineError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::ConcurrentModification => {
            tracing::error!("movement still racing after retry");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
