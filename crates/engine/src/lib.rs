//! Inventory ledger engine.
//!
//! Stock is never stored as a mutable counter. Every change enters as an
//! immutable [`MovementRecord`] carrying the running balance after itself,
//! and "current stock" is always the `stock_after` of the newest record.
//! The engine orchestrates validation, balance derivation and the single
//! append path into the store; the HTTP layer on top is a thin caller.

use chrono::{NaiveDate, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

pub use error::EngineError;
pub use movements::{MovementRecord, ValidatedMovement};
pub use products::Product;
pub use validate::MovementRequest;

mod error;
mod movements;
mod products;
mod stock;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Validates and appends one movement, the only way records enter the
    /// ledger.
    ///
    /// Validation computes the new balance against the stock it read; the
    /// append re-checks that stock inside the write transaction and the
    /// whole sequence is retried once when a concurrent append for the same
    /// product got there first. A rejected movement leaves the store
    /// untouched.
    pub async fn submit_movement(&self, request: &MovementRequest) -> ResultEngine<MovementRecord> {
        let today = Utc::now().date_naive();
        let mut retried = false;
        loop {
            let validated = self.validate_movement(request, today).await?;
            match self.append(&validated).await {
                Err(EngineError::ConcurrentModification) if !retried => {
                    retried = true;
                    tracing::warn!(
                        product_id = %validated.product_id,
                        "append raced a concurrent movement, revalidating"
                    );
                }
                other => return other,
            }
        }
    }

    /// Full validation pipeline: structural rules, catalog lookup, then the
    /// non-negativity check against the current balance.
    async fn validate_movement(
        &self,
        request: &MovementRequest,
        today: NaiveDate,
    ) -> ResultEngine<ValidatedMovement> {
        let parsed = validate::parse_request(request, today)?;

        let product = self
            .find_product(&parsed.product_id)
            .await?
            .ok_or_else(|| EngineError::UnknownProduct(parsed.product_id.clone()))?;

        let prior_stock = stock::latest_stock(&self.database, &product.id).await?;
        let new_stock = prior_stock + parsed.quantity;
        if new_stock < 0 {
            return Err(EngineError::InsufficientStock {
                available: prior_stock,
                unit: product.unit,
            });
        }

        Ok(ValidatedMovement {
            product_id: product.id,
            quantity: parsed.quantity,
            effective_date: parsed.effective_date,
            prior_stock,
            new_stock,
        })
    }

    /// Store append. Optimistic: the movement declares which balance it was
    /// validated against; if the ledger moved on in the meantime the append
    /// is rejected instead of materializing a stale (possibly negative)
    /// balance.
    async fn append(&self, validated: &ValidatedMovement) -> ResultEngine<MovementRecord> {
        let db_tx = self.database.begin().await?;

        let latest = stock::latest_stock(&db_tx, &validated.product_id).await?;
        if latest != validated.prior_stock {
            return Err(EngineError::ConcurrentModification);
        }

        let model = movements::new_row(validated, Utc::now())
            .insert(&db_tx)
            .await?;
        db_tx.commit().await?;

        Ok(model.into())
    }

    /// Current balance for a product: latest `stock_after`, zero with no
    /// history. Does not require the product to exist in the catalog.
    pub async fn current_stock(&self, product_id: &str) -> ResultEngine<i64> {
        let product_id = products::normalize_id(product_id);
        Ok(stock::latest_stock(&self.database, &product_id).await?)
    }

    /// Current balance for every catalog product, catalog order.
    pub async fn stock_levels(&self) -> ResultEngine<Vec<(Product, i64)>> {
        let product_models = products::Entity::find()
            .order_by_asc(products::Column::Id)
            .all(&self.database)
            .await?;

        let mut levels = Vec::with_capacity(product_models.len());
        for model in product_models {
            let product = Product::from(model);
            let current = stock::latest_stock(&self.database, &product.id).await?;
            levels.push((product, current));
        }
        Ok(levels)
    }

    /// Full movement history enriched with catalog data, business date
    /// descending with creation order as tie-break.
    pub async fn movements(&self) -> ResultEngine<Vec<(MovementRecord, Product)>> {
        let rows: Vec<(movements::Model, Option<products::Model>)> = movements::Entity::find()
            .find_also_related(products::Entity)
            .order_by_desc(movements::Column::EffectiveDate)
            .order_by_desc(movements::Column::Id)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (movement_model, product_model) in rows {
            let Some(product_model) = product_model else {
                continue;
            };
            out.push((movement_model.into(), product_model.into()));
        }
        Ok(out)
    }

    /// Ledger history for one product, newest first.
    pub async fn movements_for_product(
        &self,
        product_id: &str,
    ) -> ResultEngine<Vec<MovementRecord>> {
        let product_id = products::normalize_id(product_id);
        let models = movements::Entity::find()
            .filter(movements::Column::ProductId.eq(product_id))
            .order_by_desc(movements::Column::Id)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Catalog lookup by id (normalized first).
    pub async fn find_product(&self, product_id: &str) -> ResultEngine<Option<Product>> {
        let product_id = products::normalize_id(product_id);
        let model = products::Entity::find_by_id(product_id)
            .one(&self.database)
            .await?;
        Ok(model.map(Into::into))
    }

    /// Catalog listing, id order.
    pub async fn products(&self) -> ResultEngine<Vec<Product>> {
        let models = products::Entity::find()
            .order_by_asc(products::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Registers a catalog product. Ids are unique and immutable.
    pub async fn new_product(&self, id: &str, name: &str, unit: &str) -> ResultEngine<Product> {
        let product = Product::new(id, name, unit);
        if self.find_product(&product.id).await?.is_some() {
            return Err(EngineError::ProductExists(product.id));
        }

        products::ActiveModel::from(&product)
            .insert(&self.database)
            .await?;
        Ok(product)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, verifying the store is reachable.
    pub async fn build(self) -> Result<Engine, EngineError> {
        self.database.ping().await?;
        Ok(Engine {
            database: self.database,
        })
    }
}
