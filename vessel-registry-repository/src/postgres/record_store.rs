use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;
use vessel_registry_shared::{CategoryReference, Vessel, VesselId};

use crate::errors::VesselRepositoryError;
use crate::interfaces::PartitionedRecordStore;
use crate::types::{
    BatchOperation, ClusteringRange, ClusteringValue, ColumnFilter, RowColumns, RowKey,
    ScanRequest, ViewName, ViewRow,
};
use crate::views::identifier_key;

/// PostgreSQL implementation of the partitioned record store.
///
/// Each view is a table whose primary key is (partition key, clustering key):
///
/// - `vessels_by_uuid (uuid)`
/// - `vessels (partition_key, uuid)`, with denormalized `name` and `category` columns
/// - `vessels_by_departure_port (port, departure_time, uuid)`
///
/// The canonical vessel is stored as JSONB in every table. Batches run inside one
/// transaction, which is stronger than the interface requires.
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a store over an existing connection pool.
    ///
    /// The pool's lifecycle stays with the caller. The schema must exist; see
    /// [`PostgresRecordStore::migrate`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), VesselRepositoryError> {
        sqlx::migrate!("src/postgres/migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    async fn apply_tx(
        operation: &BatchOperation,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), VesselRepositoryError> {
        match operation {
            BatchOperation::Upsert(row) => Self::upsert_tx(row, tx).await,
            BatchOperation::Delete(key) => Self::delete_tx(key, tx).await,
        }
    }

    async fn upsert_tx(
        row: &ViewRow,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), VesselRepositoryError> {
        let key = &row.key;
        let payload = Json(&row.vessel);

        match key.view {
            ViewName::ById => {
                sqlx::query(
                    r#"
                    INSERT INTO vessels_by_uuid (uuid, payload)
                    VALUES ($1, $2)
                    ON CONFLICT (uuid) DO UPDATE SET payload = EXCLUDED.payload
                    "#,
                )
                .bind(partition_uuid(key)?)
                .bind(payload)
                .execute(&mut **tx)
                .await?;
            }
            ViewName::ByScope => {
                let name = row
                    .columns
                    .name
                    .clone()
                    .unwrap_or_else(|| row.vessel.name().to_string());
                let category = row
                    .columns
                    .category
                    .clone()
                    .unwrap_or_else(|| row.vessel.category().clone());

                sqlx::query(
                    r#"
                    INSERT INTO vessels (partition_key, uuid, name, category, payload)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (partition_key, uuid) DO UPDATE SET
                        name = EXCLUDED.name,
                        category = EXCLUDED.category,
                        payload = EXCLUDED.payload
                    "#,
                )
                .bind(&key.partition_key)
                .bind(clustering_uuid(key, 0)?)
                .bind(name)
                .bind(category.as_str())
                .bind(payload)
                .execute(&mut **tx)
                .await?;
            }
            ViewName::ByDeparture => {
                sqlx::query(
                    r#"
                    INSERT INTO vessels_by_departure_port (port, departure_time, uuid, payload)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (port, departure_time, uuid) DO UPDATE SET payload = EXCLUDED.payload
                    "#,
                )
                .bind(&key.partition_key)
                .bind(clustering_time(key, 0)?)
                .bind(clustering_uuid(key, 1)?)
                .bind(payload)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }

    async fn delete_tx(
        key: &RowKey,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), VesselRepositoryError> {
        match key.view {
            ViewName::ById => {
                sqlx::query("DELETE FROM vessels_by_uuid WHERE uuid = $1")
                    .bind(partition_uuid(key)?)
                    .execute(&mut **tx)
                    .await?;
            }
            ViewName::ByScope => {
                sqlx::query("DELETE FROM vessels WHERE partition_key = $1 AND uuid = $2")
                    .bind(&key.partition_key)
                    .bind(clustering_uuid(key, 0)?)
                    .execute(&mut **tx)
                    .await?;
            }
            ViewName::ByDeparture => {
                sqlx::query(
                    r#"
                    DELETE FROM vessels_by_departure_port
                    WHERE port = $1 AND departure_time = $2 AND uuid = $3
                    "#,
                )
                .bind(&key.partition_key)
                .bind(clustering_time(key, 0)?)
                .bind(clustering_uuid(key, 1)?)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }

    fn scan_query(request: &ScanRequest) -> Result<QueryBuilder<'_, Postgres>, VesselRepositoryError> {
        request.check_supported()?;

        let mut query = match request.view {
            ViewName::ById => {
                let uuid = Uuid::parse_str(&request.partition_key).map_err(|e| {
                    VesselRepositoryError::invalid_argument(format!(
                        "malformed partition key {}: {}",
                        request.partition_key, e
                    ))
                })?;
                let mut query =
                    QueryBuilder::new("SELECT uuid, payload FROM vessels_by_uuid WHERE uuid = ");
                query.push_bind(uuid);
                query
            }
            ViewName::ByScope => {
                let mut query = QueryBuilder::new(
                    "SELECT partition_key, uuid, name, category, payload FROM vessels WHERE partition_key = ",
                );
                query.push_bind(request.partition_key.as_str());
                match &request.filter {
                    Some(ColumnFilter::NameContains(fragment)) => {
                        query.push(" AND name ILIKE ");
                        query.push_bind(format!("%{}%", escape_like(fragment)));
                    }
                    Some(ColumnFilter::CategoryEquals(category)) => {
                        query.push(" AND category = ");
                        query.push_bind(category.as_str());
                    }
                    None => {}
                }
                query.push(" ORDER BY uuid");
                query
            }
            ViewName::ByDeparture => {
                let mut query = QueryBuilder::new(
                    "SELECT port, departure_time, uuid, payload FROM vessels_by_departure_port WHERE port = ",
                );
                query.push_bind(request.partition_key.as_str());
                if let Some(ClusteringRange::After(since)) = request.range {
                    query.push(" AND departure_time > ");
                    query.push_bind(since);
                }
                query.push(" ORDER BY departure_time, uuid");
                query
            }
        };

        query.push(";");
        Ok(query)
    }
}

#[async_trait]
impl PartitionedRecordStore for PostgresRecordStore {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn get(&self, key: &RowKey) -> Result<Option<ViewRow>, VesselRepositoryError> {
        let row = match key.view {
            ViewName::ById => sqlx::query("SELECT uuid, payload FROM vessels_by_uuid WHERE uuid = $1")
                .bind(partition_uuid(key)?)
                .fetch_optional(&self.pool)
                .await?,
            ViewName::ByScope => sqlx::query(
                r#"
                SELECT partition_key, uuid, name, category, payload FROM vessels
                WHERE partition_key = $1 AND uuid = $2
                "#,
            )
            .bind(&key.partition_key)
            .bind(clustering_uuid(key, 0)?)
            .fetch_optional(&self.pool)
            .await?,
            ViewName::ByDeparture => sqlx::query(
                r#"
                SELECT port, departure_time, uuid, payload FROM vessels_by_departure_port
                WHERE port = $1 AND departure_time = $2 AND uuid = $3
                "#,
            )
            .bind(&key.partition_key)
            .bind(clustering_time(key, 0)?)
            .bind(clustering_uuid(key, 1)?)
            .fetch_optional(&self.pool)
            .await?,
        };

        match row {
            Some(row) => Ok(Some(decode_row(key.view, &row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, request), fields(view = %request.view, partition = %request.partition_key))]
    async fn scan(&self, request: &ScanRequest) -> Result<Vec<ViewRow>, VesselRepositoryError> {
        let mut query = Self::scan_query(request)?;
        let rows = query.build().fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "Scanned partition");

        rows.iter()
            .map(|row| decode_row(request.view, row).map_err(VesselRepositoryError::from))
            .collect()
    }

    #[instrument(skip(self, batch), fields(operations = batch.len()))]
    async fn submit_batch(&self, batch: &[BatchOperation]) -> Result<(), VesselRepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for operation in batch {
            Self::apply_tx(operation, &mut tx).await?;
        }
        tx.commit().await?;

        Ok(())
    }
}

fn decode_row(view: ViewName, row: &PgRow) -> Result<ViewRow, sqlx::Error> {
    let id = VesselId::from_uuid(row.try_get::<Uuid, _>("uuid")?);
    let vessel = row.try_get::<Json<Vessel>, _>("payload")?.0;

    let (key, columns) = match view {
        ViewName::ById => (identifier_key(id), RowColumns::default()),
        ViewName::ByScope => (
            RowKey::new(
                ViewName::ByScope,
                row.try_get::<String, _>("partition_key")?,
                vec![ClusteringValue::Id(id)],
            ),
            RowColumns {
                name: Some(row.try_get::<String, _>("name")?),
                category: Some(CategoryReference::new(
                    row.try_get::<String, _>("category")?,
                )),
            },
        ),
        ViewName::ByDeparture => (
            RowKey::new(
                ViewName::ByDeparture,
                row.try_get::<String, _>("port")?,
                vec![
                    ClusteringValue::Time(row.try_get::<DateTime<Utc>, _>("departure_time")?),
                    ClusteringValue::Id(id),
                ],
            ),
            RowColumns::default(),
        ),
    };

    Ok(ViewRow {
        key,
        vessel,
        columns,
    })
}

fn partition_uuid(key: &RowKey) -> Result<Uuid, VesselRepositoryError> {
    Uuid::parse_str(&key.partition_key).map_err(|e| malformed_key(key, &e.to_string()))
}

fn clustering_uuid(key: &RowKey, index: usize) -> Result<Uuid, VesselRepositoryError> {
    match key.clustering_key.get(index) {
        Some(ClusteringValue::Id(id)) => Ok(*id.as_uuid()),
        _ => Err(malformed_key(key, "expected an identifier component")),
    }
}

fn clustering_time(key: &RowKey, index: usize) -> Result<DateTime<Utc>, VesselRepositoryError> {
    match key.clustering_key.get(index) {
        Some(ClusteringValue::Time(time)) => Ok(*time),
        _ => Err(malformed_key(key, "expected a time component")),
    }
}

fn malformed_key(key: &RowKey, reason: &str) -> VesselRepositoryError {
    VesselRepositoryError::invalid_argument(format!("malformed key {}: {}", key, reason))
}

/// Escapes `LIKE` wildcards so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
