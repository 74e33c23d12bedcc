//! SQLite catalog backend
//!
//! A single connection guarded by a mutex. Every statement runs on the tokio
//! blocking pool so async callers never block a runtime worker.

use crate::error::{CatalogError, CatalogResult};
use crate::record::{fold_case, NewPlant, PlantId, PlantQuery, PlantRecord, UpdateOutcome};
use crate::store::CatalogStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::Arc;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS plants (
    id          INTEGER PRIMARY KEY,
    name        TEXT    NOT NULL,
    description TEXT    NOT NULL,
    price       REAL    NOT NULL
)";

/// SQL name of the Unicode case-folding function
const FOLD_CASE_FN: &str = "fold_case";

const SELECT_COLUMNS: &str = "SELECT id, name, description, price FROM plants";

/// Catalog persisted in a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    ///
    /// # Errors
    /// Returns `CatalogError` if the file cannot be opened or the schema
    /// cannot be created
    pub async fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio::task::spawn_blocking(move || -> CatalogResult<Connection> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let conn = Connection::open(&path)?;
            prepare(&conn)?;
            tracing::debug!(path = %path.display(), "opened catalog database");
            Ok(conn)
        })
        .await??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    /// Returns `CatalogError::Sql` if SQLite fails to initialise
    pub fn open_in_memory() -> CatalogResult<Self> {
        let conn = Connection::open_in_memory()?;
        prepare(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> CatalogResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> CatalogResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&mut conn.lock())).await?
    }
}

/// Register `fold_case` and ensure the schema exists
fn prepare(conn: &Connection) -> rusqlite::Result<()> {
    // SQLite's built-in lower() only folds ASCII.
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(fold_case(&ctx.get::<String>(0)?)),
    )?;
    conn.execute_batch(SCHEMA)
}

fn build_query(query: &PlantQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(ids) = &query.ids {
        if ids.is_empty() {
            clauses.push("0".to_string());
        } else {
            let placeholders = vec!["?"; ids.len()].join(", ");
            clauses.push(format!("id IN ({placeholders})"));
            values.extend(ids.iter().map(|id| Value::Integer(id.get())));
        }
    }
    if let Some(needle) = &query.name_contains {
        clauses.push(format!("instr({FOLD_CASE_FN}(name), {FOLD_CASE_FN}(?)) > 0"));
        values.push(Value::Text(needle.clone()));
    }
    if let Some(max) = query.max_price {
        clauses.push("price <= ?".to_string());
        values.push(Value::Real(max));
    }

    let mut sql = SELECT_COLUMNS.to_string();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id");
    (sql, values)
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn query(&self, query: &PlantQuery) -> CatalogResult<Vec<PlantRecord>> {
        let (sql, values) = build_query(query);
        self.with_conn(move |conn| {
            let mut statement = conn.prepare(&sql)?;
            let rows = statement
                .query_map(params_from_iter(values), |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, f64>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(id, name, description, price)| {
                    Ok(PlantRecord {
                        id: PlantId::new(id)?,
                        name,
                        description,
                        price,
                    })
                })
                .collect()
        })
        .await
    }

    async fn update_description(
        &self,
        id: PlantId,
        description: &str,
    ) -> CatalogResult<UpdateOutcome> {
        let description = description.to_string();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE plants SET description = ?1 WHERE id = ?2",
                params![description, id.get()],
            )?;
            Ok(if changed == 0 {
                UpdateOutcome::Missing
            } else {
                UpdateOutcome::Updated
            })
        })
        .await
    }

    async fn seed(&self, plants: &[NewPlant]) -> CatalogResult<usize> {
        let plants = plants.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM plants", [], |row| row.get(0))?;
            if existing > 0 {
                return Ok(0);
            }
            {
                let mut insert = tx.prepare(
                    "INSERT INTO plants (id, name, description, price) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for (index, plant) in plants.iter().enumerate() {
                    let id = PlantId::from_index(index);
                    insert.execute(params![id.get(), plant.name, plant.description, plant.price])?;
                }
            }
            tx.commit()?;
            tracing::info!(count = plants.len(), "seeded plant catalog");
            Ok(plants.len())
        })
        .await
    }

    async fn count(&self) -> CatalogResult<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM plants", [], |row| row.get(0))?;
            usize::try_from(count)
                .map_err(|_| CatalogError::invalid_record(format!("negative row count {count}")))
        })
        .await
    }
}
