// SQLite persistence for equipment, the transaction ledger, and orders.
//
// Only compiled with the `database` feature; callers that stay in-process
// use `MemoryStore` instead. All ids are stored as uuid text and timestamps
// as RFC 3339 text, so rows stay greppable with the sqlite3 shell.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::inventory::condition::Condition;
use crate::inventory::error::StoreError;
use crate::inventory::traits::{InventoryStore, OrderStore};
use crate::inventory::types::{
    ActionKind, Equipment, EquipmentId, EquipmentStatus, EquipmentTransaction, OrderId, Stock,
    StockId,
};
use crate::orders::types::{Order, OrderActivity, OrderStatus, ProductRequirement};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url`.
    pub async fn new(database_url: &str, max_connections: u32, auto_migrate: bool) -> Result<Self> {
        if !sqlx::Sqlite::database_exists(database_url).await? {
            info!(url = database_url, "Creating database");
            sqlx::Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        if auto_migrate {
            info!("Running database migrations");
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database migrations completed");
        }

        Ok(Self { pool })
    }

    /// Open the store described by the global configuration, falling back to
    /// `DatabaseConfig::default()` when no `[database]` section is present.
    pub async fn from_config() -> Result<Self> {
        let config = crate::config::config()?;
        let db = config.database.clone().unwrap_or_default();
        Self::from_database_config(&db).await
    }

    pub async fn from_database_config(db: &DatabaseConfig) -> Result<Self> {
        Self::new(&db.url, db.max_connections, db.auto_migrate).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn shutdown(&self) {
        info!("Closing database connections");
        self.pool.close().await;
    }

    /// Insert or update a condition and its permitted-action set.
    pub async fn save_condition(&self, condition: &Condition) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT OR REPLACE INTO conditions (id, name, description) VALUES (?1, ?2, ?3)",
        )
        .bind(condition.id.to_string())
        .bind(&condition.name)
        .bind(&condition.description)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM condition_actions WHERE condition_id = ?1")
            .bind(condition.id.to_string())
            .execute(&mut *tx)
            .await?;

        for kind in condition.allowed_actions() {
            sqlx::query("INSERT INTO condition_actions (condition_id, action) VALUES (?1, ?2)")
                .bind(condition.id.to_string())
                .bind(kind.name())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn save_stock(&self, stock: &Stock) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO stocks (id, name, location_id) VALUES (?1, ?2, ?3)")
            .bind(stock.id.to_string())
            .bind(&stock.name)
            .bind(stock.location.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert or update an equipment record wholesale. Meant for seeding and
    /// administrative edits; action execution goes through `commit_action`.
    pub async fn save_equipment(&self, equipment: &Equipment) -> Result<()> {
        self.save_condition(&equipment.condition).await?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO equipment
                (id, name, status, condition_id, holder_id, stock_id, location_id,
                 generic_product_id, version)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(equipment.id.to_string())
        .bind(&equipment.name)
        .bind(equipment.status.as_str())
        .bind(equipment.condition.id.to_string())
        .bind(equipment.holder.map(|id| id.to_string()))
        .bind(equipment.stock.map(|id| id.to_string()))
        .bind(equipment.location.map(|id| id.to_string()))
        .bind(equipment.generic_product.map(|id| id.to_string()))
        .bind(equipment.version as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn link_equipment(&self, order: OrderId, equipment: EquipmentId) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO order_equipment (order_id, equipment_id) VALUES (?1, ?2)",
        )
        .bind(order.to_string())
        .bind(equipment.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn add_requirement(
        &self,
        order: OrderId,
        requirement: ProductRequirement,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO order_generic_products (order_id, generic_product_id, quantity)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(order.to_string())
        .bind(requirement.generic_product.to_string())
        .bind(requirement.quantity as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load_condition(&self, id: &str) -> Result<Condition, StoreError> {
        let row = sqlx::query("SELECT id, name, description FROM conditions WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("condition", id))?;

        let action_rows =
            sqlx::query("SELECT action FROM condition_actions WHERE condition_id = ?1")
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::backend)?;

        let mut allowed = Vec::with_capacity(action_rows.len());
        for action_row in action_rows {
            let name: String = action_row.get("action");
            allowed.push(parse_action(&name)?);
        }

        Ok(Condition::with_id(
            parse_id(id, "condition")?,
            row.get::<String, _>("name"),
            row.get::<String, _>("description"),
            allowed,
        ))
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn equipment(&self, id: EquipmentId) -> Result<Equipment, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, status, condition_id, holder_id, stock_id, location_id,
                   generic_product_id, version
            FROM equipment
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?
        .ok_or_else(|| StoreError::not_found("equipment", id))?;

        let condition_id: String = row.get("condition_id");
        let condition = self.load_condition(&condition_id).await?;
        let status: String = row.get("status");

        Ok(Equipment {
            id,
            name: row.get("name"),
            status: EquipmentStatus::from_name(&status).ok_or_else(|| {
                StoreError::backend(format!("unknown equipment status '{status}'"))
            })?,
            condition,
            holder: parse_opt_id(row.get("holder_id"), "user")?,
            stock: parse_opt_id(row.get("stock_id"), "stock")?,
            location: parse_opt_id(row.get("location_id"), "location")?,
            generic_product: parse_opt_id(row.get("generic_product_id"), "generic product")?,
            version: row.get::<i64, _>("version") as u64,
        })
    }

    async fn stock(&self, id: StockId) -> Result<Stock, StoreError> {
        let row = sqlx::query("SELECT id, name, location_id FROM stocks WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?
            .ok_or_else(|| StoreError::not_found("stock", id))?;

        let location: String = row.get("location_id");
        Ok(Stock {
            id,
            name: row.get("name"),
            location: parse_id(&location, "location")?,
        })
    }

    async fn commit_action(
        &self,
        equipment: &Equipment,
        expected_version: u64,
        transaction: &EquipmentTransaction,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        // Versioned update: zero rows affected means the record either moved
        // on under us or does not exist at all.
        let updated = sqlx::query(
            r#"
            UPDATE equipment
            SET name = ?1, status = ?2, condition_id = ?3, holder_id = ?4, stock_id = ?5,
                location_id = ?6, generic_product_id = ?7, version = ?8
            WHERE id = ?9 AND version = ?10
            "#,
        )
        .bind(&equipment.name)
        .bind(equipment.status.as_str())
        .bind(equipment.condition.id.to_string())
        .bind(equipment.holder.map(|id| id.to_string()))
        .bind(equipment.stock.map(|id| id.to_string()))
        .bind(equipment.location.map(|id| id.to_string()))
        .bind(equipment.generic_product.map(|id| id.to_string()))
        .bind(equipment.version as i64)
        .bind(equipment.id.to_string())
        .bind(expected_version as i64)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::backend)?;

        if updated.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM equipment WHERE id = ?1")
                .bind(equipment.id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StoreError::backend)?
                .is_some();

            return Err(if exists {
                StoreError::Conflict {
                    id: equipment.id,
                    expected: expected_version,
                }
            } else {
                StoreError::not_found("equipment", equipment.id)
            });
        }

        // Condition overrides may introduce a condition row the equipment
        // table now references.
        sqlx::query("INSERT OR IGNORE INTO conditions (id, name, description) VALUES (?1, ?2, ?3)")
            .bind(equipment.condition.id.to_string())
            .bind(&equipment.condition.name)
            .bind(&equipment.condition.description)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::backend)?;

        sqlx::query(
            r#"
            INSERT INTO equipment_transactions
                (id, equipment_id, action, user_id, condition_id, stock_id, recipient_id, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.equipment.to_string())
        .bind(transaction.action.name())
        .bind(transaction.user.to_string())
        .bind(transaction.condition.to_string())
        .bind(transaction.stock.map(|id| id.to_string()))
        .bind(transaction.recipient.map(|id| id.to_string()))
        .bind(transaction.timestamp.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::backend)?;

        tx.commit().await.map_err(StoreError::backend)
    }

    async fn transactions(
        &self,
        equipment: EquipmentId,
    ) -> Result<Vec<EquipmentTransaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, equipment_id, action, user_id, condition_id, stock_id, recipient_id,
                   timestamp
            FROM equipment_transactions
            WHERE equipment_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(equipment.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let action: String = row.get("action");
            let user: String = row.get("user_id");
            let condition: String = row.get("condition_id");
            let timestamp: String = row.get("timestamp");

            entries.push(EquipmentTransaction {
                id: parse_id(&id, "transaction")?,
                equipment,
                action: parse_action(&action)?,
                user: parse_id(&user, "user")?,
                condition: parse_id(&condition, "condition")?,
                stock: parse_opt_id(row.get("stock_id"), "stock")?,
                recipient: parse_opt_id(row.get("recipient_id"), "user")?,
                timestamp: parse_timestamp(&timestamp)?,
            });
        }
        Ok(entries)
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn order(&self, id: OrderId) -> Result<Order, StoreError> {
        let row = sqlx::query(
            "SELECT id, activity, status, customer_id, location_id, date FROM orders WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?
        .ok_or_else(|| StoreError::not_found("order", id))?;

        let activity: String = row.get("activity");
        let status: String = row.get("status");
        let customer: String = row.get("customer_id");
        let location: String = row.get("location_id");
        let date: String = row.get("date");

        Ok(Order {
            id,
            activity: OrderActivity::from_name(&activity).ok_or_else(|| {
                StoreError::backend(format!("unknown order activity '{activity}'"))
            })?,
            status: OrderStatus::from_name(&status)
                .ok_or_else(|| StoreError::backend(format!("unknown order status '{status}'")))?,
            customer: parse_id(&customer, "customer")?,
            location: parse_id(&location, "location")?,
            date: parse_timestamp(&date)?,
        })
    }

    async fn order_equipment(&self, id: OrderId) -> Result<Vec<EquipmentId>, StoreError> {
        let rows = sqlx::query(
            "SELECT equipment_id FROM order_equipment WHERE order_id = ?1 ORDER BY rowid",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.into_iter()
            .map(|row| {
                let equipment: String = row.get("equipment_id");
                parse_id(&equipment, "equipment")
            })
            .collect()
    }

    async fn requested_products(
        &self,
        id: OrderId,
    ) -> Result<Vec<ProductRequirement>, StoreError> {
        let rows = sqlx::query(
            "SELECT generic_product_id, quantity FROM order_generic_products WHERE order_id = ?1",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.into_iter()
            .map(|row| {
                let product: String = row.get("generic_product_id");
                Ok(ProductRequirement {
                    generic_product: parse_id(&product, "generic product")?,
                    quantity: row.get::<i64, _>("quantity") as u32,
                })
            })
            .collect()
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO orders (id, activity, status, customer_id, location_id, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(order.id.to_string())
        .bind(order.activity.as_str())
        .bind(order.status.as_str())
        .bind(order.customer.to_string())
        .bind(order.location.to_string())
        .bind(order.date.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(())
    }
}

fn parse_id<T>(value: &str, entity: &'static str) -> Result<T, StoreError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| StoreError::backend(format!("invalid {entity} id '{value}': {e}")))
}

fn parse_opt_id<T>(value: Option<String>, entity: &'static str) -> Result<Option<T>, StoreError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map(|v| parse_id(&v, entity)).transpose()
}

fn parse_action(name: &str) -> Result<ActionKind, StoreError> {
    ActionKind::from_name(name)
        .ok_or_else(|| StoreError::backend(format!("unknown action '{name}'")))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::backend(format!("invalid timestamp '{value}': {e}")))
}
