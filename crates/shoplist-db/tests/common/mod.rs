//! Test database management for shopping list integration tests
//!
//! Needs a reachable PostgreSQL. Point TEST_DB_URL at a scratch database
//! (default: postgres://postgres@localhost/shopping_list_test).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shoplist_db::{DbClient, ShoppingListItem, ShoppingListService};
use sqlx::{Postgres, QueryBuilder, Row};
use tokio::sync::{Mutex, MutexGuard};

/// Every test shares one table, so scenarios run one at a time.
static TABLE_LOCK: Mutex<()> = Mutex::const_new(());

pub async fn lock_table() -> MutexGuard<'static, ()> {
    TABLE_LOCK.lock().await
}

pub const SCHEMA_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS shopping_list (
        id INTEGER PRIMARY KEY GENERATED BY DEFAULT AS IDENTITY,
        name TEXT NOT NULL,
        date_added TIMESTAMPTZ NOT NULL DEFAULT now(),
        price NUMERIC(12, 2) NOT NULL,
        category TEXT NOT NULL,
        checked BOOLEAN NOT NULL DEFAULT false
    )
"#;

/// Test database manager
pub struct TestDb {
    client: DbClient,
}

impl TestDb {
    /// Connect, make sure the table exists, and start from an empty table
    pub async fn new() -> Result<Self> {
        shoplist_obs::try_init_for_tests();

        let url = std::env::var("TEST_DB_URL")
            .unwrap_or_else(|_| "postgres://postgres@localhost/shopping_list_test".to_string());
        let client = DbClient::new(&url)
            .await
            .with_context(|| format!("Failed to connect to {url}"))?;
        client.ping().await.context("Test database did not answer")?;

        sqlx::query(SCHEMA_SQL)
            .execute(client.pool())
            .await
            .context("Failed to create shopping_list table")?;

        let db = Self { client };
        db.truncate().await?;
        Ok(db)
    }

    /// Connect and seed the standard four-item fixture
    pub async fn seeded() -> Result<Self> {
        let db = Self::new().await?;
        db.seed(&test_items()).await?;
        Ok(db)
    }

    pub fn service(&self) -> ShoppingListService {
        ShoppingListService::new(self.client.clone())
    }

    /// Empty the table and reset id generation
    pub async fn truncate(&self) -> Result<()> {
        sqlx::query("TRUNCATE shopping_list RESTART IDENTITY")
            .execute(self.client.pool())
            .await
            .context("Failed to truncate shopping_list")?;
        Ok(())
    }

    /// Leave the table empty for whoever runs next and release the pool
    pub async fn finish(self) -> Result<()> {
        self.truncate().await?;
        self.client.close().await;
        Ok(())
    }

    /// Insert rows with their explicit ids, bypassing the service
    pub async fn seed(&self, items: &[ShoppingListItem]) -> Result<()> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO shopping_list (id, name, date_added, price, category, checked) ",
        );
        qb.push_values(items, |mut row, item| {
            row.push_bind(item.id)
                .push_bind(item.name.as_str())
                .push_bind(item.date_added)
                .push("CAST(")
                .push_bind_unseparated(item.price.as_str())
                .push_unseparated(" AS NUMERIC)")
                .push_bind(item.category.as_str())
                .push_bind(item.checked);
        });
        qb.build()
            .execute(self.client.pool())
            .await
            .context("Failed to seed shopping_list")?;

        // Explicit ids do not advance the identity sequence.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('shopping_list', 'id'), MAX(id)) \
             FROM shopping_list",
        )
        .execute(self.client.pool())
        .await
        .context("Failed to advance shopping_list id sequence")?;

        Ok(())
    }

    /// Get row count for the table
    pub async fn count_rows(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM shopping_list")
            .fetch_one(self.client.pool())
            .await?;

        Ok(row.get("count"))
    }
}

pub fn ts(value: &str) -> DateTime<Utc> {
    value
        .parse()
        .unwrap_or_else(|e| panic!("bad fixture timestamp {value}: {e}"))
}

fn item(id: i32, name: &str, date_added: &str, price: &str, category: &str) -> ShoppingListItem {
    ShoppingListItem {
        id,
        name: name.to_string(),
        date_added: ts(date_added),
        price: price.to_string(),
        category: category.to_string(),
        checked: false,
    }
}

/// The four fixture rows, ids 1 through 4
pub fn test_items() -> Vec<ShoppingListItem> {
    vec![
        item(1, "First test item!", "2029-01-22T16:28:32.615Z", "12.00", "Main"),
        item(2, "Second test item!", "2100-05-22T16:28:32.615Z", "21.00", "Snack"),
        item(3, "Third test item!", "1919-12-22T16:28:32.615Z", "3.00", "Lunch"),
        item(4, "Third test item!", "1919-12-22T16:28:32.615Z", "0.99", "Breakfast"),
    ]
}

pub fn sorted_by_id(mut items: Vec<ShoppingListItem>) -> Vec<ShoppingListItem> {
    items.sort_by_key(|item| item.id);
    items
}
