//! Shopping list CRUD operations
//!
//! Every method is one statement against `shopping_list` (an insert with a
//! caller-supplied id also advances the id sequence). Storage errors are
//! passed through as `DbError`; a missing row is not an error (`None` or a
//! zero affected-row count).

use crate::schema::{NewShoppingListItem, ShoppingListItem, ShoppingListItemPatch, ITEM_COLUMNS};
use crate::{DbClient, DbError, DbResult};
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, instrument};

/// Never moves the sequence backwards: the new value is the larger of the
/// highest stored id and the last value handed out.
const ADVANCE_ID_SEQUENCE_SQL: &str = "SELECT setval(
        pg_get_serial_sequence('shopping_list', 'id'),
        GREATEST(
            MAX(id),
            pg_sequence_last_value(pg_get_serial_sequence('shopping_list', 'id')::regclass),
            1
        )
    )
    FROM shopping_list";

/// Stateless access to the `shopping_list` table over an injected client
#[derive(Clone)]
pub struct ShoppingListService {
    client: DbClient,
}

impl ShoppingListService {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &DbClient {
        &self.client
    }

    /// Every row, in whatever order the store returns them
    #[instrument(skip(self))]
    pub async fn get_all_items(&self) -> DbResult<Vec<ShoppingListItem>> {
        let items = sqlx::query_as::<_, ShoppingListItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shopping_list"
        ))
        .fetch_all(self.client.pool())
        .await?;

        debug!("Retrieved {} shopping list items", items.len());
        Ok(items)
    }

    /// Insert one row and return it as stored, with its id and defaults filled in.
    ///
    /// A caller-supplied id moves the identity sequence past it in the same
    /// transaction, so later generated ids never collide with it.
    #[instrument(skip(self, item), fields(name = %item.name))]
    pub async fn insert_item(&self, item: &NewShoppingListItem) -> DbResult<ShoppingListItem> {
        let mut tx = self.client.pool().begin().await?;

        let inserted = build_insert(item)
            .build_query_as::<ShoppingListItem>()
            .fetch_one(&mut *tx)
            .await?;

        if item.id.is_some() {
            sqlx::query(ADVANCE_ID_SEQUENCE_SQL)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!("Inserted shopping list item {}", inserted.id);
        Ok(inserted)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> DbResult<Option<ShoppingListItem>> {
        let item = sqlx::query_as::<_, ShoppingListItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shopping_list WHERE id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(self.client.pool())
        .await?;

        Ok(item)
    }

    /// Returns the number of rows removed (0 or 1)
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM shopping_list WHERE id = $1")
            .bind(id)
            .execute(self.client.pool())
            .await?;

        let deleted = result.rows_affected();
        debug!("Deleted {} shopping list items with id {}", deleted, id);
        Ok(deleted)
    }

    /// Overwrite only the fields set in `patch`. Returns the number of rows changed.
    #[instrument(skip(self, patch))]
    pub async fn update_item(&self, id: i32, patch: &ShoppingListItemPatch) -> DbResult<u64> {
        if patch.is_empty() {
            return Err(DbError::EmptyUpdate(id));
        }

        let result = build_update(id, patch)
            .build()
            .execute(self.client.pool())
            .await?;

        let updated = result.rows_affected();
        debug!("Updated {} shopping list items with id {}", updated, id);
        Ok(updated)
    }
}

fn build_insert(item: &NewShoppingListItem) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new("INSERT INTO shopping_list (");

    let mut columns = qb.separated(", ");
    if item.id.is_some() {
        columns.push("id");
    }
    columns.push("name");
    columns.push("date_added");
    columns.push("price");
    columns.push("category");
    if item.checked.is_some() {
        columns.push("checked");
    }

    qb.push(") VALUES (");

    let mut values = qb.separated(", ");
    if let Some(id) = item.id {
        values.push_bind(id);
    }
    values.push_bind(item.name.as_str());
    values.push_bind(item.date_added);
    values
        .push("CAST(")
        .push_bind_unseparated(item.price.as_str())
        .push_unseparated(" AS NUMERIC)");
    values.push_bind(item.category.as_str());
    if let Some(checked) = item.checked {
        values.push_bind(checked);
    }

    qb.push(") RETURNING ");
    qb.push(ITEM_COLUMNS);
    qb
}

fn build_update(id: i32, patch: &ShoppingListItemPatch) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE shopping_list SET ");

    let mut assignments = qb.separated(", ");
    if let Some(name) = &patch.name {
        assignments
            .push("name = ")
            .push_bind_unseparated(name.as_str());
    }
    if let Some(date_added) = patch.date_added {
        assignments
            .push("date_added = ")
            .push_bind_unseparated(date_added);
    }
    if let Some(price) = &patch.price {
        assignments
            .push("price = CAST(")
            .push_bind_unseparated(price.as_str())
            .push_unseparated(" AS NUMERIC)");
    }
    if let Some(category) = &patch.category {
        assignments
            .push("category = ")
            .push_bind_unseparated(category.as_str());
    }
    if let Some(checked) = patch.checked {
        assignments
            .push("checked = ")
            .push_bind_unseparated(checked);
    }

    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}
