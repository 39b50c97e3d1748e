//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/list APIs over `items`.
//! - Provide the guarded `taken_by` update the lending service relies on.
//!
//! # Invariants
//! - Write paths validate the item before SQL mutations.
//! - `swap_taken_by` only writes when the stored holder equals the expected
//!   one, so two racing takes cannot both succeed.
//! - Listing is deterministic: `created_at ASC, uuid ASC`.

use crate::model::holder::HolderId;
use crate::model::item::{Item, ItemId};
use crate::repo::{ensure_table_ready, parse_uuid, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    items.uuid AS uuid,
    items.name AS name,
    items.thumbnail AS thumbnail,
    items.taken_by AS taken_by,
    items.created_at AS created_at,
    holders.name AS holder_name
FROM items
LEFT JOIN holders ON holders.uuid = items.taken_by";

/// Item joined with the display name of its current holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub item: Item,
    pub holder_name: Option<String>,
}

/// Query options for listing items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    /// Only return items held by this holder.
    pub taken_by: Option<HolderId>,
}

/// Repository interface for item records.
pub trait ItemRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<ItemRecord>>;
    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<ItemRecord>>;
    /// Sets `taken_by = next` only if it currently equals `expected`.
    ///
    /// Returns `false` when nothing was written (holder mismatch or no row).
    fn swap_taken_by(
        &self,
        id: ItemId,
        expected: Option<HolderId>,
        next: Option<HolderId>,
    ) -> RepoResult<bool>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "items",
            &["uuid", "name", "thumbnail", "taken_by", "created_at", "updated_at"],
        )?;
        ensure_table_ready(conn, "holders", &["uuid", "name"])?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO items (
                uuid,
                name,
                thumbnail,
                taken_by,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.uuid.to_string(),
                item.name.as_str(),
                item.thumbnail.as_deref(),
                item.taken_by.map(|holder| holder.to_string()),
                item.created_at,
            ],
        )?;

        Ok(item.uuid)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<ItemRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE items.uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<ItemRecord>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(holder) = query.taken_by {
            sql.push_str(" AND items.taken_by = ?");
            bind_values.push(Value::Text(holder.to_string()));
        }

        sql.push_str(" ORDER BY items.created_at ASC, items.uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn swap_taken_by(
        &self,
        id: ItemId,
        expected: Option<HolderId>,
        next: Option<HolderId>,
    ) -> RepoResult<bool> {
        // `IS` compares NULLs as equal, covering the "currently available" case.
        let changed = self.conn.execute(
            "UPDATE items
             SET
                taken_by = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND taken_by IS ?2;",
            params![
                id.to_string(),
                expected.map(|holder| holder.to_string()),
                next.map(|holder| holder.to_string()),
            ],
        )?;

        Ok(changed == 1)
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<ItemRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "items.uuid")?;

    let taken_by = match row.get::<_, Option<String>>("taken_by")? {
        Some(value) => Some(parse_uuid(&value, "items.taken_by")?),
        None => None,
    };

    let item = Item {
        uuid,
        name: row.get("name")?,
        thumbnail: row.get("thumbnail")?,
        taken_by,
        created_at: row.get("created_at")?,
    };
    item.validate()?;

    Ok(ItemRecord {
        item,
        holder_name: row.get("holder_name")?,
    })
}
