//! Holder repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Token look-ups are exact matches against the unique `holders.token`.
//! - A token collision surfaces as `RepoError::DuplicateToken`, never as a
//!   raw constraint error.

use crate::model::holder::{Holder, HolderId, HolderToken};
use crate::repo::{ensure_table_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const HOLDER_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    token
FROM holders";

/// Repository interface for holder records.
pub trait HolderRepository {
    fn create_holder(&self, holder: &Holder) -> RepoResult<HolderId>;
    fn find_by_token(&self, token: &HolderToken) -> RepoResult<Option<Holder>>;
    fn list_holders(&self) -> RepoResult<Vec<Holder>>;
}

/// SQLite-backed holder repository.
pub struct SqliteHolderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHolderRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "holders", &["uuid", "name", "token", "created_at"])?;
        Ok(Self { conn })
    }
}

impl HolderRepository for SqliteHolderRepository<'_> {
    fn create_holder(&self, holder: &Holder) -> RepoResult<HolderId> {
        holder.validate()?;

        let result = self.conn.execute(
            "INSERT INTO holders (uuid, name, token) VALUES (?1, ?2, ?3);",
            params![
                holder.uuid.to_string(),
                holder.name.as_str(),
                holder.token.as_str()
            ],
        );

        match result {
            Ok(_) => Ok(holder.uuid),
            Err(err) if is_unique_violation(&err) => Err(RepoError::DuplicateToken),
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_token(&self, token: &HolderToken) -> RepoResult<Option<Holder>> {
        let row = self
            .conn
            .query_row(
                &format!("{HOLDER_SELECT_SQL} WHERE token = ?1;"),
                [token.as_str()],
                read_holder_columns,
            )
            .optional()?;

        row.map(parse_holder_columns).transpose()
    }

    fn list_holders(&self) -> RepoResult<Vec<Holder>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HOLDER_SELECT_SQL} ORDER BY name ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut holders = Vec::new();
        while let Some(row) = rows.next()? {
            holders.push(parse_holder_columns(read_holder_columns(row)?)?);
        }
        Ok(holders)
    }
}

type HolderColumns = (String, String, String);

fn read_holder_columns(row: &Row<'_>) -> rusqlite::Result<HolderColumns> {
    Ok((row.get("uuid")?, row.get("name")?, row.get("token")?))
}

fn parse_holder_columns((uuid, name, token): HolderColumns) -> RepoResult<Holder> {
    let uuid = parse_uuid(&uuid, "holders.uuid")?;
    let token = HolderToken::parse(&token).map_err(|_| {
        RepoError::InvalidData(format!("malformed token for holder {uuid} in holders.token"))
    })?;
    let holder = Holder { uuid, name, token };
    holder.validate()?;
    Ok(holder)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
