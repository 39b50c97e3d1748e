//! Lending use-case service.
//!
//! # Responsibility
//! - Provide the holder-facing entry points: list, detail, thumbnail, take,
//!   give back.
//! - Apply the lending policy and persist its result with a guarded update.
//!
//! # Invariants
//! - Every entry point resolves the token before touching items.
//! - `NotFound` carries no payload, so callers cannot tell a bad token from
//!   a missing item.
//! - A take that loses a race reports `AlreadyTaken`; a give-back that finds
//!   nothing to release reports `GiveBackOutcome::Ignored`.

use crate::model::holder::Holder;
use crate::model::item::{Item, ItemId};
use crate::policy::lending::GiveBackOutcome;
use crate::repo::holder_repo::HolderRepository;
use crate::repo::item_repo::{ItemListQuery, ItemRecord, ItemRepository};
use crate::repo::RepoError;
use crate::service::access::AccessGuard;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for holder-facing lending use-cases.
#[derive(Debug)]
pub enum LendingError {
    /// Unknown token or unknown item; deliberately indistinguishable.
    NotFound,
    /// The item is held by someone (possibly the caller).
    AlreadyTaken,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for LendingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::AlreadyTaken => write!(f, "item is already taken"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LendingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LendingError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// List/detail projection of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub name: String,
    pub has_thumbnail: bool,
    /// Display name of the current holder, `None` when available.
    pub taken_by: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl From<ItemRecord> for ItemSummary {
    fn from(record: ItemRecord) -> Self {
        Self {
            item_id: record.item.uuid,
            name: record.item.name,
            has_thumbnail: record.item.thumbnail.is_some(),
            taken_by: record.holder_name,
            created_at: record.item.created_at,
        }
    }
}

/// Detail view of one item as seen by one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub summary: ItemSummary,
    /// The viewer may take the item (nobody holds it).
    pub can_take: bool,
    /// The viewer holds the item and may give it back.
    pub can_give_back: bool,
}

impl ItemDetail {
    fn for_viewer(record: ItemRecord, viewer: &Holder) -> Self {
        let can_take = record.item.is_available();
        let can_give_back = record.item.taken_by == Some(viewer.uuid);
        Self {
            summary: ItemSummary::from(record),
            can_take,
            can_give_back,
        }
    }
}

/// Holder-facing lending service.
pub struct LendingService<I: ItemRepository, H: HolderRepository> {
    items: I,
    guard: AccessGuard<H>,
}

impl<I: ItemRepository, H: HolderRepository> LendingService<I, H> {
    pub fn new(items: I, holders: H) -> Self {
        Self {
            items,
            guard: AccessGuard::new(holders),
        }
    }

    /// Lists all items in creation order.
    pub fn list_items(&self, token: &str) -> Result<Vec<ItemSummary>, LendingError> {
        self.guard.resolve(token)?;
        let records = self.items.list_items(&ItemListQuery::default())?;
        Ok(records.into_iter().map(ItemSummary::from).collect())
    }

    /// Lists the items the token's holder currently has.
    pub fn my_items(&self, token: &str) -> Result<Vec<ItemSummary>, LendingError> {
        let holder = self.guard.resolve(token)?;
        let query = ItemListQuery {
            taken_by: Some(holder.uuid),
        };
        let records = self.items.list_items(&query)?;
        Ok(records.into_iter().map(ItemSummary::from).collect())
    }

    /// Returns one item with the actions available to the viewer.
    pub fn item_detail(&self, item_id: ItemId, token: &str) -> Result<ItemDetail, LendingError> {
        let viewer = self.guard.resolve(token)?;
        let record = self.load_item(item_id)?;
        Ok(ItemDetail::for_viewer(record, &viewer))
    }

    /// Returns stored thumbnail bytes (PNG).
    ///
    /// Items without a thumbnail are reported as `NotFound`.
    pub fn thumbnail(&self, item_id: ItemId, token: &str) -> Result<Vec<u8>, LendingError> {
        self.guard.resolve(token)?;
        self.load_item(item_id)?
            .item
            .thumbnail
            .ok_or(LendingError::NotFound)
    }

    /// Hands an available item to the token's holder.
    ///
    /// # Errors
    /// - `NotFound` for an unknown token or item.
    /// - `AlreadyTaken` when anyone holds the item, including a concurrent
    ///   taker that committed first.
    pub fn take(&self, item_id: ItemId, token: &str) -> Result<Item, LendingError> {
        let holder = self.guard.resolve(token)?;
        let mut item = self.load_item(item_id)?.item;

        if item.take(holder.uuid).is_err() {
            warn!(
                "event=item_take module=lending status=rejected reason=already_taken item_id={} holder_id={}",
                item_id, holder.uuid
            );
            return Err(LendingError::AlreadyTaken);
        }

        match self.items.swap_taken_by(item_id, None, Some(holder.uuid)) {
            Ok(true) => {
                info!(
                    "event=item_take module=lending status=ok item_id={} holder_id={}",
                    item_id, holder.uuid
                );
                Ok(item)
            }
            Ok(false) => {
                warn!(
                    "event=item_take module=lending status=rejected reason=lost_race item_id={} holder_id={}",
                    item_id, holder.uuid
                );
                Err(LendingError::AlreadyTaken)
            }
            Err(err) => {
                error!(
                    "event=item_take module=lending status=error item_id={} error={}",
                    item_id, err
                );
                Err(err.into())
            }
        }
    }

    /// Releases an item held by the token's holder.
    ///
    /// Giving back an item the caller does not hold changes nothing and is
    /// not an error.
    pub fn give_back(&self, item_id: ItemId, token: &str) -> Result<GiveBackOutcome, LendingError> {
        let holder = self.guard.resolve(token)?;
        let mut item = self.load_item(item_id)?.item;

        if item.give_back(holder.uuid) == GiveBackOutcome::Ignored {
            info!(
                "event=item_give_back module=lending status=ignored reason=not_holder item_id={} holder_id={}",
                item_id, holder.uuid
            );
            return Ok(GiveBackOutcome::Ignored);
        }

        match self.items.swap_taken_by(item_id, Some(holder.uuid), None) {
            Ok(true) => {
                info!(
                    "event=item_give_back module=lending status=ok item_id={} holder_id={}",
                    item_id, holder.uuid
                );
                Ok(GiveBackOutcome::Returned)
            }
            Ok(false) => {
                info!(
                    "event=item_give_back module=lending status=ignored reason=already_released item_id={} holder_id={}",
                    item_id, holder.uuid
                );
                Ok(GiveBackOutcome::Ignored)
            }
            Err(err) => {
                error!(
                    "event=item_give_back module=lending status=error item_id={} error={}",
                    item_id, err
                );
                Err(err.into())
            }
        }
    }

    fn load_item(&self, item_id: ItemId) -> Result<ItemRecord, LendingError> {
        self.items.get_item(item_id)?.ok_or_else(|| {
            warn!("event=item_lookup module=lending status=not_found item_id={item_id}");
            LendingError::NotFound
        })
    }
}
