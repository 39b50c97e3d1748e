//! Item domain model.
//!
//! # Responsibility
//! - Define the lendable record and its optional thumbnail.
//! - Route ownership changes through the lending policy.
//!
//! # Invariants
//! - `taken_by` is either `None` or one holder id.
//! - `taken_by` only changes through `take`/`give_back` outside fixtures.

use crate::model::holder::HolderId;
use crate::model::{now_epoch_ms, validate_name, ValidationError};
use crate::policy::lending::{self, AlreadyTaken, GiveBackOutcome, LendState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for items.
pub type ItemId = Uuid;

/// A physical thing that can be lent out and returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub uuid: ItemId,
    pub name: String,
    /// Encoded PNG bytes, already bounded by the thumbnail box.
    #[serde(skip)]
    pub thumbnail: Option<Vec<u8>>,
    /// Holder currently possessing the item.
    pub taken_by: Option<HolderId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Item {
    /// Creates an available item with a generated id.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates an available item with a caller-provided id.
    pub fn with_id(uuid: ItemId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let item = Self {
            uuid,
            name: name.into().trim().to_string(),
            thumbnail: None,
            taken_by: None,
            created_at: now_epoch_ms(),
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }

    pub fn state(&self) -> LendState {
        LendState::from(self.taken_by)
    }

    pub fn is_available(&self) -> bool {
        self.taken_by.is_none()
    }

    /// Hands the item to `holder`.
    ///
    /// Fails without touching the item when anyone (including `holder`)
    /// already holds it.
    pub fn take(&mut self, holder: HolderId) -> Result<(), AlreadyTaken> {
        let next = lending::take(self.state(), holder)?;
        self.taken_by = next.holder();
        Ok(())
    }

    /// Releases the item if `holder` is the current holder; otherwise a no-op.
    pub fn give_back(&mut self, holder: HolderId) -> GiveBackOutcome {
        let (next, outcome) = lending::give_back(self.state(), holder);
        self.taken_by = next.holder();
        outcome
    }
}
