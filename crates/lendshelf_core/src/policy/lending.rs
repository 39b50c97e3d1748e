//! Item lending state machine.
//!
//! States are `Available` and `Held(holder)`. `take` is rejected on any held
//! item; `give_back` from anyone but the current holder leaves state as is and
//! is reported as `GiveBackOutcome::Ignored` rather than an error.

use crate::model::holder::HolderId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lending state of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LendState {
    #[default]
    Available,
    Held(HolderId),
}

impl LendState {
    pub fn holder(self) -> Option<HolderId> {
        match self {
            Self::Available => None,
            Self::Held(holder) => Some(holder),
        }
    }
}

impl From<Option<HolderId>> for LendState {
    fn from(value: Option<HolderId>) -> Self {
        value.map_or(Self::Available, Self::Held)
    }
}

/// Rejection of `take` on an item that is already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyTaken {
    pub holder: HolderId,
}

impl Display for AlreadyTaken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "item is already taken")
    }
}

impl Error for AlreadyTaken {}

/// Result of a give-back request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiveBackOutcome {
    /// The caller held the item and it is available again.
    Returned,
    /// The caller did not hold the item; nothing changed.
    Ignored,
}

/// Computes the state after `holder` takes an item in `state`.
pub fn take(state: LendState, holder: HolderId) -> Result<LendState, AlreadyTaken> {
    match state {
        LendState::Available => Ok(LendState::Held(holder)),
        LendState::Held(current) => Err(AlreadyTaken { holder: current }),
    }
}

/// Computes the state after `holder` gives back an item in `state`.
pub fn give_back(state: LendState, holder: HolderId) -> (LendState, GiveBackOutcome) {
    match state {
        LendState::Held(current) if current == holder => {
            (LendState::Available, GiveBackOutcome::Returned)
        }
        other => (other, GiveBackOutcome::Ignored),
    }
}

#[cfg(test)]
mod tests {
    use super::{give_back, take, AlreadyTaken, GiveBackOutcome, LendState};
    use uuid::Uuid;

    #[test]
    fn take_moves_available_to_held() {
        let ola = Uuid::new_v4();
        assert_eq!(take(LendState::Available, ola), Ok(LendState::Held(ola)));
    }

    #[test]
    fn take_rejects_held_item_for_any_holder() {
        let ola = Uuid::new_v4();
        let tomek = Uuid::new_v4();
        let held = LendState::Held(ola);

        assert_eq!(take(held, tomek), Err(AlreadyTaken { holder: ola }));
        assert_eq!(take(held, ola), Err(AlreadyTaken { holder: ola }));
    }

    #[test]
    fn give_back_only_releases_for_current_holder() {
        let ola = Uuid::new_v4();
        let tomek = Uuid::new_v4();

        assert_eq!(
            give_back(LendState::Held(ola), tomek),
            (LendState::Held(ola), GiveBackOutcome::Ignored)
        );
        assert_eq!(
            give_back(LendState::Held(ola), ola),
            (LendState::Available, GiveBackOutcome::Returned)
        );
        assert_eq!(
            give_back(LendState::Available, ola),
            (LendState::Available, GiveBackOutcome::Ignored)
        );
    }
}
