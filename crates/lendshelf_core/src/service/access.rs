//! Token guard resolving bearer tokens to holders.
//!
//! # Invariants
//! - Malformed and unknown tokens are both reported as `LendingError::NotFound`.
//! - Token text is never logged.

use crate::model::holder::{Holder, HolderToken};
use crate::repo::holder_repo::HolderRepository;
use crate::service::lending_service::LendingError;
use log::{debug, warn};

/// Resolves presented tokens to holders before any item operation runs.
pub struct AccessGuard<H: HolderRepository> {
    holders: H,
}

impl<H: HolderRepository> AccessGuard<H> {
    pub fn new(holders: H) -> Self {
        Self { holders }
    }

    /// Returns the holder owning `token`.
    ///
    /// # Errors
    /// - `LendingError::NotFound` when the token is malformed or unknown.
    /// - `LendingError::Repo` on storage failure.
    pub fn resolve(&self, token: &str) -> Result<Holder, LendingError> {
        let Ok(token) = HolderToken::parse(token) else {
            warn!("event=access_check module=access status=denied reason=malformed_token");
            return Err(LendingError::NotFound);
        };

        match self.holders.find_by_token(&token)? {
            Some(holder) => {
                debug!(
                    "event=access_check module=access status=ok holder_id={}",
                    holder.uuid
                );
                Ok(holder)
            }
            None => {
                warn!("event=access_check module=access status=denied reason=unknown_token");
                Err(LendingError::NotFound)
            }
        }
    }
}
