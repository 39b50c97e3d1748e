//! Administrative add flow for holders and items.
//!
//! Admin authentication lives outside this crate; these entry points are not
//! token-gated.

use crate::imaging::{resize_to_bounds, ImageError, ThumbnailBounds};
use crate::model::holder::{Holder, HolderToken};
use crate::model::item::Item;
use crate::model::ValidationError;
use crate::repo::holder_repo::HolderRepository;
use crate::repo::item_repo::ItemRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for catalog administration.
#[derive(Debug)]
pub enum CatalogError {
    Validation(ValidationError),
    Image(ImageError),
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Image(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Image(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ImageError> for CatalogError {
    fn from(value: ImageError) -> Self {
        Self::Image(value)
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Creates holders and items.
pub struct CatalogService<I: ItemRepository, H: HolderRepository> {
    items: I,
    holders: H,
    bounds: ThumbnailBounds,
}

impl<I: ItemRepository, H: HolderRepository> CatalogService<I, H> {
    pub fn new(items: I, holders: H, bounds: ThumbnailBounds) -> Self {
        Self {
            items,
            holders,
            bounds,
        }
    }

    /// Registers a holder with a freshly generated token.
    pub fn add_holder(&self, name: &str) -> Result<Holder, CatalogError> {
        self.store_holder(Holder::new(name)?)
    }

    /// Registers a holder with a known token (seed data, migrations from
    /// another store).
    pub fn add_holder_with_token(
        &self,
        name: &str,
        token: HolderToken,
    ) -> Result<Holder, CatalogError> {
        self.store_holder(Holder::with_token(uuid::Uuid::new_v4(), name, token)?)
    }

    /// Adds an available item, resizing `image` into a thumbnail first.
    pub fn add_item(&self, name: &str, image: Option<&[u8]>) -> Result<Item, CatalogError> {
        let mut item = Item::new(name)?;
        item.thumbnail = image
            .map(|bytes| resize_to_bounds(bytes, self.bounds))
            .transpose()?;

        self.items.create_item(&item)?;
        info!(
            "event=item_add module=catalog status=ok item_id={} thumbnail={}",
            item.uuid,
            item.thumbnail.is_some()
        );
        Ok(item)
    }

    pub fn list_holders(&self) -> Result<Vec<Holder>, CatalogError> {
        Ok(self.holders.list_holders()?)
    }

    fn store_holder(&self, holder: Holder) -> Result<Holder, CatalogError> {
        self.holders.create_holder(&holder)?;
        info!(
            "event=holder_add module=catalog status=ok holder_id={}",
            holder.uuid
        );
        Ok(holder)
    }
}
