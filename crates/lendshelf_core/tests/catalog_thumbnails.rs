use image::{ImageFormat, RgbImage};
use lendshelf_core::db::open_db_in_memory;
use lendshelf_core::{
    resize_to_bounds, CatalogError, CatalogService, HolderToken, ImageError, LendingService,
    RepoError, SqliteHolderRepository, SqliteItemRepository, ThumbnailBounds,
};
use rusqlite::Connection;
use std::io::Cursor;

const BOUNDS: ThumbnailBounds = ThumbnailBounds {
    max_width: 120,
    max_height: 80,
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

fn catalog(conn: &Connection) -> CatalogService<SqliteItemRepository<'_>, SqliteHolderRepository<'_>> {
    CatalogService::new(
        SqliteItemRepository::try_new(conn).unwrap(),
        SqliteHolderRepository::try_new(conn).unwrap(),
        BOUNDS,
    )
}

#[test]
fn resize_large_image_fits_bounding_box() {
    let resized = resize_to_bounds(&png_bytes(800, 600), BOUNDS).unwrap();
    let (width, height) = dimensions(&resized);

    assert!(width <= BOUNDS.max_width);
    assert!(height <= BOUNDS.max_height);
    assert_eq!((width, height), (107, 80));
}

#[test]
fn resize_keeps_small_images_at_original_size() {
    let resized = resize_to_bounds(&png_bytes(40, 30), BOUNDS).unwrap();
    assert_eq!(dimensions(&resized), (40, 30));
}

#[test]
fn resize_rejects_garbage_and_empty_bounds() {
    assert!(matches!(
        resize_to_bounds(b"definitely not an image", BOUNDS),
        Err(ImageError::Decode(_))
    ));

    let empty = ThumbnailBounds {
        max_width: 0,
        max_height: 10,
    };
    assert!(matches!(
        resize_to_bounds(&png_bytes(10, 10), empty),
        Err(ImageError::InvalidBounds(_))
    ));
}

#[test]
fn add_item_stores_bounded_thumbnail_visible_to_holders() {
    let conn = open_db_in_memory().unwrap();
    let catalog = catalog(&conn);

    let ola = catalog.add_holder("Ola").unwrap();
    let item = catalog
        .add_item("Camera", Some(png_bytes(1024, 1024).as_slice()))
        .unwrap();
    assert!(item.is_available());

    let lending = LendingService::new(
        SqliteItemRepository::try_new(&conn).unwrap(),
        SqliteHolderRepository::try_new(&conn).unwrap(),
    );
    let thumbnail = lending.thumbnail(item.uuid, ola.token.as_str()).unwrap();
    assert_eq!(dimensions(&thumbnail), (80, 80));

    let listing = lending.list_items(ola.token.as_str()).unwrap();
    assert_eq!(listing.len(), 1);
    assert!(listing[0].has_thumbnail);
}

#[test]
fn add_item_without_image_and_with_broken_image() {
    let conn = open_db_in_memory().unwrap();
    let catalog = catalog(&conn);

    let plain = catalog.add_item("Ladder", None).unwrap();
    assert_eq!(plain.thumbnail, None);

    let err = catalog.add_item("Drill", Some(b"nope".as_slice())).unwrap_err();
    assert!(matches!(err, CatalogError::Image(_)));

    let err = catalog.add_item("   ", None).unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[test]
fn add_holder_generates_unique_tokens_and_rejects_reused_ones() {
    let conn = open_db_in_memory().unwrap();
    let catalog = catalog(&conn);

    let ola = catalog.add_holder("Ola").unwrap();
    let tomek = catalog.add_holder("Tomek").unwrap();
    assert_ne!(ola.token, tomek.token);

    let seeded = catalog
        .add_holder_with_token("Kasia", HolderToken::parse("kasia-token-01").unwrap())
        .unwrap();
    assert_eq!(seeded.token.as_str(), "kasia-token-01");

    let err = catalog
        .add_holder_with_token("Impostor", HolderToken::parse("kasia-token-01").unwrap())
        .unwrap_err();
    assert!(matches!(err, CatalogError::Repo(RepoError::DuplicateToken)));

    assert_eq!(catalog.list_holders().unwrap().len(), 3);
}
