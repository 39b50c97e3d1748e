use lendshelf_core::{
    GiveBackOutcome, Holder, HolderToken, Item, LendState, ValidationError,
};
use uuid::Uuid;

#[test]
fn item_new_starts_available() {
    let item = Item::new("Book").unwrap();

    assert!(!item.uuid.is_nil());
    assert_eq!(item.name, "Book");
    assert_eq!(item.taken_by, None);
    assert_eq!(item.thumbnail, None);
    assert_eq!(item.state(), LendState::Available);
    assert!(item.created_at > 0);
}

#[test]
fn item_name_validation() {
    assert_eq!(Item::new("  "), Err(ValidationError::EmptyName));
    let long_name = "x".repeat(201);
    assert!(matches!(
        Item::new(long_name),
        Err(ValidationError::NameTooLong {
            max: 200,
            actual: 201
        })
    ));
}

#[test]
fn take_then_give_back_cycles_state() {
    let ola = Uuid::new_v4();
    let mut book = Item::new("Book").unwrap();

    book.take(ola).unwrap();
    assert_eq!(book.state(), LendState::Held(ola));

    assert_eq!(book.give_back(ola), GiveBackOutcome::Returned);
    assert_eq!(book.state(), LendState::Available);
}

#[test]
fn taking_held_item_fails_even_for_current_holder() {
    let ola = Uuid::new_v4();
    let tomek = Uuid::new_v4();
    let mut book = Item::new("Book").unwrap();
    book.take(tomek).unwrap();

    let err = book.take(ola).unwrap_err();
    assert_eq!(err.holder, tomek);
    assert!(book.take(tomek).is_err());
    assert_eq!(book.taken_by, Some(tomek));
}

#[test]
fn give_back_by_other_holder_or_on_available_item_is_ignored() {
    let ola = Uuid::new_v4();
    let tomek = Uuid::new_v4();
    let mut book = Item::new("Book").unwrap();

    assert_eq!(book.give_back(ola), GiveBackOutcome::Ignored);
    assert_eq!(book.taken_by, None);

    book.take(tomek).unwrap();
    assert_eq!(book.give_back(ola), GiveBackOutcome::Ignored);
    assert_eq!(book.taken_by, Some(tomek));
}

#[test]
fn item_serialization_omits_thumbnail_bytes() {
    let item_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let holder_id = Uuid::parse_str("66666666-7777-4888-9999-000000000000").unwrap();
    let mut item = Item::with_id(item_id, "Table").unwrap();
    item.thumbnail = Some(vec![1, 2, 3]);
    item.take(holder_id).unwrap();

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["uuid"], item_id.to_string());
    assert_eq!(json["name"], "Table");
    assert_eq!(json["taken_by"], holder_id.to_string());
    assert!(json.get("thumbnail").is_none());
}

#[test]
fn holder_token_round_trips_through_serde_as_plain_string() {
    let token = HolderToken::parse("ola-token-0001").unwrap();
    let holder = Holder::with_token(Uuid::new_v4(), "Ola", token.clone()).unwrap();

    let json = serde_json::to_value(&holder).unwrap();
    assert_eq!(json["token"], "ola-token-0001");

    let decoded: Holder = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.token, token);
}

#[test]
fn holder_deserialization_rejects_malformed_token() {
    let json = serde_json::json!({
        "uuid": Uuid::new_v4().to_string(),
        "name": "Mallory",
        "token": "no",
    });
    assert!(serde_json::from_value::<Holder>(json).is_err());
}
