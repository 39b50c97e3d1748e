use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

fn lendshelf(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lendshelf"))
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("binary should run")
}

fn json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn take_and_give_back_through_the_cli() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("shelf.sqlite3");

    assert!(lendshelf(&db, &["init"]).status.success());

    let ola = json(&lendshelf(&db, &["--json", "add-holder", "Ola"]));
    let tomek = json(&lendshelf(&db, &["--json", "add-holder", "Tomek"]));
    let ola_token = ola["token"].as_str().unwrap().to_string();
    let tomek_token = tomek["token"].as_str().unwrap().to_string();

    let book = json(&lendshelf(&db, &["--json", "add-item", "Book"]));
    let book_id = book["uuid"].as_str().unwrap().to_string();

    let taken = json(&lendshelf(
        &db,
        &["--json", "take", &book_id, "--token", &ola_token],
    ));
    assert_eq!(taken["taken_by"], "Ola");
    assert_eq!(taken["can_give_back"], true);

    let rejected = lendshelf(&db, &["take", &book_id, "--token", &tomek_token]);
    assert_eq!(rejected.status.code(), Some(3));

    let ignored = json(&lendshelf(
        &db,
        &["--json", "give-back", &book_id, "--token", &tomek_token],
    ));
    assert_eq!(ignored["outcome"], "ignored");

    let returned = json(&lendshelf(
        &db,
        &["--json", "give-back", &book_id, "--token", &ola_token],
    ));
    assert_eq!(returned["outcome"], "returned");

    let listing = json(&lendshelf(&db, &["--json", "list", "--token", &tomek_token]));
    assert_eq!(listing[0]["name"], "Book");
    assert!(listing[0]["taken_by"].is_null());
}

#[test]
fn unknown_token_and_unknown_item_share_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("shelf.sqlite3");

    let ola = json(&lendshelf(&db, &["--json", "add-holder", "Ola"]));
    let ola_token = ola["token"].as_str().unwrap().to_string();
    let book = json(&lendshelf(&db, &["--json", "add-item", "Book"]));
    let book_id = book["uuid"].as_str().unwrap().to_string();
    let missing_id = "00000000-0000-4000-8000-000000000000";

    let bad_token = lendshelf(&db, &["show", &book_id, "--token", "25648235"]);
    let bad_item = lendshelf(&db, &["show", missing_id, "--token", &ola_token]);

    assert_eq!(bad_token.status.code(), Some(2));
    assert_eq!(bad_item.status.code(), Some(2));
    assert_eq!(bad_token.stderr, bad_item.stderr);
}
