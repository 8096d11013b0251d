//! Item store integration tests
//!
//! Exercises the public store surface end to end: open, add, update, read
//! back in priority order, and reopen from disk.

use chrono::{Duration, Utc};
use priorit::codec::{JsonCodec, RecordCodec, YamlCodec};
use priorit::domain::{Item, Priority};
use priorit::error::{PrioritError, Result};
use priorit::store::ItemStore;
use std::fs;
use tempfile::TempDir;

fn item(id: &str, due_days: i64, priority: Priority) -> Item {
    Item::new()
        .with_id(id)
        .with_title(format!("title of {}", id))
        .with_due_date(Utc::now() + Duration::days(due_days))
        .with_priority(priority)
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(Item::id).collect()
}

/// Integration test: add/duplicate/overwrite lifecycle on an empty store
#[test]
fn test_add_lifecycle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = ItemStore::open(temp_dir.path())?;

    let original = Item::new().with_title("first version");
    store.add_item(&original, false)?;
    let all = store.all_items()?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], original);

    let second = original.clone().with_title("second version");
    assert!(matches!(store.add_item(&second, false), Err(PrioritError::DuplicateId(_))));
    assert_eq!(store.len()?, 1);

    store.add_item(&second, true)?;
    assert_eq!(store.len()?, 1);
    assert_eq!(store.all_items()?[0].title(), "second version");

    Ok(())
}

/// Integration test: ranking across open and done items survives a reload
#[test]
fn test_priority_order_survives_reload() -> Result<()> {
    let temp_dir = TempDir::new()?;

    {
        let store = ItemStore::open(temp_dir.path())?;
        // urgency: 10*5=50, 3*2=6, -1*4=-4, done
        store.add_item(&item("someday", 10, Priority::VeryLow), false)?;
        store.add_item(&item("soon", 3, Priority::High), false)?;
        store.add_item(&item("overdue", -1, Priority::Low), false)?;
        store.add_item(&item("finished", -30, Priority::VeryHigh).with_done(true), false)?;
        assert_eq!(ids(&store.all_items()?), vec!["overdue", "soon", "someday", "finished"]);
    }

    let store = ItemStore::open(temp_dir.path())?;
    assert_eq!(ids(&store.all_items()?), vec!["overdue", "soon", "someday", "finished"]);
    assert_eq!(store.next_item()?.map(|i| i.id().to_string()), Some("overdue".to_string()));

    Ok(())
}

/// Integration test: completing the next item hands "next" to the runner-up
#[test]
fn test_done_item_leaves_front() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = ItemStore::open(temp_dir.path())?;
    store.add_item(&item("a", 1, Priority::High), false)?;
    store.add_item(&item("b", 5, Priority::High), false)?;

    let first = store.next_item()?.expect("store is not empty");
    assert_eq!(first.id(), "a");
    store.update_item(&first.with_done(true))?;

    assert_eq!(store.next_item()?.map(|i| i.id().to_string()), Some("b".to_string()));
    assert_eq!(store.len()?, 2);
    Ok(())
}

/// Integration test: ids are case-insensitive for lookup, update and files
#[test]
fn test_case_insensitive_ids() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = ItemStore::open(temp_dir.path())?;

    store.add_item(&Item::new().with_id("Weekly-Review").with_title("v1"), false)?;
    store.update_item(&Item::new().with_id("WEEKLY-REVIEW").with_title("v2"))?;

    assert_eq!(store.len()?, 1);
    assert_eq!(store.get_item("weekly-review")?.map(|i| i.title().to_string()), Some("v2".to_string()));

    let records: Vec<_> = fs::read_dir(temp_dir.path())?.collect();
    assert_eq!(records.len(), 1);
    Ok(())
}

/// Integration test: a corrupt record makes the whole open fail
#[test]
fn test_corrupt_record_fails_open() -> Result<()> {
    let temp_dir = TempDir::new()?;
    {
        let store = ItemStore::open(temp_dir.path())?;
        store.add_item(&item("fine", 1, Priority::Med), false)?;
        store.add_item(&item("also-fine", 2, Priority::Med), false)?;
    }
    fs::write(temp_dir.path().join("broken.json"), b"\x00\x01 not a record")?;

    let result = ItemStore::open(temp_dir.path());
    assert!(matches!(result, Err(PrioritError::LoadFailed { failures: 1, .. })));
    Ok(())
}

/// Integration test: opening over a regular file is a storage error
#[test]
fn test_open_over_file_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = temp_dir.path().join("plain-file");
    fs::write(&file, "x")?;

    assert!(matches!(
        ItemStore::open(&file),
        Err(PrioritError::StorageUnavailable { .. })
    ));
    Ok(())
}

/// Integration test: search wraps nothing implicitly
#[test]
fn test_search_and_categories() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = ItemStore::open(temp_dir.path())?;
    store.add_item(&Item::new().with_title("naming things").with_categories(["Code"]), false)?;
    store.add_item(&Item::new().with_title("cache invalidation").with_categories(["code", "Ops"]), false)?;

    assert_eq!(store.search_item(".*nam.*")?.len(), 1);
    assert!(store.search_item(".*lol.*")?.is_empty());
    assert_eq!(store.search_item("(?i)code")?.len(), 2);

    let mut categories: Vec<String> = store.all_categories()?.iter().map(|c| c.to_lowercase()).collect();
    categories.sort();
    assert_eq!(categories, vec!["code", "ops"]);
    Ok(())
}

/// Integration test: every codec round-trips every field
#[test]
fn test_codecs_round_trip() -> Result<()> {
    let original = Item::new()
        .with_id("round-trip")
        .with_title("Round trip")
        .with_text("first line\nsecond line")
        .with_categories(["one", "Two", "three"])
        .with_priority(Priority::Low)
        .with_done(true);

    let codecs: Vec<Box<dyn RecordCodec>> = vec![Box::new(JsonCodec), Box::new(YamlCodec)];
    for codec in codecs {
        let restored = codec.decode(&codec.encode(&original)?)?;
        assert!(original.same_content(&restored), "codec {}", codec.extension());
    }
    Ok(())
}
