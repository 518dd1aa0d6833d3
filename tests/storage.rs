use items_sync::persist::{ensure_file, read_data, write_data};
use items_sync::serializer::JsonSerializer;
use items_sync::{Error, Item, ItemFields, ItemStore};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("items_sync_test_{}.json", name))
}

fn sample() -> Vec<Item> {
    vec![
        Item::from_fields(1, ItemFields::new("Item1", "First item", 10.0)),
        Item::from_fields(2, ItemFields::new("Item2", "Second item", 2.5)),
    ]
}

#[test]
fn read_missing_file_is_io_error() {
    let path = temp_path("read_missing");
    let _ = std::fs::remove_file(&path);
    let err = read_data::<Item, _>(&path, &JsonSerializer::pretty()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn read_malformed_file_is_deserialize_error() {
    let path = temp_path("read_malformed");
    std::fs::write(&path, "[{\"id\": 1, \"name\": ").unwrap();
    let err = read_data::<Item, _>(&path, &JsonSerializer::pretty()).unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn read_wrong_shape_is_deserialize_error() {
    let path = temp_path("read_wrong_shape");
    std::fs::write(&path, r#"{"id": 1}"#).unwrap();
    let err = read_data::<Item, _>(&path, &JsonSerializer::pretty()).unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn read_empty_file_is_empty_sequence() {
    let path = temp_path("read_empty");
    std::fs::write(&path, "").unwrap();
    let items = read_data::<Item, _>(&path, &JsonSerializer::pretty()).unwrap();
    assert!(items.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_then_read_preserves_order() {
    let path = temp_path("write_read");
    let _ = std::fs::remove_file(&path);
    let ser = JsonSerializer::compact();
    write_data(&path, &sample(), &ser).unwrap();
    assert_eq!(read_data::<Item, _>(&path, &ser).unwrap(), sample());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_leaves_no_temp_file_behind() {
    let path = temp_path("no_tmp");
    let _ = std::fs::remove_file(&path);
    write_data(&path, &sample(), &JsonSerializer::pretty()).unwrap();
    assert!(!path.with_extension("json.tmp").exists());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn ensure_file_seeds_empty_array_once() {
    let path = temp_path("ensure");
    let _ = std::fs::remove_file(&path);

    assert!(ensure_file(&path).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

    write_data(&path, &sample(), &JsonSerializer::pretty()).unwrap();
    assert!(!ensure_file(&path).unwrap());
    assert_eq!(
        read_data::<Item, _>(&path, &JsonSerializer::pretty()).unwrap(),
        sample()
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn ensure_file_creates_parent_dirs() {
    let dir = std::env::temp_dir().join("items_sync_test_nested_dir");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("inner").join("data.json");

    assert!(ensure_file(&path).unwrap());
    assert!(path.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_primary_fails_requests_without_touching_mirror() {
    let primary = temp_path("corrupt_primary");
    let mirror = temp_path("corrupt_mirror");
    let _ = std::fs::remove_file(&primary);
    let _ = std::fs::remove_file(&mirror);

    let store = ItemStore::open(&primary, &mirror).unwrap();
    store.create(ItemFields::new("a", "b", 1.0)).unwrap();
    let mirror_before = std::fs::read(&mirror).unwrap();

    std::fs::write(&primary, "not json at all").unwrap();
    assert!(matches!(store.list(), Err(Error::Deserialize(_))));
    assert!(matches!(store.get(1), Err(Error::Deserialize(_))));
    assert!(matches!(
        store.create(ItemFields::new("c", "d", 1.0)),
        Err(Error::Deserialize(_))
    ));
    assert_eq!(std::fs::read(&mirror).unwrap(), mirror_before);

    let _ = std::fs::remove_file(&primary);
    let _ = std::fs::remove_file(&mirror);
}

#[test]
fn corrupt_primary_fails_open() {
    let primary = temp_path("corrupt_open_primary");
    let mirror = temp_path("corrupt_open_mirror");
    let _ = std::fs::remove_file(&mirror);
    std::fs::write(&primary, "[{]").unwrap();

    let err = ItemStore::open(&primary, &mirror).unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));

    let _ = std::fs::remove_file(&primary);
    let _ = std::fs::remove_file(&mirror);
}
