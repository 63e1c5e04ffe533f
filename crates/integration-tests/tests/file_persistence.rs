//! Integration tests running both stores over the file adapter.
//!
//! Run with: cargo test -p stockbook-integration-tests --test file_persistence

#![allow(clippy::unwrap_used)]

use serde_json::Value;
use stockbook_integration_tests::ScratchDir;
use stockbook_store::{
    CredentialStore, InventoryStore, PersistenceAdapter, PersistenceError, Registration,
    StoreConfig, keys,
};

#[test]
fn test_directory_is_created_on_first_write() {
    let scratch = ScratchDir::new("lazy-dir");
    let adapter = scratch.adapter();
    assert_eq!(adapter.get(keys::PRODUCTS).unwrap(), None);
    assert!(!scratch.path().exists());

    let mut store = InventoryStore::open(adapter);
    store.add("Mouse", "19.99", "3").unwrap();
    assert!(scratch.path().join("inventario_basico_v1.json").is_file());
}

#[test]
fn test_both_stores_share_one_directory() {
    let scratch = ScratchDir::new("shared");

    let mut inventory = InventoryStore::open(scratch.adapter());
    inventory.add("Cable", "2.5", "10").unwrap();

    let mut auth = CredentialStore::open(scratch.adapter());
    auth.register(&Registration::new("Jane Doe", "jane", "jane@x.com", "abcdef"))
        .unwrap();
    auth.login("jane", "abcdef").unwrap();

    let inventory = InventoryStore::open(scratch.adapter());
    let auth = CredentialStore::open(scratch.adapter());
    assert_eq!(inventory.len(), 1);
    assert_eq!(auth.list_users().len(), 2);
    assert_eq!(auth.current_session().unwrap().username.as_str(), "jane");
}

#[test]
fn test_blobs_use_legacy_field_names() {
    let scratch = ScratchDir::new("format");
    let adapter = scratch.adapter();
    let mut inventory = InventoryStore::open(adapter.clone());
    inventory.add("Mouse", "19.999", "3").unwrap();

    let mut auth = CredentialStore::open(adapter.clone());
    auth.login("admin", "admin123").unwrap();

    let products: Value = serde_json::from_str(&adapter.get(keys::PRODUCTS).unwrap().unwrap()).unwrap();
    let product = products.get(0).unwrap();
    assert_eq!(product.get("nombre").unwrap(), "Mouse");
    assert_eq!(product.get("precio").unwrap(), "20.00");
    assert_eq!(product.get("stock").unwrap().as_u64(), Some(3));
    assert!(product.get("id").unwrap().is_string());

    let session: Value = serde_json::from_str(&adapter.get(keys::SESSION).unwrap().unwrap()).unwrap();
    assert_eq!(session.get("usuario").unwrap(), "admin");
    assert!(session.get("ts").unwrap().as_i64().unwrap() > 0);
    assert!(session.get("contrasena").is_none());
}

#[test]
fn test_corrupt_file_degrades_to_empty() {
    let scratch = ScratchDir::new("corrupt");
    let adapter = scratch.adapter();
    adapter.set(keys::PRODUCTS, "{ not json").unwrap();
    adapter.set(keys::SESSION, "[]").unwrap();

    assert!(InventoryStore::open(adapter.clone()).is_empty());
    assert!(CredentialStore::open(adapter).current_session().is_none());
}

#[test]
fn test_invalid_key_is_rejected() {
    let scratch = ScratchDir::new("keys");
    let err = scratch.adapter().set("../escape", "x").unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidKey(_)));
}

#[test]
fn test_config_opens_stores_in_data_dir() {
    let scratch = ScratchDir::new("config");
    let data_dir = scratch.path().to_string_lossy().into_owned();
    let config = StoreConfig::from_lookup(|key| match key {
        "STOCKBOOK_DATA_DIR" => Some(data_dir.clone()),
        "STOCKBOOK_CURRENCY" => Some("USD".to_owned()),
        _ => None,
    })
    .unwrap();

    let mut inventory = config.open_inventory();
    inventory.add("Pad", "3", "2").unwrap();
    assert_eq!(inventory.format_amount(inventory.totals().grand_total), "$6.00");

    let credentials = config.open_credentials();
    assert_eq!(credentials.paths().login, "login.html");
    assert!(scratch.path().join("inventario360_users_v1.json").is_file());
}
