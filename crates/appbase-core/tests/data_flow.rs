//! End-to-end flow over the data layer: registry, metadata, records, query.

use appbase_commons::{ColumnType, Document, Filter, OwnerId};
use appbase_core::{
    DatabaseCatalog, DatabaseRegistry, MetadataStore, QueryAction, QueryRequest, QueryResponse,
    RecordRepository, TableQueryService,
};
use appbase_store::{MemoryDriver, StorageDriver};
use serde_json::{json, Value};
use std::sync::Arc;

struct App {
    driver: Arc<MemoryDriver>,
    registry: DatabaseRegistry,
    metadata: MetadataStore,
    records: Arc<RecordRepository>,
    queries: TableQueryService,
}

fn app() -> App {
    let driver = Arc::new(MemoryDriver::new());
    let catalog = Arc::new(DatabaseCatalog::new(driver.clone()).unwrap());
    let records = Arc::new(RecordRepository::new(driver.clone(), catalog.clone()));
    App {
        driver: driver.clone(),
        registry: DatabaseRegistry::new(driver.clone(), catalog.clone()),
        metadata: MetadataStore::new(driver, catalog.clone()),
        records: records.clone(),
        queries: TableQueryService::new(catalog, records),
    }
}

fn doc(pairs: &[(&str, Value)]) -> Document {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn full_lifecycle_from_database_to_query() {
    let app = app();
    let owner = OwnerId::new("owner-12345678");

    // Create a database, schema and some rows.
    let db = app.registry.create(&owner, "Sales").unwrap();
    let leads = app.metadata.add_table(&db.id, "Leads").unwrap();
    app.metadata
        .add_column(&db.id, &leads.id, "name", ColumnType::String)
        .unwrap();
    app.metadata
        .add_column(&db.id, &leads.id, "age", ColumnType::Number)
        .unwrap();
    app.metadata
        .add_column(&db.id, &leads.id, "signed_up", ColumnType::Date)
        .unwrap();

    for (name, age) in [("Ada", "36"), ("Grace", "45"), ("Alan", "17")] {
        app.records
            .insert(
                &db.id,
                "Leads",
                &doc(&[("name", json!(name)), ("age", json!(age))]),
            )
            .unwrap();
    }

    // Query: adults only.
    let resp = app
        .queries
        .query(
            &db.id,
            "Leads",
            &QueryRequest {
                filters: vec![Filter::new("age", "greater_equal", json!("18"))],
                action: QueryAction::Count,
                column: None,
            },
        )
        .unwrap();
    assert_eq!(resp, QueryResponse::Count { count: 2 });

    // No session lingers after any of this.
    assert_eq!(app.driver.open_sessions(&db.namespace_id), 0);

    // Tear the database down; the namespace disappears with it.
    app.registry.destroy(&db.id, &owner).unwrap();
    assert!(!app.driver.namespace_exists(&db.namespace_id));
}

#[test]
fn column_removal_leaves_stale_fields_harmless() {
    let app = app();
    let owner = OwnerId::new("owner-1");
    let db = app.registry.create(&owner, "CRM").unwrap();
    let table = app.metadata.add_table(&db.id, "Contacts").unwrap();
    app.metadata
        .add_column(&db.id, &table.id, "name", ColumnType::String)
        .unwrap();
    let phone = app
        .metadata
        .add_column(&db.id, &table.id, "phone", ColumnType::String)
        .unwrap();

    app.records
        .insert(
            &db.id,
            "Contacts",
            &doc(&[("name", json!("Ada")), ("phone", json!("555-0100"))]),
        )
        .unwrap();

    app.metadata
        .remove_column(&db.id, &table.id, &phone.id)
        .unwrap();

    // Stored documents no longer carry the field, inserts ignore it.
    let rows = app.records.list(&db.id, "Contacts").unwrap();
    assert!(rows[0].fields.get("phone").is_none());

    let rec = app
        .records
        .insert(&db.id, "Contacts", &doc(&[("phone", json!("555-0101"))]))
        .unwrap();
    assert!(rec.fields.get("phone").is_none());
}

#[test]
fn two_tenants_never_see_each_other() {
    let app = app();
    let alice = OwnerId::new("alice-owner-id");
    let bob = OwnerId::new("bob-owner-id00");

    let a = app.registry.create(&alice, "Sales").unwrap();
    let b = app.registry.create(&bob, "Sales").unwrap();
    assert_ne!(a.namespace_id, b.namespace_id);

    for (db, value) in [(&a, "alice"), (&b, "bob")] {
        let table = app.metadata.add_table(&db.id, "Notes").unwrap();
        app.metadata
            .add_column(&db.id, &table.id, "text", ColumnType::String)
            .unwrap();
        app.records
            .insert(&db.id, "Notes", &doc(&[("text", json!(value))]))
            .unwrap();
    }

    let rows = app.records.list(&a.id, "Notes").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fields["text"], json!("alice"));
}
