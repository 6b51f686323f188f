use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use stocktrack_core::{
    ContentType, Item, ItemAddress, ItemColumn, ItemFilter, ItemId, ItemQuery, ItemSort,
    ItemStore, ItemValidationError, ItemValues, StoreError,
};

fn recording_store() -> (ItemStore, Arc<Mutex<Vec<ItemAddress>>>) {
    let store = ItemStore::open_in_memory().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(Arc::new(move |address: &ItemAddress| {
        sink.lock().unwrap().push(*address);
    }));
    (store, seen)
}

fn pen() -> ItemValues {
    ItemValues::new()
        .with_name("Pen")
        .with_price(10)
        .with_quantity(5)
}

fn single(store: &ItemStore, address: &ItemAddress) -> Item {
    let mut rows = store.query(address).unwrap();
    assert_eq!(rows.len(), 1, "expected exactly one row for {address}");
    rows.remove(0)
}

#[test]
fn pen_lifecycle_end_to_end() {
    let store = ItemStore::open_in_memory().unwrap();

    let address = store.insert(&pen()).unwrap();
    let item = single(&store, &address);
    assert_eq!(ItemAddress::Item(item.id), address);
    assert_eq!(item.name, "Pen");
    assert_eq!(item.description, "");
    assert_eq!(item.price, 10);
    assert_eq!(item.quantity, 5);

    let updated = store
        .update(&address, &ItemValues::new().with_quantity(3))
        .unwrap();
    assert_eq!(updated, 1);
    let item = single(&store, &address);
    assert_eq!(item.quantity, 3);
    assert_eq!(item.price, 10);
    assert_eq!(item.name, "Pen");

    assert_eq!(store.delete(&address).unwrap(), 1);
    assert!(store.query(&address).unwrap().is_empty());
}

#[test]
fn insert_applies_defaults_for_omitted_numbers() {
    let store = ItemStore::open_in_memory().unwrap();
    let address = store
        .insert(&ItemValues::new().with_name("Eraser").with_description("white"))
        .unwrap();

    let item = single(&store, &address);
    assert_eq!(item.description, "white");
    assert_eq!(item.price, 0);
    assert_eq!(item.quantity, 0);
}

#[test]
fn insert_without_usable_name_is_rejected() {
    let (store, seen) = recording_store();

    for values in [
        ItemValues::new().with_price(1).with_quantity(1),
        ItemValues::new().with_name("").with_price(1),
        ItemValues::new().with_name("   "),
    ] {
        let err = store.insert(&values).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ItemValidationError::NameRequired)
        ));
        assert_eq!(err.to_string(), "name required");
    }

    assert!(store.query(&ItemAddress::Collection).unwrap().is_empty());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn insert_rejects_negative_price_and_quantity() {
    let store = ItemStore::open_in_memory().unwrap();

    let err = store.insert(&pen().with_price(-1)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ItemValidationError::InvalidPrice(-1))
    ));
    let err = store.insert(&pen().with_quantity(-1)).unwrap_err();
    assert_eq!(err.to_string(), "invalid quantity");

    assert!(store.query(&ItemAddress::Collection).unwrap().is_empty());
}

#[test]
fn rejected_update_leaves_record_unchanged() {
    let (store, seen) = recording_store();
    let address = store.insert(&pen()).unwrap();
    let before = single(&store, &address);
    seen.lock().unwrap().clear();

    let payloads = [
        ItemValues::new().with_price(-1),
        ItemValues::new().with_quantity(-1),
        ItemValues::new().with_name(""),
        ItemValues::new().with_quantity(99).with_price(-1),
    ];
    for values in payloads {
        let err = store.update(&address, &values).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    assert_eq!(single(&store, &address), before);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn empty_update_is_a_silent_noop() {
    let (store, seen) = recording_store();
    let address = store.insert(&pen()).unwrap();
    let before = single(&store, &address);
    seen.lock().unwrap().clear();

    assert_eq!(store.update(&address, &ItemValues::new()).unwrap(), 0);
    assert_eq!(
        store
            .update(&ItemAddress::Collection, &ItemValues::new())
            .unwrap(),
        0
    );

    assert_eq!(single(&store, &address), before);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn update_leaves_absent_fields_untouched() {
    let store = ItemStore::open_in_memory().unwrap();
    let address = store
        .insert(&pen().with_description("blue ink"))
        .unwrap();

    store
        .update(&address, &ItemValues::new().with_name("Gel Pen"))
        .unwrap();

    let item = single(&store, &address);
    assert_eq!(item.name, "Gel Pen");
    assert_eq!(item.description, "blue ink");
    assert_eq!(item.price, 10);
    assert_eq!(item.quantity, 5);
}

#[test]
fn collection_update_honors_filter() {
    let store = ItemStore::open_in_memory().unwrap();
    let pen = store.insert(&pen()).unwrap();
    let glue = store
        .insert(&ItemValues::new().with_name("Glue").with_quantity(0))
        .unwrap();

    let restocked = store
        .update_matching(
            &ItemAddress::Collection,
            &ItemValues::new().with_quantity(20),
            &ItemFilter::low_stock(0),
        )
        .unwrap();

    assert_eq!(restocked, 1);
    assert_eq!(single(&store, &glue).quantity, 20);
    assert_eq!(single(&store, &pen).quantity, 5);
}

#[test]
fn item_address_ignores_caller_filter() {
    let store = ItemStore::open_in_memory().unwrap();
    let address = store.insert(&pen()).unwrap();

    let query = ItemQuery {
        filter: ItemFilter {
            name: Some("Nothing like it".to_string()),
            ..ItemFilter::default()
        },
        sort: None,
    };
    assert_eq!(store.query_with(&address, &query).unwrap().len(), 1);

    let deleted = store
        .delete_matching(&address, &ItemFilter::low_stock(-100))
        .unwrap();
    assert_eq!(deleted, 1);
}

#[test]
fn query_missing_item_returns_empty() {
    let store = ItemStore::open_in_memory().unwrap();
    assert!(store
        .query(&ItemAddress::Item(ItemId(404)))
        .unwrap()
        .is_empty());
}

#[test]
fn collection_query_sorts_when_asked() {
    let store = ItemStore::open_in_memory().unwrap();
    for name in ["Ruler", "Clip", "Tape"] {
        store.insert(&ItemValues::new().with_name(name)).unwrap();
    }

    let query = ItemQuery {
        sort: Some(ItemSort::ascending(ItemColumn::Name)),
        ..ItemQuery::default()
    };
    let names: Vec<_> = store
        .query_with(&ItemAddress::Collection, &query)
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["Clip", "Ruler", "Tape"]);

    let default_order: Vec<_> = store
        .query(&ItemAddress::Collection)
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(default_order, vec!["Ruler", "Clip", "Tape"]);
}

#[test]
fn delete_collection_removes_everything() {
    let (store, seen) = recording_store();
    store.insert(&pen()).unwrap();
    store.insert(&ItemValues::new().with_name("Glue")).unwrap();
    seen.lock().unwrap().clear();

    assert_eq!(store.delete(&ItemAddress::Collection).unwrap(), 2);
    assert!(store.query(&ItemAddress::Collection).unwrap().is_empty());
    assert_eq!(*seen.lock().unwrap(), vec![ItemAddress::Collection]);

    assert_eq!(store.delete(&ItemAddress::Collection).unwrap(), 0);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn deleting_twice_returns_zero_second_time() {
    let (store, seen) = recording_store();
    let address = store.insert(&pen()).unwrap();

    assert_eq!(store.delete(&address).unwrap(), 1);
    assert_eq!(store.delete(&address).unwrap(), 0);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![ItemAddress::Collection, address]
    );
}

#[test]
fn notifications_are_scoped_to_the_mutated_address() {
    let (store, seen) = recording_store();
    let address = store.insert(&pen()).unwrap();
    store
        .update(&address, &ItemValues::new().with_price(12))
        .unwrap();
    assert_eq!(
        store
            .update(&ItemAddress::Item(ItemId(999)), &ItemValues::new().with_price(1))
            .unwrap(),
        0
    );

    assert_eq!(
        *seen.lock().unwrap(),
        vec![ItemAddress::Collection, address]
    );
}

#[test]
fn ids_are_not_reused_after_delete() {
    let store = ItemStore::open_in_memory().unwrap();
    let first = store.insert(&pen()).unwrap();
    store.delete(&first).unwrap();
    let second = store.insert(&pen()).unwrap();

    let (ItemAddress::Item(first_id), ItemAddress::Item(second_id)) = (first, second) else {
        panic!("insert must return item addresses");
    };
    assert!(second_id > first_id);
}

#[test]
fn observer_sees_committed_row_and_may_reenter_store() {
    let store = Arc::new(ItemStore::open_in_memory().unwrap());
    let observed = Arc::new(Mutex::new(Vec::new()));

    let reader = Arc::downgrade(&store);
    let sink = Arc::clone(&observed);
    store.subscribe(Arc::new(move |_: &ItemAddress| {
        if let Some(store) = reader.upgrade() {
            let rows = store.query(&ItemAddress::Collection).unwrap();
            sink.lock().unwrap().push(rows.len());
        }
    }));

    store.insert(&pen()).unwrap();
    store.insert(&pen()).unwrap();
    assert_eq!(*observed.lock().unwrap(), vec![1, 2]);
}

#[test]
fn storage_failure_surfaces_as_storage_error_without_notification() {
    let raw = Connection::open_in_memory().unwrap();
    let store = ItemStore::new(raw);
    let seen = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&seen);
    store.subscribe(Arc::new(move |_: &ItemAddress| {
        *sink.lock().unwrap() += 1;
    }));

    let err = store.insert(&pen()).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert!(matches!(
        store.query(&ItemAddress::Collection).unwrap_err(),
        StoreError::Storage(_)
    ));
    assert_eq!(*seen.lock().unwrap(), 0);
}

#[test]
fn resolve_type_classifies_addresses() {
    let store = ItemStore::open_in_memory().unwrap();
    assert_eq!(
        store.resolve_type("content://stocktrack/items").unwrap(),
        ContentType::Collection
    );
    assert_eq!(
        store.resolve_type("content://stocktrack/items/12").unwrap(),
        ContentType::Item
    );

    let err = store
        .resolve_type("content://stocktrack/suppliers")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidAddress(raw) if raw.ends_with("suppliers")));
}

#[test]
fn concurrent_inserts_get_distinct_ids() {
    let store = Arc::new(ItemStore::open_in_memory().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                (0..25)
                    .map(|n| {
                        store
                            .insert(&ItemValues::new().with_name(format!("w{worker}-{n}")))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut addresses: Vec<_> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    addresses.sort_by_key(|address| address.to_string());
    addresses.dedup();
    assert_eq!(addresses.len(), 100);
    assert_eq!(store.query(&ItemAddress::Collection).unwrap().len(), 100);
}
