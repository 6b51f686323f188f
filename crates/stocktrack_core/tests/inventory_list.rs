use std::sync::Arc;
use stocktrack_core::{
    delete_all_message, InventoryList, ItemAddress, ItemStore, ItemValues,
};

fn seeded_store() -> Arc<ItemStore> {
    let store = Arc::new(ItemStore::open_in_memory().unwrap());
    store
        .insert(
            &ItemValues::new()
                .with_name("Pen")
                .with_price(10)
                .with_quantity(5),
        )
        .unwrap();
    store
        .insert(&ItemValues::new().with_name("Glue").with_description("stick"))
        .unwrap();
    store
}

#[test]
fn attach_loads_rendered_rows() {
    let store = seeded_store();
    let mut list = InventoryList::attach(Arc::clone(&store)).unwrap();

    assert!(!list.is_stale());
    let rows = list.rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Pen");
    assert_eq!(rows[0].price_label, "₱ 10");
    assert_eq!(rows[0].stock_label, "In Stock: 5");
    assert_eq!(rows[1].description, "stick");
    assert_eq!(rows[1].stock_label, "In Stock: 0");
}

#[test]
fn change_notification_triggers_requery() {
    let store = seeded_store();
    let mut list = InventoryList::attach(Arc::clone(&store)).unwrap();

    store
        .insert(&ItemValues::new().with_name("Tape"))
        .unwrap();
    assert!(list.is_stale());
    assert_eq!(list.rows().unwrap().len(), 3);
    assert!(!list.is_stale());

    let address = list.select(0).unwrap();
    store
        .update(&address, &ItemValues::new().with_quantity(1))
        .unwrap();
    assert_eq!(list.rows().unwrap()[0].stock_label, "In Stock: 1");
}

#[test]
fn select_yields_item_address_for_row() {
    let store = seeded_store();
    let list = InventoryList::attach(Arc::clone(&store)).unwrap();

    let address = list.select(1).unwrap();
    assert!(matches!(address, ItemAddress::Item(_)));
    assert_eq!(store.query(&address).unwrap()[0].name, "Glue");
    assert_eq!(list.select(2), None);
}

#[test]
fn delete_all_empties_list() {
    let store = seeded_store();
    let mut list = InventoryList::attach(Arc::clone(&store)).unwrap();

    let deleted = list.delete_all().unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(delete_all_message(deleted), "Deleted all 2 items.");
    assert!(list.rows().unwrap().is_empty());
}

#[test]
fn dropping_list_unsubscribes() {
    let store = seeded_store();
    {
        let _list = InventoryList::attach(Arc::clone(&store)).unwrap();
        assert_eq!(store.observer_count(), 1);
    }
    assert_eq!(store.observer_count(), 0);
}
