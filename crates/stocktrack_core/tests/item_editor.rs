use std::sync::Arc;
use stocktrack_core::{
    EditorError, EditorField, ItemAddress, ItemEditor, ItemForm, ItemId, ItemStore, ItemValues,
    SaveOutcome, StoreError,
};

fn store() -> Arc<ItemStore> {
    Arc::new(ItemStore::open_in_memory().unwrap())
}

#[test]
fn new_item_with_blank_form_saves_nothing() {
    let store = store();
    let mut editor = ItemEditor::new_item(Arc::clone(&store));

    assert_eq!(editor.title(), "Add an Item");
    assert!(!editor.is_editing());
    assert_eq!(editor.save().unwrap(), SaveOutcome::Skipped);
    assert!(store.query(&ItemAddress::Collection).unwrap().is_empty());
}

#[test]
fn new_item_save_inserts_and_switches_to_editing() {
    let store = store();
    let mut editor = ItemEditor::new_item(Arc::clone(&store));
    editor.set_field(EditorField::Name, "Notebook");
    editor.set_field(EditorField::Price, "35");
    assert!(editor.has_unsaved_changes());

    let outcome = editor.save().unwrap();
    let SaveOutcome::Inserted(address) = outcome else {
        panic!("expected insert, got {outcome:?}");
    };
    assert_eq!(outcome.message(), Some("Item saved."));
    assert_eq!(editor.address(), Some(address));
    assert!(!editor.has_unsaved_changes());

    let rows = store.query(&address).unwrap();
    assert_eq!(rows[0].name, "Notebook");
    assert_eq!(rows[0].price, 35);
    assert_eq!(rows[0].quantity, 0);
}

#[test]
fn open_prefills_form_without_marking_changes() {
    let store = store();
    let address = store
        .insert(
            &ItemValues::new()
                .with_name("Pen")
                .with_description("blue")
                .with_price(10)
                .with_quantity(5),
        )
        .unwrap();

    let editor = ItemEditor::open(Arc::clone(&store), address).unwrap();
    assert_eq!(editor.title(), "Edit Item");
    assert_eq!(
        editor.form(),
        &ItemForm {
            name: "Pen".to_string(),
            description: "blue".to_string(),
            price: "10".to_string(),
            quantity: "5".to_string(),
        }
    );
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn open_missing_item_leaves_form_blank() {
    let editor = ItemEditor::open(store(), ItemAddress::Item(ItemId(77))).unwrap();
    assert!(editor.form().is_blank());
    assert!(editor.is_editing());
}

#[test]
fn touch_alone_requires_discard_confirmation() {
    let mut editor = ItemEditor::new_item(store());
    assert!(!editor.has_unsaved_changes());
    editor.touch();
    assert!(editor.has_unsaved_changes());
}

#[test]
fn editing_updates_existing_row() {
    let store = store();
    let address = store
        .insert(&ItemValues::new().with_name("Pen").with_quantity(5))
        .unwrap();

    let mut editor = ItemEditor::open(Arc::clone(&store), address).unwrap();
    editor.set_field(EditorField::Quantity, "3");
    let outcome = editor.save().unwrap();

    assert_eq!(outcome, SaveOutcome::Updated(1));
    assert_eq!(outcome.message(), Some("Item updated."));
    assert_eq!(store.query(&address).unwrap()[0].quantity, 3);
}

#[test]
fn editing_a_vanished_item_reports_update_failure() {
    let store = store();
    let address = store.insert(&ItemValues::new().with_name("Pen")).unwrap();
    let mut editor = ItemEditor::open(Arc::clone(&store), address).unwrap();
    store.delete(&address).unwrap();

    editor.set_field(EditorField::Price, "4");
    let outcome = editor.save().unwrap();
    assert_eq!(outcome, SaveOutcome::Updated(0));
    assert!(!outcome.is_success());
    assert_eq!(outcome.message(), Some("Error updating item."));
}

#[test]
fn save_rejects_bad_numbers_before_touching_store() {
    let store = store();
    let mut editor = ItemEditor::new_item(Arc::clone(&store));
    editor.set_field(EditorField::Name, "Glue");
    editor.set_field(EditorField::Price, "1.50");

    let err = editor.save().unwrap_err();
    assert!(matches!(
        err,
        EditorError::InvalidNumber {
            field: EditorField::Price,
            ..
        }
    ));
    assert!(editor.has_unsaved_changes());
    assert!(store.query(&ItemAddress::Collection).unwrap().is_empty());
}

#[test]
fn save_surfaces_store_validation() {
    let mut editor = ItemEditor::new_item(store());
    editor.set_field(EditorField::Description, "no name given");
    let err = editor.save().unwrap_err();
    assert!(matches!(err, EditorError::Store(StoreError::Validation(_))));
    assert_eq!(err.to_string(), "name required");

    editor.set_field(EditorField::Name, "Tape");
    editor.set_field(EditorField::Quantity, "-2");
    let err = editor.save().unwrap_err();
    assert_eq!(err.to_string(), "invalid quantity");
}

#[test]
fn delete_requires_saved_item_and_is_idempotent() {
    let store = store();
    let mut fresh = ItemEditor::new_item(Arc::clone(&store));
    assert!(matches!(
        fresh.delete().unwrap_err(),
        EditorError::NothingToDelete
    ));

    let address = store.insert(&ItemValues::new().with_name("Pen")).unwrap();
    let mut editor = ItemEditor::open(Arc::clone(&store), address).unwrap();
    assert_eq!(editor.delete().unwrap(), 1);
    assert_eq!(editor.delete().unwrap(), 0);
    assert_eq!(stocktrack_core::delete_message(1), "Item deleted.");
    assert_eq!(stocktrack_core::delete_message(0), "Error deleting item.");
}

#[test]
fn open_refuses_collection_address() {
    let store = store();
    store
        .insert(&ItemValues::new().with_name("Pen").with_price(10))
        .unwrap();
    store
        .insert(&ItemValues::new().with_name("Glue").with_price(3))
        .unwrap();

    let address: ItemAddress = "content://stocktrack/items".parse().unwrap();
    let err = ItemEditor::open(Arc::clone(&store), address).err().unwrap();
    assert!(matches!(err, StoreError::InvalidAddress(ref text) if text == "content://stocktrack/items"));

    let names: Vec<(String, i64)> = store
        .query(&ItemAddress::Collection)
        .unwrap()
        .into_iter()
        .map(|item| (item.name, item.price))
        .collect();
    assert_eq!(
        names,
        vec![("Pen".to_string(), 10), ("Glue".to_string(), 3)]
    );
}
