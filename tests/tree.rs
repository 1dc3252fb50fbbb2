mod common;

use common::{build, by_id, page};
use widget_sdk::widget::DataWidget;
use widget_sdk::widgets::{Data, Input, Panel};
use widget_sdk::{IsContainer, IsDataWidget, IsFilter, IsValueWidget, OfType, WidgetError};

const ORDERS: &str = r#"{
    "widget_type": "Panel",
    "id": "main",
    "object_alias": "shop.CUSTOMER",
    "widgets": [
        {"widget_type": "Input", "id": "name", "attribute_alias": "NAME"},
        {"widget_type": "Panel", "id": "details", "widgets": [
            {"widget_type": "Input", "id": "city", "attribute_alias": "CITY"}
        ]},
        {"widget_type": "Data", "id": "orders", "object_alias": "ORDER",
            "columns": [{"attribute_alias": "NUMBER"}, {"attribute_alias": "AMOUNT"}],
            "filters": [{"attribute_alias": "NUMBER", "input_widget": {"id": "number_filter"}}]
        }
    ]
}"#;

#[test]
fn subtree_is_enumerated_parents_first() {
    let mut page = page();
    let root = build(&mut page, ORDERS);
    let ids: Vec<String> = page
        .children_recursive(root)
        .unwrap()
        .into_iter()
        .map(|w| page.id(w).unwrap().to_string())
        .collect();
    assert_eq!(ids[0], "name");
    assert_eq!(ids[1], "details");
    assert_eq!(ids[2], "city");
    assert_eq!(ids[3], "orders");
    assert!(ids.contains(&"number_filter".to_string()));
    // two columns, their group, the filter and its input below `orders`
    assert_eq!(ids.len(), 4 + 5);
    assert_eq!(page.children(root).unwrap().len(), 3);
}

#[test]
fn ancestor_search_skips_non_matching_kinds() {
    let mut page = page();
    let root = build(&mut page, ORDERS);
    let input = by_id(&page, "number_filter");
    let orders = by_id(&page, "orders");
    let filter = page.parent(input).unwrap().unwrap();

    // neither the filter nor the data widget lays out children
    assert_eq!(page.ancestor_of_type::<IsContainer>(input).unwrap(), Some(root));
    assert_eq!(page.ancestor_of_type::<IsFilter>(input).unwrap(), Some(filter));
    assert_eq!(page.ancestor_of_type::<IsDataWidget>(input).unwrap(), Some(orders));
    assert_eq!(page.ancestor_of_type::<OfType<Data>>(input).unwrap(), Some(orders));
    assert_eq!(page.ancestor_of_type::<OfType<Panel>>(by_id(&page, "city")).unwrap(), Some(by_id(&page, "details")));
    assert_eq!(page.ancestor_of_type::<IsValueWidget>(input).unwrap(), None);
    assert_eq!(page.ancestor_of_type::<IsContainer>(root).unwrap(), None);
}

#[test]
fn ancestor_cache_follows_reparenting() {
    let mut page = page();
    let root = build(&mut page, ORDERS);
    let city = by_id(&page, "city");
    let details = by_id(&page, "details");
    assert_eq!(page.ancestor_of_type::<IsContainer>(city).unwrap(), Some(details));

    page.set_parent(city, root).unwrap();

    assert_eq!(page.ancestor_of_type::<IsContainer>(city).unwrap(), Some(root));
    assert_eq!(page.parent(city).unwrap(), Some(root));
    assert!(page.children(details).unwrap().is_empty());
    assert_eq!(page.children(root).unwrap().last(), Some(&city));
}

#[test]
fn children_are_found_by_index_and_id() {
    let mut page = page();
    let root = build(&mut page, ORDERS);
    assert_eq!(page.child_widget(root, 1).unwrap(), by_id(&page, "details"));
    assert_eq!(page.find_child_by_id(root, "orders").unwrap(), by_id(&page, "orders"));

    match page.child_widget(root, 7).unwrap_err() {
        WidgetError::ChildNotFound { requested, .. } => assert_eq!(requested, "#7"),
        other => panic!("unexpected error: {other}"),
    }
    // only direct children count
    assert!(matches!(
        page.find_child_by_id(root, "city"),
        Err(WidgetError::ChildNotFound { .. })
    ));
}

#[test]
fn widget_cannot_move_below_itself() {
    let mut page = page();
    let root = build(&mut page, ORDERS);
    let details = by_id(&page, "details");
    assert!(matches!(page.set_parent(root, details), Err(WidgetError::Configuration { .. })));
    assert!(matches!(page.set_parent(details, details), Err(WidgetError::Configuration { .. })));
    assert_eq!(page.parent(details).unwrap(), Some(root));
}

#[test]
fn leaf_widgets_cannot_take_children() {
    let mut page = page();
    build(&mut page, ORDERS);
    let name = by_id(&page, "name");
    let city = by_id(&page, "city");
    assert!(page.add_child(name, city).is_err());
    assert_eq!(page.parent(city).unwrap(), Some(by_id(&page, "details")));
}

#[test]
fn copies_are_independent_and_get_fresh_ids() {
    let mut page = page();
    let root = build(&mut page, ORDERS);
    let details = by_id(&page, "details");
    let before = page.widget_count();

    let copy = page.copy_widget(details).unwrap();

    assert_ne!(copy, details);
    assert_eq!(page.widget_count(), before + 2);
    assert_eq!(page.parent(copy).unwrap(), Some(root));
    assert_ne!(page.id(copy).unwrap(), "details");
    let copied_input = page.children(copy).unwrap()[0];
    assert_ne!(page.id(copied_input).unwrap(), "city");

    // changing the copy leaves the original alone
    page.node_mut(copied_input).unwrap().core.set_caption("Town");
    let original = page.widget_as::<Input>(by_id(&page, "city")).unwrap();
    assert_eq!(original.binding().attribute_alias.as_deref(), Some("CITY"));
    assert_eq!(page.node(by_id(&page, "city")).unwrap().core.caption(), None);
}

#[test]
fn copy_into_id_space_keeps_local_ids() {
    let mut page = page();
    let root = build(&mut page, ORDERS);
    let details = by_id(&page, "details");

    let copy = page.copy_widget_into_id_space(details, "second").unwrap();

    assert_eq!(page.id(copy).unwrap(), "second.details");
    let copied_input = page.children(copy).unwrap()[0];
    assert_eq!(page.id(copied_input).unwrap(), "second.city");
    assert_eq!(by_id(&page, "city"), page.children(details).unwrap()[0]);
    assert_eq!(page.children(root).unwrap().len(), 4);
}

#[test]
fn copied_filters_stay_in_the_filter_slot() {
    let mut page = page();
    build(&mut page, ORDERS);
    let orders = by_id(&page, "orders");
    let filter = page.widget_as::<Data>(orders).unwrap().filters()[0];

    page.copy_widget(filter).unwrap();

    assert_eq!(page.widget_as::<Data>(orders).unwrap().filters().len(), 2);
}
