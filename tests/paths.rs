mod common;

use common::{build, by_id, page};
use widget_sdk::WidgetError;

const ORDER_FORM: &str = r#"{
    "widget_type": "Panel",
    "object_alias": "shop.ORDER",
    "widgets": [
        {"widget_type": "Input", "id": "number", "attribute_alias": "NUMBER"},
        {"widget_type": "Panel", "id": "customer", "object_alias": "CUSTOMER"},
        {"widget_type": "Panel", "id": "country", "object_alias": "COUNTRY"},
        {"widget_type": "Panel", "id": "country_panel", "object_alias": "COUNTRY", "widgets": [
            {"widget_type": "Value", "id": "country_name", "attribute_alias": "NAME"}
        ]}
    ]
}"#;

#[test]
fn path_to_parent_is_the_reverse_of_path_from_parent() {
    let mut page = page();
    build(&mut page, ORDER_FORM);
    let customer = by_id(&page, "customer");

    let from = page.relation_path_from_parent(customer).unwrap().unwrap();
    let to = page.relation_path_to_parent(customer).unwrap().unwrap();

    assert_eq!(from.to_string(), "CUSTOMER");
    assert_eq!(from.start_object().alias, "ORDER");
    assert_eq!(from.end_object().alias, "CUSTOMER");
    assert_eq!(to.to_string(), "ORDER");
    assert_eq!(to.reversed(), from);
}

#[test]
fn same_object_gives_an_empty_path() {
    let mut page = page();
    build(&mut page, ORDER_FORM);
    let path = page.relation_path_from_parent(by_id(&page, "number")).unwrap().unwrap();
    assert!(path.is_empty());
    assert_eq!(path.prefix_alias("NUMBER"), "NUMBER");
}

#[test]
fn root_has_no_path() {
    let mut page = page();
    let root = build(&mut page, ORDER_FORM);
    assert!(page.relation_path_from_parent(root).unwrap().is_none());
}

#[test]
fn chains_of_relations_are_not_inferred() {
    let mut page = page();
    build(&mut page, ORDER_FORM);
    // ORDER -> CUSTOMER -> COUNTRY would need two steps
    let country = by_id(&page, "country");
    assert!(page.relation_path_from_parent(country).unwrap().is_none());
    assert!(page.relation_path_to_parent(country).unwrap().is_none());
}

#[test]
fn path_is_recomputed_after_the_parent_changes() {
    let mut page = page();
    build(&mut page, ORDER_FORM);
    let customer = by_id(&page, "customer");
    let country_panel = by_id(&page, "country_panel");
    assert_eq!(page.relation_path_from_parent(customer).unwrap().unwrap().to_string(), "CUSTOMER");

    page.set_parent(customer, country_panel).unwrap();

    let from = page.relation_path_from_parent(customer).unwrap().unwrap();
    assert_eq!(from.start_object().alias, "COUNTRY");
    assert_eq!(from.to_string(), "RESIDENT");
}

#[test]
fn path_is_recomputed_after_the_parent_is_rebound() {
    let mut page = page();
    let root = build(&mut page, ORDER_FORM);
    let customer = by_id(&page, "customer");
    assert_eq!(page.relation_path_to_parent(customer).unwrap().unwrap().to_string(), "ORDER");

    page.set_object_alias(root, "shop.COUNTRY").unwrap();

    let to = page.relation_path_to_parent(customer).unwrap().unwrap();
    assert_eq!(to.to_string(), "COUNTRY");
    assert_eq!(to.end_object().alias, "COUNTRY");
}

#[test]
fn unchanged_objects_keep_the_cached_path() {
    let mut page = page();
    let root = build(&mut page, ORDER_FORM);
    let customer = by_id(&page, "customer");
    let first = page.relation_path_from_parent(customer).unwrap();
    // rebinding to the same object moves the epoch but not the endpoints
    page.set_object_alias(root, "shop.ORDER").unwrap();
    assert_eq!(page.relation_path_from_parent(customer).unwrap(), first);
}

#[test]
fn configured_path_rebinds_an_inheriting_widget() {
    let mut page = page();
    let root = build(
        &mut page,
        r#"{"widget_type": "Panel", "object_alias": "shop.ORDER", "widgets": [
            {"widget_type": "Value", "id": "customer_name", "object_relation_path_from_parent": "CUSTOMER", "attribute_alias": "NAME"}
        ]}"#,
    );
    let w = by_id(&page, "customer_name");
    assert_eq!(page.meta_object(w).unwrap().alias, "CUSTOMER");
    let path = page.relation_path_from_parent(w).unwrap().unwrap();
    assert_eq!(path.start_object().alias, "ORDER");
    assert_eq!(path.to_string(), "CUSTOMER");
    assert_eq!(page.relation_path_to_parent(w).unwrap().unwrap().to_string(), "ORDER");
    assert_eq!(page.meta_object(root).unwrap().alias, "ORDER");
}

#[test]
fn configured_path_to_parent_rebinds_an_inheriting_widget() {
    let mut page = page();
    build(
        &mut page,
        r#"{"widget_type": "Panel", "object_alias": "shop.CUSTOMER", "widgets": [
            {"widget_type": "Value", "id": "order_number", "object_relation_path_to_parent": "CUSTOMER", "attribute_alias": "NUMBER"}
        ]}"#,
    );
    let w = by_id(&page, "order_number");
    assert_eq!(page.meta_object(w).unwrap().alias, "ORDER");
    assert_eq!(page.relation_path_from_parent(w).unwrap().unwrap().to_string(), "ORDER");
}

#[test]
fn configured_path_to_parent_is_walked_back_over_several_relations() {
    let mut page = page();
    build(
        &mut page,
        r#"{"widget_type": "Panel", "object_alias": "shop.COUNTRY", "widgets": [
            {"widget_type": "Value", "id": "resident_order", "object_relation_path_to_parent": "CUSTOMER__COUNTRY", "attribute_alias": "NUMBER"}
        ]}"#,
    );
    let w = by_id(&page, "resident_order");
    assert_eq!(page.meta_object(w).unwrap().alias, "ORDER");
    let to = page.relation_path_to_parent(w).unwrap().unwrap();
    assert_eq!(to.to_string(), "CUSTOMER__COUNTRY");
    assert_eq!(to.end_object().alias, "COUNTRY");
}

#[test]
fn unknown_configured_path_is_an_error() {
    let mut page = page();
    let before = page.widget_count();
    let err = page
        .create_widget_from_uxon(
            None,
            &common::uxon(
                r#"{"widget_type": "Panel", "object_alias": "shop.ORDER", "widgets": [
                    {"widget_type": "Value", "object_relation_path_from_parent": "SUPPLIER"}
                ]}"#,
            ),
            "Panel",
        )
        .unwrap_err();
    assert!(matches!(err, WidgetError::Model(_)));
    assert_eq!(page.widget_count(), before);
}

#[test]
fn path_from_an_ancestor_object_runs_through_the_tree() {
    let mut page = page();
    let root = build(
        &mut page,
        r#"{"widget_type": "Panel", "object_alias": "shop.ORDER", "widgets": [
            {"widget_type": "Panel", "object_relation_path_from_parent": "CUSTOMER", "widgets": [
                {"widget_type": "Value", "id": "country_name", "object_relation_path_from_parent": "COUNTRY", "attribute_alias": "NAME"}
            ]}
        ]}"#,
    );
    let w = by_id(&page, "country_name");
    let order = page.meta_object(root).unwrap();
    let path = page.relation_path_from_object(w, &order).unwrap().unwrap();
    assert_eq!(path.to_string(), "CUSTOMER__COUNTRY");
    assert_eq!(path.prefix_alias("NAME"), "CUSTOMER__COUNTRY__NAME");
}
