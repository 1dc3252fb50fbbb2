mod common;

use common::{build, by_id, page, uxon};
use serde_json::json;
use widget_sdk::{Visibility, WidgetError};

const FORM: &str = r#"{
    "widget_type": "Panel",
    "object_alias": "shop.CUSTOMER",
    "id": "customer",
    "caption": "Customer",
    "layout": "columns",
    "widgets": [
        {"widget_type": "Input", "id": "name", "attribute_alias": "NAME", "required": true, "width": 2},
        {"widget_type": "Value", "attribute_alias": "CITY", "visibility": "optional", "empty_text": "-"},
        {"widget_type": "InputComboTable", "attribute_alias": "COUNTRY", "text_attribute_alias": "COUNTRY__NAME"},
        {"widget_type": "Data", "id": "orders", "object_alias": "ORDER", "paginate": false,
            "columns": [{"attribute_alias": "NUMBER"}, {"attribute_alias": "AMOUNT", "footer": "SUM"}],
            "column_groups": [{"object_relation_path_from_parent": "POSITION", "columns": [{"attribute_alias": "PRODUCT"}]}],
            "filters": [{"attribute_alias": "NUMBER", "comparator": "==", "value": "A1", "input_widget": {"id": "number_filter"}}],
            "sorters": [{"attribute_alias": "NUMBER", "direction": "DESC"}]
        }
    ]
}"#;

#[test]
fn export_of_an_import_reproduces_the_export() {
    let mut first = page();
    let root = build(&mut first, FORM);
    let exported = first.export_uxon(root).unwrap();

    let mut second = page();
    let copy = second.create_widget_from_uxon(None, &exported, "Panel").unwrap();
    let again = second.export_uxon(copy).unwrap();

    assert_eq!(again, exported);
    assert_eq!(second.widget_count(), first.widget_count());
}

#[test]
fn export_leaves_out_defaults() {
    let mut page = page();
    let root = build(
        &mut page,
        r#"{"widget_type": "Panel", "object_alias": "shop.CUSTOMER", "widgets": [{"attribute_alias": "NAME"}]}"#,
    );
    let exported = page.export_uxon(root).unwrap();
    assert_eq!(
        serde_json::to_value(&exported).unwrap(),
        json!({
            "widget_type": "Panel",
            "object_alias": "shop.CUSTOMER",
            "widgets": [{"widget_type": "Input", "attribute_alias": "NAME"}]
        })
    );
}

#[test]
fn filter_export_lifts_value_and_drops_the_plain_input() {
    let mut page = page();
    build(&mut page, FORM);
    let orders = page.export_uxon(by_id(&page, "orders")).unwrap();
    let filters = orders.property_as_objects("filters");
    assert_eq!(filters.len(), 1);
    let filter = serde_json::to_value(&filters[0]).unwrap();
    assert_eq!(filter["value"], json!("A1"));
    assert_eq!(filter["comparator"], json!("=="));
    assert_eq!(filter["input_widget"], json!({"id": "number_filter"}));
    assert_eq!(orders.property("paginate"), Some(&json!(false)));
}

#[test]
fn unknown_property_names_widget_and_key() {
    let mut page = page();
    let err = page
        .create_widget_from_uxon(
            None,
            &uxon(r#"{"widget_type": "Panel", "id": "form", "widgets": [{"widget_type": "Input", "id": "x", "colour": "red"}]}"#),
            "Panel",
        )
        .unwrap_err();

    match err {
        WidgetError::UnknownProperty { widget, key } => {
            assert_eq!(widget, "Input 'x'");
            assert_eq!(key, "colour");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(page.widget_count(), 0);
    assert!(page.widget_by_id("form").is_err());
    assert!(page.widget_by_id("x").is_err());
    assert!(page.root().is_none());
}

#[test]
fn malformed_values_are_rejected() {
    let mut page = page();
    let err = page
        .create_widget_from_uxon(None, &uxon(r#"{"widget_type": "Input", "disabled": "yes"}"#), "Panel")
        .unwrap_err();
    assert!(matches!(err, WidgetError::InvalidPropertyValue { ref key, .. } if key == "disabled"));

    let err = page
        .create_widget_from_uxon(None, &uxon(r#"{"widget_type": "Filter", "comparator": "~~"}"#), "Panel")
        .unwrap_err();
    assert!(matches!(err, WidgetError::InvalidPropertyValue { ref key, .. } if key == "comparator"));

    let err = page
        .create_widget_from_uxon(None, &uxon(r#"{"widget_type": "Chart"}"#), "Panel")
        .unwrap_err();
    assert!(matches!(err, WidgetError::UnknownWidgetType(ref t) if t == "Chart"));
    assert_eq!(page.widget_count(), 0);
}

#[test]
fn original_config_is_kept_after_changes() {
    let mut page = page();
    let config = uxon(r#"{"widget_type": "Input", "id": "name", "object_alias": "shop.CUSTOMER", "attribute_alias": "NAME"}"#);
    let w = page.create_widget_from_uxon(None, &config, "Panel").unwrap();

    let core = &mut page.node_mut(w).unwrap().core;
    core.set_caption("Full name");
    core.set_visibility(Visibility::Hidden);

    assert_eq!(page.export_uxon_original(w).unwrap(), Some(config));
    let current = page.export_uxon(w).unwrap();
    assert_eq!(current.property_str("caption"), Some("Full name"));
    assert_eq!(current.property_str("visibility"), Some("hidden"));
}

#[test]
fn binding_and_ids_apply_before_children() {
    let mut page = page();
    let root = build(
        &mut page,
        r#"{"widget_type": "Panel",
            "widgets": [{"widget_type": "Input", "id": "name", "attribute_alias": "NAME"}],
            "id": "form",
            "id_space": "cust",
            "object_alias": "shop.CUSTOMER"}"#,
    );
    assert_eq!(page.id(root).unwrap(), "cust.form");
    let name = by_id(&page, "cust.name");
    assert_eq!(page.meta_object(name).unwrap().alias, "CUSTOMER");
}

#[test]
fn widgets_without_type_get_the_slot_default() {
    let mut page = page();
    let root = build(
        &mut page,
        r#"{"object_alias": "shop.ORDER", "widgets": [
            {"id": "number", "attribute_alias": "NUMBER"},
            {"id": "filter", "widget_type": "Filter", "attribute_alias": "NUMBER"}
        ]}"#,
    );
    assert_eq!(page.node(root).unwrap().kind.widget_type(), "Panel");
    assert_eq!(page.node(by_id(&page, "number")).unwrap().kind.widget_type(), "Input");
    let filter = by_id(&page, "filter");
    let input = page.children(filter).unwrap()[0];
    assert_eq!(page.node(input).unwrap().kind.widget_type(), "Input");
    assert_eq!(
        page.node(input).unwrap().kind.as_value().unwrap().attribute_alias(),
        Some("NUMBER")
    );
}
