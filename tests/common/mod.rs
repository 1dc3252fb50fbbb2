#![allow(dead_code)]

use serde_json::Value as JsonValue;
use std::sync::Arc;
use widget_sdk::expression::Expression;
use widget_sdk::{EngineSettings, MetaModel, Page, UxonObject, WidgetId};

/// Orders of customers, order positions, customer countries and an unrelated supplier.
pub const SHOP_MODEL: &str = r#"{
    "objects": [
        {"id": "o", "namespace": "shop", "alias": "ORDER", "uid_attribute": "ID", "label_attribute": "NUMBER"},
        {"id": "c", "namespace": "shop", "alias": "CUSTOMER", "uid_attribute": "ID", "label_attribute": "NAME"},
        {"id": "p", "namespace": "shop", "alias": "POSITION", "uid_attribute": "ID"},
        {"id": "k", "namespace": "shop", "alias": "COUNTRY", "uid_attribute": "ID", "label_attribute": "NAME"},
        {"id": "s", "namespace": "shop", "alias": "SUPPLIER", "uid_attribute": "ID", "label_attribute": "NAME"}
    ],
    "attributes": [
        {"object_id": "o", "alias": "ID", "data_type": "number"},
        {"object_id": "o", "alias": "NUMBER"},
        {"object_id": "o", "alias": "CUSTOMER", "data_type": "relation"},
        {"object_id": "o", "alias": "AMOUNT", "data_type": "number", "default_aggregate_function": "SUM"},
        {"object_id": "c", "alias": "ID", "data_type": "number"},
        {"object_id": "c", "alias": "NAME"},
        {"object_id": "c", "alias": "CITY"},
        {"object_id": "c", "alias": "COUNTRY", "data_type": "relation"},
        {"object_id": "p", "alias": "ID", "data_type": "number"},
        {"object_id": "p", "alias": "ORDER", "data_type": "relation"},
        {"object_id": "p", "alias": "PRODUCT"},
        {"object_id": "p", "alias": "AMOUNT", "data_type": "number"},
        {"object_id": "k", "alias": "ID", "data_type": "number"},
        {"object_id": "k", "alias": "NAME"},
        {"object_id": "s", "alias": "ID", "data_type": "number"},
        {"object_id": "s", "alias": "NAME"}
    ],
    "relations": [
        {"id": "order_customer", "alias": "CUSTOMER", "left_object_id": "o", "right_object_id": "c"},
        {"id": "position_order", "alias": "ORDER", "reverse_alias": "POSITION", "left_object_id": "p", "right_object_id": "o"},
        {"id": "customer_country", "alias": "COUNTRY", "reverse_alias": "RESIDENT", "left_object_id": "c", "right_object_id": "k"}
    ]
}"#;

pub fn model() -> Arc<MetaModel> {
    Arc::new(MetaModel::from_json_str(SHOP_MODEL).unwrap())
}

pub fn page() -> Page {
    Page::with_settings("test", model(), EngineSettings::default())
}

pub fn uxon(json: &str) -> UxonObject {
    UxonObject::from_json(json).unwrap()
}

/// Builds a parentless widget tree from config.
pub fn build(page: &mut Page, json: &str) -> WidgetId {
    page.create_widget_from_uxon(None, &uxon(json), "Panel").unwrap()
}

pub fn by_id(page: &Page, id: &str) -> WidgetId {
    page.widget_by_id(id).unwrap()
}

/// Current value expression of a value widget.
pub fn value_of(page: &Page, widget: WidgetId) -> Expression {
    page.node(widget).unwrap().kind.as_value().unwrap().value().clone()
}

pub fn literal(v: JsonValue) -> Expression {
    Expression::Literal(v)
}
