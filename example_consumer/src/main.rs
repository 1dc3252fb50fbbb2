//! Example consumer: builds a customer page from config, prefills it from a customer row and prints the
//! read request the orders table ends up with.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`

use std::path::PathBuf;
use std::sync::Arc;
use widget_sdk::{DataSheet, MetaModel, Page, UxonObject};

fn data_path(var: &str, file: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("widget_sdk=info")),
        )
        .init();

    let model = MetaModel::load_from_path(data_path("WIDGET_MODEL_PATH", "model.json"))?;
    tracing::info!(objects = model.objects.len(), "meta model loaded");

    let page_config = UxonObject::from_json(&std::fs::read_to_string(data_path("WIDGET_PAGE_PATH", "page.json"))?)?;
    let rows: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(data_path("WIDGET_ROWS_PATH", "rows.json"))?)?;

    let mut page = Page::new("customer", Arc::new(model));
    page.subscribe(|event| tracing::debug!(widget = %event.widget_id, kind = ?event.kind, "widget event"));
    let root = page.create_widget_from_uxon(None, &page_config, "Panel")?;
    tracing::info!(
        widgets = page.widget_count(),
        ids = ?page.registry().ids_in_space(""),
        "page built"
    );

    let mut prefill: DataSheet = page.prepare_data_sheet_to_prefill(root, None)?;
    println!("prefill request:\n{}", serde_json::to_string_pretty(&prefill.to_json())?);
    prefill.add_rows_from_json(&rows);
    page.prefill(root, &prefill)?;

    let orders = page.widget_by_id("orders")?;
    let read = page.prepare_data_sheet_to_read(orders, None)?;
    println!("orders read request:\n{}", serde_json::to_string_pretty(&read.to_json())?);
    println!("page after prefill:\n{}", page.export_uxon(root)?.to_json_pretty()?);
    Ok(())
}
