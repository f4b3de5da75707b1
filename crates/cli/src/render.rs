//! Terminal output for the component table and its derived views

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use reconcile_core::{EditableComponent, Statistics, Status};
use std::collections::BTreeMap;

fn quantity(q: Option<f64>) -> String {
    match q {
        Some(q) if q.fract() == 0.0 => format!("{}", q as i64),
        Some(q) => q.to_string(),
        None => "-".to_string(),
    }
}

fn text(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

fn status_cell(status: Status) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        Status::Equal => cell.fg(Color::Green),
        Status::NotEqual => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        Status::New => cell.fg(Color::Yellow),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

pub fn components_table(components: &[EditableComponent]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "", "ID", "Pos", "Description", "Material", "BOM", "Order", "Qty", "Order Qty", "Status",
        "Note",
    ]);
    apply_table_style(&mut table);

    for c in components {
        let comp = &c.component;
        table.add_row(vec![
            Cell::new(if c.is_selected { "*" } else { "" }),
            Cell::new(c.id.as_str()),
            Cell::new(text(comp.pos.as_deref())),
            Cell::new(&comp.description),
            Cell::new(text(Some(&comp.material))),
            Cell::new(text(comp.bom_material.as_deref())),
            Cell::new(text(comp.order_material.as_deref())),
            Cell::new(quantity(comp.quantity)).set_alignment(CellAlignment::Right),
            Cell::new(quantity(comp.manager_quantity)).set_alignment(CellAlignment::Right),
            status_cell(comp.status),
            Cell::new(text(comp.note.as_deref())),
        ]);
    }
    table
}

pub fn print_components(components: &[EditableComponent]) {
    if components.is_empty() {
        println!("no components");
        return;
    }
    println!("{}", components_table(components));
}

pub fn print_statistics(stats: &Statistics) {
    let mut table = Table::new();
    table.set_header(vec!["Total", "Equal", "Not equal", "New"]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(stats.total).add_attribute(Attribute::Bold),
        Cell::new(stats.equal).fg(Color::Green),
        Cell::new(stats.not_equal).fg(Color::Red),
        Cell::new(stats.new_items).fg(Color::Yellow),
    ]);
    println!("{table}");
}

pub fn print_technical_params(params: &BTreeMap<String, String>) {
    if params.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Parameter", "Value"]);
    apply_table_style(&mut table);
    for (field, value) in params {
        table.add_row(vec![field, value]);
    }
    println!("{table}");
}

pub fn print_draft_saved(timestamp_millis: i64) {
    match chrono::DateTime::from_timestamp_millis(timestamp_millis) {
        Some(saved) => println!("draft saved {}", saved.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("draft saved at unknown time"),
    }
}
