use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lab_cli::types::{DescribeReport, IdentifierReport, ProfilesReport};
use lab_receive::ReceiveAliquot;

pub fn print_identifier(report: &IdentifierReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Prefix"), Cell::new(&report.prefix)]);
    table.add_row(vec![
        Cell::new("Identifier"),
        Cell::new(&report.identifier).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Human readable"),
        Cell::new(&report.human_readable),
    ]);
    table.add_row(vec![
        Cell::new("Primary"),
        flag_cell(report.is_primary),
    ]);
    println!("{table}");
}

pub fn print_profiles(report: &ProfilesReport) {
    let discovery = &report.discovery;
    println!("Namespaces: {}", join_or_dash(&discovery.namespaces));
    if !discovery.skipped.is_empty() {
        println!("Skipped (no lab_profiles.toml): {}", discovery.skipped.join(", "));
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Profile"),
        header_cell("Requisition"),
        header_cell("Panel"),
        header_cell("Abbrev"),
        header_cell("Aliquot type"),
        header_cell("Processing"),
        header_cell("Derived"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 6, CellAlignment::Right);
    let mut total_panels = 0usize;
    for profile in &report.profiles {
        if profile.panels.is_empty() {
            table.add_row(vec![
                Cell::new(&profile.name).add_attribute(Attribute::Bold),
                Cell::new(&profile.requisition_model),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]);
            continue;
        }
        for (index, panel) in profile.panels.iter().enumerate() {
            total_panels += 1;
            let (profile_cell, model_cell) = if index == 0 {
                (
                    Cell::new(&profile.name).add_attribute(Attribute::Bold),
                    Cell::new(&profile.requisition_model),
                )
            } else {
                (Cell::new(""), Cell::new(""))
            };
            table.add_row(vec![
                profile_cell,
                model_cell,
                Cell::new(&panel.name),
                optional_cell(panel.abbreviation.as_deref()),
                Cell::new(&panel.aliquot_type),
                optional_cell(panel.processing_profile.as_deref()),
                Cell::new(panel.derived_aliquots),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell(format!("{} profiles", report.profiles.len())),
        Cell::new(format!("{total_panels} panels")).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_receipt(receipt: &ReceiveAliquot) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new("Manifest"),
        Cell::new(&receipt.manifest_identifier),
    ]);
    table.add_row(vec![
        Cell::new("Manifest on record"),
        flag_cell(receipt.manifest_on_database),
    ]);
    table.add_row(vec![
        Cell::new("Box"),
        Cell::new(format!(
            "{} (position {})",
            receipt.box_identifier, receipt.box_position
        )),
    ]);
    table.add_row(vec![
        Cell::new("Aliquot"),
        Cell::new(receipt.aliquot.human_aliquot_identifier()),
    ]);
    table.add_row(vec![Cell::new("Received"), flag_cell(receipt.flag)]);
    println!("{table}");
}

pub fn print_description(report: &DescribeReport) {
    let manifest = &report.manifest;
    let status = if manifest.manifest_on_database {
        "on record"
    } else {
        "not on record"
    };
    println!("Manifest {} ({status})", manifest.manifest_identifier);
    println!("Boxes: {}", join_or_dash(&report.box_identifiers));
    println!("{}", report.description);
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Yellow)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}
