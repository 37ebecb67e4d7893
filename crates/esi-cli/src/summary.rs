//! Terminal summary for a finished run.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use esi_cli::pipeline::ImportResult;

pub fn print_summary(result: &ImportResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Batches"),
        header_cell("Records"),
        header_cell("Accepted"),
        header_cell("Failed"),
        header_cell("Outcome"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.batches),
        Cell::new(result.records),
        Cell::new(result.succeeded()),
        count_cell(result.failed, Color::Red),
        outcome_cell(result),
    ]);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn outcome_cell(result: &ImportResult) -> Cell {
    if result.aborted {
        Cell::new("ABORTED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else if result.failed > 0 {
        Cell::new("COMPLETED WITH FAILURES").fg(Color::Yellow)
    } else {
        Cell::new("COMPLETED")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    }
}
