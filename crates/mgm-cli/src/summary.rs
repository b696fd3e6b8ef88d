use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mgm_cli::commands::CommandResult;
use mgm_model::{ChoiceKind, IndexedTable, SchemaRegistry};
use mgm_report::{ArchiveStatus, correction_lines, summarize};

pub fn print_fields(registry: &SchemaRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Choice"),
        header_cell("Allowed values"),
    ]);
    apply_table_style(&mut table);
    for spec in registry.specs() {
        let choice = match spec.choice_kind {
            ChoiceKind::Fixed => Cell::new("fixed").fg(Color::Yellow),
            ChoiceKind::Free => dim_cell("free"),
        };
        let allowed = if spec.allowed_values.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(spec.allowed_values.join(", "))
        };
        let type_cell = if registry.is_date_field(&spec.name) {
            Cell::new("date")
        } else {
            Cell::new(spec.data_type.as_str())
        };
        table.add_row(vec![
            Cell::new(&spec.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            type_cell,
            choice,
            allowed,
        ]);
    }
    println!("{table}");
}

pub fn print_result(result: &CommandResult) {
    let outcome = &result.outcome;
    let report = &outcome.report;

    if report.has_fatal() {
        eprintln!("Request rejected:");
        for issue in report.fatal_issues() {
            eprintln!("- {issue}");
        }
        return;
    }

    if let Some(table) = &outcome.table {
        print_table(table);
    }

    let summary = summarize(report);
    if !summary.is_empty() {
        println!();
        println!("{}", summary.text);
    }

    let corrections = correction_lines(report);
    if !corrections.is_empty() {
        println!();
        println!("Corrections:");
        for line in corrections {
            println!("- {line}");
        }
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    if let Some(path) = &result.export_path {
        println!();
        println!("Export: {}", path.display());
    }
    if let Some(status) = result.archive {
        println!("Archive: {}", archive_label(status));
    }
}

fn print_table(indexed: &IndexedTable) {
    let mut table = Table::new();
    table.set_header(indexed.columns().into_iter().map(header_cell));
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for row in indexed.display_rows() {
        table.add_row(row);
    }
    println!("{table}");
}

fn archive_label(status: ArchiveStatus) -> &'static str {
    match status {
        ArchiveStatus::Transferred => "transferred",
        ArchiveStatus::Skipped => "skipped (not configured)",
        ArchiveStatus::StagingFailed => "skipped (staging failed)",
        ArchiveStatus::Failed => "failed",
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
