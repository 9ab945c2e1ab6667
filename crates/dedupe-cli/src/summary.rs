use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dedupe_cli::pipeline::PipelineResult;
use dedupe_core::QualityLabel;
use dedupe_model::DedupeResponse;

pub fn print_summary(result: &PipelineResult, response: &DedupeResponse) {
    println!("Input: {} ({})", result.input.display(), result.format);
    if result.skipped_rows > 0 {
        println!("Skipped malformed rows: {}", result.skipped_rows);
    }
    if let Some(path) = &result.output_path {
        println!("Output: {}", path.display());
    }
    if let Some(path) = &result.report_path {
        println!("Report: {}", path.display());
    }
    if result.dry_run {
        println!("Dry run: nothing written");
    }
    if !result.run.classification.is_empty() {
        println!("Email columns: {}", result.run.classification.join(", "));
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Method"),
        header_cell("Affected"),
        header_cell("% of rows"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for finding in &result.run.detection.findings {
        table.add_row(vec![
            Cell::new(finding.method.as_str()),
            count_cell(finding.count, Color::Yellow),
            Cell::new(format!("{:.1}", finding.percentage_of_dataset)),
        ]);
    }
    for failure in &result.run.detection.failures {
        table.add_row(vec![
            Cell::new(failure.method.as_str()),
            Cell::new("failed").fg(Color::Red),
            dim_cell("-"),
        ]);
    }
    let total = result.run.total_duplicates();
    table.add_row(vec![
        Cell::new("TOTAL (distinct)")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(total, Color::Yellow).add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{:.1}",
            dedupe_model::percentage(total, result.rows_in())
        ))
        .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let score = &result.run.score;
    println!(
        "Rows: {} -> {} ({})",
        result.rows_in(),
        result.rows_out(),
        result.run.resolution.strategy_used
    );
    println!(
        "Score: {:.1} ({}) [reduction {:.1}, retention {:.1}, columns {:.1}]",
        score.overall,
        score.label,
        score.dedup_reduction_rate,
        score.data_retention_rate,
        score.column_retention_rate
    );
    if score.label == QualityLabel::NeedsImprovement {
        println!("Review the resolution log before using the output.");
    }

    for line in &result.run.resolution.human_log {
        println!("- {line}");
    }
    if !result.run.detection.conflicts.is_empty() {
        print_conflict_table(result);
    }
    if !result.run.detection.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &result.run.detection.warnings {
            eprintln!("- {warning}");
        }
    }
    if !result.run.detection.failures.is_empty() {
        eprintln!("Method failures:");
        for failure in &result.run.detection.failures {
            eprintln!("- {}: {}", failure.method, failure.message);
        }
    }
    println!("{} ({} ms)", response.message, response.elapsed_ms);
}

/// Conflict groups that were kept for review, capped like the report.
fn print_conflict_table(result: &PipelineResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Positions"),
        header_cell("Diverging columns"),
    ]);
    apply_summary_table_style(&mut table);
    for group in &result.report.conflicts {
        let key = group
            .normalized_key
            .iter()
            .map(|cell| cell.as_ref().map_or_else(|| "null".to_string(), ToString::to_string))
            .collect::<Vec<_>>()
            .join(" | ");
        let positions = group
            .member_positions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let columns = group
            .diverging_columns
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(key).fg(Color::Red),
            Cell::new(positions),
            Cell::new(columns),
        ]);
    }
    println!("Conflicts ({}):", result.report.conflicts_total);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
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
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
