//! CLI presentation: text and json formatters per command family.

use crate::catalog::{Catalog, OpenReport};
use crate::history::{HistoryLog, TIME_FORMAT};
use crate::image::Image;
use crate::store::journal::RenameOutcome;
use chrono::Local;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

/// Bold, underlined section heading.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn tags_cell(image: &Image) -> String {
    if image.tags().is_empty() {
        "-".to_string()
    } else {
        image.tags().join(" ")
    }
}

pub fn format_scan_summary(report: &OpenReport, total: usize) -> String {
    let mut out = format!(
        "Scanned: {} image(s) tracked ({} from snapshot, {} new)\n",
        total, report.loaded, report.discovered
    );
    if report.repaired > 0 {
        out.push_str(&format!(
            "Repaired tags on {} record(s) from their file names\n",
            report.repaired
        ));
    }
    if let Some(outcome) = report.recovered {
        let what = match outcome {
            RenameOutcome::Completed => "completed",
            RenameOutcome::NotStarted => "discarded (file was never renamed)",
            RenameOutcome::Indeterminate => "left as is (could not tell whether it happened)",
        };
        out.push_str(&format!("Interrupted rename {}\n", what));
    }
    if !report.skipped.is_empty() {
        out.push_str(&format!(
            "\nSkipped {} file(s) whose names are not valid tag names:\n",
            report.skipped.len()
        ));
        for path in &report.skipped {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }
    out
}

pub fn format_image_list_text(images: &[&Image]) -> String {
    if images.is_empty() {
        return "No images found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Path", "Tags"]);
    for image in images {
        table.add_row(vec![
            image.id().to_string(),
            image.relative_path().display().to_string(),
            tags_cell(image),
        ]);
    }
    format!("{}\n\nTotal: {} image(s)", table, images.len())
}

fn image_json(image: &Image) -> serde_json::Value {
    json!({
        "id": image.id(),
        "path": image.relative_path(),
        "name": image.name(),
        "tags": image.tags(),
    })
}

pub fn format_image_list_json(images: &[&Image]) -> String {
    let list: Vec<_> = images.iter().map(|i| image_json(i)).collect();
    to_pretty_json(&json!({ "images": list, "total": images.len() }))
}

/// One line after a tag or revert command.
pub fn format_image_result(image: &Image) -> String {
    format!(
        "{} {}  [{}]",
        image.id(),
        image.relative_path().display(),
        tags_cell(image)
    )
}

pub fn format_status_text(catalog: &Catalog, registered_tags: usize) -> String {
    let tagged = catalog
        .images()
        .iter()
        .filter(|i| !i.tags().is_empty())
        .count();
    let missing = catalog.missing_images();

    let mut out = format!("{}\n\n", format_section_heading("Catalog"));
    out.push_str(&format!("  Root: {}\n", catalog.root().display()));
    out.push_str(&format!("  Images: {}\n", catalog.len()));
    out.push_str(&format!("  Tagged: {}\n", tagged));
    out.push_str(&format!("  Registered tags: {}\n", registered_tags));

    if !missing.is_empty() {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Missing files")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Id", "Expected path"]);
        for image in &missing {
            table.add_row(vec![
                image.id().to_string(),
                image.relative_path().display().to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

pub fn format_status_json(catalog: &Catalog, registered_tags: usize) -> String {
    let tagged = catalog
        .images()
        .iter()
        .filter(|i| !i.tags().is_empty())
        .count();
    let missing: Vec<_> = catalog
        .missing_images()
        .into_iter()
        .map(image_json)
        .collect();
    to_pretty_json(&json!({
        "root": catalog.root(),
        "images": catalog.len(),
        "tagged": tagged,
        "registered_tags": registered_tags,
        "missing": missing,
    }))
}

pub fn format_history_text(image: &Image, history: &HistoryLog) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("History of {}", image.id()))
    );
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "First recorded"]);
    for entry in history.entries() {
        let marker = if entry.name == image.name() { " (current)" } else { "" };
        table.add_row(vec![
            format!("{}{}", entry.name, marker),
            entry
                .recorded_at
                .with_timezone(&Local)
                .format(TIME_FORMAT)
                .to_string(),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn format_history_json(image: &Image, history: &HistoryLog) -> String {
    to_pretty_json(&json!({
        "id": image.id(),
        "current": image.name(),
        "history": history.entries(),
    }))
}

pub fn format_names(names: &[String]) -> String {
    names.join("\n")
}

pub fn format_registry_text(tags: &[String]) -> String {
    if tags.is_empty() {
        return "No tags registered.".to_string();
    }
    let mut out = tags.join("\n");
    out.push_str(&format!("\n\nTotal: {} tag(s)", tags.len()));
    out
}

pub fn format_registry_json(tags: &[String]) -> String {
    to_pretty_json(&json!({ "tags": tags, "total": tags.len() }))
}

pub fn format_activity(lines: &[String]) -> String {
    if lines.is_empty() {
        return "No activity recorded.".to_string();
    }
    lines.join("\n")
}
