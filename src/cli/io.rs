//! Output rendering for CLI
//!
//! - Text: numbered listings with a header per command
//! - JSON: a single object `{"status": "ok", "data": ..., "repairs": [...]}`
//!
//! Only results go to stdout. Diagnostics go to stderr through `tracing`.

use std::io::{self, Write};

use serde_json::{json, Value};

use crate::storage::{RepairedKey, TokenMapItem};

use super::args::OutputFormat;
use super::commands::Report;
use super::errors::CliResult;

/// Write a report to stdout
pub fn write_report(report: &Report, format: OutputFormat) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(report, format, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Render a report to any writer
pub fn render<W: Write>(report: &Report, format: OutputFormat, out: &mut W) -> CliResult<()> {
    match format {
        OutputFormat::Text => render_text(report, out),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &to_json(report))?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn render_text<W: Write>(report: &Report, out: &mut W) -> CliResult<()> {
    match report {
        Report::All(view) => {
            writeln!(out, "=== All TokenMap Data ===")?;
            if view.chains.is_empty() {
                writeln!(out, "No TokenMap data found")?;
            }
            for (chain, items) in &view.chains {
                writeln!(out)?;
                writeln!(out, "Chain Type: {} ({} items)", chain, items.len())?;
                for (i, item) in items.iter().enumerate() {
                    writeln!(out, "  [{}] {}", i + 1, item_line(item))?;
                }
            }
            write_repairs(&view.repairs, out)
        }
        Report::Chain {
            root_chain_type,
            items,
        } => {
            writeln!(out, "=== TokenMap for Chain: {} ===", root_chain_type)?;
            if items.value.is_empty() {
                writeln!(out, "No data found")?;
            }
            for (i, item) in items.value.iter().enumerate() {
                writeln!(out, "[{}] {}", i + 1, item_line(item))?;
            }
            write_repairs(&items.repairs, out)
        }
        Report::Token {
            root_chain_type,
            root_token,
            item,
        } => {
            writeln!(out, "=== TokenMap for {}:{} ===", root_chain_type, root_token)?;
            match item {
                Some(item) => writeln!(out, "{}", item_line(item))?,
                None => writeln!(out, "No data found")?,
            }
            Ok(())
        }
        Report::Keys(keys) => {
            writeln!(out, "=== All TokenMap Keys ===")?;
            for (i, key) in keys.iter().enumerate() {
                writeln!(out, "[{}] {}", i + 1, key)?;
            }
            writeln!(out, "Total: {} keys", keys.len())?;
            Ok(())
        }
        Report::Metadata(metadata) => {
            writeln!(out, "=== Metadata ===")?;
            if metadata.is_empty() {
                writeln!(out, "No metadata found")?;
            }
            if let Some(hash) = &metadata.hash {
                writeln!(out, "hash: {}", hash)?;
            }
            if let Some(id) = &metadata.last_event_id {
                writeln!(out, "lastEventID: {}", id)?;
            }
            if let Some(block) = &metadata.checked_end_block {
                writeln!(out, "checkedEndBlock: {}", block)?;
            }
            Ok(())
        }
        Report::Count(counts) => {
            writeln!(out, "=== Data Count by Chain ===")?;
            for (chain, count) in &counts.value {
                writeln!(out, "{}: {} items", chain, count)?;
            }
            writeln!(out, "Total: {} items", counts.value.values().sum::<usize>())?;
            write_repairs(&counts.repairs, out)
        }
    }
}

fn item_line(item: &TokenMapItem) -> String {
    format!(
        "EventID: {}, RootToken: {}, ChildToken: {}",
        item.event_id, item.root_token, item.child_token
    )
}

fn write_repairs<W: Write>(repairs: &[RepairedKey], out: &mut W) -> CliResult<()> {
    if repairs.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    for repair in repairs {
        let action = if repair.deleted { "Removed" } else { "Found" };
        writeln!(
            out,
            "{} invalid entry {}: {}",
            action,
            repair.key_lossy(),
            repair.reason
        )?;
    }
    Ok(())
}

fn repairs_json(repairs: &[RepairedKey]) -> Value {
    Value::Array(
        repairs
            .iter()
            .map(|r| json!({"key": r.key_lossy(), "reason": r.reason, "deleted": r.deleted}))
            .collect(),
    )
}

fn to_json(report: &Report) -> Value {
    let (data, repairs) = match report {
        Report::All(view) => (json!(view.chains), repairs_json(&view.repairs)),
        Report::Chain { items, .. } => (json!(items.value), repairs_json(&items.repairs)),
        Report::Token { item, .. } => (json!(item), Value::Array(Vec::new())),
        Report::Keys(keys) => (json!(keys), Value::Array(Vec::new())),
        Report::Metadata(metadata) => (json!(metadata), Value::Array(Vec::new())),
        Report::Count(counts) => (json!(counts.value), repairs_json(&counts.repairs)),
    };

    json!({
        "status": "ok",
        "data": data,
        "repairs": repairs
    })
}
