//! Table and JSON rendering for command results.

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for people
    #[default]
    Table,
    /// Pretty-printed JSON for scripts
    Json,
}

/// Render rows, or a "no results" line for an empty table.
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table if items.is_empty() => println!("No results found."),
        OutputFormat::Table => println!("{}", Table::new(items)),
        OutputFormat::Json => println!("{}", to_json(items)),
    }
}

/// Render one record. In table mode each top-level field becomes a
/// `key: value` line; nested values are printed as compact JSON.
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    match (format, serde_json::to_value(item)) {
        (OutputFormat::Table, Ok(Value::Object(fields))) => {
            for (key, value) in &fields {
                print_kv(key, &scalar(value));
            }
        }
        _ => println!("{}", to_json(item)),
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
