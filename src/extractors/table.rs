// src/extractors/table.rs

// --- Imports ---
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::selectors::SelectorGroup;
use crate::extractors::text::{coerce, element_text, CoercedValue};

// --- CSS Selectors (Lazy Static) ---
static HEADER_SECTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead").expect("Failed to compile HEADER_SECTION_SELECTOR"));

static BODY_SECTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody").expect("Failed to compile BODY_SECTION_SELECTOR"));

pub(crate) static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

pub(crate) static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("Failed to compile CELL_SELECTOR"));

// --- Data Structures ---
/// One table row: column label (or `col_<i>`) to coerced cell value, in
/// column order.
pub type ExtractedRecord = IndexMap<String, CoercedValue>;

// --- Extraction ---
/// Extracts every table matched by `tables`, rows concatenated in document order.
pub fn extract_tables(document: &Html, tables: &SelectorGroup) -> Vec<ExtractedRecord> {
    let records: Vec<ExtractedRecord> = tables
        .select_all(document.root_element())
        .flat_map(extract_table)
        .collect();
    tracing::debug!("Extracted {} table rows", records.len());
    records
}

/// Extracts the rows of a single table element.
pub fn extract_table(table: ElementRef<'_>) -> Vec<ExtractedRecord> {
    let headers = header_labels(table);

    // Pages without explicit body markup keep their rows directly in the table
    let body = table.select(&BODY_SECTION_SELECTOR).next().unwrap_or(table);

    body.select(&ROW_SELECTOR)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
            if cells.is_empty() {
                return None;
            }

            let mut record = ExtractedRecord::with_capacity(cells.len());
            for (i, cell) in cells.into_iter().enumerate() {
                let key = headers
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("col_{}", i));
                // insert() keeps the first position of a repeated key but takes the last value
                record.insert(key, coerce(&element_text(Some(cell))));
            }
            Some(record)
        })
        .collect()
}

fn header_labels(table: ElementRef<'_>) -> Vec<String> {
    table
        .select(&HEADER_SECTION_SELECTOR)
        .next()
        .map(|thead| {
            thead
                .select(&CELL_SELECTOR)
                .map(|cell| element_text(Some(cell)))
                .collect()
        })
        .unwrap_or_default()
}
