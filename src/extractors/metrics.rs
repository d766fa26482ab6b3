// src/extractors/metrics.rs

// --- Imports ---
use indexmap::IndexMap;
use scraper::{ElementRef, Html};

use crate::extractors::selectors::CompiledSelectors;
use crate::extractors::table::{CELL_SELECTOR, ROW_SELECTOR};
use crate::extractors::text::{coerce, element_text, CoercedValue};

/// Label to coerced value, in order of first discovery.
pub type Metrics = IndexMap<String, CoercedValue>;

/// Collects label/value pairs from a page.
///
/// Two passes run over the whole document: first the rows of anything
/// table-like (cell 0 is the label, cell 1 the value), then labeled
/// containers. The container pass runs second and overwrites on a label
/// collision. Pages rarely agree on one markup shape for their stats, so
/// both passes always run.
pub fn extract_metrics(document: &Html, selectors: &CompiledSelectors) -> Metrics {
    let root = document.root_element();
    let mut metrics = Metrics::new();

    collect_row_pairs(root, selectors, &mut metrics);
    let from_rows = metrics.len();
    collect_container_pairs(root, selectors, &mut metrics);

    tracing::debug!(
        "Extracted {} metrics ({} from table rows, rest from containers)",
        metrics.len(),
        from_rows
    );
    metrics
}

fn collect_row_pairs(root: ElementRef<'_>, selectors: &CompiledSelectors, metrics: &mut Metrics) {
    for table in selectors.metric_tables.select_all(root) {
        for row in table.select(&ROW_SELECTOR) {
            let mut cells = row.select(&CELL_SELECTOR);
            let (Some(label_cell), Some(value_cell)) = (cells.next(), cells.next()) else {
                continue;
            };
            insert_pair(
                metrics,
                element_text(Some(label_cell)),
                element_text(Some(value_cell)),
            );
        }
    }
}

fn collect_container_pairs(root: ElementRef<'_>, selectors: &CompiledSelectors, metrics: &mut Metrics) {
    for container in selectors.metric_containers.select_all(root) {
        let label = selectors.metric_labels.first_text(container);
        let value = selectors.metric_values.first_text(container);
        if let (Some(label), Some(value)) = (label, value) {
            insert_pair(metrics, label, value);
        }
    }
}

fn insert_pair(metrics: &mut Metrics, label: String, value: String) {
    if label.is_empty() || value.is_empty() {
        return;
    }
    metrics.insert(label, coerce(&value));
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::selectors::SelectorConfig;

    fn selectors() -> CompiledSelectors {
        SelectorConfig::default().compile().unwrap()
    }

    #[test]
    fn test_row_pairs() {
        let html = r#"
            <table>
              <tr><td>Market Cap</td><td>$2.5T</td></tr>
              <tr><td>PE Ratio</td><td>29.45</td></tr>
              <tr><td>Single cell</td></tr>
              <tr><td></td><td>orphan value</td></tr>
              <tr><td>Ex-Dividend Date</td><td>n/a</td></tr>
            </table>
        "#;
        let doc = Html::parse_document(html);
        let metrics = extract_metrics(&doc, &selectors());

        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics["Market Cap"], CoercedValue::Float(2.5e12));
        assert_eq!(metrics["PE Ratio"], CoercedValue::Float(29.45));
        assert_eq!(metrics["Ex-Dividend Date"], CoercedValue::None);
        assert!(!metrics.contains_key("Single cell"));
    }

    #[test]
    fn test_container_pairs() {
        let html = r#"
            <div class="stat"><span class="stat-label">Beta</span><span class="stat-value">1.24</span></div>
            <div class="metric"><div class="metric-label">Analysts</div><div class="metric-value">Buy</div></div>
            <div class="data-point"><span class="label">No value here</span></div>
            <div class="data-point"><span class="label"> </span><span class="value">7</span></div>
        "#;
        let doc = Html::parse_document(html);
        let metrics = extract_metrics(&doc, &selectors());

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["Beta"], CoercedValue::Float(1.24));
        assert_eq!(metrics["Analysts"], CoercedValue::Text("Buy".to_string()));
    }

    #[test]
    fn test_container_pass_wins_on_collision() {
        let html = r#"
            <table><tr><th>Yield</th><td>3.0</td></tr></table>
            <div class="stat"><span class="label">Yield</span><span class="value">4.0</span></div>
        "#;
        let doc = Html::parse_document(html);
        let metrics = extract_metrics(&doc, &selectors());

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics["Yield"], CoercedValue::Float(4.0));
    }

    #[test]
    fn test_table_like_div_rows() {
        // .stats-table is matched even though it is not a <table>;
        // the rows inside are only visited once per matching element
        let html = r#"
            <div class="stats-table">
              <table><tr><td>Employees</td><td>161,000</td></tr></table>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let metrics = extract_metrics(&doc, &selectors());

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics["Employees"], CoercedValue::Integer(161_000));
    }

    #[test]
    fn test_empty_document() {
        let doc = Html::parse_document("");
        assert!(extract_metrics(&doc, &selectors()).is_empty());
    }
}
