// src/extractors/mod.rs
pub mod metrics;
pub mod selectors;
pub mod table;
pub mod text;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use self::{
    metrics::{extract_metrics, Metrics},
    selectors::{CompiledSelectors, SelectorConfig, SelectorGroup},
    table::{extract_tables, ExtractedRecord},
    text::{coerce, normalize, CoercedValue},
};
