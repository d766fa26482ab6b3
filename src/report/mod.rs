// src/report/mod.rs
pub mod builder;
pub mod models;

#[allow(unused_imports)]
pub use self::{
    builder::ReportBuilder,
    models::{NewsArticle, OverviewResult, PageGroup, ReportData, SectionResult, TickerReport},
};
