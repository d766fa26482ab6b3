// src/report/models.rs
use indexmap::IndexMap;
use serde::Serialize;

use crate::extractors::{CoercedValue, ExtractedRecord, Metrics};
use crate::sources::Section;

/// Tables and label/value metrics found on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionResult {
    pub tables: Vec<ExtractedRecord>,
    pub metrics: Metrics,
}

impl SectionResult {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.metrics.is_empty()
    }
}

/// The overview page: the usual tables/metrics plus a few identity fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewResult {
    pub company_name: Option<String>,
    pub current_price: CoercedValue,
    pub description: String,
    #[serde(flatten)]
    pub section: SectionResult,
}

/// Page key (e.g. `balance_sheet`) to that page's result, in fetch order.
/// Every page of the section is present; unavailable pages are empty.
pub type PageGroup = IndexMap<String, SectionResult>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsArticle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NewsArticle {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.url.is_none() && self.summary.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportData {
    pub overview: OverviewResult,
    pub financials: PageGroup,
    pub performance: PageGroup,
    pub analysis: PageGroup,
    pub news: Vec<NewsArticle>,
}

/// Everything extracted for one ticker in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerReport {
    /// Uppercased symbol.
    pub ticker: String,
    /// Page heading, or the ticker when the page had none.
    pub company_name: String,
    /// RFC 3339 UTC time the run started.
    pub last_updated: String,
    pub data: ReportData,
}

impl TickerReport {
    /// Number of populated items per section, for run summaries.
    pub fn section_counts(&self) -> Vec<(&'static str, usize)> {
        let populated = |group: &PageGroup| group.values().filter(|r| !r.is_empty()).count();
        Section::ALL
            .iter()
            .map(|section| {
                let count = match section {
                    Section::Overview => {
                        let overview = &self.data.overview.section;
                        overview.tables.len() + overview.metrics.len()
                    }
                    Section::Financials => populated(&self.data.financials),
                    Section::Performance => populated(&self.data.performance),
                    Section::Analysis => populated(&self.data.analysis),
                    Section::News => self.data.news.len(),
                };
                (section.name(), count)
            })
            .collect()
    }
}
