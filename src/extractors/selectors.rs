// src/extractors/selectors.rs

// --- Imports ---
use std::path::Path;

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

use crate::extractors::text::element_text;
use crate::utils::error::ExtractError;
use crate::utils::AppError;

// --- Declarative Configuration ---
/// Candidate CSS selectors for every logical field the extractors look at.
///
/// Each list is ordered. Scans (tables, metric containers, news articles)
/// visit every element matching any candidate, in document order. Field
/// lookups (company name, news title, ...) try the candidates in order and
/// keep the first one that yields non-empty text.
///
/// The defaults describe stockanalysis.com. A JSON file only needs to name
/// the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub tables: Vec<String>,
    pub metric_tables: Vec<String>,
    pub metric_containers: Vec<String>,
    pub metric_labels: Vec<String>,
    pub metric_values: Vec<String>,
    pub company_name: Vec<String>,
    pub price: Vec<String>,
    pub description: Vec<String>,
    pub news_articles: Vec<String>,
    pub news_title: Vec<String>,
    pub news_date: Vec<String>,
    pub news_link: Vec<String>,
    pub news_summary: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            tables: owned(&["table"]),
            metric_tables: owned(&["table", ".stats-table", ".table"]),
            metric_containers: owned(&[".stat", ".metric", ".data-point"]),
            metric_labels: owned(&[".label", ".stat-label", ".metric-label"]),
            metric_values: owned(&[".value", ".stat-value", ".metric-value"]),
            company_name: owned(&["h1", ".company-name", ".ticker-name"]),
            price: owned(&[".price", ".current-price", ".quote-price"]),
            description: owned(&[".description", ".company-description", ".about"]),
            news_articles: owned(&["article", ".news-item", ".news-article", ".post"]),
            news_title: owned(&["h1", "h2", "h3", ".title", ".headline"]),
            news_date: owned(&[".date", ".published", ".timestamp"]),
            news_link: owned(&["a[href]"]),
            news_summary: owned(&[".summary", ".excerpt", ".description"]),
        }
    }
}

impl SelectorConfig {
    /// Reads a (possibly partial) JSON selector file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid selector file {}: {}", path.display(), e))
        })
    }

    /// Parses every selector up front so a bad entry fails before any fetch.
    pub fn compile(&self) -> Result<CompiledSelectors, ExtractError> {
        Ok(CompiledSelectors {
            tables: SelectorGroup::compile(&self.tables)?,
            metric_tables: SelectorGroup::compile(&self.metric_tables)?,
            metric_containers: SelectorGroup::compile(&self.metric_containers)?,
            metric_labels: SelectorGroup::compile(&self.metric_labels)?,
            metric_values: SelectorGroup::compile(&self.metric_values)?,
            company_name: SelectorGroup::compile(&self.company_name)?,
            price: SelectorGroup::compile(&self.price)?,
            description: SelectorGroup::compile(&self.description)?,
            news_articles: SelectorGroup::compile(&self.news_articles)?,
            news_title: SelectorGroup::compile(&self.news_title)?,
            news_date: SelectorGroup::compile(&self.news_date)?,
            news_link: SelectorGroup::compile(&self.news_link)?,
            news_summary: SelectorGroup::compile(&self.news_summary)?,
        })
    }
}

// --- Compiled Form ---
/// An ordered list of parsed candidates plus their union.
#[derive(Debug, Clone)]
pub struct SelectorGroup {
    candidates: Vec<Selector>,
    // None when the list is empty; an empty group matches nothing
    union: Option<Selector>,
}

impl SelectorGroup {
    pub fn compile(sources: &[String]) -> Result<Self, ExtractError> {
        let candidates = sources
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;

        let union = if sources.is_empty() {
            None
        } else {
            Some(parse_selector(&sources.join(", "))?)
        };

        Ok(Self { candidates, union })
    }

    /// Every descendant of `scope` matching any candidate, in document order.
    pub fn select_all<'a>(&'a self, scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.union.iter().flat_map(move |sel| scope.select(sel))
    }

    /// First-match-wins lookup: candidates are tried in order and the first
    /// descendant with non-empty normalized text decides the result.
    pub fn first_element<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.candidates.iter().find_map(|sel| {
            scope
                .select(sel)
                .find(|el| !element_text(Some(*el)).is_empty())
        })
    }

    /// Normalized text of [`Self::first_element`], if any.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.first_element(scope).map(|el| element_text(Some(el)))
    }

    /// First candidate match carrying the named attribute, text not required.
    pub fn first_attr<'a>(&self, scope: ElementRef<'a>, attr: &str) -> Option<&'a str> {
        self.candidates.iter().find_map(|sel| {
            scope
                .select(sel)
                .find_map(|el| el.value().attr(attr))
                .filter(|value| !value.trim().is_empty())
        })
    }
}

/// All selector groups the extractors need, ready to use.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub tables: SelectorGroup,
    pub metric_tables: SelectorGroup,
    pub metric_containers: SelectorGroup,
    pub metric_labels: SelectorGroup,
    pub metric_values: SelectorGroup,
    pub company_name: SelectorGroup,
    pub price: SelectorGroup,
    pub description: SelectorGroup,
    pub news_articles: SelectorGroup,
    pub news_title: SelectorGroup,
    pub news_date: SelectorGroup,
    pub news_link: SelectorGroup,
    pub news_summary: SelectorGroup,
}

pub fn parse_selector(source: &str) -> Result<Selector, ExtractError> {
    Selector::parse(source).map_err(|e| ExtractError::InvalidSelector {
        selector: source.to_string(),
        reason: format!("{:?}", e),
    })
}
