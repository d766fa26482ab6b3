// src/sources/site.rs
use url::Url;

use crate::utils::error::FetchError;

/// Logical groups of a ticker report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    Financials,
    Performance,
    Analysis,
    News,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Overview,
        Section::Financials,
        Section::Performance,
        Section::Analysis,
        Section::News,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Financials => "financials",
            Section::Performance => "performance",
            Section::Analysis => "analysis",
            Section::News => "news",
        }
    }

    /// Pages fetched for this section, in fetch order.
    pub fn pages(&self) -> &'static [Page] {
        match self {
            Section::Overview => &[Page::Overview],
            Section::Financials => &[
                Page::Financials,
                Page::BalanceSheet,
                Page::CashFlow,
                Page::Ratios,
            ],
            Section::Performance => &[Page::Revenue, Page::Earnings, Page::Dividend],
            Section::Analysis => &[Page::Statistics, Page::Forecast],
            Section::News => &[Page::News],
        }
    }
}

/// A single fetchable page of the data site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Statistics,
    Financials,
    BalanceSheet,
    CashFlow,
    Ratios,
    Revenue,
    Earnings,
    Dividend,
    Forecast,
    News,
}

impl Page {
    /// Key of the page inside its section of the report.
    pub fn key(&self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Statistics => "statistics",
            Page::Financials => "financials",
            Page::BalanceSheet => "balance_sheet",
            Page::CashFlow => "cash_flow",
            Page::Ratios => "ratios",
            Page::Revenue => "revenue",
            Page::Earnings => "earnings",
            Page::Dividend => "dividend",
            Page::Forecast => "forecast",
            Page::News => "news",
        }
    }

    /// Path below the ticker's root URL. Always ends with '/' except the root itself.
    pub fn path(&self) -> &'static str {
        match self {
            Page::Overview => "",
            Page::Statistics => "statistics/",
            Page::Financials => "financials/",
            Page::BalanceSheet => "financials/balance-sheet/",
            Page::CashFlow => "financials/cash-flow-statement/",
            Page::Ratios => "financials/ratios/",
            Page::Revenue => "revenue/",
            Page::Earnings => "earnings/",
            Page::Dividend => "dividend/",
            Page::Forecast => "forecast/",
            Page::News => "news/",
        }
    }
}

/// URL layout of the data site: `<base>/<ticker lowercase>/<page path>`.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    base: Url,
}

impl SiteLayout {
    pub const DEFAULT_BASE: &'static str = "https://stockanalysis.com/stocks/";

    pub fn new(base: &str) -> Result<Self, FetchError> {
        // Without the trailing slash join() would replace the last segment
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{}/", base))?
        };
        Ok(Self { base })
    }

    pub fn ticker_root(&self, ticker: &str) -> Result<Url, FetchError> {
        Ok(self.base.join(&format!("{}/", ticker.to_lowercase()))?)
    }

    pub fn page_url(&self, ticker: &str, page: Page) -> Result<Url, FetchError> {
        Ok(self.ticker_root(ticker)?.join(page.path())?)
    }
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE).expect("DEFAULT_BASE is a valid URL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_urls() {
        let site = SiteLayout::default();
        assert_eq!(
            site.page_url("AAPL", Page::Overview).unwrap().as_str(),
            "https://stockanalysis.com/stocks/aapl/"
        );
        assert_eq!(
            site.page_url("AAPL", Page::CashFlow).unwrap().as_str(),
            "https://stockanalysis.com/stocks/aapl/financials/cash-flow-statement/"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let site = SiteLayout::new("http://localhost:8080/stocks").unwrap();
        assert_eq!(
            site.page_url("msft", Page::News).unwrap().as_str(),
            "http://localhost:8080/stocks/msft/news/"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(SiteLayout::new("not a url"), Err(FetchError::Url(_))));
    }

    #[test]
    fn test_every_page_belongs_to_one_section() {
        let pages: Vec<Page> = Section::ALL
            .iter()
            .flat_map(|s| s.pages().iter().copied())
            .collect();
        assert_eq!(pages.len(), 11);
        for page in &pages {
            assert_eq!(pages.iter().filter(|p| *p == page).count(), 1, "{:?}", page);
        }
    }
}
