// src/report/builder.rs

// --- Imports ---
use chrono::Utc;
use scraper::Html;
use url::Url;

use crate::extractors::text::element_text;
use crate::extractors::{coerce, extract_metrics, extract_tables, CompiledSelectors, CoercedValue};
use crate::report::models::{
    NewsArticle, OverviewResult, PageGroup, ReportData, SectionResult, TickerReport,
};
use crate::sources::{Page, PageFetcher, Section, SiteLayout};
use crate::utils::error::ExtractError;

/// Drives fetch → parse → extract for every page of a ticker.
///
/// Pages are fetched one after another in section order. `Html` is not
/// `Send`, so every document is parsed and fully extracted between awaits.
pub struct ReportBuilder {
    site: SiteLayout,
    selectors: CompiledSelectors,
}

impl ReportBuilder {
    pub fn new(site: SiteLayout, selectors: CompiledSelectors) -> Self {
        Self { site, selectors }
    }

    /// Builds the full report. Unavailable pages yield empty results; only a
    /// blank ticker is an error.
    pub async fn build_report(
        &self,
        ticker: &str,
        fetcher: &dyn PageFetcher,
    ) -> Result<TickerReport, ExtractError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ExtractError::InvalidInput("ticker symbol is empty".to_string()));
        }
        let last_updated = Utc::now().to_rfc3339();
        tracing::info!("Starting full extraction for {}", ticker);

        tracing::info!("Extracting overview...");
        let overview = match self.fetch(&ticker, Page::Overview, fetcher).await {
            Some((_, body)) => self.extract_overview(&body),
            None => OverviewResult::default(),
        };

        tracing::info!("Extracting financial data...");
        let financials = self.build_group(&ticker, Section::Financials, fetcher).await;

        tracing::info!("Extracting performance data...");
        let performance = self.build_group(&ticker, Section::Performance, fetcher).await;

        tracing::info!("Extracting analysis data...");
        let analysis = self.build_group(&ticker, Section::Analysis, fetcher).await;

        tracing::info!("Extracting news...");
        let news = match self.fetch(&ticker, Page::News, fetcher).await {
            Some((url, body)) => self.extract_news(&body, &url),
            None => Vec::new(),
        };

        let company_name = overview.company_name.clone().unwrap_or_else(|| ticker.clone());
        tracing::info!("Extraction finished for {} ({})", ticker, company_name);

        Ok(TickerReport {
            ticker,
            company_name,
            last_updated,
            data: ReportData {
                overview,
                financials,
                performance,
                analysis,
                news,
            },
        })
    }

    /// Fetches one page; any failure is logged and reported as `None`.
    async fn fetch(&self, ticker: &str, page: Page, fetcher: &dyn PageFetcher) -> Option<(Url, String)> {
        let url = match self.site.page_url(ticker, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build URL for {} page of {}: {}", page.key(), ticker, e);
                return None;
            }
        };

        tracing::info!("Scraping: {}", url);
        match fetcher.fetch_page(&url).await {
            Ok(body) => Some((url, body)),
            Err(e) => {
                tracing::warn!("{} page unavailable for {}: {}", page.key(), ticker, e);
                None
            }
        }
    }

    async fn build_group(&self, ticker: &str, section: Section, fetcher: &dyn PageFetcher) -> PageGroup {
        let mut group = PageGroup::with_capacity(section.pages().len());
        for &page in section.pages() {
            let result = match self.fetch(ticker, page, fetcher).await {
                Some((_, body)) => self.extract_section(&body),
                None => SectionResult::default(),
            };
            group.insert(page.key().to_string(), result);
        }
        group
    }

    /// Tables and metrics of one page.
    pub fn extract_section(&self, html: &str) -> SectionResult {
        let document = Html::parse_document(html);
        self.section_from(&document)
    }

    fn section_from(&self, document: &Html) -> SectionResult {
        SectionResult {
            tables: extract_tables(document, &self.selectors.tables),
            metrics: extract_metrics(document, &self.selectors),
        }
    }

    pub fn extract_overview(&self, html: &str) -> OverviewResult {
        let document = Html::parse_document(html);
        let root = document.root_element();

        // Price widgets also show change and percent; the quote is the one with '$'
        let current_price = self
            .selectors
            .price
            .select_all(root)
            .map(|el| element_text(Some(el)))
            .find(|text| text.contains('$'))
            .map(|text| coerce(&text.replace('$', "")))
            .unwrap_or(CoercedValue::None);

        OverviewResult {
            company_name: self.selectors.company_name.first_text(root),
            current_price,
            description: self.selectors.description.first_text(root).unwrap_or_default(),
            section: self.section_from(&document),
        }
    }

    /// Articles of the news page. Links are resolved against `page_url`.
    pub fn extract_news(&self, html: &str, page_url: &Url) -> Vec<NewsArticle> {
        let document = Html::parse_document(html);
        let selectors = &self.selectors;

        let articles: Vec<NewsArticle> = selectors
            .news_articles
            .select_all(document.root_element())
            .map(|article| NewsArticle {
                title: selectors.news_title.first_text(article),
                date: selectors.news_date.first_text(article),
                url: selectors
                    .news_link
                    .first_attr(article, "href")
                    .and_then(|href| page_url.join(href.trim()).ok())
                    .map(String::from),
                summary: selectors.news_summary.first_text(article),
            })
            .filter(|article| !article.is_empty())
            .collect();

        tracing::debug!("Extracted {} news articles", articles.len());
        articles
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::SelectorConfig;
    use crate::utils::error::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    const OVERVIEW_HTML: &str = r#"
        <html><body>
          <h1>Apple Inc. (AAPL)</h1>
          <div class="price">+1.25 (0.6%)</div>
          <div class="current-price">$227.52</div>
          <p class="description">Apple designs
             smartphones.</p>
          <table>
            <tr><td>Market Cap</td><td>3.5T</td></tr>
            <tr><td>Dividend</td><td>$1.00 (0.44%)</td></tr>
          </table>
          <div class="stat"><span class="label">Beta</span><span class="value">1.24</span></div>
        </body></html>
    "#;

    const INCOME_HTML: &str = r#"
        <table>
          <thead><tr><th>Year</th><th>Revenue</th></tr></thead>
          <tbody><tr><td>2023</td><td>$383.5B</td></tr></tbody>
        </table>
    "#;

    const NEWS_HTML: &str = r#"
        <div class="news-item">
          <h3>Apple unveils new iPhone</h3>
          <span class="date">Sep 9, 2024</span>
          <a href="/news/apple-iphone/">read</a>
          <p class="summary">The event took place in Cupertino.</p>
        </div>
        <article><a href="https://example.com/x">external</a></article>
        <div class="post"></div>
    "#;

    /// Serves canned pages keyed by URL; everything else is a 404.
    struct FakeSite {
        pages: HashMap<String, String>,
    }

    impl FakeSite {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::NotFound(url.to_string()))
        }
    }

    fn builder() -> ReportBuilder {
        ReportBuilder::new(
            SiteLayout::default(),
            SelectorConfig::default().compile().unwrap(),
        )
    }

    const ROOT: &str = "https://stockanalysis.com/stocks/aapl/";

    #[test]
    fn test_report_with_unavailable_sections() {
        let financials_url = format!("{}financials/", ROOT);
        let news_url = format!("{}news/", ROOT);
        let site = FakeSite::new(&[
            (ROOT, OVERVIEW_HTML),
            (financials_url.as_str(), INCOME_HTML),
            (news_url.as_str(), NEWS_HTML),
        ]);

        let report = tokio_test::block_on(builder().build_report("aapl", &site)).unwrap();

        assert_eq!(report.ticker, "AAPL");
        assert_eq!(report.company_name, "Apple Inc. (AAPL)");
        assert!(chrono::DateTime::parse_from_rfc3339(&report.last_updated).is_ok());

        // Populated sections
        let overview = &report.data.overview;
        assert_eq!(overview.current_price, CoercedValue::Float(227.52));
        assert_eq!(overview.description, "Apple designs smartphones.");
        assert_eq!(overview.section.metrics["Market Cap"], CoercedValue::Float(3.5e12));
        assert_eq!(overview.section.metrics["Beta"], CoercedValue::Float(1.24));

        let income = &report.data.financials["financials"];
        assert_eq!(income.tables.len(), 1);
        assert_eq!(income.tables[0]["Year"], CoercedValue::Integer(2023));
        assert_eq!(income.tables[0]["Revenue"], CoercedValue::Float(383.5e9));
        assert!(report.data.financials["balance_sheet"].is_empty());
        assert_eq!(
            report.data.financials.keys().collect::<Vec<_>>(),
            vec!["financials", "balance_sheet", "cash_flow", "ratios"]
        );

        assert_eq!(report.data.news.len(), 2);

        // Unavailable sections are present but empty
        assert_eq!(
            report.data.performance.keys().collect::<Vec<_>>(),
            vec!["revenue", "earnings", "dividend"]
        );
        assert!(report.data.performance.values().all(SectionResult::is_empty));
        assert_eq!(report.data.analysis.len(), 2);
        assert!(report.data.analysis.values().all(SectionResult::is_empty));

        let counts = report.section_counts();
        assert_eq!(
            counts,
            vec![
                ("overview", 5),
                ("financials", 1),
                ("performance", 0),
                ("analysis", 0),
                ("news", 2)
            ]
        );
    }

    #[test]
    fn test_report_when_everything_is_unavailable() {
        let site = FakeSite::new(&[]);
        let report = tokio_test::block_on(builder().build_report(" msft ", &site)).unwrap();

        assert_eq!(report.ticker, "MSFT");
        assert_eq!(report.company_name, "MSFT");
        assert_eq!(report.data.overview, OverviewResult::default());
        assert!(report.data.news.is_empty());
        assert!(report.section_counts().iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_blank_ticker_is_invalid_input() {
        let site = FakeSite::new(&[]);
        let result = tokio_test::block_on(builder().build_report("  ", &site));
        assert!(matches!(result, Err(ExtractError::InvalidInput(_))));
    }

    #[test]
    fn test_blank_heading_falls_back_to_ticker() {
        let site = FakeSite::new(&[(ROOT, "<h1>  \n </h1><p>no name</p>")]);
        let report = tokio_test::block_on(builder().build_report("AAPL", &site)).unwrap();
        assert_eq!(report.company_name, "AAPL");
        assert_eq!(report.data.overview.company_name, None);
    }

    #[test]
    fn test_news_links_are_absolute() {
        let page_url = Url::parse(&format!("{}news/", ROOT)).unwrap();
        let news = builder().extract_news(NEWS_HTML, &page_url);

        assert_eq!(news.len(), 2, "the empty .post is dropped");
        assert_eq!(news[0].title.as_deref(), Some("Apple unveils new iPhone"));
        assert_eq!(news[0].date.as_deref(), Some("Sep 9, 2024"));
        assert_eq!(news[0].url.as_deref(), Some("https://stockanalysis.com/news/apple-iphone/"));
        assert_eq!(news[0].summary.as_deref(), Some("The event took place in Cupertino."));
        assert_eq!(news[1].title, None);
        assert_eq!(news[1].url.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn test_overview_without_dollar_price() {
        let overview = builder().extract_overview(r#"<div class="price">N/A</div>"#);
        assert_eq!(overview.current_price, CoercedValue::None);
        assert_eq!(overview.description, "");
    }
}
