// src/sources/mod.rs
pub mod client;
pub mod currency;
pub mod isin;
pub mod site;

use async_trait::async_trait;
use url::Url;

use crate::utils::error::FetchError;

#[allow(unused_imports)]
pub use self::{
    client::{FetchConfig, HttpPageFetcher},
    currency::{usd_per_eur, RateProvider, YahooRateProvider},
    site::{Page, Section, SiteLayout},
};

/// Retrieves the markup of a page.
///
/// Any error means "page unavailable" to the report builder; it never aborts
/// a report. Implementations own their own session and pacing.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError>;
}
