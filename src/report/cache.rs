//! A per-view cache of yearly reports with a fetch-once policy.

use std::collections::HashMap;

use crate::report::{domain::YearReport, fetcher::YearReportFetcher};

/// What the cache knows about a year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedYear<'a> {
    /// The year has not been fetched yet.
    NotAttempted,
    /// The fetch failed. It will not be retried.
    Failed,
    /// The fetch succeeded.
    Loaded(&'a YearReport),
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Failed,
    Loaded(YearReport),
}

/// Yearly reports keyed by year, populated lazily and never evicted.
#[derive(Debug, Default)]
pub struct YearCache {
    years: HashMap<i32, Outcome>,
}

impl YearCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, year: i32) -> CachedYear<'_> {
        match self.years.get(&year) {
            None => CachedYear::NotAttempted,
            Some(Outcome::Failed) => CachedYear::Failed,
            Some(Outcome::Loaded(report)) => CachedYear::Loaded(report),
        }
    }

    /// Return the stored outcome for `year`, calling `fetcher` only if the
    /// year has never been attempted.
    ///
    /// Fetch errors are logged and stored as [CachedYear::Failed].
    pub async fn ensure_loaded<F>(&mut self, year: i32, fetcher: &F) -> CachedYear<'_>
    where
        F: YearReportFetcher,
    {
        if !self.years.contains_key(&year) {
            let outcome = match fetcher.fetch_year(year).await {
                Ok(report) => Outcome::Loaded(report),
                Err(error) => {
                    tracing::error!("Could not fetch the report for {year}: {error}");
                    Outcome::Failed
                }
            };

            self.years.insert(year, outcome);
        }

        self.get(year)
    }
}
