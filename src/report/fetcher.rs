//! Fetching the yearly report from the backend.

use std::future::Future;

use reqwest::Method;

use crate::{Error, auth::AccessToken, backend::BackendClient, report::domain::YearReport};

/// Something that can fetch the monthly aggregates for a year.
pub trait YearReportFetcher {
    /// Fetch the report for `year` with a single request and no retries.
    fn fetch_year(&self, year: i32) -> impl Future<Output = Result<YearReport, Error>> + Send;
}

/// Fetches yearly reports from the backend on behalf of a signed-in user.
pub struct BackendReportFetcher<'a> {
    backend: &'a BackendClient,
    token: &'a AccessToken,
}

impl<'a> BackendReportFetcher<'a> {
    pub fn new(backend: &'a BackendClient, token: &'a AccessToken) -> Self {
        Self { backend, token }
    }
}

impl YearReportFetcher for BackendReportFetcher<'_> {
    async fn fetch_year(&self, year: i32) -> Result<YearReport, Error> {
        let request = self.backend.request(
            Method::GET,
            &format!("/chargeData/getByYear/{year}"),
            self.token,
        );

        self.backend.send(request).await
    }
}
