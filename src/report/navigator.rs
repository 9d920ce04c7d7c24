//! Moves the report cursor between months, only landing on months with data.

use crate::report::{
    cache::{CachedYear, YearCache},
    cursor::MonthCursor,
    domain::MonthlyAggregate,
    fetcher::YearReportFetcher,
};

/// The result of asking the navigator to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved to the given month.
    Moved(MonthCursor),
    /// The adjacent month has no data, so the cursor did not move.
    NoData,
    /// The cursor is already at the current month, so there is no next month.
    Unavailable,
}

/// The cursor and year cache of one report view.
#[derive(Debug)]
pub struct MonthNavigator {
    cursor: MonthCursor,
    cache: YearCache,
}

impl MonthNavigator {
    /// Create a navigator with the cursor at `today`'s month and an empty cache.
    pub fn new(today: MonthCursor) -> Self {
        Self {
            cursor: today,
            cache: YearCache::new(),
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn cache(&self) -> &YearCache {
        &self.cache
    }

    /// Whether the "next month" control should be enabled.
    pub fn can_go_next(&self, today: MonthCursor) -> bool {
        self.cursor < today
    }

    /// Load the report for the cursor's year so the summary can be shown.
    pub async fn load_cursor_year<F: YearReportFetcher>(&mut self, fetcher: &F) {
        self.cache.ensure_loaded(self.cursor.year(), fetcher).await;
    }

    /// The aggregate for the cursor month, if its year is loaded and has one.
    pub fn current_aggregate(&self) -> Option<&MonthlyAggregate> {
        match self.cache.get(self.cursor.year()) {
            CachedYear::Loaded(report) => report.month(self.cursor.month()),
            CachedYear::NotAttempted | CachedYear::Failed => None,
        }
    }

    /// Whether `target` has data.
    ///
    /// Months after `today` never have data and are not fetched. Otherwise the
    /// target's year is loaded on demand, and a failed fetch, a missing month
    /// or an empty record all count as no data.
    pub async fn has_data<F: YearReportFetcher>(
        &mut self,
        target: MonthCursor,
        today: MonthCursor,
        fetcher: &F,
    ) -> bool {
        if target > today {
            return false;
        }

        match self.cache.ensure_loaded(target.year(), fetcher).await {
            CachedYear::Loaded(report) => report.has_month(target.month()),
            CachedYear::NotAttempted | CachedYear::Failed => false,
        }
    }

    pub async fn go_to_previous_month<F: YearReportFetcher>(
        &mut self,
        today: MonthCursor,
        fetcher: &F,
    ) -> Navigation {
        let target = self.cursor.previous();

        self.move_if_has_data(target, today, fetcher).await
    }

    pub async fn go_to_next_month<F: YearReportFetcher>(
        &mut self,
        today: MonthCursor,
        fetcher: &F,
    ) -> Navigation {
        if !self.can_go_next(today) {
            return Navigation::Unavailable;
        }

        let target = self.cursor.next();

        self.move_if_has_data(target, today, fetcher).await
    }

    async fn move_if_has_data<F: YearReportFetcher>(
        &mut self,
        target: MonthCursor,
        today: MonthCursor,
        fetcher: &F,
    ) -> Navigation {
        if self.has_data(target, today, fetcher).await {
            self.cursor = target;
            Navigation::Moved(target)
        } else {
            Navigation::NoData
        }
    }
}
