//! The registry of open report views.
//!
//! Each reports page gets its own [ReportView] when it is loaded. The view
//! holds the month cursor and the year cache for as long as the page is open,
//! and is dropped when the page is closed or has been idle for too long.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use crate::{
    Error,
    auth::AccessToken,
    report::{cursor::MonthCursor, navigator::MonthNavigator},
};

/// The identifier of an open report view.
pub type ReportViewId = u64;

/// The state of one open reports page.
#[derive(Debug)]
pub struct ReportView {
    pub navigator: MonthNavigator,
}

/// A shared handle to a report view.
///
/// The async mutex serialises the operations of a view, so at most one fetch
/// per year is in flight.
pub type SharedReportView = Arc<tokio::sync::Mutex<ReportView>>;

#[derive(Debug)]
struct ViewEntry {
    owner: AccessToken,
    view: SharedReportView,
    last_used: Instant,
}

/// The open report views, keyed by view ID.
#[derive(Debug, Clone)]
pub struct ReportViews {
    views: Arc<Mutex<HashMap<ReportViewId, ViewEntry>>>,
    next_id: Arc<AtomicU64>,
    lifetime: Duration,
}

impl ReportViews {
    /// Create an empty registry. Views idle for longer than `lifetime` are dropped.
    pub fn new(lifetime: Duration) -> Self {
        Self {
            views: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            lifetime,
        }
    }

    /// Open a new view for `owner` with the cursor at `today`.
    ///
    /// # Errors
    /// Returns [Error::ReportViewsLockError] if the registry lock is poisoned.
    pub fn open(
        &self,
        owner: AccessToken,
        today: MonthCursor,
    ) -> Result<(ReportViewId, SharedReportView), Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let view = Arc::new(tokio::sync::Mutex::new(ReportView {
            navigator: MonthNavigator::new(today),
        }));

        let mut views = self.views.lock().map_err(|_| Error::ReportViewsLockError)?;
        let now = Instant::now();
        views.retain(|_, entry| now.duration_since(entry.last_used) <= self.lifetime);
        views.insert(
            id,
            ViewEntry {
                owner,
                view: view.clone(),
                last_used: now,
            },
        );

        tracing::debug!("Opened report view {id}, {} open", views.len());

        Ok((id, view))
    }

    /// Get the view `id` if it is open and belongs to `owner`, marking it as used.
    ///
    /// # Errors
    /// - [Error::ReportViewExpired] if the view was closed, expired, or belongs
    ///   to someone else.
    /// - [Error::ReportViewsLockError] if the registry lock is poisoned.
    pub fn get(&self, id: ReportViewId, owner: &AccessToken) -> Result<SharedReportView, Error> {
        let mut views = self.views.lock().map_err(|_| Error::ReportViewsLockError)?;
        let now = Instant::now();

        let is_expired = match views.get(&id) {
            Some(entry) => now.duration_since(entry.last_used) > self.lifetime,
            None => return Err(Error::ReportViewExpired(id)),
        };

        if is_expired {
            views.remove(&id);
            return Err(Error::ReportViewExpired(id));
        }

        match views.get_mut(&id) {
            Some(entry) if entry.owner == *owner => {
                entry.last_used = now;
                Ok(entry.view.clone())
            }
            _ => Err(Error::ReportViewExpired(id)),
        }
    }

    /// Close the view `id`. Closing a view that is not open is not an error.
    ///
    /// # Errors
    /// Returns [Error::ReportViewsLockError] if the registry lock is poisoned.
    pub fn close(&self, id: ReportViewId, owner: &AccessToken) -> Result<(), Error> {
        let mut views = self.views.lock().map_err(|_| Error::ReportViewsLockError)?;

        if views.get(&id).is_some_and(|entry| entry.owner == *owner) {
            views.remove(&id);
            tracing::debug!("Closed report view {id}, {} open", views.len());
        }

        Ok(())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.views.lock().map(|views| views.len()).unwrap_or_default()
    }
}
