//! Monthly reports: the month navigator over cached yearly aggregates, the
//! bar chart, and the charge session history.

mod cache;
mod chart;
mod cursor;
mod domain;
mod fetcher;
mod history;
mod navigator;
mod page;
mod presenter;
mod views;

pub use history::{export_history, get_history_page};
pub use page::{
    ReportsState, delete_report_view, get_report_chart, get_reports_page, post_next_month,
    post_previous_month,
};
pub use views::ReportViews;
