//! The reports page: mounts a report view and serves its navigation partials.

use axum::{
    Extension, Form,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    endpoints::{self, format_endpoint},
    html::{BUTTON_SECONDARY_STYLE, CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    pagination::PaginationConfig,
    report::{
        cache::CachedYear,
        chart::{ReportMetric, chart_view},
        cursor::MonthCursor,
        fetcher::BackendReportFetcher,
        history::{fetch_history_or_empty, history_view},
        navigator::{MonthNavigator, Navigation},
        presenter::AggregateSummary,
        views::{ReportViewId, ReportViews},
    },
    timezone::{get_local_offset, local_today},
};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";
const SUMMARY_ID: &str = "report-summary";

/// The state needed by the reports page and its partials.
#[derive(Debug, Clone)]
pub struct ReportsState {
    pub backend: BackendClient,
    pub report_views: ReportViews,
    pub local_timezone: String,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ReportsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            report_views: state.report_views.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

impl ReportsState {
    fn today(&self) -> Result<MonthCursor, Error> {
        local_today(&self.local_timezone)
            .map(MonthCursor::from_date)
            .ok_or_else(|| Error::InvalidTimezoneError(self.local_timezone.clone()))
    }
}

/// The chart metric, sent along with navigation and chart requests.
#[derive(Debug, Default, Deserialize)]
pub struct MetricForm {
    #[serde(default)]
    pub metric: ReportMetric,
}

fn summary_stat(label: &str, value: &str) -> Markup {
    html! {
        div class="flex-1 px-6 py-4 text-center"
        {
            p class="text-lg font-semibold" { (label) }
            p class="mt-2 text-lg font-semibold text-blue-600 dark:text-blue-500" { (value) }
        }
    }
}

fn summary_view(view_id: ReportViewId, navigator: &MonthNavigator, today: MonthCursor) -> Markup {
    let cursor = navigator.cursor();
    let summary = AggregateSummary::from(navigator.current_aggregate());
    let previous_url = format_endpoint(endpoints::REPORT_PREVIOUS_MONTH, view_id);
    let next_url = format_endpoint(endpoints::REPORT_NEXT_MONTH, view_id);
    let target = format!("#{SUMMARY_ID}");

    html! {
        section id=(SUMMARY_ID) class={ "w-full mb-6 " (CARD_STYLE) }
        {
            div class="flex justify-center items-center gap-4 p-4"
            {
                button
                    type="button"
                    aria-label="Previous month"
                    hx-post=(previous_url)
                    hx-target=(target)
                    hx-swap="outerHTML"
                    hx-include="#metric"
                    hx-target-error="#alert-container"
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "‹"
                }

                h2 class="text-lg font-semibold" { (cursor) }

                button
                    type="button"
                    aria-label="Next month"
                    hx-post=(next_url)
                    hx-target=(target)
                    hx-swap="outerHTML"
                    hx-include="#metric"
                    hx-target-error="#alert-container"
                    disabled[!navigator.can_go_next(today)]
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "›"
                }
            }

            div class="flex flex-col md:flex-row md:divide-x divide-gray-200 dark:divide-gray-700"
            {
                (summary_stat("Total revenue", &summary.revenue))
                (summary_stat("Charge sessions", &summary.sessions))
                (summary_stat("Energy delivered", &summary.energy))
            }
        }
    }
}

fn cursor_year_chart(
    view_id: ReportViewId,
    navigator: &MonthNavigator,
    metric: ReportMetric,
    oob: bool,
) -> Markup {
    let cursor = navigator.cursor();
    let report = match navigator.cache().get(cursor.year()) {
        CachedYear::Loaded(report) => Some(report),
        CachedYear::NotAttempted | CachedYear::Failed => None,
    };

    chart_view(view_id, report, cursor, metric, oob)
}

/// Display the reports page.
///
/// Each page load opens a new report view with the cursor at the current
/// month and an empty year cache.
pub async fn get_reports_page(
    State(state): State<ReportsState>,
    Extension(token): Extension<AccessToken>,
) -> Result<Response, Error> {
    let today = state.today()?;
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let (view_id, view) = state.report_views.open(token.clone(), today)?;
    let mut view = view.lock().await;
    let fetcher = BackendReportFetcher::new(&state.backend, &token);
    view.navigator.load_cursor_year(&fetcher).await;

    let config = &state.pagination_config;
    let history = fetch_history_or_empty(
        &state.backend,
        &token,
        config.default_page,
        config.default_page_size,
    )
    .await?;

    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();
    let content = html! {
        (nav_bar)

        main
            id="report-view"
            data-close-url=(format_endpoint(endpoints::REPORT_VIEW, view_id))
            class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h1 class="text-2xl font-bold mb-4" { "Reports" }

                (summary_view(view_id, &view.navigator, today))
                (cursor_year_chart(view_id, &view.navigator, ReportMetric::default(), false))
                (history_view(&history, config.default_page_size, local_offset, config.max_pages))
            }
        }
    };

    Ok(base(
        "Reports",
        &[HeadElement::ScriptLink(ECHARTS_URL.to_owned())],
        &content,
    )
    .into_response())
}

async fn navigate(
    state: ReportsState,
    token: AccessToken,
    view_id: ReportViewId,
    metric: ReportMetric,
    previous: bool,
) -> Result<Markup, Error> {
    let today = state.today()?;
    let view = state.report_views.get(view_id, &token)?;
    let mut view = view.lock().await;
    let fetcher = BackendReportFetcher::new(&state.backend, &token);

    let (navigation, target) = if previous {
        let target = view.navigator.cursor().previous();
        (view.navigator.go_to_previous_month(today, &fetcher).await, target)
    } else {
        let target = view.navigator.cursor().next();
        (view.navigator.go_to_next_month(today, &fetcher).await, target)
    };

    match navigation {
        Navigation::Moved(cursor) => {
            tracing::debug!("Report view {view_id} moved to {cursor}");

            Ok(html! {
                (summary_view(view_id, &view.navigator, today))
                (cursor_year_chart(view_id, &view.navigator, metric, true))
            })
        }
        Navigation::NoData => Err(Error::NoReportData {
            month: target.month(),
            year: target.year(),
        }),
        Navigation::Unavailable => Ok(summary_view(view_id, &view.navigator, today)),
    }
}

/// Move a report view to the previous month.
///
/// Responds with the updated summary and an out-of-band chart, or a
/// "no data" alert if the previous month has no data.
pub async fn post_previous_month(
    State(state): State<ReportsState>,
    Extension(token): Extension<AccessToken>,
    Path(view_id): Path<ReportViewId>,
    Form(form): Form<MetricForm>,
) -> Response {
    match navigate(state, token, view_id, form.metric, true).await {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Move a report view to the next month.
///
/// At the current month the summary is returned unchanged.
pub async fn post_next_month(
    State(state): State<ReportsState>,
    Extension(token): Extension<AccessToken>,
    Path(view_id): Path<ReportViewId>,
    Form(form): Form<MetricForm>,
) -> Response {
    match navigate(state, token, view_id, form.metric, false).await {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Render the chart of a report view's cursor year for the requested metric.
pub async fn get_report_chart(
    State(state): State<ReportsState>,
    Extension(token): Extension<AccessToken>,
    Path(view_id): Path<ReportViewId>,
    Query(query): Query<MetricForm>,
) -> Response {
    let view = match state.report_views.get(view_id, &token) {
        Ok(view) => view,
        Err(error) => return error.into_alert_response(),
    };
    let mut view = view.lock().await;
    let fetcher = BackendReportFetcher::new(&state.backend, &token);
    view.navigator.load_cursor_year(&fetcher).await;

    cursor_year_chart(view_id, &view.navigator, query.metric, false).into_response()
}

/// Close a report view when its page is hidden.
pub async fn delete_report_view(
    State(state): State<ReportsState>,
    Extension(token): Extension<AccessToken>,
    Path(view_id): Path<ReportViewId>,
) -> Response {
    match state.report_views.close(view_id, &token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod page_tests {
    use axum::{
        Extension, Form, Json, Router,
        extract::{FromRef, Path, Query, State},
        http::StatusCode,
        routing::get,
    };
    use scraper::{Html, Selector};
    use serde_json::{Map, Value, json};

    use crate::{
        auth::AccessToken,
        report::{chart::ReportMetric, cursor::MonthCursor},
        test_utils::{
            TEST_TIMEZONE, app_state_with_backend, assert_valid_html, parse_html_document,
            parse_html_fragment,
        },
        timezone::local_today,
    };

    use super::{
        MetricForm, ReportsState, delete_report_view, get_report_chart, get_reports_page,
        post_next_month, post_previous_month,
    };

    fn today() -> MonthCursor {
        MonthCursor::from_date(local_today(TEST_TIMEZONE).unwrap())
    }

    /// Every month of every year has data.
    fn full_year() -> Value {
        let months = (1..=12)
            .map(|month| (month.to_string(), json!({"revenue": 1000 * month, "quantity": month})))
            .collect::<Map<_, _>>();

        json!({ "data": months })
    }

    fn backend(year_payload: Value) -> Router {
        Router::new()
            .route(
                "/chargeData/getByYear/{year}",
                get(move || {
                    let payload = year_payload.clone();
                    async move { Json(payload) }
                }),
            )
            .route(
                "/chargeData/getAll",
                get(|| async {
                    Json(json!({"data": {"result": [], "page": 1, "totalPages": 1, "totalItems": 0}}))
                }),
            )
    }

    async fn get_state(year_payload: Value) -> ReportsState {
        ReportsState::from_ref(&app_state_with_backend(backend(year_payload)).await)
    }

    fn token() -> AccessToken {
        AccessToken::new("token")
    }

    fn metric() -> Form<MetricForm> {
        Form(MetricForm::default())
    }

    fn heading(html: &Html) -> String {
        html.select(&Selector::parse("#report-summary h2").unwrap())
            .next()
            .expect("No summary heading")
            .text()
            .collect()
    }

    async fn open_view(state: &ReportsState) -> u64 {
        let (view_id, _) = state.report_views.open(token(), today()).unwrap();
        view_id
    }

    #[tokio::test]
    async fn reports_page_shows_current_month() {
        let state = get_state(full_year()).await;

        let response = get_reports_page(State(state), Extension(token()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(heading(&document), today().to_string());

        let stats = document
            .select(&Selector::parse("#report-summary p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();
        let month = u64::from(today().month());
        assert!(stats.contains(&format!("{}.000 VND", month)));
        assert!(stats.contains(&month.to_string()));

        let next_button = document
            .select(&Selector::parse("button[aria-label='Next month']").unwrap())
            .next()
            .expect("No next button");
        assert!(next_button.value().attr("disabled").is_some());

        let view = document
            .select(&Selector::parse("#report-view").unwrap())
            .next()
            .expect("No report view container");
        assert!(
            view.value()
                .attr("data-close-url")
                .unwrap()
                .starts_with("/api/reports/views/")
        );
    }

    #[tokio::test]
    async fn previous_month_with_data_moves_and_refreshes_chart() {
        let state = get_state(full_year()).await;
        let view_id = open_view(&state).await;

        let response =
            post_previous_month(State(state), Extension(token()), Path(view_id), metric()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_eq!(heading(&html), today().previous().to_string());

        let chart = html
            .select(&Selector::parse("#report-chart-container").unwrap())
            .next()
            .expect("No out-of-band chart");
        assert_eq!(chart.value().attr("hx-swap-oob"), Some("outerHTML"));

        let next_button = html
            .select(&Selector::parse("button[aria-label='Next month']").unwrap())
            .next()
            .unwrap();
        assert!(next_button.value().attr("disabled").is_none());
    }

    #[tokio::test]
    async fn previous_month_without_data_reports_no_data() {
        let state = get_state(json!({"data": {"year": "2025"}})).await;
        let view_id = open_view(&state).await;

        let response = post_previous_month(
            State(state.clone()),
            Extension(token()),
            Path(view_id),
            metric(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No data for this month"));

        let view = state.report_views.get(view_id, &token()).unwrap();
        assert_eq!(view.lock().await.navigator.cursor(), today());
    }

    #[tokio::test]
    async fn next_month_at_current_month_is_a_no_op() {
        let state = get_state(full_year()).await;
        let view_id = open_view(&state).await;

        let response =
            post_next_month(State(state), Extension(token()), Path(view_id), metric()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(heading(&html), today().to_string());
        assert_eq!(
            html.select(&Selector::parse("#report-chart-container").unwrap())
                .count(),
            0
        );
    }

    #[tokio::test]
    async fn next_month_returns_after_going_back() {
        let state = get_state(full_year()).await;
        let view_id = open_view(&state).await;

        post_previous_month(
            State(state.clone()),
            Extension(token()),
            Path(view_id),
            metric(),
        )
        .await;
        let response =
            post_next_month(State(state), Extension(token()), Path(view_id), metric()).await;

        let html = parse_html_fragment(response).await;
        assert_eq!(heading(&html), today().to_string());
    }

    #[tokio::test]
    async fn closed_view_has_expired() {
        let state = get_state(full_year()).await;
        let view_id = open_view(&state).await;

        let response =
            delete_report_view(State(state.clone()), Extension(token()), Path(view_id)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response =
            post_previous_month(State(state), Extension(token()), Path(view_id), metric()).await;
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn chart_uses_requested_metric() {
        let state = get_state(full_year()).await;
        let view_id = open_view(&state).await;

        let response = get_report_chart(
            State(state),
            Extension(token()),
            Path(view_id),
            Query(MetricForm {
                metric: ReportMetric::Sessions,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .expect("No selected metric");
        assert_eq!(selected.value().attr("value"), Some("sessions"));
    }
}
