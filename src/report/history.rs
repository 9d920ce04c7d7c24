//! The paginated charge session history and its CSV export.

use axum::{
    Extension,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use time::{
    OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    Error,
    auth::AccessToken,
    backend::{BackendClient, optional_number, string_or_number},
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
    pagination::{PaginationConfig, create_pagination_indicators, pagination_view},
    report::{
        page::ReportsState,
        presenter::{PRICE_PER_KWH, format_currency, format_energy},
    },
    timezone::get_local_offset,
};

/// The HTML element ID of the history section, swapped as a whole when paging.
pub const HISTORY_CONTAINER_ID: &str = "charge-history";
const MAX_PAGE_SIZE: u64 = 100;

/// One charge session as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "_id", default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "customerId", default, deserialize_with = "string_or_number")]
    pub customer_id: String,
    #[serde(rename = "vehicleType", default, deserialize_with = "string_or_number")]
    pub vehicle_type: String,
    #[serde(rename = "timeStart", default, deserialize_with = "string_or_number")]
    pub time_start: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(default, deserialize_with = "optional_number")]
    pub electric: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub station: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub charger: String,
}

#[derive(Debug, Deserialize)]
struct RawHistoryPage {
    #[serde(default)]
    result: Vec<HistoryEntry>,
    page: Option<u64>,
    #[serde(rename = "totalPages")]
    total_pages: Option<u64>,
    #[serde(rename = "totalItems")]
    total_items: Option<u64>,
}

/// One page of the charge session history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl HistoryPage {
    /// The page shown when the history could not be fetched.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            page: 1,
            total_pages: 1,
            total_items: 0,
        }
    }
}

/// Fetch page `page` of the history with `limit` entries per page.
pub async fn fetch_history(
    backend: &BackendClient,
    token: &AccessToken,
    page: u64,
    limit: u64,
) -> Result<HistoryPage, Error> {
    let request = backend
        .request(Method::GET, "/chargeData/getAll", token)
        .query(&[("page", page), ("limit", limit)]);
    let raw: RawHistoryPage = backend.send(request).await?;
    let total_items = raw.total_items.unwrap_or(raw.result.len() as u64);

    Ok(HistoryPage {
        page: raw.page.unwrap_or(page).max(1),
        total_pages: raw.total_pages.unwrap_or(1).max(1),
        total_items,
        entries: raw.result,
    })
}

/// A history entry formatted for display and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Vehicle type")]
    pub vehicle_type: String,
    #[serde(rename = "Start time")]
    pub start_time: String,
    #[serde(rename = "Duration (minutes)")]
    pub duration: String,
    #[serde(rename = "Energy")]
    pub energy: String,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Charger")]
    pub charger: String,
    #[serde(rename = "Amount")]
    pub amount: String,
}

fn format_start_time(time_start: &str, local_offset: UtcOffset) -> String {
    match OffsetDateTime::parse(time_start, &Rfc3339) {
        Ok(start) => start
            .to_offset(local_offset)
            .format(format_description!("[day]/[month]/[year] [hour]:[minute]"))
            .unwrap_or_else(|_| time_start.to_owned()),
        Err(_) => time_start.to_owned(),
    }
}

impl HistoryRow {
    pub fn new(entry: &HistoryEntry, local_offset: UtcOffset) -> Self {
        let customer = if entry.customer_id.is_empty() {
            entry.id.clone()
        } else {
            entry.customer_id.clone()
        };
        let electric = entry.electric.unwrap_or_default();

        Self {
            customer,
            vehicle_type: entry.vehicle_type.clone(),
            start_time: format_start_time(&entry.time_start, local_offset),
            duration: entry.duration.clone(),
            energy: format_energy(entry.electric),
            station: entry.station.clone(),
            charger: entry.charger.clone(),
            amount: format_currency(Some(electric * PRICE_PER_KWH)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl HistoryQuery {
    fn page_and_limit(&self, config: &PaginationConfig) -> (u64, u64) {
        let page = self.page.unwrap_or(config.default_page).max(1);
        let limit = self
            .limit
            .unwrap_or(config.default_page_size)
            .clamp(1, MAX_PAGE_SIZE);

        (page, limit)
    }
}

fn history_url(endpoint: &str, page: u64, limit: u64) -> String {
    format!("{endpoint}?page={page}&limit={limit}")
}

/// Render the history table with its pagination controls and export link.
pub fn history_view(
    history: &HistoryPage,
    limit: u64,
    local_offset: UtcOffset,
    max_pages: u64,
) -> Markup {
    let rows = history
        .entries
        .iter()
        .map(|entry| HistoryRow::new(entry, local_offset))
        .collect::<Vec<_>>();
    let indicators = create_pagination_indicators(history.page, history.total_pages, max_pages);

    html! {
        section id=(HISTORY_CONTAINER_ID) class="w-full"
        {
            div class="flex justify-between items-center mb-2"
            {
                h2 class="text-xl font-semibold" { "Charge history" }

                a
                    href=(history_url(endpoints::EXPORT_HISTORY, history.page, limit))
                    download
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Export"
                }
            }

            div class="overflow-x-auto rounded-lg"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Vehicle type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Start time" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Duration (minutes)" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Energy" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Station" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Charger" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for row in &rows {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (row.customer) }
                                td class=(TABLE_CELL_STYLE) { (row.vehicle_type) }
                                td class=(TABLE_CELL_STYLE) { (row.start_time) }
                                td class=(TABLE_CELL_STYLE) { (row.duration) }
                                td class=(TABLE_CELL_STYLE) { (row.energy) }
                                td class=(TABLE_CELL_STYLE) { (row.station) }
                                td class=(TABLE_CELL_STYLE) { (row.charger) }
                                td class=(TABLE_CELL_STYLE) { (row.amount) }
                            }
                        }

                        @if rows.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="8" class={ (TABLE_CELL_STYLE) " text-center" }
                                {
                                    "No charge sessions found."
                                }
                            }
                        }
                    }
                }
            }

            p class="my-2 text-sm text-gray-500 dark:text-gray-400"
            {
                (history.total_items) " sessions in total"
            }

            (pagination_view(
                &indicators,
                |page| history_url(endpoints::REPORT_HISTORY, page, limit),
                &format!("#{HISTORY_CONTAINER_ID}"),
            ))
        }
    }
}

/// Fetch a history page, falling back to an empty first page on failure.
///
/// An expired session is still reported so the user can log in again.
pub(super) async fn fetch_history_or_empty(
    backend: &BackendClient,
    token: &AccessToken,
    page: u64,
    limit: u64,
) -> Result<HistoryPage, Error> {
    match fetch_history(backend, token, page, limit).await {
        Ok(history) => Ok(history),
        Err(Error::Unauthorized) => Err(Error::Unauthorized),
        Err(error) => {
            tracing::error!("Could not fetch charge history page {page}: {error}");
            Ok(HistoryPage::empty())
        }
    }
}

/// Render a page of the history table.
pub async fn get_history_page(
    State(state): State<ReportsState>,
    Extension(token): Extension<AccessToken>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };
    let (page, limit) = query.page_and_limit(&state.pagination_config);

    match fetch_history_or_empty(&state.backend, &token, page, limit).await {
        Ok(history) => history_view(
            &history,
            limit,
            local_offset,
            state.pagination_config.max_pages,
        )
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn history_csv(rows: &[HistoryRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if rows.is_empty() {
        writer.write_record([
            "Customer",
            "Vehicle type",
            "Start time",
            "Duration (minutes)",
            "Energy",
            "Station",
            "Charger",
            "Amount",
        ])?;
    }

    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// Download a page of the history as a CSV file.
pub async fn export_history(
    State(state): State<ReportsState>,
    Extension(token): Extension<AccessToken>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let (page, limit) = query.page_and_limit(&state.pagination_config);

    let history = fetch_history(&state.backend, &token, page, limit).await?;
    let rows = history
        .entries
        .iter()
        .map(|entry| HistoryRow::new(entry, local_offset))
        .collect::<Vec<_>>();
    let csv = history_csv(&rows)?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"charge-history-page-{}.csv\"", history.page),
            ),
        ],
        csv,
    )
        .into_response())
}
