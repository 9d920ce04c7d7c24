//! The bar chart of a year's monthly aggregates.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::bar,
};
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;
use time::Month;

use crate::{
    endpoints::{self, format_endpoint},
    html::FORM_TEXT_INPUT_STYLE,
    report::{cursor::MonthCursor, domain::YearReport, views::ReportViewId},
};

/// The HTML element ID of the chart container, swapped as a whole on updates.
pub const CHART_CONTAINER_ID: &str = "report-chart-container";
const CHART_ID: &str = "report-chart";

/// The aggregate field plotted by the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMetric {
    #[default]
    Revenue,
    Sessions,
    Energy,
}

impl ReportMetric {
    const ALL: [ReportMetric; 3] = [
        ReportMetric::Revenue,
        ReportMetric::Sessions,
        ReportMetric::Energy,
    ];

    fn value(self) -> &'static str {
        match self {
            ReportMetric::Revenue => "revenue",
            ReportMetric::Sessions => "sessions",
            ReportMetric::Energy => "energy",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ReportMetric::Revenue => "Revenue (VND)",
            ReportMetric::Sessions => "Charge sessions",
            ReportMetric::Energy => "Energy (kWh)",
        }
    }

    fn value_formatter(self) -> JsFunction {
        match self {
            ReportMetric::Revenue => JsFunction::new_with_args(
                "number",
                "return (number) ? new Intl.NumberFormat('vi-VN').format(number) + ' VND' : \"-\";",
            ),
            ReportMetric::Sessions => JsFunction::new_with_args(
                "number",
                "return (number) ? String(number) : \"-\";",
            ),
            ReportMetric::Energy => JsFunction::new_with_args(
                "number",
                "return (number) ? number + ' kWh' : \"-\";",
            ),
        }
    }
}

/// The value of `metric` for each month, `None` where the month has no value.
pub fn monthly_values(report: Option<&YearReport>, metric: ReportMetric) -> Vec<Option<f64>> {
    (1..=12)
        .map(|month| {
            let aggregate = report?.month(month)?;

            match metric {
                ReportMetric::Revenue => aggregate.revenue,
                ReportMetric::Sessions => aggregate.quantity.map(|quantity| quantity as f64),
                ReportMetric::Energy => aggregate.electric,
            }
        })
        .collect()
}

fn month_labels() -> Vec<String> {
    let mut month = Month::January;

    (0..12)
        .map(|_| {
            let label = month.to_string()[..3].to_owned();
            month = month.next();
            label
        })
        .collect()
}

/// Build a bar chart of `metric` over the cursor's year.
///
/// The cursor month is drawn as a separate, stacked series so that it stands
/// out from the other months.
pub fn report_chart(
    report: Option<&YearReport>,
    cursor: MonthCursor,
    metric: ReportMetric,
) -> Chart {
    let values = monthly_values(report, metric);
    let selected_index = usize::from(cursor.month()) - 1;

    let (other_months, selected_month): (Vec<_>, Vec<_>) = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            if index == selected_index {
                (None, value)
            } else {
                (value, None)
            }
        })
        .unzip();

    Chart::new()
        .title(
            Title::new()
                .text(metric.label())
                .subtext(cursor.year().to_string()),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(metric.value_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(month_labels()))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            bar::Bar::new()
                .name(metric.label())
                .stack("months")
                .data(other_months),
        )
        .series(
            bar::Bar::new()
                .name(cursor.to_string())
                .stack("months")
                .data(selected_month),
        )
}

fn chart_script(options: &str) -> String {
    format!(
        r#"(function() {{
            const chartDom = document.getElementById("{CHART_ID}");
            const chart = echarts.init(chartDom);
            const option = {options};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#
    )
}

/// Render the metric select and the chart.
///
/// Changing the metric reloads this partial. With `oob` set the partial
/// replaces the chart already on the page as an out-of-band swap.
pub fn chart_view(
    view_id: ReportViewId,
    report: Option<&YearReport>,
    cursor: MonthCursor,
    metric: ReportMetric,
    oob: bool,
) -> Markup {
    let chart = report_chart(report, cursor, metric);
    let chart_url = format_endpoint(endpoints::REPORT_CHART, view_id);

    html! {
        section
            id=(CHART_CONTAINER_ID)
            hx-swap-oob=[oob.then_some("outerHTML")]
            class="w-full mb-4"
        {
            div class="flex justify-end mb-2"
            {
                label for="metric" class="sr-only" { "Chart metric" }

                select
                    id="metric"
                    name="metric"
                    hx-get=(chart_url)
                    hx-target={ "#" (CHART_CONTAINER_ID) }
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class={ "max-w-48 " (FORM_TEXT_INPUT_STYLE) }
                {
                    @for choice in ReportMetric::ALL {
                        option value=(choice.value()) selected[choice == metric]
                        {
                            (choice.label())
                        }
                    }
                }
            }

            div id=(CHART_ID) class="min-h-[380px] rounded dark:bg-gray-100" {}

            script { (PreEscaped(chart_script(&chart.to_string()))) }
        }
    }
}
