//! This modules defines the common functionality for paging data.

use maud::{Markup, html};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum rows to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render pagination indicators as htmx buttons.
///
/// Each page button fetches `page_url(page)` and swaps the result into
/// `hx_target` (replacing it).
pub fn pagination_view(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
    hx_target: &str,
) -> Markup {
    let page_button = |page: u64, text: &str| {
        html! {
            li
            {
                button
                    type="button"
                    hx-get=(page_url(page))
                    hx-target=(hx_target)
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class="block px-3 py-2 rounded-sm text-blue-600 hover:underline"
                {
                    (text)
                }
            }
        }
    };

    html! {
        nav class="pagination flex justify-center"
        {
            ul class="pagination flex items-center gap-x-1 p-0 m-0"
            {
                @for indicator in indicators {
                    @match indicator {
                        PaginationIndicator::Page(page) => {
                            (page_button(*page, &page.to_string()))
                        }
                        PaginationIndicator::CurrPage(page) => {
                            li
                            {
                                span
                                    aria-current="page"
                                    class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                {
                                    (page)
                                }
                            }
                        }
                        PaginationIndicator::Ellipsis => {
                            li
                            {
                                span class="block px-3 py-2 text-gray-500" { "..." }
                            }
                        }
                        PaginationIndicator::BackButton(page) => {
                            (page_button(*page, "Back"))
                        }
                        PaginationIndicator::NextButton(page) => {
                            (page_button(*page, "Next"))
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod pagination_tests {
    use scraper::{Html, Selector};

    use crate::pagination::{PaginationIndicator, create_pagination_indicators, pagination_view};

    #[test]
    fn renders_page_buttons_with_urls() {
        let indicators = create_pagination_indicators(2, 3, 5);

        let markup = pagination_view(
            &indicators,
            |page| format!("/api/reports/history?page={page}"),
            "#charge-history",
        );
        let html = Html::parse_fragment(&markup.into_string());

        let urls = html
            .select(&Selector::parse("button").unwrap())
            .filter_map(|button| button.value().attr("hx-get"))
            .collect::<Vec<_>>();
        assert_eq!(
            urls,
            [
                "/api/reports/history?page=1",
                "/api/reports/history?page=1",
                "/api/reports/history?page=3",
                "/api/reports/history?page=3",
            ]
        );
        let current = html
            .select(&Selector::parse("[aria-current=page]").unwrap())
            .next()
            .expect("No current page indicator")
            .text()
            .collect::<String>();
        assert_eq!(current, "2");
    }

    #[test]
    fn no_pages_renders_no_buttons() {
        let indicators = create_pagination_indicators(1, 0, 5);

        assert!(indicators.is_empty());
    }

    /// Render indicators compactly, e.g. "back:2 1 [2] 3 next:3".
    fn describe(indicators: &[PaginationIndicator]) -> String {
        indicators
            .iter()
            .map(|indicator| match indicator {
                PaginationIndicator::Page(page) => page.to_string(),
                PaginationIndicator::CurrPage(page) => format!("[{page}]"),
                PaginationIndicator::Ellipsis => "...".to_owned(),
                PaginationIndicator::BackButton(page) => format!("back:{page}"),
                PaginationIndicator::NextButton(page) => format!("next:{page}"),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn indicators_window_around_current_page() {
        let max_pages = 5;
        let cases = [
            (1, 1, "[1]"),
            (1, 5, "[1] 2 3 4 5 next:2"),
            (1, 10, "[1] 2 3 4 5 ... 10 next:2"),
            (3, 10, "back:2 1 2 [3] 4 5 ... 10 next:4"),
            (5, 10, "back:4 1 ... 3 4 [5] 6 7 ... 10 next:6"),
            (8, 10, "back:7 1 ... 6 7 [8] 9 10 next:9"),
            (10, 10, "back:9 1 ... 6 7 8 9 [10]"),
        ];

        for (curr_page, page_count, want) in cases {
            let got = create_pagination_indicators(curr_page, page_count, max_pages);

            assert_eq!(
                describe(&got),
                want,
                "page {curr_page} of {page_count}"
            );
        }
    }
}
