//! The navigation bar: a top bar on large screens and a bottom tab bar on small ones.

use maud::{Markup, html};

use crate::endpoints;

const DESKTOP_LINK_STYLE: &str = "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100 \
    lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0 \
    dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700 \
    dark:hover:text-white lg:dark:hover:bg-transparent";
const DESKTOP_CURRENT_LINK_STYLE: &str = "block py-2 px-3 text-white bg-blue-700 rounded-sm \
    lg:bg-transparent lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500";

const TAB_STYLE: &str = "flex w-full min-w-0 flex-col items-center justify-center rounded-lg \
    px-1 py-2 text-xs font-semibold leading-tight text-gray-600 \
    hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
    dark:hover:bg-blue-900/20 dark:hover:text-blue-200";
const TAB_CURRENT_STYLE: &str = "flex w-full min-w-0 flex-col items-center justify-center rounded-lg \
    bg-blue-50 px-1 py-2 text-xs font-semibold leading-tight text-blue-700 shadow-sm \
    dark:bg-blue-900/30 dark:text-blue-200";

/// A link in the navigation bar.
#[derive(Debug, Clone, Copy)]
struct NavLink {
    url: &'static str,
    title: &'static str,
    /// The short label used on the bottom tab bar.
    tab_title: &'static str,
    is_current: bool,
}

/// The pages reachable from the navigation bar, in display order.
const PAGES: [(&str, &str, &str); 4] = [
    (endpoints::STATIONS_VIEW, "Stations", "Stations"),
    (endpoints::CHARGERS_VIEW, "Chargers", "Chargers"),
    (endpoints::NEW_CHARGE_SESSION_VIEW, "Add Data", "Add"),
    (endpoints::REPORTS_VIEW, "Reports", "Reports"),
];

pub struct NavBar {
    links: Vec<NavLink>,
}

impl NavBar {
    /// Build the navigation bar with the link to `active_endpoint` highlighted.
    ///
    /// Endpoints that are not in the bar, e.g. edit pages, highlight nothing.
    pub fn new(active_endpoint: &str) -> Self {
        let mut links: Vec<NavLink> = PAGES
            .iter()
            .map(|&(url, title, tab_title)| NavLink {
                url,
                title,
                tab_title,
                is_current: url == active_endpoint,
            })
            .collect();

        links.push(NavLink {
            url: endpoints::LOG_OUT,
            title: "Log out",
            tab_title: "Log out",
            is_current: false,
        });

        Self { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html! {
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::ROOT) class="flex items-center gap-2"
                    {
                        span class="text-2xl" aria-hidden="true" { "⚡" }
                        span class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "EV Station Admin"
                        }
                    }

                    ul
                        class="hidden lg:flex font-medium flex-row space-x-8 rtl:space-x-reverse"
                    {
                        @for link in &self.links {
                            li
                            {
                                a
                                    href=(link.url)
                                    class=(if link.is_current { DESKTOP_CURRENT_LINK_STYLE } else { DESKTOP_LINK_STYLE })
                                    aria-current=[link.is_current.then_some("page")]
                                {
                                    (link.title)
                                }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden" aria-label="Primary"
            {
                ul
                    class="mx-4 mb-4 grid grid-cols-5 gap-1 rounded-xl border border-gray-200
                    bg-white/95 p-2 shadow-lg backdrop-blur
                    dark:border-gray-700 dark:bg-gray-900/95"
                {
                    @for link in &self.links {
                        li class="min-w-0"
                        {
                            a
                                href=(link.url)
                                class=(if link.is_current { TAB_CURRENT_STYLE } else { TAB_STYLE })
                                aria-current=[link.is_current.then_some("page")]
                            {
                                span class="truncate" { (link.tab_title) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::{Html, Selector};

    use crate::{endpoints, navigation::NavBar};

    fn current_links(active_endpoint: &str) -> Vec<String> {
        NavBar::new(active_endpoint)
            .links
            .iter()
            .filter(|link| link.is_current)
            .map(|link| link.url.to_owned())
            .collect()
    }

    #[test]
    fn highlights_only_the_active_page() {
        for page in [
            endpoints::STATIONS_VIEW,
            endpoints::CHARGERS_VIEW,
            endpoints::NEW_CHARGE_SESSION_VIEW,
            endpoints::REPORTS_VIEW,
        ] {
            assert_eq!(current_links(page), [page]);
        }
    }

    #[test]
    fn other_endpoints_highlight_nothing() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::NEW_STATION_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::LOG_OUT,
            endpoints::REPORT_HISTORY,
        ] {
            assert!(current_links(endpoint).is_empty(), "{endpoint} was highlighted");
        }
    }

    #[test]
    fn marks_current_page_for_assistive_tech() {
        let html = Html::parse_fragment(&NavBar::new(endpoints::REPORTS_VIEW).into_html().into_string());

        let current = html
            .select(&Selector::parse("a[aria-current=page]").unwrap())
            .map(|link| link.value().attr("href").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();

        // Once in the top bar and once in the tab bar.
        assert_eq!(current, [endpoints::REPORTS_VIEW, endpoints::REPORTS_VIEW]);
    }
}
