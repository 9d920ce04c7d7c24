//! The operating state shared by stations and chargers.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// Whether a station or charger is in service.
///
/// The backend stores the state as a free-form string, unknown values are
/// kept as [OperatingState::Other] so they survive an edit round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum OperatingState {
    #[default]
    Available,
    Maintenance,
    Error,
    Other(String),
}

impl OperatingState {
    /// The states an admin can pick from in an edit form.
    pub const EDITABLE: [OperatingState; 3] = [
        OperatingState::Available,
        OperatingState::Maintenance,
        OperatingState::Error,
    ];

    /// The value sent to and received from the backend.
    pub fn as_str(&self) -> &str {
        match self {
            OperatingState::Available => "available",
            OperatingState::Maintenance => "maintenance",
            OperatingState::Error => "error",
            OperatingState::Other(state) => state,
        }
    }

    /// The human readable name of the state.
    pub fn label(&self) -> &str {
        match self {
            OperatingState::Available => "Available",
            OperatingState::Maintenance => "Maintenance",
            OperatingState::Error => "Error",
            OperatingState::Other(state) => state,
        }
    }

    /// A coloured badge for the state, or nothing for unknown states.
    pub fn badge(&self) -> Option<Markup> {
        let style = match self {
            OperatingState::Available => {
                "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300"
            }
            OperatingState::Maintenance => {
                "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-300"
            }
            OperatingState::Error => "bg-red-500 text-white",
            OperatingState::Other(_) => return None,
        };

        Some(html! {
            span class={ "px-2 py-1 rounded text-xs font-semibold " (style) } { (self.label()) }
        })
    }
}

impl From<Option<String>> for OperatingState {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            None | Some("") | Some("available") => OperatingState::Available,
            Some("maintenance") => OperatingState::Maintenance,
            Some("error") => OperatingState::Error,
            Some(other) => OperatingState::Other(other.to_owned()),
        }
    }
}

impl From<OperatingState> for String {
    fn from(value: OperatingState) -> Self {
        value.as_str().to_owned()
    }
}
