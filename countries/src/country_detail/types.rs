//! Intents, actions, results and view state of the country detail screen.

use crate::error::CountryError;
use crate::types::{Country, MessageType};
use countries_mvi_core::{Intent, ViewState};

/// User gestures on the detail screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryDetailIntent {
    /// The screen was opened for a country; only the first one loads
    Initial {
        /// Country to show, as passed by the navigation layer
        country_name: Option<String>,
    },
    /// The favorite toggle was switched on
    AddToFavorite(String),
    /// The favorite toggle was switched off
    RemoveFromFavorite(String),
}

/// Commands of the detail screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryDetailAction {
    /// Read one country
    LoadCountryDetail {
        /// Country to read
        country_name: Option<String>,
    },
    /// Mark a country as favorite
    AddToFavorite {
        /// Country to mark
        country_name: String,
    },
    /// Clear a country's favorite flag
    RemoveFromFavorite {
        /// Country to clear
        country_name: String,
    },
}

impl Intent for CountryDetailIntent {
    type Action = CountryDetailAction;

    fn into_action(self) -> CountryDetailAction {
        match self {
            Self::Initial { country_name } => CountryDetailAction::LoadCountryDetail { country_name },
            Self::AddToFavorite(country_name) => CountryDetailAction::AddToFavorite { country_name },
            Self::RemoveFromFavorite(country_name) => {
                CountryDetailAction::RemoveFromFavorite { country_name }
            },
        }
    }

    fn is_initial(&self) -> bool {
        matches!(self, Self::Initial { .. })
    }
}

/// Outcome of a `LoadCountryDetail` action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadCountryDetailResult {
    /// The request started
    InProgress,
    /// The country was read
    Success(Country),
    /// The country could not be read
    Failure(CountryError),
}

/// Outcome of an `AddToFavorite` action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddToFavoriteResult {
    /// The request started
    InProgress,
    /// The country is now a favorite
    Success,
    /// The country could not be marked
    Failure(CountryError),
    /// The success message should disappear
    Reset,
}

/// Outcome of a `RemoveFromFavorite` action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoveFromFavoriteResult {
    /// The request started
    InProgress,
    /// The country is no longer a favorite
    Success,
    /// The favorite flag could not be cleared
    Failure(CountryError),
    /// The success message should disappear
    Reset,
}

/// Results of the detail screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryDetailResult {
    /// Progress of a detail load
    LoadCountryDetail(LoadCountryDetailResult),
    /// Progress of an add-to-favorite
    AddToFavorite(AddToFavoriteResult),
    /// Progress of a remove-from-favorite
    RemoveFromFavorite(RemoveFromFavoriteResult),
}

impl From<LoadCountryDetailResult> for CountryDetailResult {
    fn from(result: LoadCountryDetailResult) -> Self {
        Self::LoadCountryDetail(result)
    }
}

impl From<AddToFavoriteResult> for CountryDetailResult {
    fn from(result: AddToFavoriteResult) -> Self {
        Self::AddToFavorite(result)
    }
}

impl From<RemoveFromFavoriteResult> for CountryDetailResult {
    fn from(result: RemoveFromFavoriteResult) -> Self {
        Self::RemoveFromFavorite(result)
    }
}

/// Everything the detail screen renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryDetailViewState {
    /// A request is running
    pub is_loading: bool,
    /// The loaded country
    pub country: Option<Country>,
    /// Last failure
    pub error: Option<CountryError>,
    /// Transient favorite message, cleared by the matching reset
    pub message: Option<MessageType>,
}

impl ViewState for CountryDetailViewState {}

impl CountryDetailViewState {
    /// State before anything happened
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            is_loading: false,
            country: None,
            error: None,
            message: None,
        }
    }

    /// Whether the shown country is a favorite
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.country.as_ref().is_some_and(|c| c.is_favorite)
    }
}

impl Default for CountryDetailViewState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_map_to_actions() {
        assert_eq!(
            CountryDetailIntent::Initial { country_name: Some("Czechia".into()) }.into_action(),
            CountryDetailAction::LoadCountryDetail { country_name: Some("Czechia".into()) }
        );
        assert_eq!(
            CountryDetailIntent::AddToFavorite("Czechia".into()).into_action(),
            CountryDetailAction::AddToFavorite { country_name: "Czechia".into() }
        );
        assert_eq!(
            CountryDetailIntent::RemoveFromFavorite("Czechia".into()).into_action(),
            CountryDetailAction::RemoveFromFavorite { country_name: "Czechia".into() }
        );
    }

    #[test]
    fn only_initial_is_initial() {
        assert!(CountryDetailIntent::Initial { country_name: None }.is_initial());
        assert!(!CountryDetailIntent::AddToFavorite("Czechia".into()).is_initial());
    }
}
