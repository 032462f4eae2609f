//! Intents, actions, results and view state of the country list screen.

use crate::error::CountryError;
use crate::types::{Country, FilterType};
use countries_mvi_core::{Intent, ViewState};

/// User gestures on the list screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryListIntent {
    /// The screen was shown; only the first one per pipeline loads data
    Initial,
    /// Pull-to-refresh
    SwipeToRefresh,
    /// A filter tab was selected
    ChangeFilter(FilterType),
}

/// Commands of the list screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryListAction {
    /// Read the country list
    LoadCountries {
        /// Whether this is a refresh of data already shown
        is_refresh: bool,
    },
    /// Switch the visible subset
    ChangeFilter(FilterType),
}

impl Intent for CountryListIntent {
    type Action = CountryListAction;

    fn into_action(self) -> CountryListAction {
        match self {
            Self::Initial => CountryListAction::LoadCountries { is_refresh: false },
            Self::SwipeToRefresh => CountryListAction::LoadCountries { is_refresh: true },
            Self::ChangeFilter(filter) => CountryListAction::ChangeFilter(filter),
        }
    }

    fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }
}

/// Outcome of a `LoadCountries` action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadCountriesResult {
    /// The request started
    InProgress {
        /// Mirrors the action's `is_refresh`
        is_refreshing: bool,
    },
    /// The list was read
    Success(Vec<Country>),
    /// The list could not be read
    Failure(CountryError),
}

/// Results of the list screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryListResult {
    /// Progress of a load
    LoadCountries(LoadCountriesResult),
    /// The filter changed
    FilterChanged(FilterType),
}

impl From<LoadCountriesResult> for CountryListResult {
    fn from(result: LoadCountriesResult) -> Self {
        Self::LoadCountries(result)
    }
}

/// Everything the list screen renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryListViewState {
    /// A first load is running
    pub is_loading: bool,
    /// A refresh is running
    pub is_refreshing: bool,
    /// Countries from the last successful load
    pub countries: Vec<Country>,
    /// Active filter
    pub filter_type: FilterType,
    /// Last failure
    pub error: Option<CountryError>,
}

impl ViewState for CountryListViewState {}

impl CountryListViewState {
    /// State before anything happened
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            is_loading: false,
            is_refreshing: false,
            countries: Vec::new(),
            filter_type: FilterType::All,
            error: None,
        }
    }

    /// Countries passing the active filter
    pub fn visible_countries(&self) -> impl Iterator<Item = &Country> {
        let filter = self.filter_type;
        self.countries.iter().filter(move |c| filter.matches(c))
    }
}

impl Default for CountryListViewState {
    fn default() -> Self {
        Self::idle()
    }
}
