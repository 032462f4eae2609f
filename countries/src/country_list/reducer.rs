//! Reducer of the country list screen.

use super::types::{CountryListResult, CountryListViewState, LoadCountriesResult};
use countries_mvi_core::Reducer;

/// Folds list results into [`CountryListViewState`]
///
/// Each result touches only the fields listed below; everything else is
/// carried over from the previous state.
///
/// | result | changes |
/// |---|---|
/// | `InProgress { is_refreshing: false }` | loading, not refreshing |
/// | `InProgress { is_refreshing: true }` | refreshing, not loading |
/// | `Success(list)` | neither flag, `countries = list` |
/// | `Failure(e)` | neither flag, `error = e` |
/// | `FilterChanged(f)` | `filter_type = f` |
#[derive(Clone, Copy, Debug, Default)]
pub struct CountryListReducer;

impl Reducer for CountryListReducer {
    type State = CountryListViewState;
    type Result = CountryListResult;

    fn reduce(&self, state: &CountryListViewState, result: CountryListResult) -> CountryListViewState {
        match result {
            CountryListResult::LoadCountries(load) => match load {
                LoadCountriesResult::InProgress { is_refreshing } => CountryListViewState {
                    is_loading: !is_refreshing,
                    is_refreshing,
                    ..state.clone()
                },
                LoadCountriesResult::Success(countries) => CountryListViewState {
                    is_loading: false,
                    is_refreshing: false,
                    countries,
                    ..state.clone()
                },
                LoadCountriesResult::Failure(error) => CountryListViewState {
                    is_loading: false,
                    is_refreshing: false,
                    error: Some(error),
                    ..state.clone()
                },
            },
            CountryListResult::FilterChanged(filter_type) => CountryListViewState {
                filter_type,
                ..state.clone()
            },
        }
    }
}
