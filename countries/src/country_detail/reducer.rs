//! Reducer of the country detail screen.

use super::types::{
    AddToFavoriteResult, CountryDetailResult, CountryDetailViewState, LoadCountryDetailResult,
    RemoveFromFavoriteResult,
};
use crate::error::CountryError;
use crate::types::MessageType;
use countries_mvi_core::Reducer;

/// Folds detail results into [`CountryDetailViewState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct CountryDetailReducer;

impl CountryDetailReducer {
    fn in_progress(state: &CountryDetailViewState) -> CountryDetailViewState {
        CountryDetailViewState {
            is_loading: true,
            ..state.clone()
        }
    }

    fn failed(state: &CountryDetailViewState, error: CountryError) -> CountryDetailViewState {
        CountryDetailViewState {
            is_loading: false,
            error: Some(error),
            ..state.clone()
        }
    }

    fn favorite_changed(
        state: &CountryDetailViewState,
        is_favorite: bool,
        message: MessageType,
    ) -> CountryDetailViewState {
        CountryDetailViewState {
            is_loading: false,
            country: state.country.clone().map(|c| c.with_favorite(is_favorite)),
            message: Some(message),
            ..state.clone()
        }
    }

    fn reset(state: &CountryDetailViewState) -> CountryDetailViewState {
        CountryDetailViewState {
            message: None,
            ..state.clone()
        }
    }
}

impl Reducer for CountryDetailReducer {
    type State = CountryDetailViewState;
    type Result = CountryDetailResult;

    fn reduce(&self, state: &CountryDetailViewState, result: CountryDetailResult) -> CountryDetailViewState {
        match result {
            CountryDetailResult::LoadCountryDetail(load) => match load {
                LoadCountryDetailResult::InProgress => Self::in_progress(state),
                LoadCountryDetailResult::Success(country) => CountryDetailViewState {
                    is_loading: false,
                    country: Some(country),
                    ..state.clone()
                },
                LoadCountryDetailResult::Failure(error) => Self::failed(state, error),
            },
            CountryDetailResult::AddToFavorite(add) => match add {
                AddToFavoriteResult::InProgress => Self::in_progress(state),
                AddToFavoriteResult::Success => {
                    Self::favorite_changed(state, true, MessageType::AddedToFavorite)
                },
                AddToFavoriteResult::Failure(error) => Self::failed(state, error),
                AddToFavoriteResult::Reset => Self::reset(state),
            },
            CountryDetailResult::RemoveFromFavorite(remove) => match remove {
                RemoveFromFavoriteResult::InProgress => Self::in_progress(state),
                RemoveFromFavoriteResult::Success => {
                    Self::favorite_changed(state, false, MessageType::RemovedFromFavorite)
                },
                RemoveFromFavoriteResult::Failure(error) => Self::failed(state, error),
                RemoveFromFavoriteResult::Reset => Self::reset(state),
            },
        }
    }
}
