//! Interactor of the country list screen.

use super::types::{CountryListAction, CountryListResult, LoadCountriesResult};
use crate::error::CountryError;
use crate::repository::CountryRepository;
use countries_mvi_core::{Effect, Interactor};
use std::sync::Arc;

/// Routes list actions to repository operations
#[derive(Clone)]
pub struct CountryListInteractor {
    repository: Arc<dyn CountryRepository>,
}

impl CountryListInteractor {
    /// Create an interactor reading from `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn CountryRepository>) -> Self {
        Self { repository }
    }

    fn load_countries(&self, is_refresh: bool) -> Effect<CountryListResult> {
        let repository = Arc::clone(&self.repository);
        Effect::start_with(
            CountryListResult::LoadCountries(LoadCountriesResult::InProgress {
                is_refreshing: is_refresh,
            }),
            Effect::attempt(
                async move { repository.get_countries().await },
                |countries| {
                    Effect::Emit(CountryListResult::LoadCountries(LoadCountriesResult::Success(
                        countries,
                    )))
                },
                |error| {
                    Effect::Emit(CountryListResult::LoadCountries(LoadCountriesResult::Failure(
                        CountryError::LoadCountries(error),
                    )))
                },
            ),
        )
    }
}

impl Interactor for CountryListInteractor {
    type Action = CountryListAction;
    type Result = CountryListResult;

    fn process(&self, action: CountryListAction) -> Effect<CountryListResult> {
        match action {
            CountryListAction::LoadCountries { is_refresh } => self.load_countries(is_refresh),
            CountryListAction::ChangeFilter(filter) => {
                Effect::Emit(CountryListResult::FilterChanged(filter))
            },
        }
    }
}

impl std::fmt::Debug for CountryListInteractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountryListInteractor").finish_non_exhaustive()
    }
}
