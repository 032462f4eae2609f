//! Interactor of the country detail screen.

use super::types::{
    AddToFavoriteResult, CountryDetailAction, CountryDetailResult, LoadCountryDetailResult,
    RemoveFromFavoriteResult,
};
use crate::error::CountryError;
use crate::repository::CountryRepository;
use countries_mvi_core::{Effect, Interactor};
use std::sync::Arc;
use std::time::Duration;

/// Routes detail actions to repository operations
///
/// Favorite toggles emit their success followed, after `reset_delay`, by a
/// reset that hides the confirmation message.
#[derive(Clone)]
pub struct CountryDetailInteractor {
    repository: Arc<dyn CountryRepository>,
    reset_delay: Duration,
}

impl CountryDetailInteractor {
    /// Create an interactor backed by `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn CountryRepository>, reset_delay: Duration) -> Self {
        Self {
            repository,
            reset_delay,
        }
    }

    fn load_country_detail(&self, country_name: Option<String>) -> Effect<CountryDetailResult> {
        let in_progress = CountryDetailResult::LoadCountryDetail(LoadCountryDetailResult::InProgress);

        let Some(country_name) = country_name else {
            tracing::warn!("Country detail requested without a country name");
            return Effect::chain(vec![
                Effect::Emit(in_progress),
                Effect::Emit(CountryDetailResult::LoadCountryDetail(
                    LoadCountryDetailResult::Failure(CountryError::MissingCountryName),
                )),
            ]);
        };

        let repository = Arc::clone(&self.repository);
        Effect::start_with(
            in_progress,
            Effect::attempt(
                async move { repository.get_country(&country_name).await },
                |country| {
                    Effect::Emit(CountryDetailResult::LoadCountryDetail(
                        LoadCountryDetailResult::Success(country),
                    ))
                },
                |error| {
                    Effect::Emit(CountryDetailResult::LoadCountryDetail(
                        LoadCountryDetailResult::Failure(CountryError::LoadDetail(error)),
                    ))
                },
            ),
        )
    }

    fn add_to_favorite(&self, country_name: String) -> Effect<CountryDetailResult> {
        let repository = Arc::clone(&self.repository);
        let delay = self.reset_delay;
        Effect::start_with(
            CountryDetailResult::AddToFavorite(AddToFavoriteResult::InProgress),
            Effect::attempt(
                async move { repository.add_to_favorite(&country_name).await },
                move |()| {
                    Effect::pair_with_delay(
                        CountryDetailResult::AddToFavorite(AddToFavoriteResult::Success),
                        CountryDetailResult::AddToFavorite(AddToFavoriteResult::Reset),
                        delay,
                    )
                },
                |error| {
                    Effect::Emit(CountryDetailResult::AddToFavorite(AddToFavoriteResult::Failure(
                        CountryError::AddToFavorite(error),
                    )))
                },
            ),
        )
    }

    fn remove_from_favorite(&self, country_name: String) -> Effect<CountryDetailResult> {
        let repository = Arc::clone(&self.repository);
        let delay = self.reset_delay;
        Effect::start_with(
            CountryDetailResult::RemoveFromFavorite(RemoveFromFavoriteResult::InProgress),
            Effect::attempt(
                async move { repository.remove_from_favorite(&country_name).await },
                move |()| {
                    Effect::pair_with_delay(
                        CountryDetailResult::RemoveFromFavorite(RemoveFromFavoriteResult::Success),
                        CountryDetailResult::RemoveFromFavorite(RemoveFromFavoriteResult::Reset),
                        delay,
                    )
                },
                |error| {
                    Effect::Emit(CountryDetailResult::RemoveFromFavorite(
                        RemoveFromFavoriteResult::Failure(CountryError::RemoveFromFavorite(error)),
                    ))
                },
            ),
        )
    }
}

impl Interactor for CountryDetailInteractor {
    type Action = CountryDetailAction;
    type Result = CountryDetailResult;

    fn process(&self, action: CountryDetailAction) -> Effect<CountryDetailResult> {
        match action {
            CountryDetailAction::LoadCountryDetail { country_name } => {
                self.load_country_detail(country_name)
            },
            CountryDetailAction::AddToFavorite { country_name } => self.add_to_favorite(country_name),
            CountryDetailAction::RemoveFromFavorite { country_name } => {
                self.remove_from_favorite(country_name)
            },
        }
    }
}

impl std::fmt::Debug for CountryDetailInteractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountryDetailInteractor")
            .field("reset_delay", &self.reset_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::repository::InMemoryCountryRepository;
    use crate::types::Country;
    use countries_mvi_testing::collect_results;

    const DELAY: Duration = Duration::from_secs(2);

    fn interactor(repository: &InMemoryCountryRepository) -> CountryDetailInteractor {
        CountryDetailInteractor::new(Arc::new(repository.clone()), DELAY)
    }

    fn czechia() -> InMemoryCountryRepository {
        InMemoryCountryRepository::with_countries([Country::named("Czechia")])
    }

    #[tokio::test]
    async fn load_detail_emits_in_progress_then_country() {
        let effect = interactor(&czechia()).process(CountryDetailAction::LoadCountryDetail {
            country_name: Some("Czechia".to_string()),
        });

        assert_eq!(
            collect_results(effect).await,
            vec![
                CountryDetailResult::LoadCountryDetail(LoadCountryDetailResult::InProgress),
                CountryDetailResult::LoadCountryDetail(LoadCountryDetailResult::Success(
                    Country::named("Czechia")
                )),
            ]
        );
    }

    #[tokio::test]
    async fn load_without_name_fails() {
        let effect = interactor(&czechia())
            .process(CountryDetailAction::LoadCountryDetail { country_name: None });

        assert_eq!(
            collect_results(effect).await,
            vec![
                CountryDetailResult::LoadCountryDetail(LoadCountryDetailResult::InProgress),
                CountryDetailResult::LoadCountryDetail(LoadCountryDetailResult::Failure(
                    CountryError::MissingCountryName
                )),
            ]
        );
    }

    #[tokio::test]
    async fn load_unknown_country_fails() {
        let effect = interactor(&czechia()).process(CountryDetailAction::LoadCountryDetail {
            country_name: Some("Atlantis".to_string()),
        });

        let results = collect_results(effect).await;
        assert_eq!(
            results.last(),
            Some(&CountryDetailResult::LoadCountryDetail(LoadCountryDetailResult::Failure(
                CountryError::LoadDetail(RepositoryError::NotFound("Atlantis".to_string()))
            )))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn add_to_favorite_resets_after_delay() {
        let repository = czechia();
        let start = tokio::time::Instant::now();
        let effect = interactor(&repository).process(CountryDetailAction::AddToFavorite {
            country_name: "Czechia".to_string(),
        });

        assert_eq!(
            collect_results(effect).await,
            vec![
                CountryDetailResult::AddToFavorite(AddToFavoriteResult::InProgress),
                CountryDetailResult::AddToFavorite(AddToFavoriteResult::Success),
                CountryDetailResult::AddToFavorite(AddToFavoriteResult::Reset),
            ]
        );
        assert!(start.elapsed() >= DELAY);
        assert_eq!(
            repository.get_country("Czechia").await.map(|c| c.is_favorite),
            Ok(true)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn remove_from_favorite_resets_after_delay() {
        let repository = InMemoryCountryRepository::with_countries([
            Country::named("Czechia").with_favorite(true)
        ]);
        let effect = interactor(&repository).process(CountryDetailAction::RemoveFromFavorite {
            country_name: "Czechia".to_string(),
        });

        assert_eq!(
            collect_results(effect).await,
            vec![
                CountryDetailResult::RemoveFromFavorite(RemoveFromFavoriteResult::InProgress),
                CountryDetailResult::RemoveFromFavorite(RemoveFromFavoriteResult::Success),
                CountryDetailResult::RemoveFromFavorite(RemoveFromFavoriteResult::Reset),
            ]
        );
    }

    #[tokio::test]
    async fn failed_favorite_has_no_reset() {
        let repository = czechia();
        let offline = RepositoryError::Unavailable("offline".to_string());
        repository.set_failure(Some(offline.clone()));

        let effect = interactor(&repository).process(CountryDetailAction::AddToFavorite {
            country_name: "Czechia".to_string(),
        });

        assert_eq!(
            collect_results(effect).await,
            vec![
                CountryDetailResult::AddToFavorite(AddToFavoriteResult::InProgress),
                CountryDetailResult::AddToFavorite(AddToFavoriteResult::Failure(
                    CountryError::AddToFavorite(offline)
                )),
            ]
        );
    }
}
