//! Country storage.
//!
//! [`CountryRepository`] is the seam between interactors and data. It is
//! dyn-compatible, so interactors hold an `Arc<dyn CountryRepository>` and
//! move clones of it into the futures they return.
//!
//! [`InMemoryCountryRepository`] keeps countries in memory, optionally
//! seeded from JSON, with artificial latency and failure injection for
//! demos and tests.

use crate::error::{RepositoryError, SeedError};
use crate::types::Country;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Boxed repository future
pub type RepositoryFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Metric counting repository calls, labelled by operation and outcome
pub const REPOSITORY_REQUESTS: &str = "countries_repository_requests_total";

/// Seed data bundled with the crate
pub const DEFAULT_SEED: &str = include_str!("../data/countries.json");

/// Async access to countries and favorites
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the trait can
/// be used as `Arc<dyn CountryRepository>`.
pub trait CountryRepository: Send + Sync {
    /// Look up one country by name
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] if no country has this name.
    fn get_country(&self, name: &str) -> RepositoryFuture<'_, Country>;

    /// All countries, ordered by name
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Unavailable`] if the store cannot be read.
    fn get_countries(&self) -> RepositoryFuture<'_, Vec<Country>>;

    /// Mark a country as favorite
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] if no country has this name.
    fn add_to_favorite(&self, name: &str) -> RepositoryFuture<'_, ()>;

    /// Clear a country's favorite flag
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] if no country has this name.
    fn remove_from_favorite(&self, name: &str) -> RepositoryFuture<'_, ()>;
}

#[derive(Debug, Default)]
struct Store {
    countries: BTreeMap<String, Country>,
    failure: Option<RepositoryError>,
}

/// In-memory [`CountryRepository`]
///
/// Cloning yields another handle to the same data.
///
/// # Example
///
/// ```
/// use countries::repository::{CountryRepository, InMemoryCountryRepository};
/// use countries::types::Country;
///
/// # tokio_test::block_on(async {
/// let repository = InMemoryCountryRepository::with_countries([Country::named("Czechia")]);
/// repository.add_to_favorite("Czechia").await?;
///
/// let czechia = repository.get_country("Czechia").await?;
/// assert!(czechia.is_favorite);
/// # Ok::<(), countries::error::RepositoryError>(())
/// # }).unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryCountryRepository {
    store: Arc<RwLock<Store>>,
    latency: Duration,
}

impl InMemoryCountryRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `countries`
    #[must_use]
    pub fn with_countries(countries: impl IntoIterator<Item = Country>) -> Self {
        let repository = Self::new();
        repository.insert_all(countries);
        repository
    }

    /// Create a repository from a JSON array of countries
    ///
    /// # Errors
    ///
    /// [`SeedError::Parse`] if `json` is not an array of countries.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let countries: Vec<Country> = serde_json::from_str(json)?;
        Ok(Self::with_countries(countries))
    }

    /// Create a repository from the bundled seed data
    ///
    /// # Errors
    ///
    /// [`SeedError::Parse`] if the bundled data is malformed.
    pub fn with_default_seed() -> Result<Self, SeedError> {
        Self::from_json(DEFAULT_SEED)
    }

    /// Create a repository from a JSON seed file
    ///
    /// # Errors
    ///
    /// [`SeedError::Io`] if the file cannot be read, [`SeedError::Parse`]
    /// if its content is not an array of countries.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let repository = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), countries = repository.len(), "Seed file loaded");
        Ok(repository)
    }

    /// Delay every operation by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Insert or replace countries
    pub fn insert_all(&self, countries: impl IntoIterator<Item = Country>) {
        let mut store = self.write();
        for country in countries {
            store.countries.insert(country.name.clone(), country);
        }
    }

    /// Make every following operation fail with `error`, or succeed again with `None`
    pub fn set_failure(&self, error: Option<RepositoryError>) {
        self.write().failure = error;
    }

    /// Number of stored countries
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().countries.len()
    }

    /// Whether no country is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().countries.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn injected_failure(&self) -> Result<(), RepositoryError> {
        self.read().failure.clone().map_or(Ok(()), Err)
    }

    fn set_favorite(&self, name: &str, is_favorite: bool) -> Result<(), RepositoryError> {
        self.injected_failure()?;
        let mut store = self.write();
        let country = store
            .countries
            .get_mut(name)
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))?;
        country.is_favorite = is_favorite;
        Ok(())
    }
}

fn record<T>(operation: &'static str, outcome: &Result<T, RepositoryError>) {
    let outcome = if outcome.is_ok() { "ok" } else { "error" };
    metrics::counter!(REPOSITORY_REQUESTS, "operation" => operation, "outcome" => outcome)
        .increment(1);
}

impl CountryRepository for InMemoryCountryRepository {
    fn get_country(&self, name: &str) -> RepositoryFuture<'_, Country> {
        let name = name.to_string();
        Box::pin(async move {
            self.simulate_latency().await;
            let result = self.injected_failure().and_then(|()| {
                self.read()
                    .countries
                    .get(&name)
                    .cloned()
                    .ok_or(RepositoryError::NotFound(name))
            });
            record("get_country", &result);
            result
        })
    }

    fn get_countries(&self) -> RepositoryFuture<'_, Vec<Country>> {
        Box::pin(async move {
            self.simulate_latency().await;
            let result = self
                .injected_failure()
                .map(|()| self.read().countries.values().cloned().collect());
            record("get_countries", &result);
            result
        })
    }

    fn add_to_favorite(&self, name: &str) -> RepositoryFuture<'_, ()> {
        let name = name.to_string();
        Box::pin(async move {
            self.simulate_latency().await;
            let result = self.set_favorite(&name, true);
            record("add_to_favorite", &result);
            result
        })
    }

    fn remove_from_favorite(&self, name: &str) -> RepositoryFuture<'_, ()> {
        let name = name.to_string();
        Box::pin(async move {
            self.simulate_latency().await;
            let result = self.set_favorite(&name, false);
            record("remove_from_favorite", &result);
            result
        })
    }
}
