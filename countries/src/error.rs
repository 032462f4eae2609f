//! Error types for the countries domain.
//!
//! Errors never leave the pipeline as `Err`: interactors turn them into
//! `Failure` results and reducers store them in view state. They are
//! therefore `Clone` and comparable, like any other state field.

use thiserror::Error;

/// Failures reported by a [`CountryRepository`](crate::repository::CountryRepository)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No country with this name exists
    #[error("Country not found: {0}")]
    NotFound(String),

    /// The backing store could not serve the request
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

/// One "operation failed" kind per action, carrying its cause
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryError {
    /// Loading the country list failed
    #[error("Failed to load countries: {0}")]
    LoadCountries(#[source] RepositoryError),

    /// Loading a country's detail failed
    #[error("Failed to load country detail: {0}")]
    LoadDetail(#[source] RepositoryError),

    /// Adding a favorite failed
    #[error("Failed to add to favorites: {0}")]
    AddToFavorite(#[source] RepositoryError),

    /// Removing a favorite failed
    #[error("Failed to remove from favorites: {0}")]
    RemoveFromFavorite(#[source] RepositoryError),

    /// The detail screen was opened without a country name
    #[error("No country name given")]
    MissingCountryName,
}

/// Failures while loading seed data into a repository
#[derive(Error, Debug)]
pub enum SeedError {
    /// The seed file could not be read
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The seed data is not a JSON array of countries
    #[error("Invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CountryError {
    /// The repository failure behind this error, if any
    #[must_use]
    pub const fn cause(&self) -> Option<&RepositoryError> {
        match self {
            Self::LoadCountries(cause)
            | Self::LoadDetail(cause)
            | Self::AddToFavorite(cause)
            | Self::RemoveFromFavorite(cause) => Some(cause),
            Self::MissingCountryName => None,
        }
    }
}
