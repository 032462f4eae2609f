//! # Countries
//!
//! The country list and country detail screens, built on the
//! Intent → Action → Result → State pipeline of `countries-mvi-runtime`.
//!
//! Each screen contributes four pieces:
//!
//! - **Intent / Action / Result** enums and a **view state** (`types`)
//! - an **interactor** turning actions into repository calls
//! - a **reducer** folding results into the view state
//! - a constructor for its `ViewModel`
//!
//! ## Example
//!
//! ```no_run
//! use countries::country_list::{country_list_view_model, CountryListIntent};
//! use countries::repository::InMemoryCountryRepository;
//! use countries_mvi_runtime::ViewModelConfig;
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Arc::new(InMemoryCountryRepository::with_default_seed()?);
//! let view_model = country_list_view_model(repository, ViewModelConfig::default());
//!
//! let mut states = view_model.states();
//! view_model.send(CountryListIntent::Initial)?;
//!
//! while let Some(state) = states.next().await {
//!     println!("{} countries", state.countries.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Application configuration
pub mod config;

/// Country detail screen
pub mod country_detail;

/// Country list screen
pub mod country_list;

/// Domain errors
pub mod error;

/// Country storage
pub mod repository;

/// Domain types
pub mod types;

pub use config::CountriesConfig;
pub use error::{CountryError, RepositoryError, SeedError};
pub use repository::{CountryRepository, InMemoryCountryRepository};
pub use types::{Country, FilterType, MessageType};
