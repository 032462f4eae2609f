//! Country detail screen.
//!
//! Shows one country and lets the user toggle its favorite flag. A
//! successful toggle shows a message that a delayed reset hides again.

mod interactor;
mod reducer;
mod types;

pub use interactor::CountryDetailInteractor;
pub use reducer::CountryDetailReducer;
pub use types::{
    AddToFavoriteResult, CountryDetailAction, CountryDetailIntent, CountryDetailResult,
    CountryDetailViewState, LoadCountryDetailResult, RemoveFromFavoriteResult,
};

use crate::config::CountriesConfig;
use crate::repository::CountryRepository;
use countries_mvi_runtime::{ViewModel, ViewModelConfig};
use std::sync::Arc;

/// Name used in logs and metric labels
pub const VIEW_MODEL_NAME: &str = "country_detail";

/// `ViewModel` of the detail screen
pub type CountryDetailViewModel =
    ViewModel<CountryDetailIntent, CountryDetailReducer, CountryDetailInteractor>;

/// Start a detail pipeline in the idle state
///
/// Named [`VIEW_MODEL_NAME`] unless `view_model_config` already carries a name.
#[must_use]
pub fn country_detail_view_model(
    repository: Arc<dyn CountryRepository>,
    config: &CountriesConfig,
    view_model_config: ViewModelConfig,
) -> CountryDetailViewModel {
    ViewModel::with_config(
        CountryDetailViewState::idle(),
        CountryDetailReducer,
        CountryDetailInteractor::new(repository, config.reset_delay),
        view_model_config.or_name(VIEW_MODEL_NAME),
    )
}
