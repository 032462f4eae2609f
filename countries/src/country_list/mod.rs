//! Country list screen.
//!
//! Shows every country (or only favorites) and supports pull-to-refresh.
//!
//! | intent | action | results |
//! |---|---|---|
//! | `Initial` (first only) | `LoadCountries { is_refresh: false }` | `InProgress`, `Success` / `Failure` |
//! | `SwipeToRefresh` | `LoadCountries { is_refresh: true }` | `InProgress`, `Success` / `Failure` |
//! | `ChangeFilter(f)` | `ChangeFilter(f)` | `FilterChanged(f)` |

mod interactor;
mod reducer;
mod types;

pub use interactor::CountryListInteractor;
pub use reducer::CountryListReducer;
pub use types::{
    CountryListAction, CountryListIntent, CountryListResult, CountryListViewState,
    LoadCountriesResult,
};

use crate::repository::CountryRepository;
use countries_mvi_runtime::{ViewModel, ViewModelConfig};
use std::sync::Arc;

/// Name used in logs and metric labels
pub const VIEW_MODEL_NAME: &str = "country_list";

/// `ViewModel` of the list screen
pub type CountryListViewModel = ViewModel<CountryListIntent, CountryListReducer, CountryListInteractor>;

/// Start a list pipeline in the idle state
///
/// Named [`VIEW_MODEL_NAME`] unless `config` already carries a name.
#[must_use]
pub fn country_list_view_model(
    repository: Arc<dyn CountryRepository>,
    config: ViewModelConfig,
) -> CountryListViewModel {
    ViewModel::with_config(
        CountryListViewState::idle(),
        CountryListReducer,
        CountryListInteractor::new(repository),
        config.or_name(VIEW_MODEL_NAME),
    )
}
