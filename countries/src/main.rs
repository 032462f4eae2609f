//! Terminal demo of the countries screens.
//!
//! Seeds a repository, drives the list and detail pipelines with a scripted
//! sequence of intents and prints every state the screens would render.
//! Ends with a Prometheus snapshot of the pipeline metrics.
//!
//! ```bash
//! RUST_LOG=countries=debug COUNTRIES_LATENCY_MS=200 cargo run --bin countries
//! ```

use anyhow::Context;
use countries::country_detail::{
    CountryDetailIntent, CountryDetailViewState, country_detail_view_model,
};
use countries::country_list::{CountryListIntent, CountryListViewState, country_list_view_model};
use countries::{CountriesConfig, FilterType, InMemoryCountryRepository};
use countries_mvi_runtime::metrics::install_prometheus_recorder;
use countries_mvi_runtime::{StateStream, ViewModelConfig};
use futures::{StreamExt, stream};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const STEP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("countries=debug,countries_mvi_runtime=debug")),
        )
        .init();

    let metrics = install_prometheus_recorder()?;
    let config = CountriesConfig::from_env()?;
    let view_model_config = ViewModelConfig::from_env()?;

    let repository = match &config.seed_file {
        Some(path) => InMemoryCountryRepository::from_seed_file(path).await?,
        None => InMemoryCountryRepository::with_default_seed()?,
    }
    .with_latency(config.latency);
    let repository = Arc::new(repository);

    println!("=== Countries ===\n");

    // List screen: the second Initial (a re-attached UI) is filtered out
    let list = country_list_view_model(repository.clone(), view_model_config.clone());
    let mut list_states = list.states();
    list.process_intents(stream::iter([CountryListIntent::Initial, CountryListIntent::Initial]))?;
    let loaded = wait_until(&mut list_states, render_list, |s| !s.countries.is_empty()).await?;

    // Detail screen for the first country
    let name = loaded
        .countries
        .first()
        .map(|c| c.name.clone())
        .context("repository returned no countries")?;
    println!("\n--- Detail: {name} ---");

    let detail = country_detail_view_model(repository.clone(), &config, view_model_config.clone());
    let mut detail_states = detail.states();
    detail.send(CountryDetailIntent::Initial {
        country_name: Some(name.clone()),
    })?;
    wait_until(&mut detail_states, render_detail, |s| s.country.is_some()).await?;

    detail.send(CountryDetailIntent::AddToFavorite(name.clone()))?;
    wait_until(&mut detail_states, render_detail, |s| s.message.is_some()).await?;
    wait_until(&mut detail_states, render_detail, |s| s.message.is_none()).await?;

    // Back on the list: refresh and show favorites only
    println!("\n--- Favorites ---");
    list.send(CountryListIntent::ChangeFilter(FilterType::Favorite))?;
    list.send(CountryListIntent::SwipeToRefresh)?;
    let favorites = wait_until(&mut list_states, render_list, |s| {
        s.filter_type == FilterType::Favorite && !s.is_refreshing && s.visible_countries().next().is_some()
    })
    .await?;
    for country in favorites.visible_countries() {
        println!("  {country}");
    }

    if let Err(error) = detail.shutdown().await {
        tracing::warn!(%error, "Detail screen did not drain");
    }
    if let Err(error) = list.shutdown().await {
        tracing::warn!(%error, "List screen did not drain");
    }

    println!("\n=== Metrics ===\n");
    println!("{}", metrics.render());
    Ok(())
}

/// Render states until one matches `done`
async fn wait_until<S>(
    states: &mut StateStream<S>,
    render: fn(&S),
    done: impl Fn(&S) -> bool,
) -> anyhow::Result<S> {
    tokio::time::timeout(STEP_TIMEOUT, async {
        while let Some(state) = states.next().await {
            render(&state);
            if done(&state) {
                return Ok(state);
            }
        }
        anyhow::bail!("state stream ended")
    })
    .await
    .context("timed out waiting for state")?
}

fn render_list(state: &CountryListViewState) {
    let status = if state.is_loading {
        "loading"
    } else if state.is_refreshing {
        "refreshing"
    } else {
        "idle"
    };
    print!(
        "[list] {status:<10} filter={:?} countries={}",
        state.filter_type,
        state.visible_countries().count()
    );
    if let Some(error) = &state.error {
        print!(" error=\"{error}\"");
    }
    println!();
}

fn render_detail(state: &CountryDetailViewState) {
    let status = if state.is_loading { "loading" } else { "idle" };
    let country = state
        .country
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    print!("[detail] {status:<10} {country}");
    if let Some(message) = state.message {
        print!(" message=\"{message}\"");
    }
    if let Some(error) = &state.error {
        print!(" error=\"{error}\"");
    }
    println!();
}
