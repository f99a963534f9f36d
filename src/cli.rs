use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use common::Target;
use query::{FilterAction, FilterStore, Horizon, ModelType, ResourceKind};
use tracing::debug;

pub mod commands;

use crate::client::build_client;
use crate::config::Settings;
use commands::{cities, dashboard, fetch};

#[derive(Parser)]
#[command(name = "hird")]
#[command(about = "Housing Insights & Risk Dashboard client")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    ///
    /// Defaults to ./hird.toml when it exists. Values can be overridden with
    /// HIRD_* environment variables.
    #[arg(short, long, global = true, env = "HIRD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the dashboard API, e.g. http://localhost:8000
    #[arg(long, global = true, env = "HIRD_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Log at debug level (RUST_LOG is used otherwise)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the cities the API has data for
    Cities {
        /// Print the raw JSON payload
        #[arg(long)]
        json: bool,
    },
    /// Fetch a single resource
    ///
    /// Examples:
    ///   hird fetch forecast --city Kelowna --horizon 5Y --model prophet
    ///   hird fetch model-comparison --city Toronto --target rent
    Fetch {
        /// cities, forecast, sentiment, risk, anomalies or model-comparison
        kind: ResourceKind,

        #[command(flatten)]
        filters: FilterArgs,

        /// Market series for forecast and model-comparison
        #[arg(long, default_value_t = Target::Price)]
        target: Target,

        /// Print the raw JSON payload
        #[arg(long)]
        json: bool,
    },
    /// Fetch every dashboard panel for the selected filters
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,

        /// Invalidate every panel afterwards and print the refreshed results
        #[arg(long)]
        predict: bool,

        /// Print the raw JSON payloads
        #[arg(long)]
        json: bool,
    },
}

/// Filter controls of the dashboard. Selector flags accept "Any" to clear
/// the filter.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub city: Option<String>,

    /// 1Y, 2Y, 5Y or 10Y
    #[arg(long)]
    pub horizon: Option<Horizon>,

    /// arima, lstm or prophet
    #[arg(long)]
    pub model: Option<ModelType>,

    #[arg(long)]
    pub property_type: Option<String>,

    #[arg(long)]
    pub beds: Option<String>,

    #[arg(long)]
    pub baths: Option<String>,

    #[arg(long)]
    pub sqft_min: Option<u32>,

    #[arg(long)]
    pub sqft_max: Option<u32>,

    #[arg(long)]
    pub year_built: Option<String>,
}

impl FilterArgs {
    /// Actions equivalent to setting each given control, in form order.
    pub fn actions(&self) -> Vec<FilterAction> {
        let mut actions = Vec::new();
        if let Some(city) = &self.city {
            actions.push(FilterAction::SetCity(city.clone()));
        }
        if let Some(horizon) = self.horizon {
            actions.push(FilterAction::SetHorizon(horizon));
        }
        if let Some(model) = self.model {
            actions.push(FilterAction::SetModelType(model));
        }
        if let Some(property_type) = &self.property_type {
            actions.push(FilterAction::SetPropertyType(property_type.clone()));
        }
        if let Some(beds) = &self.beds {
            actions.push(FilterAction::SetBeds(beds.clone()));
        }
        if let Some(baths) = &self.baths {
            actions.push(FilterAction::SetBaths(baths.clone()));
        }
        match (self.sqft_min, self.sqft_max) {
            (Some(min), Some(max)) => actions.push(FilterAction::SetSqft { min, max }),
            (Some(min), None) => actions.push(FilterAction::SetSqftMin(min)),
            (None, Some(max)) => actions.push(FilterAction::SetSqftMax(max)),
            (None, None) => {}
        }
        if let Some(year_built) = &self.year_built {
            actions.push(FilterAction::SetYearBuilt(year_built.clone()));
        }
        actions
    }

    /// Builds the filter store, starting from the configured default city.
    pub fn into_store(self, default_city: &str) -> FilterStore {
        let mut store = FilterStore::new();
        store.dispatch(FilterAction::SetCity(default_city.to_string()));
        for action in self.actions() {
            store.dispatch(action);
        }
        debug!(revision = store.revision(), state = ?store.state(), "Filters applied");
        store
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref())?.with_api_base_url(self.api_base_url);
        let client = build_client(&settings)?;

        match self.command {
            Commands::Cities { json } => {
                cities(&client, json).await?;
            }
            Commands::Fetch { kind, filters, target, json } => {
                let store = filters.into_store(&settings.default_city);
                fetch(&client, kind, &store.state(), target, json).await?;
            }
            Commands::Dashboard { filters, predict, json } => {
                let store = filters.into_store(&settings.default_city);
                dashboard(&client, &store.state(), predict, json).await?;
            }
        }
        Ok(())
    }
}
