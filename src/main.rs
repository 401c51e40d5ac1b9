//! Travel planner CLI
//!
//! Drives the page controller against a running backend and prints the
//! rendered result fragments.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use url::Url;

use travel_planner::config::PlannerConfig;
use travel_planner::models::ApiReply;
use travel_planner::page::ids;
use travel_planner::{
    Container, Controller, HttpTravelApi, Page, PlannerError, RequestState, View, logging,
};

/// Page the transport form lives on, relative to the backend root
const TRANSPORT_PAGE: &str = "modes.html";

#[derive(Parser)]
#[command(name = "travel-planner")]
#[command(author, version, about = "Travel planning page controller", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search transport options to a destination
    Transport {
        /// Travel mode (train, aeroplane, bus, mixed)
        #[arg(short, long, default_value = "mixed")]
        mode: String,

        /// Destination
        #[arg(short, long)]
        location: String,

        /// Travel date, e.g. 2024-01-01
        #[arg(short, long, default_value = "")]
        date: String,
    },

    /// Generate a day-by-day itinerary
    Itinerary {
        /// Destination
        #[arg(short, long)]
        location: String,

        /// Number of days
        #[arg(short, long, default_value = "3")]
        days: String,
    },

    /// Show where the search bar would redirect to
    Search {
        /// Search text
        query: String,
    },

    /// List known destinations
    Locations,

    /// Check backend health
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            match PlannerError::find_in(&e) {
                Some(planner) => eprintln!("{}\n  {e:#}", planner.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = PlannerConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose);
    debug!("Using backend at {}", config.api.base_url);

    let api = Arc::new(HttpTravelApi::new(&config.api)?);
    let view = View::from_config(&config.display)?;

    match cli.command {
        Commands::Transport {
            mode,
            location,
            date,
        } => {
            require_location(&location)?;
            let url = page_url(&api, TRANSPORT_PAGE)?;
            let mut controller = Controller::new(view, Page::transport(url), Arc::clone(&api));
            controller.load();

            let index = controller
                .page()
                .mode_options()
                .iter()
                .position(|option| option.mode == mode);
            match index {
                Some(index) => {
                    controller.click_mode(index);
                }
                None => {
                    info!("Mode '{}' is not offered on the page, sending it as typed", mode);
                    controller.page_mut().set_field(ids::MODE, mode);
                }
            }
            controller.page_mut().set_field(ids::LOCATION, location);
            controller.page_mut().set_field(ids::DATE, date);

            controller.submit_travel_form();
            controller.settle().await;
            print_container(&controller, Container::Results);
            ensure_settled(controller.view().transport_state())
        }
        Commands::Itinerary { location, days } => {
            require_location(&location)?;
            let href = format!(
                "{}?location={}",
                config.display.itinerary_page,
                urlencoding::encode(&location)
            );
            let url = page_url(&api, &href)?;
            let mut controller = Controller::new(view, Page::itinerary(url), Arc::clone(&api));
            controller.load();
            controller.page_mut().set_field(ids::DURATION, days);

            controller.submit_itinerary_form();
            controller.settle().await;
            print_container(&controller, Container::ItineraryResults);
            ensure_settled(controller.view().itinerary_state())
        }
        Commands::Search { query } => {
            let url = page_url(&api, TRANSPORT_PAGE)?;
            let mut controller = Controller::new(view, Page::transport(url), Arc::clone(&api));
            controller.page_mut().set_field(ids::SEARCH_INPUT, query);
            controller.click_search();

            if controller.page().navigations().is_empty() {
                return Err(PlannerError::validation("search text is empty").into());
            }
            println!("{}", controller.page().url());
            Ok(())
        }
        Commands::Locations => match api.locations().await? {
            ApiReply::Success(locations) => {
                for location in &locations {
                    println!("{location}");
                }
                info!("Listed {} locations", locations.len());
                Ok(())
            }
            ApiReply::Failure(message) => bail!("Backend error: {message}"),
        },
        Commands::Health => {
            let health = api.health().await?;
            println!("{} ({})", health.status, health.timestamp);
            if !health.is_healthy() {
                bail!("Backend reports status '{}'", health.status);
            }
            Ok(())
        }
    }
}

fn require_location(location: &str) -> Result<()> {
    if location.trim().is_empty() {
        return Err(PlannerError::validation("location must not be empty").into());
    }
    Ok(())
}

fn page_url(api: &HttpTravelApi, href: &str) -> Result<Url> {
    api.base_url()
        .join(href)
        .with_context(|| format!("Invalid page path '{href}'"))
}

fn print_container<A: travel_planner::TravelApi + 'static>(
    controller: &Controller<A>,
    container: Container,
) {
    if let Some(html) = controller.page().container(container) {
        println!("{html}");
    }
}

fn ensure_settled(state: RequestState) -> Result<()> {
    match state {
        RequestState::Failed(id) => bail!("Request {id} failed, see the log for details"),
        _ => Ok(()),
    }
}
