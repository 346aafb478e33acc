mod advice;
mod campaign;
mod cli;
mod config;
mod dashboard;
mod error;
mod generation;
mod storage;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use advice::{AdviceRequest, AdviceSettings, Advisor};
use campaign::{CURRENCIES, CampaignStore};
use cli::{Cli, Command};
use config::SaleTargetConfig;
use dashboard::Dashboard;
use error::SaleTargetError;
use generation::AnthropicClient;
use storage::{FileStore, KeyValueStore, MemoryStore};
use ui::{AdviceSpinner, Screen, TerminalConfirm};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SaleTargetConfig::load()?;

    if cli.ephemeral {
        return run(cli.command, &config, MemoryStore::new()).await;
    }

    let dir = config.resolve_data_dir(cli.data_dir.as_deref());
    run_in(cli.command, &config, dir).await
}

/// Runs `command` against the data directory, or in memory when there is none.
async fn run_in(
    command: Option<Command>,
    config: &SaleTargetConfig,
    dir: Result<PathBuf, SaleTargetError>,
) -> Result<()> {
    match dir {
        Ok(dir) => {
            let store = FileStore::open(dir);
            debug!(dir = %store.dir().display(), "using data directory");
            run(command, config, store).await
        }
        Err(e) => {
            warn!(error = %e, "progress will be kept in memory only");
            run(command, config, MemoryStore::new()).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "saletarget=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_advisor(config: &SaleTargetConfig) -> Result<Advisor<AnthropicClient>, SaleTargetError> {
    let client = if config.has_api_key() {
        Some(AnthropicClient::with_base_url(
            config.api_key.clone(),
            config.base_url.clone(),
            config.advice_timeout(),
        )?)
    } else {
        info!("no API key configured, advice will use the fallback text");
        None
    };
    Ok(Advisor::new(client, AdviceSettings::from(config)))
}

fn print_screen<S: KeyValueStore>(store: &CampaignStore<S>, show_config_panel: bool) {
    let screen = Screen {
        state: store.state(),
        progress: store.progress(),
        advice: "",
        is_loading_advice: false,
        show_config_panel,
    };
    println!("{}", screen.render());
}

async fn run<S>(command: Option<Command>, config: &SaleTargetConfig, storage: S) -> Result<()>
where
    S: KeyValueStore + Send + 'static,
{
    let mut store = CampaignStore::open(storage);

    match command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => {
            let advisor = build_advisor(config)?;
            let mut dashboard = Dashboard::new(store, advisor, Handle::current());
            tokio::task::spawn_blocking(move || dashboard.run()).await??;
        }
        Command::Status => print_screen(&store, false),
        Command::Sale { count } => {
            for _ in 0..count {
                store.record_sale();
            }
            print_screen(&store, false);
        }
        Command::Undo => {
            store.undo_sale();
            print_screen(&store, false);
        }
        Command::Reset => {
            if store.reset_progress(&mut TerminalConfirm) {
                println!("Progress reset.");
            } else {
                println!("Reset cancelled, progress kept.");
            }
        }
        Command::Set {
            target,
            unit,
            currency,
        } => {
            if let Some(target) = target {
                store.set_target_amount(target);
            }
            if let Some(unit) = unit {
                store.set_unit_value(unit);
            }
            if let Some(currency) = currency {
                store.set_currency_symbol(&currency);
            }
            print_screen(&store, true);
        }
        Command::Advice => {
            let advisor = build_advisor(config)?;
            let req = AdviceRequest::from_state(store.state());
            let spinner = AdviceSpinner::start();
            let text = advisor
                .request_advice(req.target, req.current, req.unit_value, &req.currency_symbol)
                .await;
            spinner.finish(&text);
        }
        Command::Currencies => {
            for c in CURRENCIES {
                println!("{:<3} {:<4} {}", c.symbol, c.code, c.name);
            }
        }
    }

    Ok(())
}
