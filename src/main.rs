use std::env;
use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ha_badge::sensors::Client;
use ha_badge::{render, Badge, Cadence, Config, DisplayState, Job, RenderOptions, ThresholdConfig};

const FAST_REFRESH: Duration = Duration::from_secs(10);

fn usage(program: &str) {
    eprintln!("Usage: {program} [SUBCOMMAND]");
    eprintln!("Subcommands:");
    eprintln!("    run                   send readings to the badge every minute (default)");
    eprintln!("    preview <out.pbm>     fetch and render once, write the bitmap as PBM");
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_env().context("invalid configuration")?;
    for kind in config.missing_entities() {
        tracing::warn!(%kind, key = kind.entity_key(), "no entity configured, showing no data");
    }
    Ok(config)
}

fn run() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = Client::new(&config).context("failed to build HTTP client")?;
    let badge = Badge::open(&config.badge_port, config.baud_rate, config.ack_timeout)
        .with_context(|| format!("could not connect to badge at {}", config.badge_port))?;

    let cadence = if config.fast_refresh {
        Cadence::Every(FAST_REFRESH)
    } else {
        Cadence::EveryMinute
    };
    let options = RenderOptions {
        debug_borders: config.debug_borders,
    };

    tracing::info!(ha_url = %config.ha_url, port = %config.badge_port, "sensor monitor started");
    Job::new("badge", cadence, client, badge, ThresholdConfig::default(), options).run()
}

fn preview(path: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = Client::new(&config).context("failed to build HTTP client")?;

    let now = Local::now().naive_local();
    let state = DisplayState::collect(&client, &ThresholdConfig::default(), now);
    tracing::info!("{state}");
    let options = RenderOptions {
        debug_borders: config.debug_borders,
    };
    let bitmap = render(&state, &options);
    fs::write(path, bitmap.to_pbm()).with_context(|| format!("failed to write {path}"))?;
    tracing::info!(path, "preview written");
    Ok(())
}

fn entry() -> Result<(), ()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "ha-badge".to_string());

    let result = match args.next().as_deref() {
        None | Some("run") => run(),
        Some("preview") => {
            let path = args.next().ok_or_else(|| {
                usage(&program);
                eprintln!("ERROR: 'preview' requires an output path");
            })?;
            preview(&path)
        }
        Some(subcommand) => {
            usage(&program);
            eprintln!("ERROR: unknown subcommand {subcommand}");
            return Err(());
        }
    };

    result.map_err(|err| {
        tracing::error!("{err:#}");
    })
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ha_badge=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match entry() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
