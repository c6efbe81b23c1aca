use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use kgs_api::{Api, ArchivesQuery, Exchange, HttpClient, Reply};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

mod config;
use config::Config;

#[derive(Parser, Debug)]
#[command(about = "Fetch game archives, rankings and tournaments from MetaKGS")]
struct Args {
    /// Path to config json file
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(PathBuf),
        default_value = "kgs.json"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Archive page for a user
    Archives {
        user: String,
        #[arg(long)]
        year: Option<u32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
        /// Also print this many older pages
        #[arg(long, default_value_t = 0)]
        older: usize,
    },
    /// Games on a user's archive page
    Games {
        user: String,
        #[arg(long)]
        year: Option<u32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
    /// Rank recorded in a user's most recent game
    Rank { user: String },
    /// Top 100 players
    Top100,
    /// Tournaments, optionally for one year
    Tournaments {
        #[arg(long)]
        year: Option<u32>,
    },
    /// A single tournament
    Tournament { id: u64 },
    /// Rounds of a tournament
    Rounds { id: u64 },
    /// Entrants of a tournament
    Entrants { id: u64 },
    /// Games in a tournament round
    Round { id: u64, round: u32 },
    /// Byes in a tournament round
    Byes { id: u64, round: u32 },
}

fn print_json<T: Serialize + ?Sized>(content: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(content)?);
    Ok(())
}

fn no_content(exchange: &Exchange) -> anyhow::Error {
    match &exchange.response {
        Ok(response) => {
            error!(url = %exchange.request.url, status = %response.status, "No content");
            anyhow!("{} returned {}", exchange.request.url, response.status)
        }
        Err(e) => {
            error!(url = %exchange.request.url, error = %e, "Request failed");
            anyhow!("{} failed: {}", exchange.request.url, e)
        }
    }
}

fn emit<C: Serialize>(reply: Reply<C>) -> Result<()> {
    match reply.content {
        Some(content) => print_json(&content),
        None => Err(no_content(&reply.exchange)),
    }
}

#[instrument(skip(api))]
async fn archives(api: &Api<HttpClient>, query: ArchivesQuery, older: usize) -> Result<()> {
    let mut reply = api.archives(&query).await?;
    for _ in 0..=older {
        let Some(page) = reply.content else {
            return Err(no_content(&reply.exchange));
        };
        print_json(&*page)?;
        let prev = match page.as_paginated() {
            Some(archives) => archives.prev().await,
            None => None,
        };
        match prev {
            Some(prev) => reply = prev,
            None => {
                info!("No older pages");
                break;
            }
        }
    }
    Ok(())
}

async fn run(api: Api<HttpClient>, command: Command) -> Result<()> {
    match command {
        Command::Archives {
            user,
            year,
            month,
            older,
        } => archives(&api, ArchivesQuery { user, year, month }, older).await,
        Command::Games { user, year, month } => {
            emit(api.games(&ArchivesQuery { user, year, month }).await?)
        }
        Command::Rank { user } => {
            let latest = api.latest_rank(&user).await?;
            match latest.rank {
                Some(rank) => println!("{rank}"),
                None => {
                    warn!(
                        requests = latest.requests,
                        status = ?latest.exchange.status(),
                        "Rank unknown"
                    );
                    println!("unknown");
                }
            }
            Ok(())
        }
        Command::Top100 => emit(api.top100_players().await),
        Command::Tournaments { year } => emit(api.tournament_list(year).await?),
        Command::Tournament { id } => emit(api.tournament(id).await?.map(|t| t.into_inner())),
        Command::Rounds { id } => emit(api.tournament_rounds(id).await?),
        Command::Entrants { id } => emit(api.tournament_entrant_list(id).await?),
        Command::Round { id, round } => emit(api.tournament_games(id, round).await?),
        Command::Byes { id, round } => emit(api.tournament_byes(id, round).await?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    info!(endpoint = %config.endpoint, "Using API endpoint");

    let api = Api::with_fetcher(config.client()?);
    run(api, args.command).await
}
