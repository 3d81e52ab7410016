// ABOUTME: CLI for browsing movies through the BFF: popular, search, details, favorites and health.
// ABOUTME: Resolves configuration from flags and MARQUEE_* environment variables, logs to stderr via tracing.

mod browse;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use marquee_listing::{
    DetailsLoader, DetailsState, FavoritesStore, Feed, FileStorage, ImageUrls, Query,
    SortCriterion, DEFAULT_IMAGE_BASE,
};
use marquee_proxy::{Client, DEFAULT_BASE_URL};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Browse popular movies, search titles and keep a list of favorites.
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "Browse movies from the command line", long_about = None)]
struct Args {
    /// BFF base URL
    #[arg(long, env = "MARQUEE_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Favorites file (default: <data dir>/marquee/favorites.json)
    #[arg(long, env = "MARQUEE_FAVORITES", global = true)]
    favorites: Option<PathBuf>,

    /// Image CDN base used for poster links
    #[arg(long, env = "MARQUEE_IMAGE_URL", default_value = DEFAULT_IMAGE_BASE, global = true)]
    image_url: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", env = "MARQUEE_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List popular movies
    Popular {
        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search movies by title
    Search {
        query: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one movie
    Details {
        id: i64,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage favorites
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Check that the BFF is up
    Health,
    /// Interactive browsing on stdin
    Browse,
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List favorites
    List {
        /// title-asc, title-desc, rating-asc, rating-desc, date-asc or date-desc
        #[arg(long, default_value = "title-asc")]
        sort: SortCriterion,
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a movie by id
    Add { id: i64 },
    /// Remove a movie by id
    Remove { id: i64 },
    /// Add the movie if absent, remove it otherwise
    Toggle { id: i64 },
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn favorites_path(args: &Args) -> PathBuf {
    args.favorites.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("marquee")
            .join("favorites.json")
    })
}

fn open_favorites(args: &Args) -> FavoritesStore<FileStorage> {
    let path = favorites_path(args);
    debug!(path = %path.display(), "opening favorites");
    FavoritesStore::open(FileStorage::new(path))
}

fn build_client(args: &Args) -> Result<Client> {
    Client::builder()
        .base_url(&args.api_url)
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
        .context("invalid API configuration")
}

async fn list(args: &Args, query: Query, pages: u32, json: bool) -> Result<()> {
    let client = build_client(args)?;
    let mut feed = Feed::new();
    feed.load(&client, query).await;
    for _ in 1..pages {
        if !feed.controller_mut().fetch_next_page(&client).await {
            break;
        }
        if feed.state().error.is_some() {
            break;
        }
    }

    let state = feed.state();
    if let Some(error) = &state.error {
        if state.items.is_empty() {
            bail!("{}", error);
        }
        eprintln!("warning: {}", error);
    }
    if json {
        println!("{}", render::listing_json(state)?);
    } else {
        let favorites = open_favorites(args);
        println!("{}", render::listing(state, |id| favorites.is_favorite(id)));
    }
    Ok(())
}

async fn details(args: &Args, id: i64, json: bool) -> Result<()> {
    let client = build_client(args)?;
    let mut loader = DetailsLoader::new();
    match loader.load(&client, id).await {
        DetailsState::Loaded(details) => {
            if json {
                println!("{}", serde_json::to_string_pretty(details)?);
            } else {
                let favorites = open_favorites(args);
                let images = ImageUrls::new(&args.image_url);
                println!(
                    "{}",
                    render::details(details, &images, favorites.is_favorite(id))
                );
            }
            Ok(())
        }
        DetailsState::Failed { error, .. } if error.is_not_found() => {
            bail!("movie {} not found", id)
        }
        DetailsState::Failed { error, .. } => bail!("{}", error),
        DetailsState::Idle | DetailsState::Loading { .. } => bail!("details request did not settle"),
    }
}

async fn favorites(args: &Args, command: &FavoritesCommand) -> Result<()> {
    let mut store = open_favorites(args);
    match command {
        FavoritesCommand::List { sort, json } => {
            let items = store.list_sorted(*sort);
            if *json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("No favorites yet.");
            } else {
                for line in render::item_lines(&items, 1, |_| false) {
                    println!("{}", line);
                }
            }
        }
        FavoritesCommand::Add { id } => {
            if let Some(item) = store.get(*id) {
                println!("\"{}\" is already in favorites", item.title);
                return Ok(());
            }
            let item = fetch_item(args, *id).await?;
            store.add(item);
        }
        FavoritesCommand::Remove { id } => {
            if !store.remove(*id) {
                bail!("movie {} is not in favorites", id);
            }
        }
        FavoritesCommand::Toggle { id } => {
            let item = match store.get(*id) {
                Some(item) => item.clone(),
                None => fetch_item(args, *id).await?,
            };
            store.toggle(item);
        }
    }
    for notice in store.drain_notifications() {
        println!("{}", notice);
    }
    Ok(())
}

async fn fetch_item(args: &Args, id: i64) -> Result<marquee_listing::Item> {
    let client = build_client(args)?;
    let mut loader = DetailsLoader::new();
    loader.load(&client, id).await;
    match loader.details() {
        Some(details) => Ok(details.to_item()),
        None => match loader.error() {
            Some(error) if error.is_not_found() => bail!("movie {} not found", id),
            Some(error) => bail!("{}", error),
            None => bail!("details request did not settle"),
        },
    }
}

async fn health(args: &Args) -> Result<()> {
    let client = build_client(args)?;
    let health = client.health().await.context("health check failed")?;
    println!("{}: {}", health.status, health.message);
    if !health.is_ok() {
        bail!("server reported status {}", health.status);
    }
    Ok(())
}

async fn browse(args: &Args) -> Result<()> {
    let client = build_client(args)?;
    let mut store = open_favorites(args);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    browse::run(&client, &mut store, stdin).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    info!(api = %args.api_url, "marquee starting");

    match &args.command {
        Command::Popular { pages, json } => list(&args, Query::Popular, *pages, *json).await,
        Command::Search { query, pages, json } => {
            let query = Query::search(query)?;
            list(&args, query, *pages, *json).await
        }
        Command::Details { id, json } => details(&args, *id, *json).await,
        Command::Favorites(command) => favorites(&args, command).await,
        Command::Health => health(&args).await,
        Command::Browse => browse(&args).await,
    }
}
