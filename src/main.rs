mod cli;

use marquee::{
    cache::{FileStore, SnapshotStore},
    config, render,
    service::ListService,
    types::MediaType,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CacheAction, Cli, Commands};

async fn show(
    genre_label: &str,
    media: Option<MediaType>,
    refresh: bool,
    json: bool,
    limit: Option<usize>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override list length from CLI if specified
    if let Some(limit) = limit {
        if limit == 0 {
            return Err(marquee::error::Error::invalid_input("--limit cannot be 0").into());
        }
        config.merge.max_items = limit;
    }

    let genre = config
        .genre(genre_label)
        .cloned()
        .ok_or_else(|| marquee::error::Error::unknown_genre(genre_label))
        .context("run `marquee genres` to list configured genres")?;

    let service = ListService::from_config(&config);
    let snapshot = service.top_lists(&genre, refresh).await?;

    if json {
        println!("{}", render::render_json(&snapshot)?);
    } else {
        print!("{}", render::render_text(&snapshot, media));
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "marquee=trace,reqwest=debug".to_string()
        } else {
            "marquee=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Show {
            genre,
            media,
            refresh,
            json,
            limit,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(show(
                &genre,
                media,
                refresh,
                json,
                limit,
                cli.config.as_deref(),
            ))
        }
        Commands::Genres => list_genres(cli.config.as_deref()),
        Commands::Sources => list_sources(cli.config.as_deref()),
        Commands::Cache { action } => match action {
            CacheAction::Status => cache_status(cli.config.as_deref()),
            CacheAction::Clear => cache_clear(cli.config.as_deref()),
        },
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("marquee {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn list_genres(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Configured genres:\n");
    for genre in &config.genres {
        println!("  {}", genre.label);
        if let Some(id) = genre.tmdb_id {
            println!("    tmdb:   genre id {}", id);
        }
        if let Some(ref key) = genre.imdb {
            println!("    imdb:   {}", key);
        }
        if let Some(ref key) = genre.rotten {
            println!("    rotten: {}", key);
        }
    }

    Ok(())
}

fn list_sources(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let service = ListService::from_config(&config);

    println!("Sources in priority order:\n");
    for name in service.sources() {
        let available = service
            .registry()
            .get(&name)
            .map(|p| p.is_available())
            .unwrap_or(false);
        let status = if available { "✓" } else { "✗" };
        print!("{} {}", status, name);
        if !available {
            print!(" (not configured)");
        }
        println!();
    }

    Ok(())
}

fn cache_status(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let store = FileStore::new(config.cache.path.clone(), config.cache.ttl_hours);

    println!("Cache file: {}", store.path().display());
    match store.load() {
        Ok(Some(snapshot)) => {
            println!("Genre: {}", snapshot.genre);
            println!(
                "Generated: {} ({} minutes ago)",
                snapshot.generated_at.format("%Y-%m-%d %H:%M UTC"),
                snapshot.age().num_minutes()
            );
            println!("Movies: {}", snapshot.lists.movies.len());
            println!("Series: {}", snapshot.lists.series.len());
            println!("TTL: {} hours", config.cache.ttl_hours);
        }
        Ok(None) => println!("No snapshot (missing or expired)."),
        Err(e) => println!("Unreadable snapshot ({}); `marquee cache clear` to reset.", e),
    }

    Ok(())
}

fn cache_clear(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let store = FileStore::new(config.cache.path.clone(), config.cache.ttl_hours);

    store.clear()?;
    println!("Cache cleared.");
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Sources: {}", config.sources.order.join(", "));
            println!("  Genres: {}", config.genres.len());
            println!("  Cache: {} ({}h TTL)", config.cache.path.display(), config.cache.ttl_hours);
            println!(
                "  Merge: max {} items, {} matching",
                config.merge.max_items,
                match config.merge.match_mode {
                    marquee::aggregate::MatchMode::Exact => "exact",
                    marquee::aggregate::MatchMode::Substring => "substring",
                }
            );
            println!(
                "  TMDB key: {}",
                if config.tmdb.api_key.is_empty() {
                    "not set"
                } else {
                    "set"
                }
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Sources: {}", config.sources.order.join(", "));
            println!("  Genres: {}", config.genres.len());
        }
    }

    Ok(())
}
