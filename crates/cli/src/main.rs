use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Instant;

use factor_model::{AlsConfig, AlsTrainer};
use recommender::{Recommender, build_snapshot};
use signal_store::{IdRegistry, SignalSet, SignalWeights, UserId, load_signal_set};

/// ShopRecs - product recommendation engine over fused interaction signals
#[derive(Parser)]
#[command(name = "shop-recs")]
#[command(about = "Collaborative-filtering recommendations from click/order/rating signals", long_about = None)]
struct Cli {
    /// Directory holding clicks.csv, orders.csv, and ratings.csv
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and print recommendations for a user
    Recommend {
        /// User ID to recommend for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Latent factor count
        #[arg(long, default_value = "64")]
        factors: usize,

        /// ALS iteration count
        #[arg(long, default_value = "15")]
        iterations: usize,

        /// Include items the user has already interacted with
        #[arg(long)]
        include_seen: bool,
    },

    /// List the user identifiers known to the signal set
    Users,

    /// Show signal and registry statistics without training
    Stats,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading signals from {}...", cli.data_dir.display());
    let start = Instant::now();
    let signals = load_signal_set(&cli.data_dir)
        .with_context(|| format!("Failed to load signals from {}", cli.data_dir.display()))?;
    println!("{} Loaded signals in {:?}", "✓".green(), start.elapsed());

    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            factors,
            iterations,
            include_seen,
        } => handle_recommend(signals, user_id, limit, factors, iterations, include_seen)?,
        Commands::Users => handle_users(&signals),
        Commands::Stats => handle_stats(&signals),
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    signals: SignalSet,
    user_id: UserId,
    limit: usize,
    factors: usize,
    iterations: usize,
    include_seen: bool,
) -> Result<()> {
    let config = AlsConfig {
        factors,
        iterations,
        ..Default::default()
    };
    let trainer = AlsTrainer::new(config);

    println!("Training factor model ({} factors, {} iterations)...", factors, iterations);
    let start = Instant::now();
    let snapshot = build_snapshot(&signals, &SignalWeights::default(), &trainer)?;
    println!("{} Trained in {:?}", "✓".green(), start.elapsed());

    let engine = if include_seen {
        Recommender::with_filters(snapshot, recommender::FilterChain::new())
    } else {
        Recommender::new(snapshot)
    };

    let result = engine.recommend(user_id, limit);
    if result.fallback {
        println!(
            "{}",
            format!(
                "User {} is unknown; showing most popular items instead.",
                user_id
            )
            .yellow()
        );
    }

    println!(
        "{}",
        format!("Top {} items for user {}:", result.items.len(), user_id)
            .bold()
            .blue()
    );
    for (rank, item) in result.items.iter().enumerate() {
        println!(
            "{}. item {} - score {:.3}",
            (rank + 1).to_string().green(),
            item.item_id,
            item.score
        );
    }
    Ok(())
}

/// Handle the 'users' command
fn handle_users(signals: &SignalSet) {
    let registry = IdRegistry::from_sources(&signals.record_sets());
    println!(
        "{}",
        format!("{} known users:", registry.num_users()).bold().blue()
    );
    for user_id in registry.known_users() {
        println!("  {}", user_id);
    }
}

/// Handle the 'stats' command
fn handle_stats(signals: &SignalSet) {
    let registry = IdRegistry::from_sources(&signals.record_sets());
    let (clicks, orders, ratings) = signals.counts();
    let (num_users, num_items) = registry.shape();

    println!("{}", "Signal statistics:".bold().blue());
    println!("{}Click records:  {}", "• ".green(), clicks);
    println!("{}Order records:  {}", "• ".green(), orders);
    println!("{}Rating records: {}", "• ".green(), ratings);
    println!("{}Users: {}", "• ".cyan(), num_users);
    println!("{}Items: {}", "• ".cyan(), num_items);

    let cells = (num_users as f64) * (num_items as f64);
    if cells > 0.0 {
        let records = (clicks + orders + ratings) as f64;
        println!(
            "{}Matrix density: {:.4}%",
            "• ".cyan(),
            100.0 * records / cells
        );
    }
}
