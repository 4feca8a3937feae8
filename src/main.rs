use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use zerowaste::app::App;
use zerowaste::catalog::{
    calculate_co2_prevented, calculate_meals, priority_score, Catalog, DonationFilter,
};
use zerowaste::config::Config;
use zerowaste::logging;
use zerowaste::roles::Role;
use zerowaste::walkthrough::walkthrough;

#[derive(Parser)]
#[command(name = "zerowaste")]
#[command(about = "Food-rescue dashboards for donors, NGOs and volunteers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Skip sign in and open this dashboard
    #[arg(short, long, value_enum)]
    role: Option<Role>,
}

#[derive(Subcommand)]
enum Commands {
    /// List surplus donations open for claiming
    Donations {
        /// Only show matching donations
        #[arg(short, long, value_enum, default_value = "all")]
        filter: DonationFilter,

        /// Sort by priority score instead of listing order
        #[arg(short = 'p', long)]
        by_priority: bool,
    },

    /// Meals and CO₂ prevented for a weight of rescued food
    Impact {
        /// Pounds of food
        pounds: f64,
    },

    /// Show a role's workflow steps
    Steps {
        #[arg(value_enum)]
        role: Role,
    },

    /// Run a role's happy path headlessly with the simulated backend
    Walkthrough {
        #[arg(value_enum)]
        role: Role,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Save it to the user config file
        #[arg(short, long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();

    // File logging for the dashboard, stderr for subcommands
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    let catalog = Arc::new(Catalog::load(config.catalog_path().as_deref())?);
    tracing::debug!(
        donations = catalog.donations.len(),
        tasks = catalog.tasks.len(),
        "Catalog loaded"
    );

    match cli.command {
        Some(Commands::Donations {
            filter,
            by_priority,
        }) => cmd_donations(&catalog, filter, by_priority),
        Some(Commands::Impact { pounds }) => cmd_impact(pounds)?,
        Some(Commands::Steps { role }) => cmd_steps(role),
        Some(Commands::Walkthrough { role }) => cmd_walkthrough(&config, catalog, role).await?,
        Some(Commands::Config { write }) => cmd_config(&config, write)?,
        None => {
            let start_role = cli.role.or(config.ui.start_role);
            run_tui(config, catalog, start_role, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

async fn run_tui(
    config: Config,
    catalog: Arc<Catalog>,
    start_role: Option<Role>,
    log_file_path: Option<PathBuf>,
) -> Result<()> {
    let mut app = App::new(config, catalog, start_role);
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_donations(catalog: &Catalog, filter: DonationFilter, by_priority: bool) {
    let donations = if by_priority {
        catalog.ranked_donations(filter)
    } else {
        catalog
            .available_donations()
            .filter(|d| filter.matches(d))
            .collect()
    };

    if donations.is_empty() {
        println!("No donations match '{}'", filter.label());
        return;
    }

    println!("Surplus Donations ({}, {})", filter.label(), donations.len());
    println!("{}", "─".repeat(88));

    for d in donations {
        println!(
            "{:<8} {:<26} {:<22} {:>4.1} km  {:>3}%  {:<14} score {}",
            d.id,
            d.food_type,
            d.source,
            d.distance_km,
            d.freshness,
            d.urgency.label(),
            priority_score(d)
        );
    }
}

fn cmd_impact(pounds: f64) -> Result<()> {
    if !pounds.is_finite() || pounds < 0.0 {
        anyhow::bail!("Pounds must be a non-negative number, got {pounds}");
    }
    println!("{pounds} lbs of food rescued");
    println!("  Meals served:   {}", calculate_meals(pounds));
    println!("  CO₂ prevented:  {} lbs", calculate_co2_prevented(pounds));
    Ok(())
}

fn cmd_steps(role: Role) {
    println!("{} workflow", role.label());
    println!("{}", "─".repeat(40));
    for step in role.steps() {
        println!("  {} {} {}", step.id, step.icon.glyph(), step.label);
    }
}

async fn cmd_walkthrough(config: &Config, catalog: Arc<Catalog>, role: Role) -> Result<()> {
    println!("{} walkthrough", role.label());
    println!("{}", "─".repeat(80));
    for event in walkthrough(role, catalog, config.simulation.clone()).await? {
        println!("{event}");
    }
    Ok(())
}

fn cmd_config(config: &Config, write: bool) -> Result<()> {
    print!("{}", config.to_toml()?);
    if write {
        let path = config.save()?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(())
}
