// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use database::models::UnitSystem;
use std::path::PathBuf;

mod database;
mod engine;
mod import;
mod report;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

fn parse_system(s: &str) -> std::result::Result<UnitSystem, String> {
    match s {
        "metric" => Ok(UnitSystem::Metric),
        "us" | "us-customary" => Ok(UnitSystem::UsCustomary),
        _ => Err(format!(
            "unknown measurement system {s:?} (expected \"metric\" or \"us\")"
        )),
    }
}

#[derive(Parser, Debug)]
struct Args {
    /// Path to the SQLite database; defaults to a file in the user data dir.
    #[arg(long)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Install the built-in unit catalog (no-op if units already exist).
    SeedUnits,
    /// Import ingredients (with prices and weights) from a JSON file.
    ImportIngredients { path: PathBuf },
    /// Import recipes from a JSON file.
    ImportRecipes { path: PathBuf },
    /// List recipe names.
    List,
    /// Print a recipe scaled to a serving count, with cost and weight.
    Show {
        recipe: String,
        #[arg(long)]
        servings: Option<f64>,
        #[arg(long, value_parser = parse_system, default_value = "metric")]
        system: UnitSystem,
    },
    /// Print the total cost of a recipe scaled to a serving count.
    Cost {
        recipe: String,
        #[arg(long)]
        servings: Option<f64>,
    },
    /// Print the total weight of a recipe scaled to a serving count.
    Weight {
        recipe: String,
        #[arg(long)]
        servings: Option<f64>,
        #[arg(long, value_parser = parse_system, default_value = "metric")]
        system: UnitSystem,
    },
}

/// This is where the database lives on-disk. On Linux it should be like:
/// `~/.local/share/recipe_costing/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().expect("failed to get user home directory");
    let path = dirs.data_dir().join("recipe_costing");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let args = Args::parse();
    let database_path = match args.database {
        Some(path) => path,
        None => data_path()?.join("data.sqlite"),
    };
    let mut conn = database::establish_connection(database_path)?;
    match args.commands {
        Commands::SeedUnits => import::seed_units(&mut conn)?,
        Commands::ImportIngredients { path } => import::import_ingredients(&mut conn, path)?,
        Commands::ImportRecipes { path } => import::import_recipes(&mut conn, path)?,
        Commands::List => report::list_recipes(&mut conn)?,
        Commands::Show {
            recipe,
            servings,
            system,
        } => report::show_recipe(&mut conn, &recipe, servings, system)?,
        Commands::Cost { recipe, servings } => report::show_cost(&mut conn, &recipe, servings)?,
        Commands::Weight {
            recipe,
            servings,
            system,
        } => report::show_weight(&mut conn, &recipe, servings, system)?,
    }
    Ok(())
}
