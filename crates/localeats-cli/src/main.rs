mod bookmarks;
mod filters;
mod location;
mod search;

use clap::{Parser, Subcommand};
use localeats_search::StateFile;
use tracing_subscriber::EnvFilter;

use crate::{
    bookmarks::BookmarkCommands, filters::FilterCommands, location::LocationCommands,
    search::SearchArgs,
};

#[derive(Debug, Parser)]
#[command(name = "localeats-cli")]
#[command(about = "Search nearby restaurants from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a restaurant search around the saved location
    Search(SearchArgs),
    /// Show the pagination plan for a hit count
    Pages {
        /// Total upstream hits
        #[arg(long)]
        total: u32,
        /// Offset the search started at
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Validate a page-jump entry against a hit count
    Jump {
        /// Total upstream hits
        #[arg(long)]
        total: u32,
        /// What the user typed, e.g. "3" or "-2.5"
        #[arg(allow_hyphen_values = true)]
        input: String,
    },
    /// Manage the saved search location
    Location {
        #[command(subcommand)]
        command: LocationCommands,
    },
    /// Manage saved search filters
    Filters {
        #[command(subcommand)]
        command: FilterCommands,
    },
    /// Manage bookmarked restaurants
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = localeats_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let state = StateFile::new(&config.state_path);

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&config, &state, &args).await?,
        Some(Commands::Pages { total, offset }) => search::run_pages(total, offset),
        Some(Commands::Jump { total, input }) => search::run_jump(total, &input)?,
        Some(Commands::Location { command }) => {
            location::run_location(&config, state, command).await?;
        }
        Some(Commands::Filters { command }) => filters::run_filters(&state, command)?,
        Some(Commands::Bookmarks { command }) => bookmarks::run_bookmarks(&state, command)?,
        None => println!("localeats-cli ready; try `localeats-cli search --term ramen`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
