//! `filters` command handlers. Saved filters seed every `search`.

use clap::Subcommand;
use localeats_core::{FilterState, HoursFilter, MinRating, PriceLevel, SortBy};
use localeats_search::display::{distance_filter_label, hours_label, price_label, rating_label};
use localeats_search::location::FILTERS_KEY;
use localeats_search::StateFile;

#[derive(Debug, Subcommand)]
pub enum FilterCommands {
    /// Show the saved filters
    Show,
    /// Change saved filters; unspecified filters keep their value
    Set {
        /// Search radius in meters
        #[arg(long)]
        radius: Option<u32>,
        /// "any" or a tier from 1 to 4
        #[arg(long)]
        price: Option<PriceLevel>,
        /// "any" or a minimum star rating from 1 to 5
        #[arg(long)]
        rating: Option<MinRating>,
        /// "any" or "open_now"
        #[arg(long)]
        hours: Option<HoursFilter>,
        /// best_match, rating, review_count or distance
        #[arg(long)]
        sort_by: Option<SortBy>,
        /// Default search term; pass an empty string to clear it
        #[arg(long)]
        term: Option<String>,
    },
    /// Restore default filters
    Reset,
}

/// Saved filters, or the defaults when none are saved or they can't be read.
pub(crate) fn load_filters(state: &StateFile) -> FilterState {
    match state.read_key::<FilterState>(FILTERS_KEY) {
        Ok(filters) => filters.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved filters, using defaults");
            FilterState::default()
        }
    }
}

pub(crate) fn run_filters(state: &StateFile, command: FilterCommands) -> anyhow::Result<()> {
    match command {
        FilterCommands::Show => print_filters(&load_filters(state)),
        FilterCommands::Set {
            radius,
            price,
            rating,
            hours,
            sort_by,
            term,
        } => {
            let mut filters = load_filters(state);
            if let Some(radius) = radius {
                filters.radius_meters = radius;
            }
            if let Some(price) = price {
                filters.price = price;
            }
            if let Some(rating) = rating {
                filters.min_rating = rating;
            }
            if let Some(hours) = hours {
                filters.hours = hours;
            }
            if let Some(sort_by) = sort_by {
                filters.sort_by = sort_by;
            }
            if let Some(term) = term {
                let term = term.trim();
                filters.term = (!term.is_empty()).then(|| term.to_owned());
            }
            state.write_key(FILTERS_KEY, &filters)?;
            print_filters(&filters);
        }
        FilterCommands::Reset => {
            state.remove_key(FILTERS_KEY)?;
            println!("filters reset");
        }
    }
    Ok(())
}

fn print_filters(filters: &FilterState) {
    println!("distance  {}", distance_filter_label(filters.radius_meters));
    println!("price     {}", price_label(filters.price));
    println!("rating    {}", rating_label(filters.min_rating));
    println!("hours     {}", hours_label(filters.hours));
    println!("sort by   {}", filters.sort_by.as_param());
    println!("term      {}", filters.term.as_deref().unwrap_or("-"));
    let link = filters
        .to_query_params()
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    println!("link      ?{link}");
}
