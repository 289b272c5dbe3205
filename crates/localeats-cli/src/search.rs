//! `search`, `pages` and `jump` command handlers.

use clap::Args;
use localeats_core::{AppConfig, FilterState, HoursFilter, SearchOutcome, SortBy};
use localeats_search::display::{
    annotate_bookmarks, distance_filter_label, hours_label, outcome_message, price_label,
    rating_label, search_header, search_title, AnnotatedRecord,
};
use localeats_search::pagination::offset_for_page;
use localeats_search::{
    required_pages, validate_jump, BridgeClient, FilterStore, LocationResolver, PaginationPlan,
    PriceSelection, QueryBuilder, QueryParams, SearchBackend, SearchOrchestrator, StateFile,
    UpstreamClient,
};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Raw search-page query string, e.g. "term=ramen&price=2"
    #[arg(long)]
    pub query: Option<String>,
    /// What to search for, e.g. "pad thai"
    #[arg(long)]
    pub term: Option<String>,
    /// Search radius in meters
    #[arg(long)]
    pub radius: Option<u32>,
    /// Price tiers ("1", "1,2") or "false" to switch the filter off
    #[arg(long, value_parser = parse_price)]
    pub price: Option<PriceSelection>,
    /// "open_now" to only show open restaurants
    #[arg(long)]
    pub hours: Option<HoursFilter>,
    /// best_match, rating, review_count or distance
    #[arg(long)]
    pub sort_by: Option<SortBy>,
    /// 1-indexed page to open
    #[arg(long, conflicts_with = "jump")]
    pub page: Option<u32>,
    /// Free-text page jump, checked against the first search's page count
    #[arg(long, allow_hyphen_values = true)]
    pub jump: Option<String>,
    /// Call the business-search API directly instead of the proxy (needs YELP_API_KEY)
    #[arg(long)]
    pub direct: bool,
    /// Show bookmark flags for the signed-in user
    #[arg(long)]
    pub signed_in: bool,
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_price(raw: &str) -> Result<PriceSelection, String> {
    PriceSelection::parse(raw)
        .ok_or_else(|| format!("invalid price \"{raw}\": expected 1-4, a list like 1,2, or false"))
}

/// URL params from `--query`, with individual flags taking precedence.
pub(crate) fn query_params(args: &SearchArgs) -> QueryParams {
    let mut params = args
        .query
        .as_deref()
        .map(QueryParams::parse)
        .unwrap_or_default();
    if let Some(term) = &args.term {
        params.term = Some(term.clone());
    }
    if args.radius.is_some() {
        params.radius = args.radius;
    }
    if let Some(price) = &args.price {
        params.price = Some(price.clone());
    }
    if args.hours.is_some() {
        params.hours = args.hours;
    }
    if args.sort_by.is_some() {
        params.sort_by = args.sort_by;
    }
    params
}

/// Runs a search through the proxy, or straight against the upstream with
/// `--direct`, and prints the published outcome.
///
/// # Errors
///
/// Returns an error if a client cannot be built or `--direct` is used without
/// an API key. Search failures are printed, not returned.
pub(crate) async fn run_search(
    config: &AppConfig,
    state: &StateFile,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let mut filters = crate::filters::load_filters(state);
    let mut params = query_params(args);
    if let Some(page) = args.page {
        filters.set_page(page);
        params = params.without_offset();
    }

    if args.direct {
        let api_key = config.require_yelp_api_key()?;
        let upstream = UpstreamClient::new(
            api_key,
            &config.search_endpoint,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )?;
        execute(upstream, config, state, filters, &params, args).await
    } else {
        let bridge = BridgeClient::new(
            &config.proxy_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        execute(bridge, config, state, filters, &params, args).await
    }
}

async fn execute<B: SearchBackend>(
    backend: B,
    config: &AppConfig,
    state: &StateFile,
    filters: FilterState,
    params: &QueryParams,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let orch = SearchOrchestrator::new(
        backend,
        LocationResolver::new(state.clone()),
        FilterStore::new(filters),
        QueryBuilder::new(config.search_endpoint.as_str()),
    );

    orch.search(params).await;
    if let Some(raw) = &args.jump {
        if let Err(e) = orch.jump_to_page(raw).await {
            eprintln!("page jump rejected: {e}");
        }
    }

    let Some(outcome) = orch.store().outcome() else {
        return Ok(());
    };
    let bookmarks = crate::bookmarks::load_bookmarks(state);
    let annotated = annotate_bookmarks(outcome.records(), &bookmarks, args.signed_in);

    if args.json {
        let body = match outcome_message(&outcome) {
            Some(message) => serde_json::json!({ "message": message }),
            None => serde_json::json!({
                "numberOfHits": outcome.total_hits(),
                "results": annotated,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let filters = orch.store().filters();
    if let Some(title) = search_title(params, &filters) {
        let location = orch.resolver().resolve();
        println!("{}", search_header(&title, location.as_ref()));
    }
    println!(
        "distance {} | price {} | rating {} | hours {}",
        distance_filter_label(params.radius.unwrap_or(filters.radius_meters)),
        price_label(filters.price),
        rating_label(filters.min_rating),
        hours_label(params.hours.unwrap_or(filters.hours)),
    );
    println!();

    if let Some(message) = outcome_message(&outcome) {
        println!("{message}");
        return Ok(());
    }

    print_results(&annotated);
    if let (SearchOutcome::Success { total_hits, .. }, Some(plan)) =
        (&outcome, orch.store().plan())
    {
        println!();
        print_plan(*total_hits, plan);
    }
    Ok(())
}

fn print_results(records: &[AnnotatedRecord<'_>]) {
    let header = format!(
        "{:<2}{:<4}{:<32}{:<8}{:<7}{:<14}{:<16}CATEGORY",
        "", "#", "NAME", "RATING", "PRICE", "DISTANCE", "HOURS"
    );
    println!("{header}");
    for annotated in records {
        let record = annotated.record;
        let name = if record.store_name.chars().count() > 30 {
            format!("{}...", record.store_name.chars().take(27).collect::<String>())
        } else {
            record.store_name.clone()
        };
        println!(
            "{:<2}{:<4}{:<32}{:<8}{:<7}{:<14}{:<16}{}",
            if annotated.bookmarked { "*" } else { "" },
            record.search_index + 1,
            name,
            record.rating,
            "$".repeat(record.price_level),
            record.distance_label,
            record.hours_label.as_str(),
            record.category,
        );
    }
}

fn print_plan(total_hits: u32, plan: PaginationPlan) {
    println!("{total_hits} results");
    if plan.shows_controls() {
        println!("page {} of {}", plan.current_page, plan.required_pages);
    }
    if plan.shows_jump_field() {
        println!("jump to any page with --jump <page>");
    }
}

/// Prints the pagination plan for `total` hits.
pub(crate) fn run_pages(total: u32, offset: u32) {
    match PaginationPlan::new(total, offset) {
        Some(plan) => {
            print_plan(total, plan);
            if !plan.shows_controls() {
                println!("single page, no pagination controls");
            }
        }
        None => println!("{}", localeats_search::display::NO_RESULTS_MESSAGE),
    }
}

/// Validates a page jump the way the search page's jump field does.
///
/// # Errors
///
/// Returns the [`localeats_search::JumpError`] for unusable input.
pub(crate) fn run_jump(total: u32, input: &str) -> anyhow::Result<()> {
    let page = validate_jump(required_pages(total), input)?;
    println!("page {page} (offset {})", offset_for_page(page));
    Ok(())
}
