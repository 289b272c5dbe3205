use localeats_core::{HoursFilter, MinRating, PriceLevel, SortBy};
use localeats_search::PriceSelection;

use super::*;
use crate::search::query_params;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["localeats-cli"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("expected valid cli args")
}

fn search_args(args: &[&str]) -> SearchArgs {
    let mut argv = vec!["search"];
    argv.extend_from_slice(args);
    match parse(&argv).command {
        Some(Commands::Search(args)) => args,
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn no_command_is_none() {
    assert!(parse(&[]).command.is_none());
}

#[test]
fn parses_search_flags() {
    let args = search_args(&[
        "--term",
        "pad thai",
        "--radius",
        "5000",
        "--price",
        "1,2",
        "--hours",
        "open_now",
        "--sort-by",
        "rating",
    ]);
    assert_eq!(args.term.as_deref(), Some("pad thai"));
    assert_eq!(args.radius, Some(5000));
    assert_eq!(args.price, Some(PriceSelection::Tiers(vec![1, 2])));
    assert_eq!(args.hours, Some(HoursFilter::OpenNow));
    assert_eq!(args.sort_by, Some(SortBy::Rating));
    assert!(!args.direct);
    assert!(!args.signed_in);
}

#[test]
fn invalid_price_is_rejected() {
    assert!(Cli::try_parse_from(["localeats-cli", "search", "--price", "$$"]).is_err());
}

#[test]
fn invalid_sort_is_rejected() {
    assert!(Cli::try_parse_from(["localeats-cli", "search", "--sort-by", "newest"]).is_err());
}

#[test]
fn page_and_jump_conflict() {
    assert!(
        Cli::try_parse_from(["localeats-cli", "search", "--page", "2", "--jump", "3"]).is_err()
    );
}

#[test]
fn jump_accepts_negative_input() {
    let args = search_args(&["--jump", "-3"]);
    assert_eq!(args.jump.as_deref(), Some("-3"));
}

#[test]
fn flags_override_raw_query() {
    let args = search_args(&["--query", "term=sushi&radius=2000&price=false", "--term", "ramen"]);
    let params = query_params(&args);
    assert_eq!(params.term.as_deref(), Some("ramen"));
    assert_eq!(params.radius, Some(2000));
    assert_eq!(params.price, Some(PriceSelection::Off));
}

#[test]
fn parses_pages_command() {
    let cli = parse(&["pages", "--total", "240", "--offset", "100"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Pages {
            total: 240,
            offset: 100
        })
    ));
}

#[test]
fn parses_jump_command_with_negative_input() {
    let cli = parse(&["jump", "--total", "240", "-2"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Jump { total: 240, ref input }) if input == "-2"
    ));
}

#[test]
fn run_jump_reports_out_of_range() {
    assert!(search::run_jump(240, "3").is_ok());
    assert!(search::run_jump(240, "9").is_err());
    assert!(search::run_jump(240, "abc").is_err());
}

#[test]
fn parses_location_set_with_negative_longitude() {
    let cli = parse(&[
        "location",
        "set",
        "--latitude",
        "43.85",
        "--longitude",
        "-79.43",
        "--name",
        "Richmond Hill, ON",
    ]);
    match cli.command {
        Some(Commands::Location {
            command:
                LocationCommands::Set {
                    latitude,
                    longitude,
                    name,
                },
        }) => {
            assert!((latitude - 43.85).abs() < f64::EPSILON);
            assert!((longitude + 79.43).abs() < f64::EPSILON);
            assert_eq!(name, "Richmond Hill, ON");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn location_detect_without_coordinates_is_allowed() {
    let cli = parse(&["location", "detect"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Location {
            command: LocationCommands::Detect {
                latitude: None,
                longitude: None
            }
        })
    ));
}

#[test]
fn location_detect_requires_both_coordinates() {
    assert!(
        Cli::try_parse_from(["localeats-cli", "location", "detect", "--latitude", "43.85"])
            .is_err()
    );
}

#[test]
fn parses_filters_set() {
    let cli = parse(&["filters", "set", "--price", "3", "--rating", "4"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Filters {
            command: FilterCommands::Set {
                price: Some(PriceLevel::Pricey),
                rating: Some(MinRating::Four),
                radius: None,
                ..
            }
        })
    ));
}

#[test]
fn filters_set_persists_and_reset_clears() {
    let dir = tempfile::tempdir().unwrap();
    let state = StateFile::new(dir.path().join("state.json"));

    filters::run_filters(
        &state,
        FilterCommands::Set {
            radius: Some(2_500),
            price: None,
            rating: None,
            hours: Some(HoursFilter::OpenNow),
            sort_by: None,
            term: Some("  ".to_owned()),
        },
    )
    .unwrap();
    let saved = filters::load_filters(&state);
    assert_eq!(saved.radius_meters, 2_500);
    assert_eq!(saved.hours, HoursFilter::OpenNow);
    assert_eq!(saved.term, None);

    filters::run_filters(&state, FilterCommands::Reset).unwrap();
    assert_eq!(filters::load_filters(&state), localeats_core::FilterState::default());
}

#[test]
fn bookmarks_add_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let state = StateFile::new(dir.path().join("state.json"));

    bookmarks::run_bookmarks(
        &state,
        BookmarkCommands::Add {
            store_id: "kinton-ramen".to_owned(),
        },
    )
    .unwrap();
    assert!(bookmarks::load_bookmarks(&state).contains("kinton-ramen"));

    bookmarks::run_bookmarks(
        &state,
        BookmarkCommands::Remove {
            store_id: "kinton-ramen".to_owned(),
        },
    )
    .unwrap();
    assert!(bookmarks::load_bookmarks(&state).is_empty());
}
