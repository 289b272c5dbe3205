//! `bookmarks` command handlers.

use std::collections::BTreeSet;

use clap::Subcommand;
use localeats_search::location::BOOKMARKS_KEY;
use localeats_search::StateFile;

#[derive(Debug, Subcommand)]
pub enum BookmarkCommands {
    /// List bookmarked store ids
    List,
    /// Bookmark a store by id
    Add { store_id: String },
    /// Remove a bookmark
    Remove { store_id: String },
}

pub(crate) fn load_bookmarks(state: &StateFile) -> BTreeSet<String> {
    match state.read_key::<BTreeSet<String>>(BOOKMARKS_KEY) {
        Ok(saved) => saved.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read bookmarks");
            BTreeSet::new()
        }
    }
}

pub(crate) fn run_bookmarks(state: &StateFile, command: BookmarkCommands) -> anyhow::Result<()> {
    let mut bookmarks = load_bookmarks(state);
    match command {
        BookmarkCommands::List => {
            if bookmarks.is_empty() {
                println!("no bookmarks yet");
            }
            for id in &bookmarks {
                println!("{id}");
            }
            return Ok(());
        }
        BookmarkCommands::Add { store_id } => {
            if !bookmarks.insert(store_id.clone()) {
                println!("{store_id} is already bookmarked");
                return Ok(());
            }
            println!("bookmarked {store_id}");
        }
        BookmarkCommands::Remove { store_id } => {
            if !bookmarks.remove(&store_id) {
                println!("{store_id} was not bookmarked");
                return Ok(());
            }
            println!("removed {store_id}");
        }
    }
    state.write_key(BOOKMARKS_KEY, &bookmarks)?;
    Ok(())
}
