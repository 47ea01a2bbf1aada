//! Interactive menu/session controller.
//!
//! A line-driven state machine over the console and catalog collaborators.
//! Each search or lookup cycle is strictly sequential: one request, classify
//! and normalize every record, render, wait for acknowledgment, return to the
//! owning menu. A failed cycle shows `NO RESULTS`; it never surfaces a
//! transport error to the user.

use log::{debug, error};

use crate::catalog::CatalogAdapter;
use crate::config::{NameStyle, COPYRIGHT, VERSION};
use crate::console::Console;
use crate::entity::Entity;
use crate::normalize::{normalize, normalize_batch};
use crate::render::{render_one, LINE_LENGTH};

const BANNER: [&str; 6] = [
    "           _                    ",
    "  ___ __ _| |_ _   _ _ __   ___ ",
    " / __/ _` | __| | | | '_ \\ / _ \\",
    "| (_| (_| | |_| |_| | | | |  __/",
    " \\___\\__,_|\\__|\\__,_|_| |_|\\___|",
    "                                ",
];

const NO_RESULTS: &str = "NO RESULTS";

/// Entity-kind filter a search can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Song,
    Album,
    Artist,
    All,
}

/// Menu token, filter, and the entity parameter the remote API expects.
/// `all` expands to the comma-joined combination by API convention.
const FILTER_TABLE: [(&str, SearchFilter, &str); 4] = [
    ("song", SearchFilter::Song, "song"),
    ("album", SearchFilter::Album, "album"),
    ("artist", SearchFilter::Artist, "musicArtist"),
    ("all", SearchFilter::All, "song,album,musicArtist"),
];

impl SearchFilter {
    /// Parses a menu token into a filter.
    pub fn parse(token: &str) -> Option<Self> {
        FILTER_TABLE
            .iter()
            .find(|(name, _, _)| *name == token)
            .map(|(_, filter, _)| *filter)
    }

    /// The `entity` parameter value sent to the remote API.
    pub fn api_entity(self) -> &'static str {
        FILTER_TABLE
            .iter()
            .find(|(_, filter, _)| *filter == self)
            .map(|(_, _, entity)| *entity)
            .unwrap_or_default()
    }

    /// Uppercase heading used above search prompts and results.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Song => "SONG",
            Self::Album => "ALBUM",
            Self::Artist => "ARTIST",
            Self::All => "ALL",
        }
    }
}

/// Controller state; `Lookup` may carry an identifier given inline from the
/// main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuState {
    Main,
    Search,
    Lookup(Option<u64>),
    Exit,
}

/// Drives the menus over the console and catalog seams.
pub struct MenuController<'a> {
    console: &'a mut dyn Console,
    catalog: &'a dyn CatalogAdapter,
    style: NameStyle,
}

impl<'a> MenuController<'a> {
    pub fn new(
        console: &'a mut dyn Console,
        catalog: &'a dyn CatalogAdapter,
        style: NameStyle,
    ) -> Self {
        Self {
            console,
            catalog,
            style,
        }
    }

    /// Runs the menu loop until exit or end of input.
    pub fn run(&mut self) {
        let mut state = MenuState::Main;
        while state != MenuState::Exit {
            state = match state {
                MenuState::Main => self.main_menu(),
                MenuState::Search => self.search_menu(),
                MenuState::Lookup(pending) => self.lookup_menu(pending),
                MenuState::Exit => MenuState::Exit,
            };
        }
    }

    fn main_menu(&mut self) -> MenuState {
        self.print_menu(
            "MAIN",
            &[
                ("search", "search the catalog by a term"),
                ("lookup", "search the catalog by an entity ID"),
                ("exit", "exit the program"),
            ],
        );
        let Some((choice, args)) = self.read_command() else {
            return MenuState::Exit;
        };
        match choice.as_str() {
            "search" => MenuState::Search,
            "lookup" => MenuState::Lookup(args.first().and_then(|arg| arg.parse().ok())),
            "exit" => MenuState::Exit,
            _ => MenuState::Main,
        }
    }

    fn search_menu(&mut self) -> MenuState {
        self.print_menu(
            "SEARCH",
            &[
                ("song", "search for a song"),
                ("album", "search for an album"),
                ("artist", "search for an artist"),
                ("all", "search for any of the above"),
                ("back", "go back"),
                ("exit", "exit the program"),
            ],
        );
        let Some((choice, args)) = self.read_command() else {
            return MenuState::Exit;
        };
        match choice.as_str() {
            "back" => return MenuState::Main,
            "exit" => return MenuState::Exit,
            _ => {}
        }
        let Some(filter) = SearchFilter::parse(&choice) else {
            return MenuState::Search;
        };
        let term = if args.is_empty() {
            self.print_header();
            self.console
                .print_centered(&format!("{} SEARCH MENU", filter.heading()));
            match self.console.read_line("enter your search term:\n") {
                Some(term) => term,
                None => return MenuState::Exit,
            }
        } else {
            args.join(" ")
        };

        let entities = self.run_search(&term, filter);
        self.console.clear();
        self.console
            .print_centered(&format!("{} SEARCH RESULTS", filter.heading()));
        self.show_results(&entities);
        MenuState::Main
    }

    fn lookup_menu(&mut self, pending: Option<u64>) -> MenuState {
        let uid = match pending {
            Some(uid) => uid,
            None => {
                self.print_menu(
                    "LOOKUP",
                    &[
                        ("numeric", "the ID to search for"),
                        ("back", "go back"),
                        ("exit", "exit the program"),
                    ],
                );
                let Some((choice, _)) = self.read_command() else {
                    return MenuState::Exit;
                };
                match choice.as_str() {
                    "back" => return MenuState::Main,
                    "exit" => return MenuState::Exit,
                    other => match other.parse() {
                        Ok(uid) => uid,
                        Err(_) => return MenuState::Lookup(None),
                    },
                }
            }
        };

        let entities = self.run_lookup(uid);
        self.console.clear();
        self.console.print_centered("LOOKUP RESULTS");
        self.show_results(&entities);
        MenuState::Main
    }

    /// One search cycle; any failure yields an empty batch.
    fn run_search(&mut self, term: &str, filter: SearchFilter) -> Vec<Entity> {
        match self.catalog.search(term, filter.api_entity()) {
            Ok(response) => {
                debug!(
                    "search for \"{}\" returned {} records",
                    term, response.result_count
                );
                normalize_batch(&response.results, self.style)
            }
            Err(err) => {
                error!("search for \"{}\" failed: {}", term, err);
                Vec::new()
            }
        }
    }

    /// One lookup cycle; at most one entity, any failure yields none.
    fn run_lookup(&mut self, uid: u64) -> Vec<Entity> {
        let raw = match self.catalog.lookup(uid) {
            Ok(raw) => raw,
            Err(err) => {
                error!("lookup of {} failed: {}", uid, err);
                None
            }
        };
        raw.and_then(|record| match normalize(&record, self.style) {
            Ok(entity) => {
                debug!("lookup {} resolved to a {}", uid, entity.kind().label());
                Some(entity)
            }
            Err(err) => {
                error!("record {} could not be interpreted: {}", uid, err);
                None
            }
        })
        .into_iter()
        .collect()
    }

    fn show_results(&mut self, entities: &[Entity]) {
        if entities.is_empty() {
            self.console.print_centered(NO_RESULTS);
        } else {
            for entity in entities {
                let row = render_one(entity);
                self.console.print(&row);
            }
        }
        self.console.pause();
    }

    fn print_header(&mut self) {
        self.console.clear();
        for line in BANNER {
            self.console.print_centered(line);
        }
        self.console.print_centered(&format!("Version {}", VERSION));
        self.console.print_centered(COPYRIGHT);
        self.console.print("");
    }

    fn print_menu(&mut self, name: &str, options: &[(&str, &str)]) {
        self.print_header();
        self.console.print_centered(&format!("{name} MENU"));
        let key_width = options
            .iter()
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = options
            .iter()
            .map(|(key, description)| format!("{:<key_width$} -- {}", key, description))
            .collect();
        let block_width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let left_pad = LINE_LENGTH.saturating_sub(block_width) / 2;
        for line in &lines {
            self.console.print(&format!("{}{}", " ".repeat(left_pad), line));
        }
    }

    fn read_command(&mut self) -> Option<(String, Vec<String>)> {
        let line = self.console.read_line("")?;
        let mut parts = line.split_whitespace().map(str::to_string);
        let choice = parts.next().unwrap_or_default();
        Some((choice, parts.collect()))
    }
}
