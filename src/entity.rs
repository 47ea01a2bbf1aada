//! Normalized catalog entity model.
//!
//! The remote catalog returns heterogeneous records; once normalized they
//! become one of these three immutable sibling variants. Entities hold data
//! only and are discarded at the end of the render cycle that produced them.

use std::fmt;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// Untyped key/value record as delivered by the remote catalog service.
pub type RawResult = Map<String, Value>;

/// Tag identifying which shape a record or entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Artist,
    Album,
    Track,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Artist => "Artist",
            Self::Album => "Album",
            Self::Track => "Track",
        }
    }
}

/// Normalized artist payload.
///
/// Artist-shaped sources carry no censored name variant, so the display name
/// is the same regardless of the censorship setting.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    pub genre: String,
    /// Originating record, kept for traceability only.
    pub raw: RawResult,
}

/// Normalized album payload, with its artist derived from the same record.
#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub id: u64,
    pub name: String,
    pub track_count: u64,
    /// Populated only when derived from an album-shaped source; track-shaped
    /// sources do not carry copyright information.
    pub copyright: Option<String>,
    pub country: String,
    pub release_date: NaiveDateTime,
    pub genre: String,
    pub artist: Artist,
    pub raw: RawResult,
}

/// Normalized track payload, with artist and album derived from the same record.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub release_date: NaiveDateTime,
    pub duration_seconds: f64,
    pub genre: String,
    pub artist: Artist,
    pub album: Album,
    pub raw: RawResult,
}

/// One normalized catalog entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Artist(Artist),
    Album(Album),
    Track(Track),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Artist(_) => EntityKind::Artist,
            Self::Album(_) => EntityKind::Album,
            Self::Track(_) => EntityKind::Track,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Artist(artist) => artist.id,
            Self::Album(album) => album.id,
            Self::Track(track) => track.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Artist(artist) => &artist.name,
            Self::Album(album) => &album.name,
            Self::Track(track) => &track.name,
        }
    }

    /// Name of the owning artist; an artist has no artist of its own.
    pub fn artist_name(&self) -> Option<&str> {
        match self {
            Self::Artist(_) => None,
            Self::Album(album) => Some(&album.artist.name),
            Self::Track(track) => Some(&track.artist.name),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
