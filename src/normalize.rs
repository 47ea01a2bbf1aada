//! Classification and normalization of raw catalog records.
//!
//! Every record the remote service returns carries a `wrapperType`
//! discriminator; classification resolves it once into an [`EntityKind`] and
//! the matching construction rule builds a fully-populated [`Entity`].
//! Records from different endpoints expose different field sets, so albums
//! have two construction paths: the album-origin path (with copyright) and
//! the track-origin path used for the album embedded in a track record.

use chrono::NaiveDateTime;
use log::warn;
use serde_json::Value;
use thiserror::Error;

use crate::config::NameStyle;
use crate::entity::{Album, Artist, Entity, EntityKind, RawResult, Track};

const DISCRIMINATOR_KEY: &str = "wrapperType";
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Why a single record could not be interpreted.
///
/// All variants are fatal for the record they occur in; batch callers skip
/// the record and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("\"{0}\" is not a known wrapper type")]
    UnsupportedResultKind(String),
    #[error("record is missing required field \"{0}\"")]
    MissingField(&'static str),
    #[error("release date \"{0}\" is not a valid timestamp")]
    MalformedDate(String),
}

/// Resolves the discriminator into the entity kind the record represents.
///
/// Fails hard on an unknown or missing discriminator; callers must not
/// attempt partial normalization afterwards.
pub fn classify(raw: &RawResult) -> Result<EntityKind, NormalizeError> {
    let wrapper_type = raw
        .get(DISCRIMINATOR_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();
    match wrapper_type {
        "artist" => Ok(EntityKind::Artist),
        "collection" => Ok(EntityKind::Album),
        "track" => Ok(EntityKind::Track),
        other => Err(NormalizeError::UnsupportedResultKind(other.to_string())),
    }
}

/// Classifies a record and builds the matching entity.
pub fn normalize(raw: &RawResult, style: NameStyle) -> Result<Entity, NormalizeError> {
    match classify(raw)? {
        EntityKind::Artist => artist_from_raw(raw).map(Entity::Artist),
        EntityKind::Album => album_from_album_raw(raw, style).map(Entity::Album),
        EntityKind::Track => track_from_raw(raw, style).map(Entity::Track),
    }
}

/// Normalizes a whole response batch, isolating per-record failures.
///
/// A record that fails classification or construction is logged and skipped;
/// it never aborts the rest of the batch.
pub fn normalize_batch(results: &[RawResult], style: NameStyle) -> Vec<Entity> {
    let mut entities = Vec::with_capacity(results.len());
    for raw in results {
        match normalize(raw, style) {
            Ok(entity) => entities.push(entity),
            Err(err) => warn!("skipping uninterpretable record: {}", err),
        }
    }
    entities
}

/// Builds an artist from any of the three record shapes.
///
/// The artist-identifying keys are present in artist, album, and track
/// records alike, and artist sources carry no censored name variant.
pub fn artist_from_raw(raw: &RawResult) -> Result<Artist, NormalizeError> {
    Ok(Artist {
        id: u64_field(raw, "artistId")?,
        name: str_field(raw, "artistName")?,
        genre: str_field(raw, "primaryGenreName")?,
        raw: raw.clone(),
    })
}

/// Builds an album from an album-shaped record; `copyright` is required here.
pub fn album_from_album_raw(raw: &RawResult, style: NameStyle) -> Result<Album, NormalizeError> {
    let mut album = album_common(raw, style)?;
    album.copyright = Some(str_field(raw, "copyright")?);
    Ok(album)
}

/// Builds the album embedded in a track-shaped record.
///
/// Track records never carry copyright information, so the field stays
/// not-applicable rather than failing construction.
pub fn album_from_track_raw(raw: &RawResult, style: NameStyle) -> Result<Album, NormalizeError> {
    album_common(raw, style)
}

/// Builds a track, deriving its artist and album from the same record.
pub fn track_from_raw(raw: &RawResult, style: NameStyle) -> Result<Track, NormalizeError> {
    Ok(Track {
        id: u64_field(raw, "trackId")?,
        name: match style {
            NameStyle::Censored => str_field(raw, "trackCensoredName")?,
            NameStyle::Original => str_field(raw, "trackName")?,
        },
        country: str_field(raw, "country")?,
        release_date: release_date_field(raw)?,
        duration_seconds: f64_field(raw, "trackTimeMillis")? / 1000.0,
        genre: str_field(raw, "primaryGenreName")?,
        artist: artist_from_raw(raw)?,
        album: album_from_track_raw(raw, style)?,
        raw: raw.clone(),
    })
}

fn album_common(raw: &RawResult, style: NameStyle) -> Result<Album, NormalizeError> {
    Ok(Album {
        id: u64_field(raw, "collectionId")?,
        name: match style {
            NameStyle::Censored => str_field(raw, "collectionCensoredName")?,
            NameStyle::Original => str_field(raw, "collectionName")?,
        },
        track_count: u64_field(raw, "trackCount")?,
        copyright: None,
        country: str_field(raw, "country")?,
        release_date: release_date_field(raw)?,
        genre: str_field(raw, "primaryGenreName")?,
        artist: artist_from_raw(raw)?,
        raw: raw.clone(),
    })
}

fn str_field(raw: &RawResult, key: &'static str) -> Result<String, NormalizeError> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(NormalizeError::MissingField(key))
}

fn u64_field(raw: &RawResult, key: &'static str) -> Result<u64, NormalizeError> {
    raw.get(key)
        .and_then(Value::as_u64)
        .ok_or(NormalizeError::MissingField(key))
}

fn f64_field(raw: &RawResult, key: &'static str) -> Result<f64, NormalizeError> {
    raw.get(key)
        .and_then(Value::as_f64)
        .ok_or(NormalizeError::MissingField(key))
}

fn release_date_field(raw: &RawResult) -> Result<NaiveDateTime, NormalizeError> {
    let text = str_field(raw, "releaseDate")?;
    NaiveDateTime::parse_from_str(&text, RELEASE_DATE_FORMAT)
        .map_err(|_| NormalizeError::MalformedDate(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawResult {
        value.as_object().cloned().expect("fixture must be an object")
    }

    fn artist_raw() -> RawResult {
        raw(json!({
            "wrapperType": "artist",
            "artistType": "Artist",
            "artistId": 462006,
            "artistName": "Bryan Adams",
            "primaryGenreName": "Rock",
        }))
    }

    fn album_raw() -> RawResult {
        raw(json!({
            "wrapperType": "collection",
            "collectionType": "Album",
            "artistId": 462006,
            "collectionId": 216012,
            "artistName": "Bryan Adams",
            "collectionName": "Reckless",
            "collectionCensoredName": "Reckless",
            "trackCount": 10,
            "copyright": "\u{2117} 1984 A&M Records",
            "country": "USA",
            "releaseDate": "1984-11-05T08:00:00Z",
            "primaryGenreName": "Rock",
        }))
    }

    fn track_raw() -> RawResult {
        raw(json!({
            "wrapperType": "track",
            "kind": "song",
            "artistId": 462006,
            "collectionId": 216012,
            "trackId": 216017,
            "artistName": "Bryan Adams",
            "collectionName": "Reckless",
            "trackName": "Run to You",
            "collectionCensoredName": "Reckless",
            "trackCensoredName": "Run to You (Clean)",
            "trackCount": 10,
            "trackTimeMillis": 234000,
            "country": "USA",
            "releaseDate": "1984-11-05T08:00:00Z",
            "primaryGenreName": "Rock",
        }))
    }

    #[test]
    fn test_classify_known_wrapper_types() {
        assert_eq!(classify(&artist_raw()), Ok(EntityKind::Artist));
        assert_eq!(classify(&album_raw()), Ok(EntityKind::Album));
        assert_eq!(classify(&track_raw()), Ok(EntityKind::Track));
    }

    #[test]
    fn test_classify_unknown_wrapper_type() {
        let record = raw(json!({ "wrapperType": "audiobook" }));
        assert_eq!(
            classify(&record),
            Err(NormalizeError::UnsupportedResultKind("audiobook".to_string()))
        );
    }

    #[test]
    fn test_classify_missing_discriminator() {
        let record = raw(json!({ "artistId": 1 }));
        assert_eq!(
            classify(&record),
            Err(NormalizeError::UnsupportedResultKind(String::new()))
        );
    }

    #[test]
    fn test_artist_from_any_origin_maps_same_keys() {
        for record in [artist_raw(), album_raw(), track_raw()] {
            let artist = artist_from_raw(&record).unwrap();
            assert_eq!(artist.id, 462006);
            assert_eq!(artist.name, "Bryan Adams");
            assert_eq!(artist.genre, "Rock");
        }
    }

    #[test]
    fn test_album_from_album_origin_has_copyright() {
        let album = album_from_album_raw(&album_raw(), NameStyle::Original).unwrap();
        assert_eq!(album.id, 216012);
        assert_eq!(album.name, "Reckless");
        assert_eq!(album.track_count, 10);
        assert_eq!(album.copyright.as_deref(), Some("\u{2117} 1984 A&M Records"));
        assert_eq!(album.artist.id, 462006);
        assert_eq!(album.release_date.format("%Y-%m-%d").to_string(), "1984-11-05");
    }

    #[test]
    fn test_album_from_album_origin_requires_copyright() {
        let mut record = album_raw();
        record.remove("copyright");
        assert_eq!(
            album_from_album_raw(&record, NameStyle::Original),
            Err(NormalizeError::MissingField("copyright"))
        );
    }

    #[test]
    fn test_album_from_track_origin_omits_copyright() {
        let album = album_from_track_raw(&track_raw(), NameStyle::Original).unwrap();
        assert_eq!(album.id, 216012);
        assert_eq!(album.copyright, None);
        assert_eq!(album.track_count, 10);
        assert_eq!(album.artist.name, "Bryan Adams");
    }

    #[test]
    fn test_track_embeds_artist_and_album() {
        let track = track_from_raw(&track_raw(), NameStyle::Original).unwrap();
        assert_eq!(track.id, 216017);
        assert_eq!(track.name, "Run to You");
        assert_eq!(track.duration_seconds, 234.0);
        assert_eq!(track.artist.id, 462006);
        assert_eq!(track.album.id, 216012);
        assert_eq!(track.album.copyright, None);
    }

    #[test]
    fn test_censored_style_selects_censored_names() {
        let track = track_from_raw(&track_raw(), NameStyle::Censored).unwrap();
        assert_eq!(track.name, "Run to You (Clean)");
        assert_eq!(track.album.name, "Reckless");
    }

    #[test]
    fn test_censored_style_requires_censored_name_key() {
        let mut record = track_raw();
        record.remove("trackCensoredName");
        assert_eq!(
            track_from_raw(&record, NameStyle::Censored),
            Err(NormalizeError::MissingField("trackCensoredName"))
        );
    }

    #[test]
    fn test_malformed_release_date_is_fatal() {
        let mut record = album_raw();
        record.insert("releaseDate".to_string(), json!("1984/11/05"));
        assert_eq!(
            album_from_album_raw(&record, NameStyle::Original),
            Err(NormalizeError::MalformedDate("1984/11/05".to_string()))
        );
    }

    #[test]
    fn test_missing_required_key_is_fatal() {
        let mut record = track_raw();
        record.remove("trackTimeMillis");
        assert_eq!(
            track_from_raw(&record, NameStyle::Original),
            Err(NormalizeError::MissingField("trackTimeMillis"))
        );
    }

    #[test]
    fn test_normalize_dispatches_on_discriminator() {
        let entity = normalize(&track_raw(), NameStyle::Original).unwrap();
        assert_eq!(entity.kind(), EntityKind::Track);
        let entity = normalize(&album_raw(), NameStyle::Original).unwrap();
        assert_eq!(entity.kind(), EntityKind::Album);
        let entity = normalize(&artist_raw(), NameStyle::Original).unwrap();
        assert_eq!(entity.kind(), EntityKind::Artist);
    }

    #[test]
    fn test_normalize_batch_isolates_bad_records() {
        let mut broken = track_raw();
        broken.remove("trackName");
        let batch = vec![artist_raw(), broken, album_raw()];
        let entities = normalize_batch(&batch, NameStyle::Original);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].kind(), EntityKind::Artist);
        assert_eq!(entities[1].kind(), EntityKind::Album);
    }
}
