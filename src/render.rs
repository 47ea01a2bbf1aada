//! Fixed-width row rendering for normalized entities.
//!
//! Layout constants are fixed, not derived from content. Truncated fields
//! keep the historical gap asymmetry: a cut field is followed by the ellipsis
//! marker and a single gap, a padded field by a double gap, which keeps every
//! non-final column at the same total width across mixed rows. Output must
//! stay byte-for-byte stable; downstream alignment depends on it.

use crate::entity::Entity;

/// Width of the identifier column.
pub const ID_WIDTH: usize = 11;
/// Width of the entity name column.
pub const NAME_WIDTH: usize = 32;
/// Width of the artist name column.
pub const ARTIST_WIDTH: usize = 17;
/// Spaces between untrimmed fields.
pub const GAP: usize = 3;
/// Marker appended to trimmed fields.
pub const ELLIPSIS: &str = "...";
/// Total width of a rendered screen line.
pub const LINE_LENGTH: usize = 4 + ID_WIDTH + NAME_WIDTH + ARTIST_WIDTH + GAP * 5;

/// Renders a batch of entities, one row per entity.
pub fn render(entities: &[Entity]) -> Vec<String> {
    entities.iter().map(render_one).collect()
}

/// Renders one entity as a single row.
///
/// Artist rows have two columns; Album and Track rows carry a third column
/// with the owning artist's name.
pub fn render_one(entity: &Entity) -> String {
    let mut row = format!("{:<width$}{}", entity.id(), " ".repeat(GAP), width = ID_WIDTH);
    row.push_str(&column(entity.name(), NAME_WIDTH, GAP));
    if let Some(artist_name) = entity.artist_name() {
        row.push_str(&column(artist_name, ARTIST_WIDTH, 0));
    }
    row
}

/// Formats one name field.
///
/// Over-long names are hard-cut at the column width and suffixed with the
/// ellipsis plus `gap_after_cut` spaces; fitting names are padded to the
/// column width and followed by a double gap.
fn column(text: &str, width: usize, gap_after_cut: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > width {
        let cut: String = chars[..width].iter().collect();
        format!("{}{}{}", cut, ELLIPSIS, " ".repeat(gap_after_cut))
    } else {
        format!("{:<width$}{}", text, " ".repeat(GAP * 2), width = width)
    }
}
