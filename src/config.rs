//! Compiled-in catalog client defaults.
//!
//! The catalog client takes no CLI flags, files, or environment variables;
//! the request parameters and the censorship preference below are fixed at
//! build time and read-only for the life of the process.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COPYRIGHT: &str = "Copyright the catune authors";

/// Which of the two name fields to read when a source carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// The original, possibly explicit, name field.
    #[default]
    Original,
    /// The storefront's censored name field.
    Censored,
}

/// Fixed request parameters sent with every search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDefaults {
    pub country: String,
    pub media: String,
    pub limit: u32,
    pub lang: String,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            media: "music".to_string(),
            limit: 10,
            lang: "en_us".to_string(),
        }
    }
}
