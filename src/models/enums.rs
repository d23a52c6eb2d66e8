//! Shared domain enums

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

/// Book genre. The five named genres back both the create and edit forms.
///
/// Records written by other clients may carry any label; those are kept
/// as `Other` so a single stray record never makes the collection unreadable.
/// Forms only accept the named genres.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fantasi,
    Horor,
    #[serde(rename = "Self-Help")]
    SelfHelp,
    Sejarah,
    Biografi,
    #[serde(untagged)]
    Other(String),
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Fantasi,
        Genre::Horor,
        Genre::SelfHelp,
        Genre::Sejarah,
        Genre::Biografi,
    ];

    /// Label as stored by the remote store and shown in the form
    pub fn label(&self) -> &str {
        match self {
            Genre::Fantasi => "Fantasi",
            Genre::Horor => "Horor",
            Genre::SelfHelp => "Self-Help",
            Genre::Sejarah => "Sejarah",
            Genre::Biografi => "Biografi",
            Genre::Other(label) => label,
        }
    }

    /// Whether this is one of the genres a form may pick
    pub fn is_known(&self) -> bool {
        !matches!(self, Genre::Other(_))
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Genre {
    type Err = String;

    /// Exact label match against the named genres, as picked from the list
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|g| g.label() == s)
            .ok_or_else(|| format!("Unknown genre: {}", s))
    }
}

// ---------------------------------------------------------------------------
// SortBy
// ---------------------------------------------------------------------------

/// Sort key for listing. Sorting is performed by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Remote insertion order; no `_sort` parameter is sent
    #[default]
    None,
    Judul,
    Tahun,
}

impl SortBy {
    /// Value of the `_sort` query parameter, if any
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            SortBy::None => None,
            SortBy::Judul => Some("judul"),
            SortBy::Tahun => Some("tahun"),
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "id" => Ok(SortBy::None),
            "judul" => Ok(SortBy::Judul),
            "tahun" => Ok(SortBy::Tahun),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}
