//! Book model

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{serde_as, DeserializeAs, SerializeAs};
use std::str::FromStr;
use validator::Validate;

use crate::validation::{known_genre, not_blank, valid_year, TEXT_PATTERN};

use super::enums::Genre;

/// Book record as stored by the remote store
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub judul: String,
    pub pengarang: String,
    #[serde_as(as = "LenientYear")]
    pub tahun: i32,
    pub genre: Genre,
}

/// Year as other clients write it: a JSON integer, a float, or a numeric
/// string. Fractions are truncated toward zero. Always written as an integer.
struct LenientYear;

impl<'de> DeserializeAs<'de, i32> for LenientYear {
    fn deserialize_as<D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        let year = match Raw::deserialize(deserializer)? {
            Raw::Int(n) => return i32::try_from(n).map_err(D::Error::custom),
            Raw::Float(n) => Some(n),
            Raw::Text(s) => s.trim().parse::<f64>().ok(),
        };
        year.filter(|y| y.is_finite() && *y >= f64::from(i32::MIN) && *y <= f64::from(i32::MAX))
            .map(|y| y.trunc() as i32)
            .ok_or_else(|| D::Error::custom("tahun is not a number"))
    }
}

impl SerializeAs<i32> for LenientYear {
    fn serialize_as<S>(source: &i32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(*source)
    }
}

/// Book form field names, as used for error keys and form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Id,
    Judul,
    Pengarang,
    Tahun,
    Genre,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Id,
        Field::Judul,
        Field::Pengarang,
        Field::Tahun,
        Field::Genre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Judul => "judul",
            Field::Pengarang => "pengarang",
            Field::Tahun => "tahun",
            Field::Genre => "genre",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// In-progress form values, held exactly as typed.
///
/// Synchronous field rules are declared here; id uniqueness is checked by
/// [`crate::validation::BookRules`] since it needs the remote store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookDraft {
    #[validate(
        custom(function = "not_blank", message = "ID harus diisi"),
        regex(path = *TEXT_PATTERN, message = "ID tidak dapat memuat simbol")
    )]
    pub id: String,
    #[validate(
        custom(function = "not_blank", message = "Judul harus diisi"),
        regex(path = *TEXT_PATTERN, message = "Judul tidak dapat memuat simbol")
    )]
    pub judul: String,
    #[validate(
        custom(function = "not_blank", message = "Pengarang harus diisi"),
        regex(path = *TEXT_PATTERN, message = "Pengarang tidak dapat memuat simbol")
    )]
    pub pengarang: String,
    #[validate(custom(function = "valid_year"))]
    pub tahun: String,
    #[validate(custom(function = "known_genre"))]
    pub genre: String,
}

impl BookDraft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Judul => &self.judul,
            Field::Pengarang => &self.pengarang,
            Field::Tahun => &self.tahun,
            Field::Genre => &self.genre,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Id => self.id = value,
            Field::Judul => self.judul = value,
            Field::Pengarang => self.pengarang = value,
            Field::Tahun => self.tahun = value,
            Field::Genre => self.genre = value,
        }
    }

    /// Convert a validated draft into a record. Returns `None` when the
    /// year or genre does not parse, which validation already reports.
    pub fn to_book(&self) -> Option<Book> {
        Some(Book {
            id: self.id.clone(),
            judul: self.judul.clone(),
            pengarang: self.pengarang.clone(),
            tahun: self.tahun.trim().parse().ok()?,
            genre: self.genre.parse().ok()?,
        })
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            judul: book.judul.clone(),
            pengarang: book.pengarang.clone(),
            tahun: book.tahun.to_string(),
            genre: book.genre.label().to_string(),
        }
    }
}
