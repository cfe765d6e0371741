use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Server-assigned identifier of a persisted book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lending status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Available,
    Issued,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Issued => "Issued",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Available" => Ok(Status::Available),
            "Issued" => Ok(Status::Issued),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownValue(pub String);

/// A persisted book as returned by the catalog resource.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id", alias = "id")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Some servers store the year as text.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub published_year: i32,
    #[serde(default)]
    pub status: Status,
    pub image: String,
}

/// Validated request body for create and update calls. Never carries an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub status: Status,
    pub image: String,
}

/// Editable fields of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookField {
    Title,
    Author,
    Genre,
    PublishedYear,
    Status,
    Image,
}

impl BookField {
    pub const ALL: [BookField; 6] = [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::PublishedYear,
        BookField::Status,
        BookField::Image,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::PublishedYear => "publishedYear",
            BookField::Status => "status",
            BookField::Image => "image",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookField {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BookField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownValue(value.to_string()))
    }
}

/// In-memory copy of a book under edit. The year stays as entered until validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: String,
    pub status: Status,
    pub image: String,
}

impl BookDraft {
    pub fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Genre => &self.genre,
            BookField::PublishedYear => &self.published_year,
            BookField::Status => self.status.as_str(),
            BookField::Image => &self.image,
        }
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            published_year: book.published_year.to_string(),
            status: book.status,
            image: book.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_reads_document_ids_and_text_years() {
        let book: Book = serde_json::from_value(json!({
            "_id": "65f0c1",
            "title": "Dune",
            "author": "Herbert",
            "genre": "SciFi",
            "publishedYear": "1965",
            "status": "Issued",
            "image": "http://x/y.jpg",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(book.id, BookId::from("65f0c1"));
        assert_eq!(book.published_year, 1965);
        assert_eq!(book.status, Status::Issued);
    }

    #[test]
    fn book_accepts_plain_id_and_defaults_status() {
        let book: Book = serde_json::from_value(json!({
            "id": "abc",
            "title": "Emma",
            "author": "Austen",
            "genre": "Classic",
            "publishedYear": 1815,
            "image": "http://x/emma.jpg"
        }))
        .unwrap();

        assert_eq!(book.id.as_str(), "abc");
        assert_eq!(book.status, Status::Available);
    }

    #[test]
    fn new_book_serializes_without_an_id() {
        let body = serde_json::to_value(NewBook {
            title: "Dune".into(),
            author: "Herbert".into(),
            genre: "SciFi".into(),
            published_year: 1965,
            status: Status::Available,
            image: "http://x/y.jpg".into(),
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "title": "Dune",
                "author": "Herbert",
                "genre": "SciFi",
                "publishedYear": 1965,
                "status": "Available",
                "image": "http://x/y.jpg"
            })
        );
    }

    #[test]
    fn field_names_parse_from_wire_names() {
        for field in BookField::ALL {
            assert_eq!(field.as_str().parse::<BookField>(), Ok(field));
        }
        assert!("published_year".parse::<BookField>().is_err());
    }

    #[test]
    fn status_only_has_two_values() {
        assert_eq!("Issued".parse::<Status>(), Ok(Status::Issued));
        assert_eq!(
            "Lost".parse::<Status>(),
            Err(UnknownValue("Lost".to_string()))
        );
    }

    #[test]
    fn draft_renders_year_as_text() {
        let book = Book {
            id: "b1".into(),
            title: "Emma".into(),
            author: "Austen".into(),
            genre: "Classic".into(),
            published_year: 1815,
            status: Status::Issued,
            image: "http://x/emma.jpg".into(),
        };
        let draft = BookDraft::from(&book);
        assert_eq!(draft.value(BookField::PublishedYear), "1815");
        assert_eq!(draft.value(BookField::Status), "Issued");
    }
}
