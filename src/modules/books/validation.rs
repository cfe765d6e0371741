//! Local, pre-network checks on a draft.

use std::collections::BTreeMap;
use std::fmt;

use super::models::{BookDraft, BookField, NewBook};

const YEAR_MAX_LEN: usize = 4;

/// Field-level messages from the last validation, one per failing field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    fields: BTreeMap<BookField, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: BookField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: BookField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BookField, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub(crate) fn insert(&mut self, field: BookField, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub(crate) fn clear(&mut self, field: BookField) -> bool {
        self.fields.remove(&field).is_some()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Whether a keystroke leaving the year field at `value` is accepted.
///
/// Only ASCII digits, at most four of them. An empty field is allowed.
pub fn accepts_year_input(value: &str) -> bool {
    value.len() <= YEAR_MAX_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

/// Check every field of `draft` and collect all violations at once.
pub fn validate_draft(draft: &BookDraft, current_year: i32) -> Result<NewBook, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if draft.title.trim().is_empty() {
        errors.insert(BookField::Title, "Title is required");
    }
    if draft.author.trim().is_empty() {
        errors.insert(BookField::Author, "Author is required");
    }
    if draft.genre.trim().is_empty() {
        errors.insert(BookField::Genre, "Genre is required");
    }

    let year_text = draft.published_year.trim();
    let published_year = if year_text.is_empty() {
        errors.insert(BookField::PublishedYear, "Published year is required");
        None
    } else {
        match year_text.parse::<i32>() {
            Ok(year) if (0..=current_year).contains(&year) => Some(year),
            _ => {
                errors.insert(BookField::PublishedYear, "Enter a valid year");
                None
            }
        }
    };

    if draft.image.trim().is_empty() {
        errors.insert(BookField::Image, "Image URL is required");
    }

    match published_year {
        Some(published_year) if errors.is_empty() => Ok(NewBook {
            title: draft.title.clone(),
            author: draft.author.clone(),
            genre: draft.genre.clone(),
            published_year,
            status: draft.status,
            image: draft.image.clone(),
        }),
        _ => Err(errors),
    }
}
