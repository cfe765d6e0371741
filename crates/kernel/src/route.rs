//! Navigation targets of the presentation shell.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A screen the shell can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Collection listing with search.
    Home,
    AddBook,
    EditBook(String),
    /// Login stub; no authentication is performed behind it.
    Login,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown route '{0}'")]
pub struct UnknownRoute(pub String);

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::AddBook => "/add-book".to_string(),
            Route::EditBook(id) => format!("/edit-book/{}", id),
            Route::Login => "/login".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => return Ok(Route::Home),
            "/add-book" => return Ok(Route::AddBook),
            "/login" => return Ok(Route::Login),
            _ => {}
        }

        match trimmed.strip_prefix("/edit-book/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Route::EditBook(id.to_string())),
            _ => Err(UnknownRoute(path.to_string())),
        }
    }
}
