use std::fmt;
use thiserror::Error;

/// Which selector an index or number refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Book,
    Chapter,
    Verse,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Book => "book",
            Level::Chapter => "chapter",
            Level::Verse => "verse",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The entry document (book list or whole data set) could not be
    /// fetched or parsed, so there is nothing to select from.
    #[error("failed to load book list from {what}: {reason}")]
    BookList { what: String, reason: String },

    /// A data set or book file could not be fetched or parsed.
    #[error("failed to load {what}: {reason}")]
    Load { what: String, reason: String },

    /// An explicit selection index was outside its sequence.
    #[error("{level} index {index} out of range (0..{len})")]
    OutOfRange { level: Level, index: usize, len: usize },

    /// A book name, chapter number or verse number had no match.
    #[error("{level} {key} not found")]
    NotFound { level: Level, key: String },

    /// The book's contents have not been fetched yet.
    #[error("book {name} ({index}) is not loaded")]
    BookNotLoaded { index: usize, name: String },
}

impl Error {
    pub fn load(what: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::Load {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Reclassify a load failure of the entry document.
    pub fn into_book_list(self) -> Self {
        match self {
            Error::Load { what, reason } => Error::BookList { what, reason },
            other => other,
        }
    }

    pub fn not_found(level: Level, key: impl fmt::Display) -> Self {
        Error::NotFound {
            level,
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = Error::OutOfRange {
            level: Level::Chapter,
            index: 7,
            len: 5,
        };
        assert_eq!(err.to_string(), "chapter index 7 out of range (0..5)");
    }

    #[test]
    fn test_into_book_list_keeps_details() {
        let err = Error::load("Bible_KRV/books.json", "HTTP error! status: 500").into_book_list();
        assert!(matches!(err, Error::BookList { .. }));
        assert_eq!(
            err.to_string(),
            "failed to load book list from Bible_KRV/books.json: HTTP error! status: 500"
        );

        let other = Error::not_found(Level::Verse, 3).into_book_list();
        assert!(matches!(other, Error::NotFound { .. }));
    }

    #[test]
    fn test_load_message_includes_reason() {
        let err = Error::load("books.json", "HTTP error! status: 404");
        assert_eq!(
            err.to_string(),
            "failed to load books.json: HTTP error! status: 404"
        );
    }
}
