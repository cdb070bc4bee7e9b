//! JSON layouts a Bible data set can arrive in, and their conversion into
//! the normalized model.

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bible::{Bible, Book, Chapter, Verse};
use crate::error::{Error, Level, Result};

/// Name of the book list in the split layout.
pub const BOOK_LIST_FILE: &str = "books.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    /// `books.json` lists book names; each book lives in `<name>.json`.
    Split,
    /// One file: an array of `{bcode, name?, chapters: [[text, ..], ..]}`.
    BookArray,
    /// One file: an object mapping book name to `[[text, ..], ..]`.
    NameMap,
}

impl Shape {
    /// Guess the layout from the entry document.
    pub fn detect(value: &Value) -> Option<Shape> {
        match value {
            Value::Array(items) => match items.first() {
                Some(Value::String(_)) => Some(Shape::Split),
                Some(Value::Object(_)) => Some(Shape::BookArray),
                _ => None,
            },
            Value::Object(map) if !map.is_empty() => Some(Shape::NameMap),
            _ => None,
        }
    }

    /// Whether books are fetched one file at a time.
    pub fn is_lazy(self) -> bool {
        self == Shape::Split
    }

    /// Convert the entry document. For `Split` that is the book list and the
    /// resulting Bible has names only.
    pub fn parse_bible(self, what: &str, value: Value) -> Result<Bible> {
        match self {
            Shape::Split => {
                let names: Vec<String> =
                    serde_json::from_value(value).map_err(|e| Error::load(what, e))?;
                if names.is_empty() {
                    return Err(Error::load(what, "book list is empty"));
                }
                Bible::from_names(names)
            }
            Shape::BookArray | Shape::NameMap => {
                let books = self.parse_books(what, value)?;
                if books.is_empty() {
                    return Err(Error::load(what, "no books"));
                }
                Bible::from_books(books)
            }
        }
    }

    /// Convert the document that holds `name`'s contents: its own file for
    /// `Split`, the whole data set otherwise.
    pub fn parse_book(self, name: &str, what: &str, value: Value) -> Result<Book> {
        match self {
            Shape::Split => {
                let raw: SplitBook =
                    serde_json::from_value(value).map_err(|e| Error::load(what, e))?;
                let book = raw.into_book(name);
                book.validate()?;
                Ok(book)
            }
            Shape::BookArray | Shape::NameMap => {
                let book = self
                    .parse_books(what, value)?
                    .into_iter()
                    .find(|b| b.name == name)
                    .ok_or_else(|| Error::not_found(Level::Book, name))?;
                book.validate()?;
                Ok(book)
            }
        }
    }

    fn parse_books(self, what: &str, value: Value) -> Result<Vec<Book>> {
        match self {
            Shape::Split => Err(Error::load(what, "split layout has no inline books")),
            Shape::BookArray => {
                let raw: Vec<CodedBook> =
                    serde_json::from_value(value).map_err(|e| Error::load(what, e))?;
                Ok(raw
                    .into_iter()
                    .map(|b| {
                        let name = b.name.unwrap_or(b.bcode);
                        book_from_texts(name, b.chapters)
                    })
                    .collect())
            }
            Shape::NameMap => {
                let Value::Object(map) = value else {
                    return Err(Error::load(what, "expected an object keyed by book name"));
                };
                // serde_json is built with preserve_order, so this is file order.
                map.into_iter()
                    .map(|(name, chapters)| {
                        let chapters: Vec<Vec<String>> = serde_json::from_value(chapters)
                            .map_err(|e| Error::load(format!("{} ({})", what, name), e))?;
                        Ok(book_from_texts(name, chapters))
                    })
                    .collect()
            }
        }
    }
}

fn book_from_texts(name: String, chapters: Vec<Vec<String>>) -> Book {
    let chapters = chapters
        .into_iter()
        .zip(1u32..)
        .map(|(texts, number)| Chapter::from_texts(number, texts))
        .collect();
    Book { name, chapters }
}

#[derive(Deserialize)]
struct SplitBook {
    chapters: Vec<SplitChapter>,
}

#[derive(Deserialize)]
struct SplitChapter {
    #[serde(deserialize_with = "loose_number")]
    chapter: u32,
    verses: Vec<SplitVerse>,
}

#[derive(Deserialize)]
struct SplitVerse {
    #[serde(deserialize_with = "loose_number")]
    verse: u32,
    text: String,
}

impl SplitBook {
    fn into_book(self, name: &str) -> Book {
        let chapters = self
            .chapters
            .into_iter()
            .map(|c| Chapter {
                number: c.chapter,
                verses: c
                    .verses
                    .into_iter()
                    .map(|v| Verse {
                        number: v.verse,
                        text: v.text,
                    })
                    .collect(),
            })
            .collect();
        Book {
            name: name.to_string(),
            chapters,
        }
    }
}

#[derive(Deserialize)]
struct CodedBook {
    bcode: String,
    #[serde(default)]
    name: Option<String>,
    chapters: Vec<Vec<String>>,
}

/// Accept `3` as well as `"3"` for chapter and verse numbers.
fn loose_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(u32),
        Text(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Number(n) => Ok(n),
        Loose::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
