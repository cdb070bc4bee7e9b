//! Fetching Bible data from a directory, a single file or an HTTP base URL
//!
//! The loader is the only part of the library that performs I/O. It turns
//! the entry document into a `Bible` and, for the split layout, fetches
//! individual books when the navigator first needs them.

pub mod shape;

use log::{debug, info, warn};
use reqwest::Url;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::bible::{Bible, Book};
use crate::error::{Error, Level, Result};
use crate::navigator::{Navigator, Step};

pub use shape::{Shape, BOOK_LIST_FILE};

/// A fetchable JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Url(Url),
}

impl Location {
    /// Resolve what the user passed on the command line or in config.
    /// Directories and URL bases point at their `books.json`.
    pub fn resolve(source: &str) -> Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let mut url = Url::parse(source).map_err(|e| Error::load(source, e))?;
            if url.path().ends_with(".json") {
                return Ok(Location::Url(url));
            }
            // A base directory: make it end in '/' so the book list joins
            // underneath it rather than replacing the last segment.
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            let entry = url.join(BOOK_LIST_FILE).map_err(|e| Error::load(source, e))?;
            return Ok(Location::Url(entry));
        }

        let path = Path::new(source);
        if path.is_dir() {
            Ok(Location::File(path.join(BOOK_LIST_FILE)))
        } else {
            Ok(Location::File(path.to_path_buf()))
        }
    }

    /// A document next to this one, e.g. a book file beside `books.json`.
    pub fn sibling(&self, file_name: &str) -> Result<Self> {
        match self {
            Location::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::File(dir.join(file_name)))
            }
            Location::Url(url) => url
                .join(file_name)
                .map(Location::Url)
                .map_err(|e| Error::load(file_name, e)),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Url(url) => write!(f, "{}", url),
        }
    }
}

pub struct DataLoader {
    entry: Location,
    shape: Option<Shape>,
    client: reqwest::Client,
}

impl DataLoader {
    pub fn new(source: &str, shape: Option<Shape>) -> Result<Self> {
        Ok(Self {
            entry: Location::resolve(source)?,
            shape,
            client: reqwest::Client::new(),
        })
    }

    pub fn entry(&self) -> &Location {
        &self.entry
    }

    /// The layout in use; known after `load` when it was not configured.
    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    /// Fetch the entry document and build the Bible. For the split layout
    /// only the book names are known afterwards.
    /// Any failure here is reported as `Error::BookList`.
    pub async fn load(&mut self) -> Result<Bible> {
        let what = self.entry.to_string();
        let value = self
            .fetch_json(&self.entry)
            .await
            .map_err(Error::into_book_list)?;

        let shape = match self.shape {
            Some(shape) => shape,
            None => Shape::detect(&value).ok_or_else(|| Error::BookList {
                what: what.clone(),
                reason: "unrecognized data layout".to_string(),
            })?,
        };
        self.shape = Some(shape);

        let bible = shape
            .parse_bible(&what, value)
            .map_err(Error::into_book_list)?;
        info!(
            "Loaded {} books ({} with contents) from {} as {:?}",
            bible.len(),
            bible.loaded_count(),
            what,
            shape
        );
        Ok(bible)
    }

    /// Fetch one book's contents.
    pub async fn load_book(&self, name: &str) -> Result<Book> {
        let shape = self.shape.unwrap_or(Shape::Split);
        let location = if shape.is_lazy() {
            self.entry.sibling(&format!("{}.json", name))?
        } else {
            self.entry.clone()
        };

        let what = location.to_string();
        let value = self.fetch_json(&location).await?;
        let book = shape.parse_book(name, &what, value)?;
        debug!("Loaded book {} ({} chapters)", name, book.chapter_count());
        Ok(book)
    }

    /// Make sure the book at `index` has contents, fetching it if needed.
    pub async fn ensure_book(&self, nav: &mut Navigator, index: usize) -> Result<()> {
        if nav.bible().is_loaded(index) {
            return Ok(());
        }
        let name = nav
            .bible()
            .name(index)
            .ok_or(Error::OutOfRange {
                level: Level::Book,
                index,
                len: nav.bible().len(),
            })?
            .to_string();

        match self.load_book(&name).await {
            Ok(book) => nav.insert_book(index, book),
            Err(e) => {
                warn!("Failed to load book {}: {}", name, e);
                Err(e)
            }
        }
    }

    /// Select a book by index, fetching its contents first.
    pub async fn select_book(&self, nav: &mut Navigator, index: usize) -> Result<()> {
        self.ensure_book(nav, index).await?;
        nav.select_position(index, None, None)
    }

    /// Select by name and numbers, fetching the book first if needed.
    pub async fn lookup(
        &self,
        nav: &mut Navigator,
        book_name: &str,
        chapter_number: u32,
        verse_number: Option<u32>,
    ) -> Result<()> {
        let index = nav
            .bible()
            .find_book(book_name)
            .ok_or_else(|| Error::not_found(Level::Book, book_name))?;
        self.ensure_book(nav, index).await?;
        nav.select_reference(book_name, chapter_number, verse_number)
    }

    /// `Navigator::step_next`, loading the next book when the step crosses
    /// into one that has not been fetched. A failed fetch aborts the step.
    pub async fn step_next(&self, nav: &mut Navigator) -> Result<Step> {
        self.step(nav, true).await
    }

    pub async fn step_previous(&self, nav: &mut Navigator) -> Result<Step> {
        self.step(nav, false).await
    }

    async fn step(&self, nav: &mut Navigator, forward: bool) -> Result<Step> {
        if let Some((index, _)) = nav.pending_book(forward) {
            self.ensure_book(nav, index).await?;
        }
        if forward {
            nav.step_next()
        } else {
            nav.step_previous()
        }
    }

    async fn fetch_json(&self, location: &Location) -> Result<Value> {
        debug!("Fetching {}", location);
        let what = location.to_string();

        match location {
            Location::File(path) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| Error::load(&what, e))?;
                serde_json::from_str(&content).map_err(|e| Error::load(&what, e))
            }
            Location::Url(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| Error::load(&what, e))?;

                if !response.status().is_success() {
                    return Err(Error::load(
                        &what,
                        format!("HTTP error! status: {}", response.status().as_u16()),
                    ));
                }

                response.json().await.map_err(|e| Error::load(&what, e))
            }
        }
    }
}
