//! Normalized Bible data model
//!
//! Every on-disk shape is converted into these types by the loader. A
//! `Bible` keeps books in canonical order; in the split layout a book starts
//! out as a name only and its chapters are filled in when its file arrives.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Level, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// Build a chapter whose verse numbers follow their position (1-based).
    pub fn from_texts(number: u32, texts: Vec<String>) -> Self {
        let verses = texts
            .into_iter()
            .zip(1u32..)
            .map(|(text, number)| Verse { number, text })
            .collect();
        Self { number, verses }
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    pub fn verse_index(&self, number: u32) -> Option<usize> {
        self.verses.iter().position(|v| v.number == number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapter_index(&self, number: u32) -> Option<usize> {
        self.chapters.iter().position(|c| c.number == number)
    }

    /// Reject books the navigator cannot step through: no chapters, or a
    /// chapter without verses.
    pub fn validate(&self) -> Result<()> {
        if self.chapters.is_empty() {
            return Err(Error::load(&self.name, "book has no chapters"));
        }
        if let Some(empty) = self.chapters.iter().find(|c| c.verses.is_empty()) {
            return Err(Error::load(
                &self.name,
                format!("chapter {} has no verses", empty.number),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct BookEntry {
    name: String,
    book: Option<Book>,
}

#[derive(Debug, Clone, Default)]
pub struct Bible {
    entries: Vec<BookEntry>,
}

impl Bible {
    /// A Bible whose books are all in memory.
    pub fn from_books(books: Vec<Book>) -> Result<Self> {
        check_unique(books.iter().map(|b| b.name.as_str()))?;
        for book in &books {
            book.validate()?;
        }

        let entries = books
            .into_iter()
            .map(|book| BookEntry {
                name: book.name.clone(),
                book: Some(book),
            })
            .collect();
        Ok(Self { entries })
    }

    /// A Bible that only knows its book names; contents arrive through
    /// `insert_book`.
    pub fn from_names(names: Vec<String>) -> Result<Self> {
        check_unique(names.iter().map(String::as_str))?;

        let entries = names
            .into_iter()
            .map(|name| BookEntry { name, book: None })
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn book_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    pub fn find_book(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.book.is_some())
    }

    /// The book at `index`, if it exists and has been loaded.
    pub fn book(&self, index: usize) -> Option<&Book> {
        self.entries.get(index).and_then(|e| e.book.as_ref())
    }

    /// Like `book`, but says why the book is unavailable.
    pub fn loaded_book(&self, index: usize) -> Result<&Book> {
        let entry = self.entries.get(index).ok_or(Error::OutOfRange {
            level: Level::Book,
            index,
            len: self.entries.len(),
        })?;
        entry.book.as_ref().ok_or_else(|| Error::BookNotLoaded {
            index,
            name: entry.name.clone(),
        })
    }

    /// Fill in the contents of the book at `index`. The entry keeps its
    /// listed name even if the file spells it differently.
    pub fn insert_book(&mut self, index: usize, mut book: Book) -> Result<()> {
        let len = self.entries.len();
        let entry = self.entries.get_mut(index).ok_or(Error::OutOfRange {
            level: Level::Book,
            index,
            len,
        })?;
        book.validate()?;
        book.name = entry.name.clone();
        entry.book = Some(book);
        Ok(())
    }

    pub fn chapter_numbers(&self, book: usize) -> Vec<u32> {
        self.book(book)
            .map(|b| b.chapters.iter().map(|c| c.number).collect())
            .unwrap_or_default()
    }

    pub fn verse_numbers(&self, book: usize, chapter: usize) -> Vec<u32> {
        self.book(book)
            .and_then(|b| b.chapters.get(chapter))
            .map(|c| c.verses.iter().map(|v| v.number).collect())
            .unwrap_or_default()
    }

    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.book.is_some()).count()
    }
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(Error::load(name, "duplicate book name"));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a book from per-chapter verse counts.
    pub(crate) fn book(name: &str, verse_counts: &[usize]) -> Book {
        let chapters = verse_counts
            .iter()
            .zip(1u32..)
            .map(|(&count, number)| {
                let texts = (1..=count)
                    .map(|v| format!("{} {}:{}", name, number, v))
                    .collect();
                Chapter::from_texts(number, texts)
            })
            .collect();
        Book {
            name: name.to_string(),
            chapters,
        }
    }

    #[test]
    fn test_from_texts_numbers_verses_by_position() {
        let chapter = Chapter::from_texts(3, vec!["a".into(), "b".into()]);
        assert_eq!(chapter.number, 3);
        assert_eq!(chapter.verses[1].number, 2);
        assert_eq!(chapter.verses[1].text, "b");
    }

    #[test]
    fn test_queries_follow_canonical_order() {
        let bible = Bible::from_books(vec![book("A", &[3, 2]), book("B", &[1])]).unwrap();
        assert_eq!(bible.book_names(), vec!["A", "B"]);
        assert_eq!(bible.chapter_numbers(0), vec![1, 2]);
        assert_eq!(bible.verse_numbers(0, 1), vec![1, 2]);
        assert_eq!(bible.find_book("B"), Some(1));
        assert!(bible.verse_numbers(5, 0).is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Bible::from_names(vec!["A".into(), "A".into()]).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }

    #[test]
    fn test_empty_chapter_rejected() {
        let err = Bible::from_books(vec![book("A", &[2, 0])]).unwrap_err();
        assert!(err.to_string().contains("chapter 2 has no verses"));
    }

    #[test]
    fn test_insert_book_fills_named_entry() {
        let mut bible = Bible::from_names(vec!["창세기".into(), "출애굽기".into()]).unwrap();
        assert!(!bible.is_loaded(1));
        assert!(matches!(
            bible.loaded_book(1),
            Err(Error::BookNotLoaded { index: 1, .. })
        ));

        bible.insert_book(1, book("Exodus", &[2])).unwrap();
        assert!(bible.is_loaded(1));
        assert_eq!(bible.loaded_book(1).unwrap().name, "출애굽기");
        assert_eq!(bible.loaded_count(), 1);
    }

    #[test]
    fn test_insert_book_out_of_range() {
        let mut bible = Bible::from_names(vec!["A".into()]).unwrap();
        let err = bible.insert_book(4, book("A", &[1])).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 4, len: 1, .. }));
    }
}
