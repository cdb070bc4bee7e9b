//! Position tracking over a loaded Bible
//!
//! The navigator owns the one piece of mutable state in the program: which
//! book, chapter and verse the reader is looking at. Selection sets it
//! directly, stepping walks the flattened reading order one verse at a time
//! and rolls over chapter and book boundaries. Nothing here performs I/O; a
//! step into a book whose file has not been fetched reports
//! `Error::BookNotLoaded` and leaves the position alone so the caller can
//! load it and retry.

use log::debug;
use std::cmp::Ordering;

use crate::bible::{Bible, Book, Chapter, Verse};
use crate::error::{Error, Level, Result};

/// Zero-based indices of the verse being viewed. `None` means not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub book: Option<usize>,
    pub chapter: Option<usize>,
    pub verse: Option<usize>,
}

impl Position {
    pub const UNSET: Position = Position {
        book: None,
        chapter: None,
        verse: None,
    };

    pub fn at(book: usize, chapter: usize, verse: usize) -> Self {
        Self {
            book: Some(book),
            chapter: Some(chapter),
            verse: Some(verse),
        }
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    /// All three indices, when the position is fully set.
    pub fn indices(&self) -> Option<(usize, usize, usize)> {
        Some((self.book?, self.chapter?, self.verse?))
    }
}

/// Outcome of a step that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Already at the first or last verse of the whole Bible.
    Boundary,
    /// No verse is selected, so there is nothing to step from.
    NotPositioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTag {
    Before,
    Current,
    After,
}

/// One line of a context window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextVerse<'a> {
    pub tag: ContextTag,
    pub book: &'a str,
    pub chapter: u32,
    pub verse: u32,
    pub text: &'a str,
}

/// A typed reference such as `창세기 1:3` or `1 Samuel 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub book: String,
    pub chapter: u32,
    pub verse: Option<u32>,
}

impl Reference {
    /// Parse `<book> <chapter>[:<verse>]`. The book name may contain spaces;
    /// the numbers follow the last one.
    pub fn parse(input: &str) -> Option<Self> {
        let (book, numbers) = input.trim().rsplit_once(char::is_whitespace)?;
        let book = book.trim();
        if book.is_empty() {
            return None;
        }
        let (chapter, verse) = match numbers.split_once(':') {
            Some((chapter, verse)) => (chapter, Some(verse.parse().ok()?)),
            None => (numbers, None),
        };
        Some(Self {
            book: book.to_string(),
            chapter: chapter.parse().ok()?,
            verse,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    bible: Bible,
    position: Position,
}

impl Navigator {
    pub fn new(bible: Bible) -> Self {
        Self {
            bible,
            position: Position::UNSET,
        }
    }

    pub fn bible(&self) -> &Bible {
        &self.bible
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Fill in a lazily loaded book. Positions never point into unloaded
    /// books, so the current position stays valid.
    pub fn insert_book(&mut self, index: usize, book: Book) -> Result<()> {
        if self.bible.is_loaded(index) {
            debug!("book {} already loaded, keeping existing contents", index);
            return Ok(());
        }
        self.bible.insert_book(index, book)
    }

    pub fn clear(&mut self) {
        self.position = Position::UNSET;
    }

    /// Select by index. An omitted chapter leaves chapter and verse unset;
    /// an omitted verse leaves the verse unset. A verse without a chapter is
    /// ignored.
    pub fn select_position(
        &mut self,
        book: usize,
        chapter: Option<usize>,
        verse: Option<usize>,
    ) -> Result<()> {
        let book_count = self.bible.len();
        if book >= book_count {
            return Err(Error::OutOfRange {
                level: Level::Book,
                index: book,
                len: book_count,
            });
        }

        let Some(chapter) = chapter else {
            self.position = Position {
                book: Some(book),
                chapter: None,
                verse: None,
            };
            return Ok(());
        };

        let contents = self.bible.loaded_book(book)?;
        let current = contents.chapters.get(chapter).ok_or(Error::OutOfRange {
            level: Level::Chapter,
            index: chapter,
            len: contents.chapter_count(),
        })?;

        if let Some(verse) = verse {
            if verse >= current.verse_count() {
                return Err(Error::OutOfRange {
                    level: Level::Verse,
                    index: verse,
                    len: current.verse_count(),
                });
            }
        }

        self.position = Position {
            book: Some(book),
            chapter: Some(chapter),
            verse,
        };
        debug!("selected {:?}", self.position);
        Ok(())
    }

    /// Select by book name and chapter/verse numbers as a reader types them.
    pub fn select_reference(
        &mut self,
        book_name: &str,
        chapter_number: u32,
        verse_number: Option<u32>,
    ) -> Result<()> {
        let book = self
            .bible
            .find_book(book_name)
            .ok_or_else(|| Error::not_found(Level::Book, book_name))?;
        let contents = self.bible.loaded_book(book)?;
        let chapter = contents
            .chapter_index(chapter_number)
            .ok_or_else(|| Error::not_found(Level::Chapter, chapter_number))?;

        let verse = match verse_number {
            Some(number) => Some(
                contents.chapters[chapter]
                    .verse_index(number)
                    .ok_or_else(|| Error::not_found(Level::Verse, number))?,
            ),
            None => None,
        };

        self.position = Position {
            book: Some(book),
            chapter: Some(chapter),
            verse,
        };
        debug!("selected {} -> {:?}", book_name, self.position);
        Ok(())
    }

    pub fn step_next(&mut self) -> Result<Step> {
        if self.position.indices().is_none() {
            return Ok(Step::NotPositioned);
        }
        match self.next_position()? {
            Some(next) => {
                debug!("step next {:?} -> {:?}", self.position, next);
                self.position = next;
                Ok(Step::Moved)
            }
            None => Ok(Step::Boundary),
        }
    }

    pub fn step_previous(&mut self) -> Result<Step> {
        if self.position.indices().is_none() {
            return Ok(Step::NotPositioned);
        }
        match self.previous_position()? {
            Some(previous) => {
                debug!("step previous {:?} -> {:?}", self.position, previous);
                self.position = previous;
                Ok(Step::Moved)
            }
            None => Ok(Step::Boundary),
        }
    }

    /// False exactly when `step_next` would leave the position unchanged
    /// without an error.
    pub fn can_step_next(&self) -> bool {
        !matches!(self.next_position(), Ok(None))
    }

    pub fn can_step_previous(&self) -> bool {
        !matches!(self.previous_position(), Ok(None))
    }

    /// The book a step in the given direction needs but does not have yet.
    pub fn pending_book(&self, forward: bool) -> Option<(usize, &str)> {
        let result = if forward {
            self.next_position()
        } else {
            self.previous_position()
        };
        match result {
            Err(Error::BookNotLoaded { index, .. }) => {
                self.bible.name(index).map(|name| (index, name))
            }
            _ => None,
        }
    }

    fn next_position(&self) -> Result<Option<Position>> {
        let Some((b, c, v)) = self.position.indices() else {
            return Ok(None);
        };
        let book = self.bible.loaded_book(b)?;

        if v + 1 < book.chapters[c].verse_count() {
            Ok(Some(Position::at(b, c, v + 1)))
        } else if c + 1 < book.chapter_count() {
            Ok(Some(Position::at(b, c + 1, 0)))
        } else if b + 1 < self.bible.len() {
            self.bible.loaded_book(b + 1)?;
            Ok(Some(Position::at(b + 1, 0, 0)))
        } else {
            Ok(None)
        }
    }

    fn previous_position(&self) -> Result<Option<Position>> {
        let Some((b, c, v)) = self.position.indices() else {
            return Ok(None);
        };
        let book = self.bible.loaded_book(b)?;

        if v > 0 {
            Ok(Some(Position::at(b, c, v - 1)))
        } else if c > 0 {
            let last_verse = book.chapters[c - 1].verse_count().saturating_sub(1);
            Ok(Some(Position::at(b, c - 1, last_verse)))
        } else if b > 0 {
            let previous = self.bible.loaded_book(b - 1)?;
            let last_chapter = previous.chapter_count().saturating_sub(1);
            let last_verse = previous.chapters[last_chapter]
                .verse_count()
                .saturating_sub(1);
            Ok(Some(Position::at(b - 1, last_chapter, last_verse)))
        } else {
            Ok(None)
        }
    }

    pub fn current_book(&self) -> Option<&Book> {
        self.bible.book(self.position.book?)
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.current_book()?.chapters.get(self.position.chapter?)
    }

    pub fn current_verse(&self) -> Option<&Verse> {
        self.current_chapter()?.verses.get(self.position.verse?)
    }

    /// Human-readable reference such as `창세기 1:3`, or as much of it as is
    /// selected.
    pub fn reference(&self) -> Option<String> {
        let name = self.bible.name(self.position.book?)?;
        let Some(chapter) = self.current_chapter() else {
            return Some(name.to_string());
        };
        Some(match self.current_verse() {
            Some(verse) => format!("{} {}:{}", name, chapter.number, verse.number),
            None => format!("{} {}", name, chapter.number),
        })
    }

    /// The current verse with up to `radius` neighbours on each side, never
    /// leaving the current chapter.
    pub fn context_window(&self, radius: usize) -> Vec<ContextVerse<'_>> {
        let Some((b, _, v)) = self.position.indices() else {
            return Vec::new();
        };
        let (Some(name), Some(chapter)) = (self.bible.name(b), self.current_chapter()) else {
            return Vec::new();
        };

        let start = v.saturating_sub(radius);
        let end = v.saturating_add(radius).saturating_add(1).min(chapter.verse_count());

        chapter.verses[start..end]
            .iter()
            .zip(start..)
            .map(|(verse, index)| ContextVerse {
                tag: match index.cmp(&v) {
                    Ordering::Less => ContextTag::Before,
                    Ordering::Equal => ContextTag::Current,
                    Ordering::Greater => ContextTag::After,
                },
                book: name,
                chapter: chapter.number,
                verse: verse.number,
                text: &verse.text,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible::tests::book;

    fn two_books() -> Navigator {
        // Book A: one chapter, three verses. Book B: one chapter, one verse.
        Navigator::new(Bible::from_books(vec![book("A", &[3]), book("B", &[1])]).unwrap())
    }

    fn sample() -> Navigator {
        Navigator::new(
            Bible::from_books(vec![
                book("A", &[3, 1, 2]),
                book("B", &[1]),
                book("C", &[2, 4, 1, 1, 3]),
            ])
            .unwrap(),
        )
    }

    fn all_positions(nav: &Navigator) -> Vec<Position> {
        let bible = nav.bible();
        let mut positions = Vec::new();
        for b in 0..bible.len() {
            for (c, chapter) in bible.book(b).unwrap().chapters.iter().enumerate() {
                for v in 0..chapter.verse_count() {
                    positions.push(Position::at(b, c, v));
                }
            }
        }
        positions
    }

    fn go(nav: &mut Navigator, position: Position) {
        nav.select_position(
            position.book.unwrap(),
            position.chapter,
            position.verse,
        )
        .unwrap();
    }

    #[test]
    fn test_starts_unset() {
        let nav = sample();
        assert!(nav.position().is_unset());
        assert!(!nav.can_step_next());
        assert!(!nav.can_step_previous());
        assert!(nav.context_window(2).is_empty());
        assert_eq!(nav.reference(), None);
    }

    #[test]
    fn test_step_while_unset_is_noop() {
        let mut nav = sample();
        assert_eq!(nav.step_next().unwrap(), Step::NotPositioned);
        assert_eq!(nav.step_previous().unwrap(), Step::NotPositioned);
        assert!(nav.position().is_unset());
    }

    #[test]
    fn test_step_with_partial_position_is_noop() {
        let mut nav = sample();
        nav.select_position(0, Some(1), None).unwrap();
        assert!(!nav.can_step_next());
        assert_eq!(nav.step_next().unwrap(), Step::NotPositioned);
        assert_eq!(nav.position().chapter, Some(1));
    }

    #[test]
    fn test_can_step_agrees_with_step() {
        let nav = sample();
        for position in all_positions(&nav) {
            let mut forward = nav.clone();
            go(&mut forward, position);
            let can_next = forward.can_step_next();
            let moved = forward.step_next().unwrap() == Step::Moved;
            assert_eq!(can_next, moved, "next at {:?}", position);
            assert_eq!(moved, forward.position() != position);

            let mut backward = nav.clone();
            go(&mut backward, position);
            let can_previous = backward.can_step_previous();
            let moved = backward.step_previous().unwrap() == Step::Moved;
            assert_eq!(can_previous, moved, "previous at {:?}", position);
            assert_eq!(moved, backward.position() != position);
        }
    }

    #[test]
    fn test_next_then_previous_restores_position() {
        let nav = sample();
        for position in all_positions(&nav) {
            let mut walker = nav.clone();
            go(&mut walker, position);
            if walker.can_step_next() {
                walker.step_next().unwrap();
                walker.step_previous().unwrap();
                assert_eq!(walker.position(), position);
            }
        }
    }

    #[test]
    fn test_stepping_visits_every_verse_in_reading_order() {
        let mut nav = sample();
        let expected = all_positions(&nav);
        nav.select_position(0, Some(0), Some(0)).unwrap();

        let mut visited = vec![nav.position()];
        while nav.step_next().unwrap() == Step::Moved {
            visited.push(nav.position());
        }
        assert_eq!(visited, expected);

        let mut reversed = vec![nav.position()];
        while nav.step_previous().unwrap() == Step::Moved {
            reversed.push(nav.position());
        }
        reversed.reverse();
        assert_eq!(reversed, expected);
    }

    #[test]
    fn test_rollover_into_next_book() {
        let mut nav = two_books();
        nav.select_reference("A", 1, Some(3)).unwrap();

        assert_eq!(nav.step_next().unwrap(), Step::Moved);
        assert_eq!(nav.position(), Position::at(1, 0, 0));
        assert_eq!(nav.reference().as_deref(), Some("B 1:1"));

        assert!(!nav.can_step_next());
        assert_eq!(nav.step_next().unwrap(), Step::Boundary);
        assert_eq!(nav.position(), Position::at(1, 0, 0));
    }

    #[test]
    fn test_previous_lands_on_last_verse_of_previous_chapter() {
        let mut nav = sample();
        nav.select_position(2, Some(1), Some(0)).unwrap();
        nav.step_previous().unwrap();
        assert_eq!(nav.position(), Position::at(2, 0, 1));

        nav.select_position(2, Some(0), Some(0)).unwrap();
        nav.step_previous().unwrap();
        assert_eq!(nav.position(), Position::at(1, 0, 0));

        nav.step_previous().unwrap();
        assert_eq!(nav.position(), Position::at(0, 2, 1));
    }

    #[test]
    fn test_first_verse_is_terminal() {
        let mut nav = sample();
        nav.select_position(0, Some(0), Some(0)).unwrap();
        assert!(!nav.can_step_previous());
        assert_eq!(nav.step_previous().unwrap(), Step::Boundary);
        assert_eq!(nav.position(), Position::at(0, 0, 0));
    }

    #[test]
    fn test_out_of_range_chapter_leaves_position() {
        let mut nav = sample();
        nav.select_position(0, Some(0), Some(1)).unwrap();

        let err = nav.select_position(0, Some(3), None).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                level: Level::Chapter,
                index: 3,
                len: 3
            }
        ));
        assert_eq!(nav.position(), Position::at(0, 0, 1));

        assert!(nav.select_position(9, None, None).is_err());
        assert!(nav.select_position(0, Some(1), Some(1)).is_err());
        assert_eq!(nav.position(), Position::at(0, 0, 1));
    }

    #[test]
    fn test_book_only_selection_is_partial() {
        let mut nav = sample();
        nav.select_position(1, None, Some(4)).unwrap();
        assert_eq!(
            nav.position(),
            Position {
                book: Some(1),
                chapter: None,
                verse: None
            }
        );
        assert_eq!(nav.reference().as_deref(), Some("B"));

        nav.clear();
        assert!(nav.position().is_unset());
    }

    #[test]
    fn test_missing_chapter_number_not_found() {
        let mut nav = sample();
        nav.select_reference("C", 2, Some(3)).unwrap();

        let err = nav.select_reference("C", 99, None).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                level: Level::Chapter,
                ..
            }
        ));
        assert_eq!(nav.position(), Position::at(2, 1, 2));

        assert!(matches!(
            nav.select_reference("C", 2, Some(5)),
            Err(Error::NotFound {
                level: Level::Verse,
                ..
            })
        ));
        assert!(matches!(
            nav.select_reference("Z", 1, None),
            Err(Error::NotFound {
                level: Level::Book,
                ..
            })
        ));
        assert_eq!(nav.position(), Position::at(2, 1, 2));
    }

    #[test]
    fn test_reference_without_verse_selects_chapter() {
        let mut nav = sample();
        nav.select_reference("C", 5, None).unwrap();
        assert_eq!(nav.current_chapter().unwrap().verse_count(), 3);
        assert_eq!(nav.current_verse(), None);
        assert_eq!(nav.reference().as_deref(), Some("C 5"));
    }

    #[test]
    fn test_context_window_middle_of_chapter() {
        let mut nav = two_books();
        nav.select_reference("A", 1, Some(2)).unwrap();

        let window = nav.context_window(2);
        let tags: Vec<_> = window.iter().map(|c| (c.tag, c.verse)).collect();
        assert_eq!(
            tags,
            vec![
                (ContextTag::Before, 1),
                (ContextTag::Current, 2),
                (ContextTag::After, 3),
            ]
        );
        assert_eq!(window[1].book, "A");
        assert_eq!(window[1].text, "A 1:2");
    }

    #[test]
    fn test_context_window_clamps_at_chapter_edges() {
        let mut nav = sample();
        nav.select_reference("C", 2, Some(1)).unwrap();
        let window = nav.context_window(2);
        assert!(window.iter().all(|c| c.tag != ContextTag::Before));
        assert_eq!(
            window.iter().filter(|c| c.tag == ContextTag::After).count(),
            2
        );

        nav.select_reference("C", 2, Some(4)).unwrap();
        let window = nav.context_window(2);
        assert!(window.iter().all(|c| c.tag != ContextTag::After));
        assert_eq!(
            window.iter().filter(|c| c.tag == ContextTag::Before).count(),
            2
        );
        assert!(window.iter().all(|c| c.chapter == 2));
    }

    #[test]
    fn test_context_window_radius_zero_and_huge() {
        let mut nav = sample();
        nav.select_reference("C", 2, Some(2)).unwrap();
        assert_eq!(nav.context_window(0).len(), 1);
        assert_eq!(nav.context_window(usize::MAX).len(), 4);
    }

    #[test]
    fn test_step_into_unloaded_book_is_reported() {
        let mut bible = Bible::from_names(vec!["A".into(), "B".into()]).unwrap();
        bible.insert_book(0, book("A", &[1])).unwrap();
        let mut nav = Navigator::new(bible);
        nav.select_position(0, Some(0), Some(0)).unwrap();

        assert!(nav.can_step_next());
        assert_eq!(nav.pending_book(true), Some((1, "B")));
        assert_eq!(nav.pending_book(false), None);
        assert!(matches!(
            nav.step_next(),
            Err(Error::BookNotLoaded { index: 1, .. })
        ));
        assert_eq!(nav.position(), Position::at(0, 0, 0));

        nav.insert_book(1, book("B", &[2])).unwrap();
        assert_eq!(nav.step_next().unwrap(), Step::Moved);
        assert_eq!(nav.position(), Position::at(1, 0, 0));
    }

    #[test]
    fn test_select_chapter_in_unloaded_book() {
        let mut nav = Navigator::new(Bible::from_names(vec!["A".into()]).unwrap());
        nav.select_position(0, None, None).unwrap();
        assert!(matches!(
            nav.select_position(0, Some(0), None),
            Err(Error::BookNotLoaded { .. })
        ));
        assert_eq!(nav.position().chapter, None);
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            Reference::parse("창세기 1:3"),
            Some(Reference {
                book: "창세기".into(),
                chapter: 1,
                verse: Some(3),
            })
        );
        assert_eq!(
            Reference::parse("  1 Samuel 3 "),
            Some(Reference {
                book: "1 Samuel".into(),
                chapter: 3,
                verse: None,
            })
        );
        assert_eq!(Reference::parse("C"), None);
        assert_eq!(Reference::parse("C 2:"), None);
        assert_eq!(Reference::parse("C two"), None);
        assert_eq!(Reference::parse(" 5"), None);
    }
}
