//! User-facing strings in the reader's language.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ko,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    BookListFailed,
    DataFailed,
    ChapterRequired,
    Loading,
    BookNotFound,
    ChapterNotFound,
    VerseNotFound,
    OutOfRange,
    FirstVerse,
    LastVerse,
    NothingSelected,
    Books,
    Chapters,
    Verses,
    Previous,
    Next,
    SelectPrompt,
    Title,
    KeyHint,
    LookupPrompt,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ko => match self {
                Message::BookListFailed => "책 목록을 불러오는 데 실패했습니다.",
                Message::DataFailed => "성경 데이터를 불러오는 데 실패했습니다.",
                Message::ChapterRequired => "장을 입력해주세요.",
                Message::Loading => "검색 중...",
                Message::BookNotFound => "책을 찾을 수 없습니다.",
                Message::ChapterNotFound => "장을 찾을 수 없습니다.",
                Message::VerseNotFound => "절을 찾을 수 없습니다.",
                Message::OutOfRange => "선택 범위를 벗어났습니다.",
                Message::FirstVerse => "첫 구절입니다.",
                Message::LastVerse => "마지막 구절입니다.",
                Message::NothingSelected => "책, 장, 절을 먼저 선택해주세요.",
                Message::Books => "책",
                Message::Chapters => "장",
                Message::Verses => "절",
                Message::Previous => "이전",
                Message::Next => "다음",
                Message::SelectPrompt => "책과 장을 선택하세요",
                Message::Title => "성경 찾기",
                Message::KeyHint => "Tab 이동  Enter 선택  / 찾기  Esc 지우기  +/- 문맥  q 종료",
                Message::LookupPrompt => "찾기 (책 장:절)",
            },
            Locale::En => match self {
                Message::BookListFailed => "Failed to load the book list.",
                Message::DataFailed => "Failed to load Bible data.",
                Message::ChapterRequired => "Please enter a chapter.",
                Message::Loading => "Searching...",
                Message::BookNotFound => "Book not found.",
                Message::ChapterNotFound => "Chapter not found.",
                Message::VerseNotFound => "Verse not found.",
                Message::OutOfRange => "Selection is out of range.",
                Message::FirstVerse => "Already at the first verse.",
                Message::LastVerse => "Already at the last verse.",
                Message::NothingSelected => "Select a book, chapter and verse first.",
                Message::Books => "Books",
                Message::Chapters => "Chapters",
                Message::Verses => "Verses",
                Message::Previous => "Prev",
                Message::Next => "Next",
                Message::SelectPrompt => "Select a book and chapter",
                Message::Title => "Bible Lookup",
                Message::KeyHint => "Tab focus  Enter select  / lookup  Esc clear  +/- context  q quit",
                Message::LookupPrompt => "Lookup (book chapter:verse)",
            },
        }
    }

    /// The message shown for a failed operation.
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::BookList { .. } => Message::BookListFailed,
            Error::Load { .. } | Error::BookNotLoaded { .. } => Message::DataFailed,
            Error::OutOfRange { .. } => Message::OutOfRange,
            Error::NotFound { level, .. } => match level {
                Level::Book => Message::BookNotFound,
                Level::Chapter => Message::ChapterNotFound,
                Level::Verse => Message::VerseNotFound,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_korean() {
        assert_eq!(Locale::default(), Locale::Ko);
        assert_eq!(Message::ChapterNotFound.text(Locale::default()), "장을 찾을 수 없습니다.");
    }

    #[test]
    fn test_ui_labels_follow_locale() {
        assert_eq!(Message::Title.text(Locale::Ko), "성경 찾기");
        assert_eq!(Message::Title.text(Locale::En), "Bible Lookup");
        assert!(Message::KeyHint.text(Locale::Ko).contains("종료"));
        assert!(Message::LookupPrompt.text(Locale::En).starts_with("Lookup"));
    }

    #[test]
    fn test_error_messages() {
        let list = Error::load("Bible_KRV/index.json", "HTTP error! status: 404").into_book_list();
        assert_eq!(Message::for_error(&list), Message::BookListFailed);

        // A split-layout book that happens to be called "books"
        let book_named_books = Error::load("Bible_KRV/books.json", "expected value at line 1");
        assert_eq!(Message::for_error(&book_named_books), Message::DataFailed);

        let book = Error::load("Bible_KRV/창세기.json", "missing field `chapters`");
        assert_eq!(Message::for_error(&book).text(Locale::Ko), "성경 데이터를 불러오는 데 실패했습니다.");

        let verse = Error::not_found(Level::Verse, 40);
        assert_eq!(Message::for_error(&verse).text(Locale::En), "Verse not found.");
    }
}
