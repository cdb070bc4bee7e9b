use bible_lookup::{DataLoader, Locale, Message, Navigator, Reference, Step};
use ratatui::widgets::ListState;
use crate::config::Config;

/// Largest context radius the +/- keys will reach.
pub const MAX_CONTEXT_RADIUS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Books,
    Chapters,
    Verses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a reference into the lookup prompt.
    Editing,
}

/// Work that needs the data loader and runs between draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    SelectBook(usize),
    Step { forward: bool },
    Lookup(Reference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub input_mode: InputMode,
    pub locale: Locale,

    // Selector cursors
    pub book_state: ListState,
    pub chapter_state: ListState,
    pub verse_state: ListState,

    // Content state
    pub context_radius: usize,
    pub content_scroll: u16,
    pub status: Option<Status>,
    pub pending: Option<Pending>,
    pub lookup_input: String,

    // Data
    pub navigator: Navigator,
}

impl App {
    pub fn new(navigator: Navigator, locale: Locale, context_radius: usize) -> Self {
        let mut book_state = ListState::default();
        if !navigator.bible().is_empty() {
            book_state.select(Some(0));
        }

        Self {
            should_quit: false,
            focus: FocusPane::Books,
            input_mode: InputMode::Normal,
            locale,

            book_state,
            chapter_state: ListState::default(),
            verse_state: ListState::default(),

            context_radius: context_radius.min(MAX_CONTEXT_RADIUS),
            content_scroll: 0,
            status: None,
            pending: None,
            lookup_input: String::new(),

            navigator,
        }
    }

    pub fn text(&self, message: Message) -> &'static str {
        message.text(self.locale)
    }

    // Derived selector contents
    pub fn book_names(&self) -> Vec<&str> {
        self.navigator.bible().book_names()
    }

    pub fn chapter_numbers(&self) -> Vec<u32> {
        self.navigator
            .position()
            .book
            .map(|b| self.navigator.bible().chapter_numbers(b))
            .unwrap_or_default()
    }

    pub fn verse_numbers(&self) -> Vec<u32> {
        let position = self.navigator.position();
        match (position.book, position.chapter) {
            (Some(b), Some(c)) => self.navigator.bible().verse_numbers(b, c),
            _ => Vec::new(),
        }
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            FocusPane::Books => self.navigator.bible().len(),
            FocusPane::Chapters => self.chapter_numbers().len(),
            FocusPane::Verses => self.verse_numbers().len(),
        }
    }

    fn focused_state(&mut self) -> &mut ListState {
        match self.focus {
            FocusPane::Books => &mut self.book_state,
            FocusPane::Chapters => &mut self.chapter_state,
            FocusPane::Verses => &mut self.verse_state,
        }
    }

    // Cursor movement
    pub fn nav_down(&mut self) {
        let len = self.focused_len();
        if len > 0 {
            let state = self.focused_state();
            let i = state.selected().unwrap_or(0);
            state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn nav_up(&mut self) {
        if self.focused_len() > 0 {
            let state = self.focused_state();
            let i = state.selected().unwrap_or(0);
            state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn nav_first(&mut self) {
        if self.focused_len() > 0 {
            self.focused_state().select(Some(0));
        }
    }

    pub fn nav_last(&mut self) {
        let len = self.focused_len();
        if len > 0 {
            self.focused_state().select(Some(len - 1));
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusPane::Books => FocusPane::Chapters,
            FocusPane::Chapters => FocusPane::Verses,
            FocusPane::Verses => FocusPane::Books,
        };
        self.ensure_cursor();
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FocusPane::Books => FocusPane::Verses,
            FocusPane::Chapters => FocusPane::Books,
            FocusPane::Verses => FocusPane::Chapters,
        };
        self.ensure_cursor();
    }

    fn ensure_cursor(&mut self) {
        if self.focused_len() > 0 && self.focused_state().selected().is_none() {
            self.focused_state().select(Some(0));
        }
    }

    /// Enter on the focused selector.
    pub fn nav_enter(&mut self) {
        self.status = None;
        match self.focus {
            FocusPane::Books => {
                if let Some(book) = self.book_state.selected() {
                    self.pending = Some(Pending::SelectBook(book));
                }
            }
            FocusPane::Chapters => {
                let (Some(book), Some(chapter)) =
                    (self.navigator.position().book, self.chapter_state.selected())
                else {
                    return;
                };
                let result = self.navigator.select_position(book, Some(chapter), None);
                if self.apply(result) {
                    self.focus = FocusPane::Verses;
                    self.verse_state.select(Some(0));
                }
            }
            FocusPane::Verses => {
                let position = self.navigator.position();
                let (Some(book), Some(chapter)) = (position.book, position.chapter) else {
                    self.set_status(Message::ChapterRequired, false);
                    return;
                };
                let Some(verse) = self.verse_state.selected() else {
                    return;
                };
                let result = self
                    .navigator
                    .select_position(book, Some(chapter), Some(verse));
                self.apply(result);
            }
        }
    }

    /// Clear the selection back to nothing chosen.
    pub fn nav_back(&mut self) {
        self.navigator.clear();
        self.focus = FocusPane::Books;
        self.chapter_state.select(None);
        self.verse_state.select(None);
        self.content_scroll = 0;
        self.status = None;
    }

    // Lookup prompt
    pub fn start_lookup(&mut self) {
        self.input_mode = InputMode::Editing;
        self.lookup_input.clear();
        self.status = None;
    }

    pub fn cancel_lookup(&mut self) {
        self.input_mode = InputMode::Normal;
        self.lookup_input.clear();
    }

    /// Parse the typed reference and queue it for the loader.
    pub fn submit_lookup(&mut self) {
        self.input_mode = InputMode::Normal;
        let input = std::mem::take(&mut self.lookup_input);
        match Reference::parse(&input) {
            Some(reference) => self.pending = Some(Pending::Lookup(reference)),
            None => {
                log::debug!("Unparsable reference {:?}", input);
                self.set_status(Message::ChapterRequired, true);
            }
        }
    }

    /// Step by one verse, deferring to the loader when the step crosses
    /// into a book that is not in memory yet.
    pub fn request_step(&mut self, forward: bool) {
        self.status = None;
        if self.navigator.pending_book(forward).is_some() {
            self.pending = Some(Pending::Step { forward });
            return;
        }
        let result = if forward {
            self.navigator.step_next()
        } else {
            self.navigator.step_previous()
        };
        self.after_step(forward, result);
    }

    fn after_step(&mut self, forward: bool, result: bible_lookup::Result<Step>) {
        match result {
            Ok(Step::Moved) => self.sync_selectors(),
            Ok(Step::Boundary) => {
                let message = if forward {
                    Message::LastVerse
                } else {
                    Message::FirstVerse
                };
                self.set_status(message, false);
            }
            Ok(Step::NotPositioned) => self.set_status(Message::NothingSelected, false),
            Err(e) => {
                self.apply(Err(e));
            }
        }
    }

    /// Run deferred work against the loader. The main loop calls this after
    /// drawing the loading message.
    pub async fn run_pending(&mut self, loader: &DataLoader) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending {
            Pending::SelectBook(book) => {
                let result = loader.select_book(&mut self.navigator, book).await;
                if self.apply(result) {
                    self.chapter_state.select(Some(0));
                    self.verse_state.select(None);
                    self.focus = FocusPane::Chapters;
                    self.content_scroll = 0;
                }
            }
            Pending::Step { forward } => {
                let result = if forward {
                    loader.step_next(&mut self.navigator).await
                } else {
                    loader.step_previous(&mut self.navigator).await
                };
                self.after_step(forward, result);
            }
            Pending::Lookup(reference) => {
                let result = loader
                    .lookup(
                        &mut self.navigator,
                        &reference.book,
                        reference.chapter,
                        reference.verse,
                    )
                    .await;
                if self.apply(result) {
                    self.sync_selectors();
                    self.focus = FocusPane::Verses;
                    if reference.verse.is_none() {
                        self.verse_state.select(Some(0));
                    }
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Point the selectors at the navigator's current position.
    pub fn sync_selectors(&mut self) {
        let position = self.navigator.position();
        self.book_state.select(position.book);
        self.chapter_state.select(position.chapter);
        self.verse_state.select(position.verse);
        self.content_scroll = 0;
    }

    /// Report an error through the status line; true when the operation
    /// succeeded.
    fn apply(&mut self, result: bible_lookup::Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}", e);
                self.set_status(Message::for_error(&e), true);
                false
            }
        }
    }

    fn set_status(&mut self, message: Message, is_error: bool) {
        self.status = Some(Status {
            text: self.text(message).to_string(),
            is_error,
        });
    }

    pub fn change_radius(&mut self, grow: bool) {
        let radius = if grow {
            (self.context_radius + 1).min(MAX_CONTEXT_RADIUS)
        } else {
            self.context_radius.saturating_sub(1)
        };
        if radius != self.context_radius {
            self.context_radius = radius;
            if let Err(e) = Config::save_context_radius(radius) {
                log::warn!("Could not save context radius: {}", e);
            }
        }
    }

    // Content scrolling
    pub fn scroll_down(&mut self) {
        self.content_scroll = self.content_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.content_scroll = self.content_scroll.saturating_sub(1);
    }

    pub fn content_title(&self) -> String {
        self.navigator
            .reference()
            .unwrap_or_else(|| self.text(Message::SelectPrompt).to_string())
    }
}
