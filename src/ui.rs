use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use bible_lookup::{ContextTag, Message};
use crate::app::{App, FocusPane, InputMode};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    // Selectors on the left, verse text on the right
    let [selector_area, content_area] = Layout::horizontal([
        Constraint::Length(28),
        Constraint::Min(0),
    ])
    .areas(body_area);

    render_header(app, frame, header_area);
    render_selectors(app, frame, selector_area);
    render_content(app, frame, content_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let bible = app.navigator.bible();
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", app.text(Message::Title)),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("[{}/{}] ", bible.loaded_count(), bible.len()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn selector_block(app: &App, pane: FocusPane, title: Message) -> Block<'static> {
    let border_color = if app.focus == pane { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", app.text(title)))
}

fn selector_list<'a>(items: Vec<ListItem<'a>>, block: Block<'a>) -> List<'a> {
    List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
}

fn render_selectors(app: &mut App, frame: &mut Frame, area: Rect) {
    let [books_area, chapters_area, verses_area] = Layout::vertical([
        Constraint::Percentage(50),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .areas(area);

    let position = app.navigator.position();
    let selected_style = Style::default().fg(Color::Yellow);

    let books: Vec<ListItem> = app
        .book_names()
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let item = ListItem::new(format!(" {} ", name));
            if position.book == Some(i) { item.style(selected_style) } else { item }
        })
        .collect();
    let chapters: Vec<ListItem> = app
        .chapter_numbers()
        .into_iter()
        .enumerate()
        .map(|(i, n)| {
            let item = ListItem::new(format!(" {} ", n));
            if position.chapter == Some(i) { item.style(selected_style) } else { item }
        })
        .collect();
    let verses: Vec<ListItem> = app
        .verse_numbers()
        .into_iter()
        .enumerate()
        .map(|(i, n)| {
            let item = ListItem::new(format!(" {} ", n));
            if position.verse == Some(i) { item.style(selected_style) } else { item }
        })
        .collect();

    let books = selector_list(books, selector_block(app, FocusPane::Books, Message::Books));
    let chapters = selector_list(
        chapters,
        selector_block(app, FocusPane::Chapters, Message::Chapters),
    );
    let verses = selector_list(verses, selector_block(app, FocusPane::Verses, Message::Verses));

    frame.render_stateful_widget(books, books_area, &mut app.book_state);
    frame.render_stateful_widget(chapters, chapters_area, &mut app.chapter_state);
    frame.render_stateful_widget(verses, verses_area, &mut app.verse_state);
}

/// Lines for the content pane: the context window around the current verse,
/// or the whole chapter while no verse is chosen.
fn content_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if app.navigator.current_verse().is_some() {
        for entry in app.navigator.context_window(app.context_radius) {
            let (num_style, text_style) = match entry.tag {
                ContextTag::Current => (
                    Style::default().fg(Color::Black).bg(Color::Yellow).bold(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                ContextTag::Before | ContextTag::After => (
                    Style::default().fg(Color::Yellow),
                    Style::default().fg(Color::Gray),
                ),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}:{}  ", entry.chapter, entry.verse), num_style),
                Span::styled(entry.text.to_string(), text_style),
            ]));
            lines.push(Line::default());
        }
    } else if let Some(chapter) = app.navigator.current_chapter() {
        for verse in &chapter.verses {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}:{}  ", chapter.number, verse.number),
                    Style::default().fg(Color::Yellow).bold(),
                ),
                Span::raw(verse.text.clone()),
            ]));
            lines.push(Line::default());
        }
    }

    lines
}

fn render_content(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.content_title()));

    let placeholder = if app.is_loading() {
        Some(Message::Loading)
    } else if app.navigator.current_chapter().is_none() {
        Some(Message::SelectPrompt)
    } else {
        None
    };

    if let Some(message) = placeholder {
        let paragraph = Paragraph::new(app.text(message))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let lines = content_lines(app);
    let max_scroll = (lines.len() as u16).saturating_sub(1);
    app.content_scroll = app.content_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.content_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    if app.input_mode == InputMode::Editing {
        let prompt = Line::from(vec![
            Span::styled(
                format!(" {}: ", app.text(Message::LookupPrompt)),
                Style::default().fg(Color::Cyan).bold(),
            ),
            Span::raw(app.lookup_input.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]);
        frame.render_widget(Paragraph::new(prompt), area);
        return;
    }

    let control = |enabled: bool, label: Message, key: &str| {
        let style = if enabled {
            Style::default().fg(Color::Green).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!(" {} {} ", key, app.text(label)), style)
    };

    let mut spans = vec![
        control(app.navigator.can_step_previous(), Message::Previous, "[p]"),
        control(app.navigator.can_step_next(), Message::Next, "[n]"),
        Span::styled(
            format!(" ±{} ", app.context_radius),
            Style::default().fg(Color::Cyan),
        ),
    ];

    match &app.status {
        Some(status) => {
            let color = if status.is_error { Color::Red } else { Color::Yellow };
            spans.push(Span::styled(format!(" {}", status.text), Style::default().fg(color)));
        }
        None => spans.push(Span::styled(
            format!(" {}", app.text(Message::KeyHint)),
            Style::default().fg(Color::DarkGray),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
