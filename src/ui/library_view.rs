use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, HighlightSpacing, List, ListItem, ListState, Padding, Paragraph,
};
use ratatui::Frame;

use crate::launcher::Launch;
use crate::ui::app::{App, Mode};
use crate::ui::command::Command;
use crate::ui::theme::Theme;

/// Lines per list row (title + description)
const ROW_HEIGHT: u16 = 2;

const COMMAND_PLACEHOLDER: &str = "commands";

/// Renders the game list and its surrounding chrome
pub struct LibraryView {
    /// Scroll position of the list widget
    list_state: ListState,
    /// Rows that fit in the list area on the last draw
    page_size: usize,
}

impl LibraryView {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            page_size: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Draw the whole screen
    pub fn render<L: Launch>(&mut self, frame: &mut Frame<'_>, app: &App<L>) {
        let theme = app.theme();

        let outer = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_type(BorderType::Rounded)
            .border_style(theme.border())
            .padding(Padding::new(2, 2, 1, 0));
        let area = outer.inner(frame.area());
        frame.render_widget(outer, frame.area());

        let help_height = if app.show_full_help() { 2 } else { 1 };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(help_height),
            ])
            .split(area);

        self.render_title(frame, layout[0], app);
        self.render_status(frame, layout[1], app);
        self.render_list(frame, layout[3], app);
        self.render_command_line(frame, layout[4], app);
        self.render_help(frame, layout[5], app);
    }

    fn render_title<L: Launch>(&self, frame: &mut Frame<'_>, area: Rect, app: &App<L>) {
        let theme = app.theme();

        let line = match app.mode() {
            Mode::Filtering => Line::from(vec![
                Span::styled("Filter: ", theme.muted()),
                Span::raw(app.filter_input().to_string()),
                Span::styled("█", theme.selection_bar()),
            ]),
            _ => {
                let mut spans = vec![Span::styled(" Games ", theme.title_bar())];
                if !app.list().filter().is_empty() {
                    spans.push(Span::styled(
                        format!("  “{}”", app.list().filter()),
                        theme.muted(),
                    ));
                }
                Line::from(spans)
            }
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status<L: Launch>(&self, frame: &mut Frame<'_>, area: Rect, app: &App<L>) {
        let theme = app.theme();

        let line = match app.status() {
            Some(text) => Line::styled(text.to_string(), theme.status()),
            None => {
                let list = app.list();
                let noun = if list.visible_len() == 1 { "item" } else { "items" };
                let mut text = format!("{} {}", list.visible_len(), noun);
                if !list.filter().is_empty() {
                    text.push_str(" • filtered");
                }
                Line::styled(text, theme.muted())
            }
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_list<L: Launch>(&mut self, frame: &mut Frame<'_>, area: Rect, app: &App<L>) {
        let theme = app.theme();
        let list = app.list();
        self.page_size = usize::from((area.height / ROW_HEIGHT).max(1));

        if list.is_empty() {
            frame.render_widget(Paragraph::new(Line::styled("No items.", theme.muted())), area);
            return;
        }

        let selected = list.selected_index();
        let rows: Vec<ListItem> = list
            .visible()
            .enumerate()
            .map(|(i, item)| {
                let is_selected = Some(i) == selected;
                ListItem::new(vec![
                    Line::styled(item.title().to_string(), theme.item_title(is_selected)),
                    Line::styled(
                        item.description().to_string(),
                        theme.item_description(is_selected),
                    ),
                ])
            })
            .collect();

        self.list_state.select(selected);

        let widget = List::new(rows)
            .highlight_symbol("│ ")
            .highlight_style(Style::default())
            .highlight_spacing(HighlightSpacing::Always)
            .repeat_highlight_symbol(true);

        frame.render_stateful_widget(widget, area, &mut self.list_state);
    }

    fn render_command_line<L: Launch>(&self, frame: &mut Frame<'_>, area: Rect, app: &App<L>) {
        let theme = app.theme();
        let focused = app.mode() == Mode::Command;

        let mut spans = vec![Span::styled("> ", theme.selection_bar())];
        if app.command_input().is_empty() && !focused {
            spans.push(Span::styled(COMMAND_PLACEHOLDER, theme.muted()));
        } else {
            spans.push(Span::raw(app.command_input().to_string()));
        }
        if focused && app.cursor_visible() {
            spans.push(Span::styled("█", theme.selection_bar()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help<L: Launch>(&self, frame: &mut Frame<'_>, area: Rect, app: &App<L>) {
        let theme = app.theme();

        let mut lines = vec![help_line(
            theme,
            &[
                ("enter", "choose"),
                ("ctrl+f", "toggle commands"),
                ("/", "filter"),
                ("q", "quit"),
                ("?", if app.show_full_help() { "close help" } else { "more" }),
            ],
        )];

        if app.show_full_help() {
            let mut bindings = vec![("COMMANDS:", "")];
            bindings.extend(Command::ALL.iter().map(|c| (c.keyword(), c.help())));
            lines.push(help_line(theme, &bindings));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Default for LibraryView {
    fn default() -> Self {
        Self::new()
    }
}

/// `key desc • key desc • ...`
fn help_line(theme: &Theme, bindings: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();

    for (i, (key, desc)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", theme.muted()));
        }
        spans.push(Span::styled(key.to_string(), theme.selection_bar()));
        if !desc.is_empty() {
            spans.push(Span::styled(format!(" {}", desc), theme.muted()));
        }
    }

    Line::from(spans)
}
