use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{error, info};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io;
use std::panic;
use std::time::{Duration, Instant};

use crate::launcher::Launch;
use crate::library::Item;
use crate::ui::command;
use crate::ui::library_view::LibraryView;
use crate::ui::list_model::ListModel;
use crate::ui::theme::Theme;

/// How often the loop wakes up without input
const TICK_RATE: Duration = Duration::from_millis(100);

/// Cursor blink half-period for the command line
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// How long a status message stays on screen
pub const STATUS_MESSAGE_LIFETIME: Duration = Duration::from_secs(1);

/// Maximum length of the command line
pub const COMMAND_CHAR_LIMIT: usize = 156;

/// Where keystrokes go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the list
    Browsing,
    /// Typing the live filter
    Filtering,
    /// Typing into the command line
    Command,
}

/// Transient message shown above the list
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    expires_at: Instant,
}

/// Interactive library browser
pub struct App<L: Launch> {
    list: ListModel,
    theme: Theme,
    launcher: L,
    mode: Mode,
    filter_input: String,
    command_input: String,
    show_full_help: bool,
    status: Option<StatusMessage>,
    cursor_visible: bool,
    last_blink: Instant,
    page_size: usize,
    should_quit: bool,
}

impl<L: Launch> App<L> {
    pub fn new(items: Vec<Item>, theme: Theme, launcher: L) -> Self {
        Self {
            list: ListModel::new(items),
            theme,
            launcher,
            mode: Mode::Browsing,
            filter_input: String::new(),
            command_input: String::new(),
            show_full_help: false,
            status: None,
            cursor_visible: true,
            last_blink: Instant::now(),
            page_size: 1,
            should_quit: false,
        }
    }

    pub fn list(&self) -> &ListModel {
        &self.list
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn filter_input(&self) -> &str {
        &self.filter_input
    }

    pub fn command_input(&self) -> &str {
        &self.command_input
    }

    pub fn show_full_help(&self) -> bool {
        self.show_full_help
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Take over the terminal and run until the user quits
    pub fn run(&mut self) -> Result<()> {
        install_panic_hook(|| {
            let _ = restore_terminal();
        });

        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("enter alternate screen");
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = restore_terminal();
                return Err(e).context("create terminal");
            }
        };

        let result = self.event_loop(&mut terminal);
        if let Err(e) = &result {
            error!("Event loop failed: {:#}", e);
        }

        restore_terminal()?;
        terminal.show_cursor().context("show cursor")?;
        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut view = LibraryView::new();

        while !self.should_quit() {
            self.tick(Instant::now());

            terminal
                .draw(|frame| view.render(frame, self))
                .context("draw frame")?;
            self.page_size = view.page_size();

            if !event::poll(TICK_RATE).context("poll event")? {
                continue;
            }

            match event::read().context("read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                // Redrawn on the next pass at the new size
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        info!("Quitting");
        Ok(())
    }

    /// Expire the status message and blink the command line cursor
    pub fn tick(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|status| now >= status.expires_at) {
            self.status = None;
        }

        if self.mode == Mode::Command && now.duration_since(self.last_blink) >= BLINK_INTERVAL {
            self.cursor_visible = !self.cursor_visible;
            self.last_blink = now;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Browsing => self.handle_browsing_key(key),
            Mode::Filtering => self.handle_filter_key(key),
            Mode::Command => self.handle_command_key(key),
        }
    }

    fn handle_browsing_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('f'), KeyModifiers::CONTROL) => self.focus_command_line(),
            (KeyCode::Enter, _) => self.launch_selected(),
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                self.list.select_previous()
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                self.list.select_next()
            }
            (KeyCode::PageUp, _) => self.list.page_up(self.page_size),
            (KeyCode::PageDown, _) => self.list.page_down(self.page_size),
            (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => {
                self.list.select_first()
            }
            (KeyCode::End, _) | (KeyCode::Char('G'), _) => self.list.select_last(),
            (KeyCode::Char('/'), _) => {
                self.mode = Mode::Filtering;
                self.status = None;
            }
            (KeyCode::Esc, _) if !self.list.filter().is_empty() => {
                self.filter_input.clear();
                self.list.clear_filter();
            }
            (KeyCode::Char('?'), _) => self.show_full_help = !self.show_full_help,
            (KeyCode::Char('q'), KeyModifiers::NONE) => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.mode = Mode::Browsing,
            KeyCode::Esc => {
                self.filter_input.clear();
                self.list.clear_filter();
                self.mode = Mode::Browsing;
            }
            KeyCode::Backspace => {
                self.filter_input.pop();
                self.list.set_filter(&self.filter_input);
            }
            KeyCode::Char(c) if is_text_input(&key) => {
                self.filter_input.push(c);
                self.list.set_filter(&self.filter_input);
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.mode = Mode::Browsing
            }
            KeyCode::Esc => self.mode = Mode::Browsing,
            KeyCode::Enter => self.submit_command(),
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(c) if is_text_input(&key) => {
                if self.command_input.chars().count() < COMMAND_CHAR_LIMIT {
                    self.command_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn focus_command_line(&mut self) {
        self.mode = Mode::Command;
        self.cursor_visible = true;
        self.last_blink = Instant::now();
    }

    fn submit_command(&mut self) {
        let input = std::mem::take(&mut self.command_input);

        match command::dispatch(&mut self.list, &input) {
            Some(command) => info!(
                "Command {:?} leaves {} games visible",
                command,
                self.list.visible_len()
            ),
            None if input.is_empty() => {}
            None => self.set_status(format!("Unknown command: {}", input)),
        }

        self.mode = Mode::Browsing;
    }

    fn launch_selected(&mut self) {
        let Some(item) = self.list.selected() else {
            return;
        };
        let (title, app_id) = (item.title().to_string(), item.app_id());

        let message = match self.launcher.launch(app_id) {
            Ok(()) => format!("You chose {} | AppId: {}", title, app_id),
            Err(e) => format!("Error running game: {}", e),
        };
        self.set_status(message);
    }

    fn set_status(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            expires_at: Instant::now() + STATUS_MESSAGE_LIFETIME,
        });
    }
}

/// Plain characters, as opposed to Ctrl/Alt chords
fn is_text_input(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("leave alternate screen")?;
    Ok(())
}

/// Run `restore` before the previously installed panic hook, so the panic
/// message lands on a usable terminal.
fn install_panic_hook<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore();
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;
    use crate::library::{build_items, Game, InstalledSet};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeLauncher {
        launched: RefCell<Vec<u32>>,
        fail: bool,
    }

    impl Launch for FakeLauncher {
        fn launch(&self, app_id: u32) -> Result<(), LaunchError> {
            self.launched.borrow_mut().push(app_id);
            if self.fail {
                Err(io::Error::new(io::ErrorKind::NotFound, "no handler for steam://").into())
            } else {
                Ok(())
            }
        }
    }

    fn app_with(launcher: FakeLauncher) -> App<FakeLauncher> {
        let games = vec![
            Game { app_id: 20, name: "Alpha".into(), playtime_forever: 0, last_played: 1700000000 },
            Game { app_id: 10, name: "Zeta".into(), playtime_forever: 0, last_played: 0 },
        ];
        let installed: InstalledSet = ["20".to_string()].into_iter().collect();
        App::new(build_items(&games, &installed), Theme::default(), launcher)
    }

    fn app() -> App<FakeLauncher> {
        app_with(FakeLauncher::default())
    }

    fn press(app: &mut App<FakeLauncher>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App<FakeLauncher>, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App<FakeLauncher>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn titles(app: &App<FakeLauncher>) -> Vec<String> {
        app.list().visible().map(|item| item.title().to_string()).collect()
    }

    #[test]
    fn command_line_dispatches_on_enter() {
        let mut app = app();

        ctrl(&mut app, 'f');
        assert_eq!(app.mode(), Mode::Command);
        type_text(&mut app, "i");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(app.command_input(), "");
        assert_eq!(titles(&app), vec!["Alpha"]);

        ctrl(&mut app, 'f');
        type_text(&mut app, "all");
        press(&mut app, KeyCode::Enter);
        assert_eq!(titles(&app), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn toggling_command_line_off_does_not_dispatch() {
        let mut app = app();

        ctrl(&mut app, 'f');
        type_text(&mut app, "i");
        ctrl(&mut app, 'f');

        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(titles(&app), vec!["Alpha", "Zeta"]);
        assert_eq!(app.command_input(), "i");
    }

    #[test]
    fn unknown_command_reports_and_keeps_list() {
        let mut app = app();

        ctrl(&mut app, 'f');
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Enter);

        assert_eq!(titles(&app), vec!["Alpha", "Zeta"]);
        assert_eq!(app.status(), Some("Unknown command: zzz"));
    }

    #[test]
    fn command_input_is_limited() {
        let mut app = app();

        ctrl(&mut app, 'f');
        type_text(&mut app, &"x".repeat(COMMAND_CHAR_LIMIT + 10));

        assert_eq!(app.command_input().len(), COMMAND_CHAR_LIMIT);
    }

    #[test]
    fn q_quits_only_outside_text_entry() {
        let mut app = app();

        ctrl(&mut app, 'f');
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit());
        assert_eq!(app.command_input(), "q");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));

        ctrl(&mut app, 'c');

        assert!(app.should_quit());
    }

    #[test]
    fn enter_launches_selected_game() {
        let mut app = app();

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(*app.launcher.launched.borrow(), vec![10]);
        assert_eq!(app.status(), Some("You chose Zeta | AppId: 10"));
    }

    #[test]
    fn failed_launch_is_reported_not_fatal() {
        let mut app = app_with(FakeLauncher {
            fail: true,
            ..FakeLauncher::default()
        });

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.status(), Some("Error running game: no handler for steam://"));
        assert!(!app.should_quit());
    }

    #[test]
    fn enter_on_empty_list_does_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "nothing matches");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Enter);

        assert!(app.launcher.launched.borrow().is_empty());
        assert_eq!(app.status(), None);
    }

    #[test]
    fn live_filter_updates_while_typing() {
        let mut app = app();
        press(&mut app, KeyCode::Down);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode(), Mode::Filtering);
        type_text(&mut app, "ZE");
        assert_eq!(titles(&app), vec!["Zeta"]);
        assert_eq!(app.list().selected_index(), Some(0));

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(titles(&app), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn applied_filter_is_cleared_with_esc() {
        let mut app = app();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "alp");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(titles(&app), vec!["Alpha"]);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filter_input(), "");
        assert_eq!(titles(&app), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn navigation_keys_move_selection() {
        let mut app = app();

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.list().selected_index(), Some(1));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.list().selected_index(), Some(0));
        press(&mut app, KeyCode::End);
        assert_eq!(app.list().selected_index(), Some(1));
        press(&mut app, KeyCode::Home);
        assert_eq!(app.list().selected_index(), Some(0));
    }

    #[test]
    fn question_mark_toggles_full_help() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_full_help());
        press(&mut app, KeyCode::Char('?'));
        assert!(!app.show_full_help());
    }

    #[test]
    fn status_message_expires() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.status().is_some());

        app.tick(Instant::now() + STATUS_MESSAGE_LIFETIME + Duration::from_millis(10));

        assert_eq!(app.status(), None);
    }

    #[test]
    fn cursor_blinks_only_in_command_mode() {
        let mut app = app();
        let later = Instant::now() + BLINK_INTERVAL * 2;

        app.tick(later);
        assert!(app.cursor_visible());

        ctrl(&mut app, 'f');
        app.tick(Instant::now() + BLINK_INTERVAL + Duration::from_millis(10));
        assert!(!app.cursor_visible());
    }

    #[test]
    fn panic_restores_terminal_first() {
        static RESTORED: AtomicBool = AtomicBool::new(false);

        install_panic_hook(|| RESTORED.store(true, Ordering::SeqCst));
        let result = panic::catch_unwind(|| panic!("boom"));
        // Drop the chained hook again
        let _ = panic::take_hook();

        assert!(result.is_err());
        assert!(RESTORED.load(Ordering::SeqCst));
    }
}
