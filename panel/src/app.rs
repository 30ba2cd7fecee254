//! Terminal application state and event loop

use crate::error::PanelError;
use crate::input::TextInput;
use crate::ui::{self, GRID_COLUMNS};
use crate::view::SearchView;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use requester::drom::DromRequesterExt;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

const FRAME_TIME: Duration = Duration::from_millis(33);
const TOAST_TIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Model,
    Button,
    Results,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Model,
            Focus::Model => Focus::Button,
            Focus::Button => Focus::Results,
            Focus::Results => Focus::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Search => Focus::Results,
            Focus::Model => Focus::Search,
            Focus::Button => Focus::Model,
            Focus::Results => Focus::Button,
        }
    }
}

pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(message: String, duration: Duration) -> Self {
        Self {
            message,
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub type LinkOpener = Box<dyn Fn(&str) -> io::Result<()>>;

pub struct App<R> {
    pub view: SearchView<R>,
    pub search_input: TextInput,
    pub model_input: TextInput,
    pub focus: Focus,
    /// Index into `view.state().parts` of the highlighted card
    pub selected: usize,
    pub should_quit: bool,
    pub toast: Option<Toast>,
    /// Drives the spinner animation
    pub loading_started: Instant,
    link_opener: LinkOpener,
}

impl<R> App<R>
where
    R: DromRequesterExt + Clone + Send + Sync + 'static,
{
    pub fn new(requester: R) -> Self {
        Self::with_link_opener(requester, Box::new(|link: &str| open::that(link)))
    }

    pub fn with_link_opener(requester: R, link_opener: LinkOpener) -> Self {
        Self {
            view: SearchView::new(requester),
            search_input: TextInput::new(),
            model_input: TextInput::new(),
            focus: Focus::Search,
            selected: 0,
            should_quit: false,
            toast: None,
            loading_started: Instant::now(),
            link_opener,
        }
    }

    pub fn search(&mut self) {
        self.loading_started = Instant::now();
        self.view.fetch_parts();
    }

    /// Applies finished requests and expires the toast
    pub fn poll(&mut self) {
        if self.view.poll_outcomes() > 0 {
            self.selected = 0;
        }
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn open_selected(&mut self) {
        let state = self.view.state();
        if state.loading {
            return;
        }
        let Some(part) = state.parts.get(self.selected) else {
            return;
        };

        let link = part.link.clone();
        match (self.link_opener)(&link) {
            Ok(()) => info!(link = %link, "opened part link"),
            Err(e) => {
                let err = PanelError::OpenLink(link);
                error!(open_error = ?e, "{err}");
                self.toast = Some(Toast::new(err.to_string(), TOAST_TIME));
            }
        }
    }

    fn move_selection(&mut self, code: KeyCode) {
        let n_parts = self.view.state().parts.len();
        if n_parts == 0 {
            return;
        }
        self.selected = match code {
            KeyCode::Left => self.selected.saturating_sub(1),
            KeyCode::Right => (self.selected + 1).min(n_parts - 1),
            KeyCode::Up => self.selected.saturating_sub(GRID_COLUMNS),
            KeyCode::Down if self.selected + GRID_COLUMNS < n_parts => {
                self.selected + GRID_COLUMNS
            }
            KeyCode::Home => 0,
            KeyCode::End => n_parts - 1,
            _ => self.selected,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            (KeyCode::Tab, _) => self.focus = self.focus.next(),
            (KeyCode::BackTab, _) => self.focus = self.focus.prev(),
            (KeyCode::Enter, _) => match self.focus {
                Focus::Results => self.open_selected(),
                Focus::Search | Focus::Model | Focus::Button => self.search(),
            },
            (code, modifiers) => match self.focus {
                Focus::Search => {
                    if self.search_input.handle_key(code, modifiers) {
                        self.view.set_search_string(self.search_input.text.as_str());
                    }
                }
                Focus::Model => {
                    if self.model_input.handle_key(code, modifiers) {
                        self.view.set_model(self.model_input.text.as_str());
                    }
                }
                Focus::Button => {}
                Focus::Results => self.move_selection(code),
            },
        }
    }
}

/// Runs `restore` when dropped, so early returns and panics leave the
/// terminal usable
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        error!(terminal_error = ?e, "could not disable raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        error!(terminal_error = ?e, "could not leave alternate screen");
    }
}

/// Runs the terminal application until the user quits
pub async fn run<R>(requester: R) -> Result<(), PanelError>
where
    R: DromRequesterExt + Clone + Send + Sync + 'static,
{
    enable_raw_mode()?;
    let _restore = TerminalGuard {
        restore: restore_terminal,
    };
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(requester);
    run_loop(&mut terminal, &mut app).await
}

async fn run_loop<R>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<R>,
) -> Result<(), PanelError>
where
    R: DromRequesterExt + Clone + Send + Sync + 'static,
{
    let mut frames = tokio::time::interval(FRAME_TIME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // yields to the runtime so in-flight requests make progress
        frames.tick().await;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
            if app.should_quit {
                info!("quit requested");
                return Ok(());
            }
        }

        app.poll();
        terminal.draw(|frame| ui::render(frame, app))?;
    }
}
