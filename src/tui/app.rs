#![forbid(unsafe_code)]

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::info;

use crate::config::{Config, GlyphStyle};
use crate::task::draft::Draft;
use crate::task::list::{PickerState, TodoList, Variant};
use crate::task::model::TaskId;
use crate::tui::swatches::{self, SwatchAction};
use crate::tui::{self, TerminalGuard, view};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppOptions {
    pub variant: Variant,
    pub glyphs: GlyphStyle,
    pub tint_rows: bool,
}

impl From<&Config> for AppOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            variant: cfg.ui.variant,
            glyphs: cfg.ui.glyphs,
            tint_rows: cfg.ui.tint_rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

#[derive(Debug)]
pub struct AppState {
    pub list: TodoList,
    pub opts: AppOptions,
    pub focus: Focus,
    /// Highlighted row in the task list.
    pub selected: usize,
    /// Highlighted swatch while the picker is open.
    pub swatch: usize,
    pub show_help: bool,
    pub should_quit: bool,
}

impl AppState {
    #[must_use]
    pub fn new(opts: AppOptions) -> Self {
        Self {
            list: TodoList::new(opts.variant),
            opts,
            focus: Focus::Input,
            selected: 0,
            swatch: 0,
            show_help: false,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.list.tasks().get(self.selected).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.list.tasks().len().saturating_sub(1));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.list.tasks().len();
        if len == 0 {
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    fn open_picker(&mut self, target: Option<TaskId>) {
        self.list.open_color_picker(target);
        let start = match self.list.picker() {
            PickerState::Closed => return,
            PickerState::OpenForDefault => Some(self.list.selected_color()),
            PickerState::OpenForTask(id) => self.list.task(id).and_then(|t| t.color),
        };
        self.swatch = start.unwrap_or_default().index();
    }
}

pub fn run(opts: AppOptions) -> anyhow::Result<()> {
    let terminal = tui::init_terminal()?;
    let mut guard = TerminalGuard::new(terminal);

    let mut app = AppState::new(opts);
    info!(variant = ?opts.variant, "session started");

    loop {
        {
            let Some(terminal) = guard.terminal.as_mut() else {
                anyhow::bail!("terminal unavailable");
            };
            terminal.draw(|f| view::draw(f, &app))?;
        }

        if app.should_quit {
            break;
        }

        // Blocks until the next input; resizes fall through to a redraw.
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key(key, &mut app);
        }
    }

    info!(tasks = app.list.tasks().len(), "session ended");
    Ok(())
}

pub fn handle_key(key: KeyEvent, app: &mut AppState) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        app.should_quit = true;
        return;
    }

    // Modals take precedence
    if app.list.color_picker_open() {
        match swatches::handle_key(key, &mut app.swatch) {
            SwatchAction::Choose(color) => app.list.choose_color(color),
            SwatchAction::Dismiss => app.list.dismiss_color_picker(),
            SwatchAction::Consumed => {}
        }
        return;
    }
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.focus {
        Focus::Input => handle_input_key(key, app),
        Focus::List => handle_list_key(key, app),
    }
}

fn handle_input_key(key: KeyEvent, app: &mut AppState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            if app.list.submit_draft().is_some() {
                app.selected = app.list.tasks().len() - 1;
            }
        }
        KeyCode::F(2) => app.open_picker(None),
        KeyCode::Char('k') if ctrl => app.open_picker(None),
        KeyCode::Esc if app.list.tasks().is_empty() => app.should_quit = true,
        KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            if !app.list.tasks().is_empty() {
                app.focus = Focus::List;
                app.clamp_selection();
            }
        }
        _ => handle_draft_key(key, app.list.draft_mut()),
    }
}

fn handle_list_key(key: KeyEvent, app: &mut AppState) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('i' | 'a') | KeyCode::Tab | KeyCode::BackTab => app.focus = Focus::Input,
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(10),
        KeyCode::PageUp => app.move_selection(-10),
        KeyCode::Home | KeyCode::Char('g') => app.selected = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.selected = app.list.tasks().len().saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char(' ' | 'x') => {
            if let Some(id) = app.selected_task_id() {
                app.list.toggle_task(id);
            }
        }
        KeyCode::Char('c') => {
            if let Some(id) = app.selected_task_id() {
                app.open_picker(Some(id));
            }
        }
        KeyCode::Char('C') | KeyCode::F(2) => app.open_picker(None),
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_task_id() {
                app.list.delete_task(id);
                app.clamp_selection();
                if app.list.tasks().is_empty() {
                    app.focus = Focus::Input;
                }
            }
        }
        _ => {}
    }
}

fn handle_draft_key(key: KeyEvent, input: &mut Draft) {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT)
            {
                input.insert_char(c);
            }
        }
        _ => {}
    }
}
