#![forbid(unsafe_code)]

//! Rendering. Everything here reads `AppState` and never mutates it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar as _;

use crate::config::GlyphStyle;
use crate::task::list::PickerState;
use crate::task::model::Task;
use crate::task::palette::TaskColor;
use crate::tui::app::{AppState, Focus};
use crate::tui::swatches;

const EMPTY_TEXT: &str = "No tasks yet — add one below!";
const PLACEHOLDER: &str = "What needs to be done?";

pub fn draw(f: &mut Frame<'_>, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_title(f, root[0], app);
    draw_tasks(f, root[1], app);
    draw_input_row(f, root[2], app);
    draw_footer(f, root[3], app);

    match app.list.picker() {
        PickerState::Closed => {}
        PickerState::OpenForDefault => swatches::draw(f, "Choose Default Color", app.swatch),
        PickerState::OpenForTask(_) => swatches::draw(f, "Choose Task Color", app.swatch),
    }
    if app.show_help {
        draw_help(f, app);
    }
}

fn draw_title(f: &mut Frame<'_>, area: Rect, app: &AppState) {
    let title = if app.list.variant().tagging() {
        "📝 My Colorful To-Do List"
    } else {
        "📝 My To-Do List"
    };
    let done = app.list.tasks().iter().filter(|t| t.done).count();
    let total = app.list.tasks().len();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(16)])
        .split(area);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(format!("{done}/{total} done"))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_tasks(f: &mut Frame<'_>, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::List;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }))
        .title(" Tasks ");

    if app.list.tasks().is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let middle = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1)])
            .flex(ratatui::layout::Flex::Center)
            .split(inner)[0];
        f.render_widget(
            Paragraph::new(EMPTY_TEXT)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            middle,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .list
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| task_item(task, app, focused && i == app.selected))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol(if focused { "> " } else { "" });
    // A fresh state each frame keeps rendering pure. The selection is passed
    // even without list focus so ratatui scrolls the newest task into view.
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn task_item<'a>(task: &'a Task, app: &AppState, selected: bool) -> ListItem<'a> {
    let glyph = match (app.opts.glyphs, task.done) {
        (GlyphStyle::Unicode, true) => "✅",
        (GlyphStyle::Unicode, false) => "⬜",
        (GlyphStyle::Ascii, true) => "[x]",
        (GlyphStyle::Ascii, false) => "[ ]",
    };

    let tint = task.color.filter(|_| app.opts.tint_rows);
    let mut row_style = Style::default();
    if let Some(color) = tint {
        row_style = row_style.bg(swatch_color(color)).fg(text_on(color));
    }

    let mut text_style = Style::default();
    if task.done {
        text_style = text_style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
    }
    if selected {
        text_style = text_style.add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw(glyph),
        Span::raw(" "),
        Span::styled(task.text.as_str(), text_style),
    ];
    if task.color.is_some() && !app.opts.tint_rows {
        // Without row tint, show the tag as a small swatch instead.
        if let Some(color) = task.color {
            spans.push(Span::raw(" "));
            spans.push(Span::styled("  ", Style::default().bg(swatch_color(color))));
        }
    }
    if selected {
        let hint = if app.list.variant().tagging() {
            "   c 🎨  d 🗑"
        } else {
            "   d 🗑"
        };
        spans.push(Span::styled(hint, Style::default().add_modifier(Modifier::DIM)));
    }

    ListItem::new(Line::from(spans)).style(row_style)
}

fn draw_input_row(f: &mut Frame<'_>, area: Rect, app: &AppState) {
    let tagging = app.list.variant().tagging();
    let mut constraints = vec![Constraint::Min(10)];
    if tagging {
        constraints.push(Constraint::Length(6));
    }
    constraints.push(Constraint::Length(5));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }))
        .title(" New task ");
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let draft = app.list.draft();
    let (visible, cursor_col) =
        input_window(draft.as_str(), draft.cursor(), usize::from(inner.width.max(1)));
    let input = if draft.as_str().is_empty() {
        Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(visible)
    };
    f.render_widget(input, inner);

    if focused && !app.list.color_picker_open() && !app.show_help {
        let x = inner.x + u16::try_from(cursor_col).unwrap_or(0);
        f.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }

    let mut next = 1;
    if tagging {
        let color = app.list.selected_color();
        let swatch = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("F2")
            .style(Style::default().bg(swatch_color(color)));
        f.render_widget(swatch, chunks[next]);
        next += 1;
    }

    let add = Paragraph::new("+")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0x4F, 0x46, 0xE5))
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(add, chunks[next]);
}

/// Slices `text` to what fits in `width` cells with the cursor visible.
/// Returns the visible text and the cursor's cell column within it.
fn input_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    let cell = |c: char| c.width().unwrap_or(0);
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut start = 0;
    let mut col: usize = chars[..cursor].iter().map(|&c| cell(c)).sum();
    while col >= width && start < cursor {
        col -= cell(chars[start]);
        start += 1;
    }

    let mut used = 0;
    let visible = chars[start..]
        .iter()
        .take_while(|&&c| {
            used += cell(c);
            used <= width
        })
        .collect();
    (visible, col)
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &AppState) {
    let tagging = app.list.variant().tagging();
    let left = if app.list.color_picker_open() {
        "←/→ move • 1-7 choose • Enter choose • Esc cancel"
    } else if app.show_help {
        "any key close"
    } else {
        match (app.focus, tagging) {
            (Focus::Input, true) => "Enter add • F2 default color • Tab list • Esc list/quit",
            (Focus::Input, false) => "Enter add • Tab list • Esc list/quit",
            (Focus::List, true) => {
                "q quit • j/k move • Space toggle • c color • C default color • d delete • i input • ? help"
            }
            (Focus::List, false) => "q quit • j/k move • Space toggle • d delete • i input • ? help",
        }
    };

    let p = Paragraph::new(Line::from(Span::styled(
        left,
        Style::default().fg(Color::White).bg(Color::Blue),
    )))
    .style(Style::default().bg(Color::Blue));
    f.render_widget(p, area);
}

fn draw_help(f: &mut Frame<'_>, app: &AppState) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);
    let mut lines = vec![
        Line::from("Input:"),
        Line::from("  Enter        Add task"),
        Line::from("  Tab/↓        Go to list"),
    ];
    if app.list.variant().tagging() {
        lines.push(Line::from("  F2, Ctrl+K   Choose default color"));
    }
    lines.extend([
        Line::from(""),
        Line::from("List:"),
        Line::from("  j/k, ↑/↓     Move"),
        Line::from("  Space/x      Toggle done"),
    ]);
    if app.list.variant().tagging() {
        lines.push(Line::from("  c            Recolor task"));
        lines.push(Line::from("  C            Choose default color"));
    }
    lines.extend([
        Line::from("  d/Del        Delete task"),
        Line::from("  i/Tab        Back to input"),
        Line::from("  q/Esc        Quit"),
    ]);
    let popup = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn swatch_color(color: TaskColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn text_on(color: TaskColor) -> Color {
    if color.is_light() {
        Color::Black
    } else {
        Color::White
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
