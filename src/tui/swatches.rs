#![forbid(unsafe_code)]

//! Modal color picker: one swatch per palette entry.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::task::palette::{PALETTE, TaskColor};

const SWATCH_WIDTH: u16 = 6;
const SWATCH_GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchAction {
    Consumed,
    Choose(TaskColor),
    Dismiss,
}

pub fn handle_key(key: KeyEvent, cursor: &mut usize) -> SwatchAction {
    let last = PALETTE.len() - 1;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => SwatchAction::Dismiss,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
            *cursor = if *cursor == 0 { last } else { *cursor - 1 };
            SwatchAction::Consumed
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            *cursor = if *cursor >= last { 0 } else { *cursor + 1 };
            SwatchAction::Consumed
        }
        KeyCode::Home => {
            *cursor = 0;
            SwatchAction::Consumed
        }
        KeyCode::End => {
            *cursor = last;
            SwatchAction::Consumed
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            SwatchAction::Choose(TaskColor::from_index(*cursor).unwrap_or_default())
        }
        KeyCode::Char(c) => match c.to_digit(10).map(|d| d as usize) {
            Some(d @ 1..=7) => {
                *cursor = d - 1;
                SwatchAction::Choose(PALETTE[d - 1])
            }
            _ => SwatchAction::Consumed,
        },
        _ => SwatchAction::Consumed,
    }
}

pub fn popup_rect(area: Rect) -> Rect {
    let n = u16::try_from(PALETTE.len()).unwrap_or(7);
    let w = (n * SWATCH_WIDTH + (n - 1) * SWATCH_GAP + 4).min(area.width);
    let h = 9u16.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn draw(f: &mut Frame<'_>, title: &str, cursor: usize) {
    let area = popup_rect(f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // pad
            Constraint::Length(2), // swatches
            Constraint::Length(1), // numbers
            Constraint::Length(1), // name
            Constraint::Min(0),    // hints
        ])
        .split(inner);

    let mut constraints = Vec::with_capacity(PALETTE.len() * 2);
    for i in 0..PALETTE.len() {
        if i > 0 {
            constraints.push(Constraint::Length(SWATCH_GAP));
        }
        constraints.push(Constraint::Length(SWATCH_WIDTH));
    }
    let swatch_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints.clone())
        .flex(ratatui::layout::Flex::Center)
        .split(rows[1]);
    let number_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .flex(ratatui::layout::Flex::Center)
        .split(rows[2]);

    for (i, color) in PALETTE.iter().enumerate() {
        let (r, g, b) = color.rgb();
        let selected = i == cursor;
        let swatch = Paragraph::new(if selected { "✓" } else { "" })
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .bg(Color::Rgb(r, g, b))
                    .fg(if color.is_light() {
                        Color::Black
                    } else {
                        Color::White
                    })
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(swatch, swatch_row[i * 2]);

        let num_style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let number = Paragraph::new((i + 1).to_string())
            .alignment(Alignment::Center)
            .style(num_style);
        f.render_widget(number, number_row[i * 2]);
    }

    let name = TaskColor::from_index(cursor).unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(name.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", name.hex()), Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center),
        rows[3],
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::raw(" move  "),
            Span::styled("1-7/Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" choose  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]))
        .alignment(Alignment::Center),
        rows[4],
    );
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_wrap_around_the_palette() {
        let mut cur = 0;
        assert_eq!(handle_key(key(KeyCode::Left), &mut cur), SwatchAction::Consumed);
        assert_eq!(cur, 6);
        assert_eq!(handle_key(key(KeyCode::Right), &mut cur), SwatchAction::Consumed);
        assert_eq!(cur, 0);
        handle_key(key(KeyCode::Char('l')), &mut cur);
        handle_key(key(KeyCode::Char('l')), &mut cur);
        assert_eq!(cur, 2);
    }

    #[test]
    fn enter_chooses_the_cursor_color() {
        let mut cur = 4;
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut cur),
            SwatchAction::Choose(TaskColor::Purple)
        );
    }

    #[test]
    fn digits_choose_directly() {
        let mut cur = 0;
        assert_eq!(
            handle_key(key(KeyCode::Char('4')), &mut cur),
            SwatchAction::Choose(PALETTE[3])
        );
        assert_eq!(cur, 3);
        assert_eq!(handle_key(key(KeyCode::Char('9')), &mut cur), SwatchAction::Consumed);
        assert_eq!(handle_key(key(KeyCode::Char('0')), &mut cur), SwatchAction::Consumed);
        assert_eq!(cur, 3);
    }

    #[test]
    fn escape_dismisses() {
        let mut cur = 2;
        assert_eq!(handle_key(key(KeyCode::Esc), &mut cur), SwatchAction::Dismiss);
        assert_eq!(cur, 2);
    }

    #[test]
    fn popup_fits_small_screens() {
        let r = popup_rect(Rect::new(0, 0, 20, 5));
        assert!(r.width <= 20 && r.height <= 5);
        let r = popup_rect(Rect::new(0, 0, 100, 40));
        assert_eq!(r.width, 7 * 6 + 6 + 4);
    }
}
