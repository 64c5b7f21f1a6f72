#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to u16 since board dimensions are tiny
    clippy::cast_possible_truncation
)]

use std::collections::HashSet;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::components::{Board, Cell, Piece};
use crate::state::{AnimationMode, GameMode};

// Each cell is 2 characters wide and 1 tall
const CELL_WIDTH: u16 = 2;

pub fn render(f: &mut Frame, app: &App) {
    let board = app.board();
    let board_width = board.width as u16 * CELL_WIDTH + 2; // +2 for borders
    let board_height = board.height as u16 + 2;
    let min_info_width = 24u16;

    if f.area().width < board_width + min_info_width || f.area().height < board_height + 2 {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Tetros"));
        f.render_widget(warning_text, centered_rect(50, 30, f.area()));
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Min(min_info_width)])
        .split(f.area());

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Title
            Constraint::Length(board_height), // Game board
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    let title = Paragraph::new("TETROS")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, app, game_layout[1]);
    render_info(f, app, main_layout[1]);
}

fn render_game_board(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if app.is_slow_motion() {
            Style::default().fg(Color::LightBlue)
        } else {
            Style::default()
        });
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let board = app.render_board();
    for (y, row) in board.cells.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let (symbol, color) = cell_style(*cell);
            draw_cell(f, inner_area, x, y, symbol, color);
        }
    }

    if app.animation_mode() == AnimationMode::Smooth && app.drop_progress() >= 0.5 {
        if let Some(piece) = app.current_piece() {
            draw_half_step(f, inner_area, piece, &board);
        }
    }

    let overlay = match app.mode() {
        GameMode::Start => Some(("Press Enter\nto start".to_string(), Color::White)),
        GameMode::Countdown => Some((app.countdown().to_string(), Color::Yellow)),
        GameMode::Paused if app.is_aiming() => None,
        GameMode::Paused => Some(("PAUSED".to_string(), Color::Cyan)),
        GameMode::GameOver => Some(("GAME OVER\nEnter: restart".to_string(), Color::Red)),
        GameMode::Playing | GameMode::Clearing => None,
    };

    if let Some((text, color)) = overlay {
        let overlay_area = Rect {
            x: inner_area.x,
            y: inner_area.y + (inner_area.height / 2).saturating_sub(1),
            width: inner_area.width,
            height: 2,
        };
        f.render_widget(Clear, overlay_area);
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            overlay_area,
        );
    }
}

// Draws the falling piece half a row lower than its grid position
fn draw_half_step(f: &mut Frame, area: Rect, piece: &Piece, board: &Board) {
    let cells: HashSet<(i32, i32)> = piece.filled_cells().map(|(x, y, _)| (x, y)).collect();
    let Some(color) = piece.tetromino_type().map(|t| t.get_color()) else {
        return;
    };

    for &(x, y) in &cells {
        let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
            continue;
        };
        if !cells.contains(&(x, y - 1)) {
            draw_cell(f, area, col, row, "▄▄", color);
        }
        if !cells.contains(&(x, y + 1)) && board.get(col, row + 1).is_some_and(|c| !c.is_filled()) {
            draw_cell(f, area, col, row + 1, "▀▀", color);
        }
    }
}

fn cell_style(cell: Cell) -> (&'static str, Color) {
    match cell {
        Cell::Empty => ("  ", Color::Black),
        Cell::Block(tetromino_type) => ("██", tetromino_type.get_color()),
        Cell::Ghost => ("░░", Color::DarkGray),
        Cell::Aimer => ("<>", Color::LightRed),
        Cell::Clearing => ("▓▓", Color::White),
    }
}

fn draw_cell(f: &mut Frame, area: Rect, x: usize, y: usize, symbol: &str, color: Color) {
    let cell_x = area.left() + x as u16 * CELL_WIDTH;
    let cell_y = area.top() + y as u16;
    if cell_x + CELL_WIDTH > area.right() || cell_y >= area.bottom() {
        return;
    }

    let buffer = f.buffer_mut();
    for (offset, ch) in symbol.chars().take(CELL_WIDTH as usize).enumerate() {
        if let Some(cell) = buffer.cell_mut((cell_x + offset as u16, cell_y)) {
            cell.set_char(ch);
            cell.set_fg(color);
            cell.set_bg(Color::Black);
        }
    }
}

fn piece_preview(piece: Option<&Piece>) -> Vec<Line<'static>> {
    let Some(piece) = piece else {
        return vec![Line::from("  -")];
    };

    piece
        .shape
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|cell| match cell {
                        Cell::Block(t) => Span::styled("██", Style::default().fg(t.get_color())),
                        _ => Span::raw("  "),
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn render_info(f: &mut Frame, app: &App, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(6), // Next and hold previews
            Constraint::Length(4), // Score
            Constraint::Length(6), // Power-ups
            Constraint::Min(5),    // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let preview_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(info_layout[1]);
    f.render_widget(
        Paragraph::new(piece_preview(app.next_piece()))
            .block(Block::default().borders(Borders::ALL).title("Next")),
        preview_layout[0],
    );
    f.render_widget(
        Paragraph::new(piece_preview(app.hold_piece()))
            .block(Block::default().borders(Borders::ALL).title("Hold")),
        preview_layout[1],
    );

    let animation = match app.animation_mode() {
        AnimationMode::Smooth => "smooth",
        AnimationMode::Step => "step",
    };
    let stats = format!(
        "Score: {}\nLevel: {}\nLines: {}\nAnimation: {animation}",
        app.score(),
        app.level(),
        app.lines_cleared(),
    );
    f.render_widget(Paragraph::new(stats).wrap(Wrap { trim: true }), info_layout[2]);

    let mut power_lines = vec![Line::from("Power-ups:")];
    for (index, (kind, count)) in app.power_up_counts().into_iter().enumerate() {
        let style = if app.can_use_power_up(kind) {
            Style::default().fg(Color::LightGreen)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        power_lines.push(Line::styled(
            format!("{}: {} x{count}", index + 1, kind.name()),
            style,
        ));
    }
    if app.is_slow_motion() {
        power_lines[0] = Line::styled("Power-ups: (slow)", Style::default().fg(Color::LightBlue));
    }
    f.render_widget(Paragraph::new(power_lines), info_layout[3]);

    let controls = if app.is_aiming() {
        "Aiming:\n\
        Arrows: Move cursor\n\
        Enter: Destroy cell\n\
        "
    } else {
        "Controls:\n\
        ←/→: Move left/right\n\
        ↓: Soft drop\n\
        ↑: Rotate\n\
        Space: Hard drop\n\
        C: Hold\n\
        1-4: Power-ups\n\
        P/Esc: Pause\n\
        T: Animation mode\n\
        Q: Quit\n\
        "
    };
    f.render_widget(
        Paragraph::new(controls)
            .block(Block::default().borders(Borders::TOP))
            .wrap(Wrap { trim: true }),
        info_layout[4],
    );
}

/// Helper function to create a centered rect using up certain percentage of the available rect
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
