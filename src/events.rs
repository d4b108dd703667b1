use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::ui::matrix::Viewport;

/// File written by the `e` key, relative to the working directory.
pub const EXPORT_FILE: &str = "matrix_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow moving between cells while the overlay is open
            code if navigate(app, code) => {
                if app.selected_cell().is_none() {
                    app.close_overlay();
                }
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        code if navigate(app, code) => {}

        KeyCode::Enter => app.toggle_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.close_overlay(),

        KeyCode::Char('d') => app.toggle_direction(),

        KeyCode::Char('r') => {
            app.request_refresh();
            let _ = app.reload_data();
        }

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Apply a cursor movement key. Returns false if `code` is not one.
fn navigate(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.select_up(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(1),
        KeyCode::Left | KeyCode::Char('h') => app.select_left(1),
        KeyCode::Right | KeyCode::Char('l') => app.select_right(1),
        KeyCode::PageUp => app.select_up(10),
        KeyCode::PageDown => app.select_down(10),
        KeyCode::Home => app.select_first_column(),
        KeyCode::End => app.select_last_column(),
        _ => return false,
    }
    true
}

/// Handle mouse events
///
/// `matrix_area` is where the matrix block was last drawn.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, matrix_area: Rect) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_up(1),
        MouseEventKind::ScrollDown => app.select_down(1),

        // Click selects a cell; clicking the selected cell opens its detail
        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.show_help = false;
                return;
            }
            let Some(ref grid) = app.grid else {
                return;
            };
            let view = Viewport::compute(app, grid, matrix_area);
            if let Some((row, column)) = view.hit_test(mouse.column, mouse.row) {
                if (row, column) == (app.selected_row, app.selected_column) {
                    app.toggle_detail();
                } else {
                    app.selected_row = row;
                    app.selected_column = column;
                    if app.selected_cell().is_none() {
                        app.close_overlay();
                    }
                }
            }
        }

        MouseEventKind::Down(MouseButton::Right) => {
            app.show_help = false;
            app.close_overlay();
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GridBuilder;
    use crate::source::{FileSource, Host, MeasurementCell, MeasurementResult, StatusMatrixDocument};
    use crate::ui::Theme;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// 2×2 app where only (0,0) and (1,1) are measured.
    fn app() -> App {
        let measured = || {
            vec![MeasurementCell {
                id: "m".to_string(),
                result: Some(MeasurementResult {
                    status: Some(0),
                    ..Default::default()
                }),
                ..Default::default()
            }]
        };
        let document = StatusMatrixDocument {
            columns: vec![
                Host {
                    hostname: "dst-a".to_string(),
                },
                Host {
                    hostname: "dst-b".to_string(),
                },
            ],
            rows: vec![
                Host {
                    hostname: "src-a".to_string(),
                },
                Host {
                    hostname: "src-b".to_string(),
                },
            ],
            matrix: vec![vec![measured(), vec![]], vec![vec![], measured()]],
            ..Default::default()
        };

        let mut app = App::with_theme(
            Box::new(FileSource::new("unused.json")),
            GridBuilder::new("Host"),
            Theme::dark(),
        );
        app.render(document).unwrap();
        app
    }

    #[test]
    fn test_arrow_keys_move_cursor() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Down));
        handle_key_event(&mut app, key(KeyCode::Char('l')));
        assert_eq!((app.selected_row, app.selected_column), (1, 1));

        handle_key_event(&mut app, key(KeyCode::Home));
        assert_eq!(app.selected_column, 0);
        handle_key_event(&mut app, key(KeyCode::PageUp));
        assert_eq!(app.selected_row, 0);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_overlay_closes_when_moving_to_empty_cell() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.show_detail_overlay);

        handle_key_event(&mut app, key(KeyCode::Right));
        assert_eq!(app.selected_column, 1);
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_q_in_overlay_only_closes_it() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Enter));
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_detail_overlay);
        assert!(app.running);
    }

    #[test]
    fn test_direction_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.direction(), crate::data::Direction::Reverse);
        // No reverse measurements anywhere
        assert!(app.selected_cell().is_none());
    }

    #[test]
    fn test_click_selects_then_opens_detail() {
        let mut app = app();
        let area = Rect::new(0, 1, 60, 12);
        let view = Viewport::compute(&app, app.grid.as_ref().unwrap(), area);
        let x = view.inner.x + view.row_header_width as u16 + 1 + view.column_width as u16;
        let y = view.inner.y + 3;

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), x, y), area);
        assert_eq!((app.selected_row, app.selected_column), (1, 1));
        assert!(!app.show_detail_overlay);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), x, y), area);
        assert!(app.show_detail_overlay);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Right), 0, 0), area);
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_scroll_moves_rows() {
        let mut app = app();
        let area = Rect::new(0, 1, 60, 12);
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollDown, 0, 0), area);
        assert_eq!(app.selected_row, 1);
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollUp, 0, 0), area);
        assert_eq!(app.selected_row, 0);
    }
}
