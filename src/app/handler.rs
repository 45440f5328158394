//! Input handling — maps key/mouse events to state mutations.
//!
//! Clicks are routed through the enhancer, so keyboard activation and mouse
//! clicks behave identically: anchors ease the view to their section, cart
//! buttons flash their confirmation and feed the session cart.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::core::enhancer::ClickOutcome;
use crate::core::page::ElementId;
use crate::ui::layout::AppLayout;
use crate::ui::storefront::{build_rows, nav_anchor_at, row_of_element, section_row_indices, RowKind};

use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Store => handle_store_key(state, key),
        ActiveView::Help => handle_help_key(state, key),
    }
}

// ── Storefront view (configurable bindings) ─────────────────────

fn handle_store_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ToggleHelp => {
            state.active_view = ActiveView::Help;
        }
        Action::MoveUp => {
            move_cursor(state, -1);
        }
        Action::MoveDown => {
            move_cursor(state, 1);
        }
        Action::JumpSectionUp => {
            jump_section(state, Direction::Up);
        }
        Action::JumpSectionDown => {
            jump_section(state, Direction::Down);
        }
        Action::Activate => {
            if let Some(element) = state.selected_element() {
                click_element(state, element, Instant::now());
            }
        }
    }
}

fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Store;
        }
        _ => {}
    }
}

enum Direction {
    Up,
    Down,
}

// ── cursor & scrolling ──────────────────────────────────────────

fn move_cursor(state: &mut AppState, delta: i64) {
    if state.interactive.is_empty() {
        return;
    }
    let max = state.interactive.len() as i64 - 1;
    state.cursor = (state.cursor as i64 + delta).clamp(0, max) as usize;
    ensure_cursor_visible(state);
}

/// Inner height of the storefront pane, from the last drawn layout.
fn store_viewport(state: &AppState) -> usize {
    let layout = AppLayout::from_area(state.terminal_area);
    layout.store_area.height.saturating_sub(2) as usize
}

/// Keep the cursor's row inside the viewport.  Nav anchors live in the nav
/// bar and never scroll the content.
fn ensure_cursor_visible(state: &mut AppState) {
    let Some(element) = state.selected_element() else {
        return;
    };
    let rows = build_rows(&state.page);
    let Some(row) = row_of_element(&rows, element) else {
        return; // nav anchor
    };

    let height = store_viewport(state);
    if height == 0 {
        return;
    }
    if row < state.scroll_target {
        scroll_to_row(state, row);
    } else if row >= state.scroll_target + height {
        scroll_to_row(state, row + 1 - height);
    }
}

/// Retarget the viewport, easing when animations are on.
fn scroll_to_row(state: &mut AppState, row: usize) {
    state.scroll_target = row;
    if state.animations {
        state.animator.jump_to(row);
    } else {
        state.animator.snap_to(row);
    }
}

fn jump_section(state: &mut AppState, direction: Direction) {
    let rows = build_rows(&state.page);
    let sections = section_row_indices(&state.page, &rows);
    let current = state.scroll_target;

    let next = match direction {
        Direction::Down => sections.iter().copied().find(|&row| row > current),
        Direction::Up => sections.iter().copied().rev().find(|&row| row < current),
    };
    if let Some(row) = next {
        scroll_to_row(state, row);
    }
}

// ── click dispatch ──────────────────────────────────────────────

/// Click `element` through the enhancer and apply the outcome.
fn click_element(state: &mut AppState, element: ElementId, now: Instant) {
    match state.enhancer.click(&mut state.page, element, now) {
        ClickOutcome::Scroll(target) => {
            let rows = build_rows(&state.page);
            if let Some(row) = row_of_element(&rows, target) {
                scroll_to_row(state, row);
            }
        }
        ClickOutcome::Confirmed(button) => {
            let title = state
                .page
                .attr(button, "data-title")
                .unwrap_or_default()
                .to_string();
            let price: f64 = state
                .page
                .attr(button, "data-price")
                .and_then(|p| p.parse().ok())
                .unwrap_or(0.0);
            state.cart.add(&title, price);
            state.status_message = Some(format!(
                "Added \"{title}\" — cart now {} items",
                state.cart.total_items()
            ));
            tracing::debug!(%title, items = state.cart.total_items(), "cart add");
        }
        ClickOutcome::Ignored => {}
    }
}

/// Move the cursor to `element` if it is interactive.
fn focus_element(state: &mut AppState, element: ElementId) {
    if let Some(pos) = state.interactive.iter().position(|&id| id == element) {
        state.cursor = pos;
    }
}

// ── mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Store {
        return;
    }

    let layout = AppLayout::from_area(state.terminal_area);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row == layout.nav_area.y {
                if let Some(anchor) = nav_anchor_at(&state.page, mouse.column) {
                    focus_element(state, anchor);
                    click_element(state, anchor, Instant::now());
                }
                return;
            }

            // Inside the storefront block border?
            let content_top = layout.store_area.y.saturating_add(1);
            let content_bottom = layout
                .store_area
                .y
                .saturating_add(layout.store_area.height.saturating_sub(1));
            if mouse.row < content_top || mouse.row >= content_bottom {
                return;
            }

            // The rendered offset includes any in-flight ease.
            let offset = state.animator.effective_offset(state.scroll_target);
            let clicked = (mouse.row - content_top) as usize + offset;
            let rows = build_rows(&state.page);
            if let Some(row) = rows.get(clicked) {
                if row.kind == RowKind::Button {
                    focus_element(state, row.element);
                    click_element(state, row.element, Instant::now());
                }
            }
        }
        MouseEventKind::ScrollDown => scroll_wheel(state, 3),
        MouseEventKind::ScrollUp => scroll_wheel(state, -3),
        _ => {}
    }
}

/// Wheel scrolling moves the viewport directly, without easing.
fn scroll_wheel(state: &mut AppState, delta: i64) {
    let rows = build_rows(&state.page).len() as i64;
    let height = store_viewport(state) as i64;
    let max = (rows - height).max(0);
    let target = (state.scroll_target as i64 + delta).clamp(0, max) as usize;
    state.scroll_target = target;
    state.animator.snap_to(target);
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::layout::Rect;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::catalog::{Catalog, ACTION_ADD_TO_CART, ATTR_ACTION};

    fn test_state() -> AppState {
        let mut state = AppState::new(
            &Catalog::sample(),
            AppConfig::default(),
            true,
            Instant::now(),
        );
        state.terminal_area = Rect::new(0, 0, 80, 24);
        state
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_walks_interactive_elements_and_clamps() {
        let mut state = test_state();
        assert_eq!(state.cursor, 0);
        handle_key(&mut state, press(KeyCode::Up));
        assert_eq!(state.cursor, 0);

        for _ in 0..100 {
            handle_key(&mut state, press(KeyCode::Down));
        }
        assert_eq!(state.cursor, state.interactive.len() - 1);
    }

    #[test]
    fn activating_an_anchor_eases_the_view_to_its_section() {
        let mut state = test_state();
        // Cursor 0 is the first nav anchor; jump to the last one instead so
        // the target row is past the viewport.
        let last_anchor = state.page.select_href_prefix("#").pop().unwrap();
        focus_element(&mut state, last_anchor);
        handle_key(&mut state, press(KeyCode::Enter));

        assert!(state.scroll_target > 0);
        assert!(state.animator.is_animating());
    }

    #[test]
    fn activating_a_button_confirms_and_feeds_the_cart() {
        let mut state = test_state();
        let button = state.page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART)[0];
        focus_element(&mut state, button);

        handle_key(&mut state, press(KeyCode::Enter));
        assert!(state.enhancer.is_confirmed(button));
        assert_eq!(state.cart.total_items(), 1);
        assert!(state.status_message.as_deref().unwrap().contains("Added"));

        // The revert fires through the normal tick path.
        let later = Instant::now() + Duration::from_millis(2001);
        state.tick(later);
        assert!(!state.enhancer.is_confirmed(button));
        // The cart keeps the addition — only the visual state reverts.
        assert_eq!(state.cart.total_items(), 1);
    }

    #[test]
    fn section_jumps_move_between_landing_rows() {
        let mut state = test_state();
        handle_key(&mut state, press(KeyCode::Char(']')));
        let first = state.scroll_target;
        handle_key(&mut state, press(KeyCode::Char(']')));
        let second = state.scroll_target;
        assert!(second > first);

        handle_key(&mut state, press(KeyCode::Char('[')));
        assert_eq!(state.scroll_target, first);
    }

    #[test]
    fn help_overlay_opens_and_closes() {
        let mut state = test_state();
        handle_key(&mut state, press(KeyCode::Char('?')));
        assert_eq!(state.active_view, ActiveView::Help);
        // Storefront bindings are inert while help is open.
        handle_key(&mut state, press(KeyCode::Down));
        assert_eq!(state.cursor, 0);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Store);
    }

    #[test]
    fn ctrl_c_quits_from_any_view() {
        let mut state = test_state();
        state.active_view = ActiveView::Help;
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }
}
