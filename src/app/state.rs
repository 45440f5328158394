//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    cart::Cart,
    catalog::{build_page, Catalog},
    enhancer::Enhancer,
    page::{ElementId, Page},
};
use crate::ui::scroll::ScrollAnimator;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Store,
    Help,
}

/// Top-level application state.
pub struct AppState {
    /// The storefront element tree, already enhanced.
    pub page: Page,
    /// The enhancement component — click dispatch and revert deadlines.
    pub enhancer: Enhancer,
    /// Session cart, summarized on exit.
    pub cart: Cart,
    /// User-configurable bindings and tuning.
    pub config: AppConfig,
    /// Smooth-scroll easing between document rows.
    pub animator: ScrollAnimator,
    /// Bound elements in document order — what the keyboard cursor walks.
    pub interactive: Vec<ElementId>,
    /// Index into `interactive`.
    pub cursor: usize,
    /// Logical first document row of the viewport (easing not applied).
    pub scroll_target: usize,
    /// Last known terminal area, updated every draw (mouse hit-testing).
    pub terminal_area: Rect,
    /// The page-ready instant — fade-in delays count from here.
    pub ready_at: Instant,
    /// `false` disables entrance and scroll animation (`--no-animations`).
    pub animations: bool,
    pub active_view: ActiveView,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    /// Build the page from the catalog, run the enhancement passes, and wire
    /// up the initial state.  `now` becomes the fade-in epoch.
    pub fn new(catalog: &Catalog, config: AppConfig, animations: bool, now: Instant) -> Self {
        let mut page = build_page(catalog);
        let mut enhancer = Enhancer::new(Duration::from_millis(config.revert_ms));
        enhancer.enhance(&mut page);

        let interactive: Vec<ElementId> = page
            .document_order()
            .into_iter()
            .filter(|&id| enhancer.is_bound(id))
            .collect();
        let animator = ScrollAnimator::new(config.scroll_speed);

        Self {
            page,
            enhancer,
            cart: Cart::default(),
            config,
            animator,
            interactive,
            cursor: 0,
            scroll_target: 0,
            terminal_area: Rect::default(),
            ready_at: now,
            animations,
            active_view: ActiveView::default(),
            status_message: None,
            should_quit: false,
        }
    }

    /// The interactive element under the cursor, if any.
    pub fn selected_element(&self) -> Option<ElementId> {
        self.interactive.get(self.cursor).copied()
    }

    /// Advance everything time-driven: pending confirmation reverts and the
    /// scroll ease.  Called on every loop iteration.
    pub fn tick(&mut self, now: Instant) {
        self.enhancer.tick(&mut self.page, now);
        if self.animator.is_animating() {
            self.animator.tick();
        }
        // Cart messages live as long as some confirmation is still showing.
        if self.enhancer.pending_reverts() == 0 {
            self.status_message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_elements_are_anchors_then_buttons_in_document_order() {
        let catalog = Catalog::sample();
        let state = AppState::new(
            &catalog,
            crate::config::AppConfig::default(),
            true,
            Instant::now(),
        );

        // One anchor per section plus one button per book, all bound.
        assert_eq!(
            state.interactive.len(),
            catalog.sections.len() + catalog.book_count()
        );
        for pair in state.interactive.windows(2) {
            assert!(pair[0] < pair[1], "document order");
        }
        assert!(state.selected_element().is_some());
    }
}
