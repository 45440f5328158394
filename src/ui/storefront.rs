//! Custom Ratatui widgets that render a [`Page`] as the storefront — nav bar
//! on top, sections of book cards below.
//!
//! The page arena is flattened to a row list each frame.  The same row list
//! drives rendering, keyboard cursor movement, mouse hit-testing, and the
//! document rows that smooth scrolling targets, so all four always agree.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::core::enhancer::CLASS_BTN_SUCCESS;
use crate::core::page::{ElementId, ElementKind, Page};

use super::theme::Theme;

/// How long a revealed card stays in its dimmed fade step.
pub const FADE_STEP: Duration = Duration::from_millis(300);

// ───────────────────────────────────────── row model ─────────

/// One rendered row of the storefront document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Spacer.  The blank opening a section carries the section's element id
    /// and is the row fragment anchors scroll to.
    Blank,
    Heading,
    Card,
    Button,
}

/// A document row and the element it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PageRow {
    pub element: ElementId,
    pub kind: RowKind,
}

/// Flatten the page to document rows, skipping the nav subtree (the nav bar
/// renders separately).
pub fn build_rows(page: &Page) -> Vec<PageRow> {
    let mut rows = Vec::new();
    for &top in &page.get(page.root).children {
        if page.get(top).kind != ElementKind::Section {
            continue;
        }
        rows.push(PageRow { element: top, kind: RowKind::Blank });
        for &child in &page.get(top).children {
            match page.get(child).kind {
                ElementKind::Heading => rows.push(PageRow { element: child, kind: RowKind::Heading }),
                ElementKind::Card => {
                    rows.push(PageRow { element: child, kind: RowKind::Card });
                    for &grandchild in &page.get(child).children {
                        if page.get(grandchild).kind == ElementKind::Button {
                            rows.push(PageRow { element: grandchild, kind: RowKind::Button });
                        }
                    }
                    rows.push(PageRow { element: child, kind: RowKind::Blank });
                }
                _ => {}
            }
        }
    }
    rows
}

/// Row index of `element`, if it produces one.
pub fn row_of_element(rows: &[PageRow], element: ElementId) -> Option<usize> {
    rows.iter().position(|row| row.element == element)
}

/// Row indices where sections start, in document order.
pub fn section_row_indices(page: &Page, rows: &[PageRow]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            row.kind == RowKind::Blank && page.get(row.element).kind == ElementKind::Section
        })
        .map(|(i, _)| i)
        .collect()
}

// ───────────────────────────────────────── fade reveal ───────

/// Entrance-animation state of a card at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reveal {
    Hidden,
    Fading,
    Shown,
}

fn reveal_at(delay: Option<Duration>, ready_at: Instant, now: Instant) -> Reveal {
    let Some(delay) = delay else {
        return Reveal::Shown;
    };
    let elapsed = now.saturating_duration_since(ready_at);
    if elapsed < delay {
        Reveal::Hidden
    } else if elapsed < delay + FADE_STEP {
        Reveal::Fading
    } else {
        Reveal::Shown
    }
}

// ───────────────────────────────────────── storefront ────────

/// The storefront pane — created fresh each frame.
pub struct StorefrontWidget<'a> {
    page: &'a Page,
    /// First document row to render (already eased by the scroll animator).
    offset: usize,
    /// Interactive element under the cursor.
    selected: Option<ElementId>,
    /// Page-ready instant — the fade-in epoch.
    ready_at: Instant,
    now: Instant,
    animations: bool,
    block: Option<Block<'a>>,
}

impl<'a> StorefrontWidget<'a> {
    pub fn new(page: &'a Page, ready_at: Instant, now: Instant) -> Self {
        Self {
            page,
            offset: 0,
            selected: None,
            ready_at,
            now,
            animations: true,
            block: None,
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn selected(mut self, selected: Option<ElementId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn animations(mut self, enabled: bool) -> Self {
        self.animations = enabled;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn card_reveal(&self, card: ElementId) -> Reveal {
        if !self.animations {
            return Reveal::Shown;
        }
        reveal_at(self.page.get(card).animation_delay, self.ready_at, self.now)
    }

    fn card_line(&self, card: ElementId) -> Line<'a> {
        let el = self.page.get(card);
        match self.card_reveal(card) {
            Reveal::Hidden => Line::raw(""),
            Reveal::Fading => Line::from(Span::styled(
                format!("  {}", el.text),
                Theme::fading_style(),
            )),
            Reveal::Shown => {
                let author = self.page.attr(card, "data-author").unwrap_or("");
                let price = self.page.attr(card, "data-price").unwrap_or("?");
                let stock: u32 = self
                    .page
                    .attr(card, "data-stock")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);

                let mut spans = vec![
                    Span::styled(format!("  {}", el.text), Theme::card_title_style()),
                    Span::styled(format!(" — {author}"), Theme::card_author_style()),
                    Span::styled(format!("   ${price}"), Theme::price_style()),
                ];
                if stock == 0 {
                    spans.push(Span::styled("  (out of stock)", Theme::out_of_stock_style()));
                } else {
                    spans.push(Span::styled(
                        format!("  ({stock} in stock)"),
                        Theme::stock_style(),
                    ));
                }
                Line::from(spans)
            }
        }
    }

    fn button_line(&self, button: ElementId) -> Line<'a> {
        // A button appears together with its card.
        let reveal = match self.page.get(button).parent {
            Some(card) if self.page.get(card).kind == ElementKind::Card => self.card_reveal(card),
            _ => Reveal::Shown,
        };
        if reveal == Reveal::Hidden {
            return Line::raw("");
        }

        let el = self.page.get(button);
        let mut style = if reveal == Reveal::Fading {
            Theme::fading_style()
        } else if self.page.has_class(button, CLASS_BTN_SUCCESS) {
            Theme::btn_success_style()
        } else {
            Theme::btn_primary_style()
        };
        if self.selected == Some(button) {
            style = style.patch(Theme::btn_selected_style());
        }
        Line::from(Span::styled(format!("    [ {} ]", el.text), style))
    }
}

impl Widget for StorefrontWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let rows = build_rows(self.page);
        let visible = rows
            .iter()
            .skip(self.offset)
            .take(inner.height as usize);

        for (i, row) in visible.enumerate() {
            let y = inner.y + i as u16;
            let line = match row.kind {
                RowKind::Blank => Line::raw(""),
                RowKind::Heading => Line::from(Span::styled(
                    format!("▌ {}", self.page.get(row.element).text),
                    Theme::heading_style(),
                )),
                RowKind::Card => self.card_line(row.element),
                RowKind::Button => self.button_line(row.element),
            };
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

// ───────────────────────────────────────── nav bar ───────────

/// Nav bar segments: each anchor id with its rendered label.  Shared by the
/// renderer and mouse hit-testing so the two never drift apart.
pub fn nav_segments(page: &Page) -> Vec<(ElementId, String)> {
    let Some(&nav) = page
        .get(page.root)
        .children
        .iter()
        .find(|&&id| page.get(id).kind == ElementKind::Nav)
    else {
        return Vec::new();
    };
    page.get(nav)
        .children
        .iter()
        .filter(|&&id| page.get(id).kind == ElementKind::Anchor)
        .map(|&id| (id, format!("  {}  ", page.get(id).text)))
        .collect()
}

/// Width of the fixed brand prefix, in columns.
fn brand_label() -> &'static str {
    " ⌂ Bookstall │"
}

/// Resolve a nav-bar click column to the anchor under it.
pub fn nav_anchor_at(page: &Page, column: u16) -> Option<ElementId> {
    let mut x = brand_label().chars().count() as u16;
    for (id, label) in nav_segments(page) {
        let w = label.chars().count() as u16;
        if column >= x && column < x + w {
            return Some(id);
        }
        x += w;
    }
    None
}

/// The top nav bar — brand, fragment anchors, cart badge.
pub struct NavBar<'a> {
    page: &'a Page,
    selected: Option<ElementId>,
    cart_items: u32,
    cart_total: f64,
}

impl<'a> NavBar<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self {
            page,
            selected: None,
            cart_items: 0,
            cart_total: 0.0,
        }
    }

    pub fn selected(mut self, selected: Option<ElementId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn cart(mut self, items: u32, total: f64) -> Self {
        self.cart_items = items;
        self.cart_total = total;
        self
    }
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Paint the bar background across the full width first.
        buf.set_line(
            area.x,
            area.y,
            &Line::from(Span::styled(
                " ".repeat(area.width as usize),
                Theme::nav_style(),
            )),
            area.width,
        );

        let mut spans = vec![Span::styled(brand_label(), Theme::nav_brand_style())];
        let mut used = brand_label().chars().count();
        for (id, label) in nav_segments(self.page) {
            let style = if self.selected == Some(id) {
                Theme::nav_link_selected_style()
            } else {
                Theme::nav_link_style()
            };
            used += label.chars().count();
            spans.push(Span::styled(label, style));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // Cart badge, right-aligned.
        let badge = format!(" Cart ({}) ${:.2} ", self.cart_items, self.cart_total);
        let badge_width = badge.chars().count() as u16;
        if area.width > badge_width && used as u16 <= area.width - badge_width {
            buf.set_line(
                area.x + area.width - badge_width,
                area.y,
                &Line::from(Span::styled(badge, Theme::cart_badge_style())),
                badge_width,
            );
        }
    }
}

// ───────────────────────────────────────── tests ─────────────
