//! Page enhancement — the presentation-only behaviors layered onto a built
//! page: staggered card fade-in, smooth scrolling for fragment anchors, and a
//! transient confirmation state on add-to-cart controls.
//!
//! The three setup passes are independent and may run in any order.  After
//! setup the enhancer owns click dispatch for the elements it bound, and the
//! revert deadlines of confirmed controls.  Time is always passed in
//! explicitly, so every behavior here is deterministic under test.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::catalog::{ACTION_ADD_TO_CART, ATTR_ACTION, CART_BUTTON_LABEL, CLASS_BTN_PRIMARY, CLASS_CARD};
use super::page::{ElementId, Page};

/// Class added to each card by the fade-in pass.
pub const CLASS_FADE_IN: &str = "fade-in";
/// Success-state button class while a control shows its confirmation.
pub const CLASS_BTN_SUCCESS: &str = "btn-success";
/// Label shown while a control is confirmed.
pub const CONFIRMED_LABEL: &str = "✓ Added!";

/// Entrance-animation stagger per card index: card *i* starts at `i × 100 ms`.
pub const FADE_STAGGER: Duration = Duration::from_millis(100);
/// Default time a confirmed control stays confirmed before reverting.
pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(2000);

// ───────────────────────────────────────── outcomes ──────────

/// What a dispatched click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A fragment anchor resolved; the view should ease toward this element.
    /// Default navigation is always suppressed for bound anchors.
    Scroll(ElementId),
    /// A cart control entered its confirmed state; a revert is now pending.
    Confirmed(ElementId),
    /// Nothing happened: the element has no binding, or its fragment
    /// resolved to no element in the page.
    Ignored,
}

/// What the setup passes registered for an element.
#[derive(Debug, Clone)]
enum Binding {
    /// The anchor's `href` captured at bind time.  Resolution happens at
    /// click time, against whatever the page contains then.
    SmoothScroll { href: String },
    CartConfirm,
}

// ───────────────────────────────────────── enhancer ──────────

/// Decorates a page on ready and services the interactions it registered.
#[derive(Debug)]
pub struct Enhancer {
    bindings: HashMap<ElementId, Binding>,
    /// Confirmed controls and their single owned revert deadline.  A new
    /// click on a confirmed control overwrites the deadline — there is never
    /// more than one pending revert per control.
    reverts: HashMap<ElementId, Instant>,
    revert_delay: Duration,
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new(DEFAULT_REVERT_DELAY)
    }
}

impl Enhancer {
    pub fn new(revert_delay: Duration) -> Self {
        Self {
            bindings: HashMap::new(),
            reverts: HashMap::new(),
            revert_delay,
        }
    }

    /// Run all three setup passes.  Call once, when the page is ready.
    pub fn enhance(&mut self, page: &mut Page) {
        self.apply_fade_in(page);
        self.bind_smooth_scroll(page);
        self.bind_cart_buttons(page);
    }

    // ── setup passes ────────────────────────────────────────────

    /// Assign each book card a staggered entrance delay (`index × 100 ms`)
    /// and tag it `fade-in`.  An empty card set is a no-op.
    pub fn apply_fade_in(&self, page: &mut Page) {
        for (index, id) in page.select_class(CLASS_CARD).into_iter().enumerate() {
            page.get_mut(id).animation_delay = Some(FADE_STAGGER * index as u32);
            page.add_class(id, CLASS_FADE_IN);
        }
    }

    /// Register a click binding on every anchor whose `href` starts with `#`.
    pub fn bind_smooth_scroll(&mut self, page: &Page) {
        for id in page.select_href_prefix("#") {
            let href = page.attr(id, "href").unwrap_or_default().to_string();
            self.bindings.insert(id, Binding::SmoothScroll { href });
        }
    }

    /// Register the confirmation binding on every element marked
    /// `data-action = "add-to-cart"`.  Selecting zero controls is valid.
    pub fn bind_cart_buttons(&mut self, page: &Page) {
        for id in page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART) {
            self.bindings.insert(id, Binding::CartConfirm);
        }
    }

    // ── interaction ─────────────────────────────────────────────

    /// Dispatch a click on `target` at time `now`.
    ///
    /// Anchors: suppress navigation, resolve the captured fragment, and
    /// request a smooth scroll.  An unresolvable fragment is an inert no-op
    /// with a debug diagnostic — it must never fail the hosting app.
    ///
    /// Cart controls: swap to the confirmed label and success class, and
    /// (re)schedule the revert.  Clicking an already-confirmed control
    /// restarts its revert timer.
    pub fn click(&mut self, page: &mut Page, target: ElementId, now: Instant) -> ClickOutcome {
        match self.bindings.get(&target) {
            None => ClickOutcome::Ignored,
            Some(Binding::SmoothScroll { href }) => {
                let fragment = href.strip_prefix('#').unwrap_or(href.as_str());
                match page.element_by_fragment(fragment) {
                    Some(resolved) => ClickOutcome::Scroll(resolved),
                    None => {
                        tracing::debug!(href = %href, "fragment resolves to no element; ignoring click");
                        ClickOutcome::Ignored
                    }
                }
            }
            Some(Binding::CartConfirm) => {
                page.set_text(target, CONFIRMED_LABEL);
                page.remove_class(target, CLASS_BTN_PRIMARY);
                page.add_class(target, CLASS_BTN_SUCCESS);
                self.reverts.insert(target, now + self.revert_delay);
                ClickOutcome::Confirmed(target)
            }
        }
    }

    /// Revert every confirmed control whose deadline has passed.  Call from
    /// the host's tick; idempotent between deadlines.
    pub fn tick(&mut self, page: &mut Page, now: Instant) {
        let due: Vec<ElementId> = self
            .reverts
            .iter()
            .filter(|(_, &deadline)| deadline <= now)
            .map(|(&id, _)| id)
            .collect();
        for id in due {
            self.reverts.remove(&id);
            page.set_text(id, CART_BUTTON_LABEL);
            page.remove_class(id, CLASS_BTN_SUCCESS);
            page.add_class(id, CLASS_BTN_PRIMARY);
        }
    }

    /// Whether the setup passes registered any binding on `id`.
    pub fn is_bound(&self, id: ElementId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Whether `id` currently shows its confirmation state.
    pub fn is_confirmed(&self, id: ElementId) -> bool {
        self.reverts.contains_key(&id)
    }

    /// Number of reverts currently scheduled.
    pub fn pending_reverts(&self) -> usize {
        self.reverts.len()
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::core::catalog::{build_page, Catalog, CLASS_NAV_LINK};
    use crate::core::page::{Element, ElementKind, Page};

    /// Enhanced sample page plus a fixed "page ready" instant.
    fn setup() -> (Page, Enhancer, Instant) {
        let mut page = build_page(&Catalog::sample());
        let mut enhancer = Enhancer::default();
        enhancer.enhance(&mut page);
        (page, enhancer, Instant::now())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fade_in_staggers_by_card_index() {
        let (page, _, _) = setup();
        let cards = page.select_class(CLASS_CARD);
        assert!(!cards.is_empty());
        for (i, &card) in cards.iter().enumerate() {
            assert_eq!(page.get(card).animation_delay, Some(ms(100 * i as u64)));
            assert!(page.has_class(card, CLASS_FADE_IN));
        }
    }

    #[test]
    fn anchor_click_scrolls_to_resolved_section() {
        let (mut page, mut enhancer, t0) = setup();
        let anchor = page.select_class(CLASS_NAV_LINK)[1];
        let href = page.attr(anchor, "href").unwrap().to_string();
        let expected = page
            .element_by_fragment(href.strip_prefix('#').unwrap())
            .unwrap();

        assert_eq!(
            enhancer.click(&mut page, anchor, t0),
            ClickOutcome::Scroll(expected)
        );
    }

    #[test]
    fn dangling_fragment_is_inert() {
        let (mut page, mut enhancer, t0) = setup();
        let nav = page.get(page.root).children[0];
        let dangling = page.add_child(
            nav,
            Element::new(ElementKind::Anchor)
                .with_text("Nowhere")
                .with_attr("href", "#missing"),
        );
        enhancer.bind_smooth_scroll(&page);

        assert_eq!(enhancer.click(&mut page, dangling, t0), ClickOutcome::Ignored);
    }

    #[test]
    fn unbound_elements_ignore_clicks() {
        let (mut page, mut enhancer, t0) = setup();
        let heading = page.document_order()
            .into_iter()
            .find(|&id| page.get(id).kind == ElementKind::Heading)
            .unwrap();
        assert_eq!(enhancer.click(&mut page, heading, t0), ClickOutcome::Ignored);
    }

    #[test]
    fn confirmation_reverts_after_delay() {
        let (mut page, mut enhancer, t0) = setup();
        let button = page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART)[0];

        assert_eq!(
            enhancer.click(&mut page, button, t0),
            ClickOutcome::Confirmed(button)
        );
        assert_eq!(page.get(button).text, CONFIRMED_LABEL);
        assert!(page.has_class(button, CLASS_BTN_SUCCESS));
        assert!(!page.has_class(button, CLASS_BTN_PRIMARY));
        assert!(enhancer.is_confirmed(button));

        // One millisecond short of the deadline: still confirmed.
        enhancer.tick(&mut page, t0 + ms(1999));
        assert!(enhancer.is_confirmed(button));

        enhancer.tick(&mut page, t0 + ms(2000));
        assert!(!enhancer.is_confirmed(button));
        assert_eq!(page.get(button).text, CART_BUTTON_LABEL);
        assert!(page.has_class(button, CLASS_BTN_PRIMARY));
        assert!(!page.has_class(button, CLASS_BTN_SUCCESS));
    }

    #[test]
    fn rapid_reclick_owns_a_single_revert() {
        let (mut page, mut enhancer, t0) = setup();
        let button = page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART)[0];

        enhancer.click(&mut page, button, t0);
        enhancer.click(&mut page, button, t0 + ms(500));
        assert_eq!(enhancer.pending_reverts(), 1);

        // The first click's deadline passes without effect — the second
        // click rescheduled the revert.
        enhancer.tick(&mut page, t0 + ms(2000));
        assert!(enhancer.is_confirmed(button));

        // By 2500 ms after the first click the control is back to default.
        enhancer.tick(&mut page, t0 + ms(2500));
        assert!(!enhancer.is_confirmed(button));
        assert_eq!(page.get(button).text, CART_BUTTON_LABEL);
    }

    #[test]
    fn controls_revert_independently() {
        let (mut page, mut enhancer, t0) = setup();
        let buttons = page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART);
        let (a, b) = (buttons[0], buttons[1]);

        enhancer.click(&mut page, a, t0);
        enhancer.click(&mut page, b, t0 + ms(700));
        assert_eq!(enhancer.pending_reverts(), 2);

        enhancer.tick(&mut page, t0 + ms(2000));
        assert!(!enhancer.is_confirmed(a));
        assert!(enhancer.is_confirmed(b));

        enhancer.tick(&mut page, t0 + ms(2700));
        assert!(!enhancer.is_confirmed(b));
        assert_eq!(enhancer.pending_reverts(), 0);
    }

    #[test]
    fn custom_revert_delay_is_honored() {
        let mut page = build_page(&Catalog::sample());
        let mut enhancer = Enhancer::new(ms(300));
        enhancer.enhance(&mut page);
        let button = page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART)[0];
        let t0 = Instant::now();

        enhancer.click(&mut page, button, t0);
        enhancer.tick(&mut page, t0 + ms(299));
        assert!(enhancer.is_confirmed(button));
        enhancer.tick(&mut page, t0 + ms(300));
        assert!(!enhancer.is_confirmed(button));
    }

    #[test]
    fn empty_page_setup_mutates_nothing() {
        let mut page = Page::new();
        let before = page.clone();
        let mut enhancer = Enhancer::default();
        enhancer.enhance(&mut page);

        assert_eq!(page.nodes.len(), before.nodes.len());
        assert!(page.get(page.root).classes.is_empty());
        assert_eq!(enhancer.pending_reverts(), 0);
        // Ticking with nothing scheduled is a no-op too.
        enhancer.tick(&mut page, Instant::now());
    }
}
