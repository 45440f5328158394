//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── nav bar ────────────────────────────────────────────────
    pub fn nav_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn nav_brand_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_link_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::Cyan)
    }

    pub fn nav_link_selected_style() -> Style {
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cart_badge_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    // ── storefront ─────────────────────────────────────────────
    pub fn heading_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_author_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn price_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn stock_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn out_of_stock_style() -> Style {
        Style::default().fg(Color::Red)
    }

    /// One fade step before a card is fully revealed.
    pub fn fading_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    }

    // ── buttons ────────────────────────────────────────────────
    pub fn btn_primary_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn btn_success_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn btn_selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
