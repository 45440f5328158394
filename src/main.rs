//! A bookstore storefront in the terminal.
//!
//! Run the binary to browse the built-in sample catalog, or point it at a
//! TOML catalog manifest.  Book cards fade in with a staggered delay, nav
//! links ease the view to their section, and add-to-cart buttons flash a
//! transient confirmation while the session cart fills up.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::{cart::Cart, catalog::Catalog};
use crate::ui::{
    help::HelpPopup,
    layout::AppLayout,
    storefront::{NavBar, StorefrontWidget},
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Bookstore storefront TUI")]
struct Cli {
    /// Catalog manifest to load (defaults to the built-in sample catalog).
    catalog: Option<PathBuf>,

    /// Disable entrance and scroll animations.
    #[arg(long)]
    no_animations: bool,

    /// Override the event-loop tick rate in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── build the storefront ──────────────────────────────────
    let catalog = match cli.catalog {
        Some(ref path) => Catalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::sample(),
    };
    tracing::debug!(
        sections = catalog.sections.len(),
        books = catalog.book_count(),
        "storefront catalog ready"
    );

    let mut config = config::AppConfig::load_or_init();
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms.clamp(16, 1000);
    }
    let tick_rate = Duration::from_millis(config.tick_ms);

    // Page ready: build the tree and run the enhancement passes before the
    // first frame, so fade delays count from here.
    let mut state = AppState::new(&catalog, config, !cli.no_animations, Instant::now());

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(tick_rate);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            state.terminal_area = frame.area();
            let layout = AppLayout::from_area(frame.area());

            let nav = NavBar::new(&state.page)
                .selected(state.selected_element())
                .cart(state.cart.total_items(), state.cart.total_price());
            frame.render_widget(nav, layout.nav_area);

            let store_block = Block::default()
                .title(" Storefront ")
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            let store = StorefrontWidget::new(&state.page, state.ready_at, Instant::now())
                .offset(state.animator.effective_offset(state.scroll_target))
                .selected(state.selected_element())
                .animations(state.animations)
                .block(store_block);
            frame.render_widget(store, layout.store_area);

            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);

            if state.active_view == ActiveView::Help {
                frame.render_widget(HelpPopup { config: &state.config }, frame.area());
            }
        })?;

        match events.recv().await {
            Some(AppEvent::Key(key)) => handler::handle_key(&mut state, key),
            Some(AppEvent::Mouse(mouse)) => handler::handle_mouse(&mut state, mouse),
            Some(AppEvent::Resize(_, _)) | Some(AppEvent::Tick) => {}
            None => break,
        }

        // Reverts and scroll easing advance on every event, ticks included.
        state.tick(Instant::now());

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    print_receipt(&state.cart);

    Ok(())
}

/// Session summary on stdout — the alternate screen renders on stderr, so
/// stdout stays reserved for the result.
fn print_receipt(cart: &Cart) {
    if cart.is_empty() {
        println!("No items in cart.");
        return;
    }
    println!("Cart summary:");
    for line in cart.lines() {
        println!(
            "  {} x {:<40} ${:>8.2}",
            line.quantity,
            line.title,
            line.subtotal()
        );
    }
    println!("  total: {} items, ${:.2}", cart.total_items(), cart.total_price());
}
