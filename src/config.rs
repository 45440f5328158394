//! User configuration — key bindings and UI tuning, persisted as a simple
//! key-value text file at `$XDG_CONFIG_HOME/bookstall/config.toml` (default
//! `~/.config/bookstall/config.toml`).
//!
//! The file is written once with defaults on first run and is edited by
//! hand; anything unparseable falls back to the defaults silently.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All bindable user actions in the storefront view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    JumpSectionUp,
    JumpSectionDown,
    Activate,
    ToggleHelp,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::JumpSectionUp,
        Action::JumpSectionDown,
        Action::Activate,
        Action::ToggleHelp,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Previous control",
            Action::MoveDown => "Next control",
            Action::JumpSectionUp => "Previous section",
            Action::JumpSectionDown => "Next section",
            Action::Activate => "Activate / add to cart",
            Action::ToggleHelp => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::JumpSectionUp => "jump_section_up",
            Action::JumpSectionDown => "jump_section_down",
            Action::Activate => "activate",
            Action::ToggleHelp => "toggle_help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Alt+↓"`, `"Enter"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            other => format!("{other:?}"),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+Down"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            s if s.len() == 1 => KeyCode::Char(s.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — key bindings and animation tuning.
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// How long a confirmed add-to-cart control stays confirmed.
    pub revert_ms: u64,
    /// Smooth-scroll damping factor per tick.
    pub scroll_speed: f64,
    /// Event-loop tick rate (drives animation frames).
    pub tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AppConfig {
    /// Hard-coded default bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let alt = KeyModifiers::ALT;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(JumpSectionUp, vec![KeyBind::new(Up, alt), KeyBind::new(Char('['), n)]);
        m.insert(JumpSectionDown, vec![KeyBind::new(Down, alt), KeyBind::new(Char(']'), n)]);
        m.insert(Activate, vec![KeyBind::new(Enter, n), KeyBind::new(Char(' '), n)]);
        m.insert(ToggleHelp, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    fn with_defaults() -> Self {
        Self {
            bindings: Self::default_bindings(),
            revert_ms: 2000,
            scroll_speed: 0.35,
            tick_ms: 100,
        }
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: browse | {}: section | {}: add to cart | {}: help",
            self.short_binding(Action::MoveDown),
            self.short_binding(Action::JumpSectionDown),
            self.short_binding(Action::Activate),
            self.short_binding(Action::ToggleHelp),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk.  On first run, write the defaults so users
    /// have a file to edit.
    pub fn load_or_init() -> Self {
        let path = config_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => return Self::parse_config(&contents),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "could not read config; using defaults");
                    return Self::with_defaults();
                }
            }
        }
        let config = Self::with_defaults();
        if let Err(err) = config.save() {
            tracing::warn!(path = %path.display(), %err, "could not write default config");
        }
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::with_defaults();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Tuning settings.  Clamped so hand-edited extremes stay usable.
            match key {
                "revert_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.revert_ms = v.clamp(250, 10_000);
                    }
                    continue;
                }
                "scroll_speed" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.scroll_speed = v.clamp(0.05, 0.95);
                    }
                    continue;
                }
                "tick_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.tick_ms = v.clamp(16, 1000);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# bookstall configuration".to_string(),
            String::new(),
            "# Animation tuning".to_string(),
            format!("revert_ms = {}", self.revert_ms),
            format!("scroll_speed = {}", self.scroll_speed),
            format!("tick_ms = {}", self.tick_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab, Space".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/bookstall/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("bookstall").join("config.toml")
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_input_falls_back_to_defaults() {
        let config = AppConfig::parse_config("%%% not a config\nrevert_ms = fast\n");
        assert_eq!(config.revert_ms, 2000);
        assert_eq!(config.tick_ms, 100);
        assert!(config.bindings.contains_key(&Action::Quit));
    }

    #[test]
    fn tuning_values_are_clamped() {
        let config =
            AppConfig::parse_config("revert_ms = 50\nscroll_speed = 4.0\ntick_ms = 100000\n");
        assert_eq!(config.revert_ms, 250);
        assert!((config.scroll_speed - 0.95).abs() < f64::EPSILON);
        assert_eq!(config.tick_ms, 1000);
    }

    #[test]
    fn bindings_round_trip_through_serialise() {
        let mut config = AppConfig::with_defaults();
        config.bindings.insert(
            Action::Quit,
            vec![KeyBind::new(KeyCode::Esc, KeyModifiers::NONE)],
        );
        config.revert_ms = 1500;

        let reparsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(reparsed.revert_ms, 1500);
        assert_eq!(
            reparsed.bindings.get(&Action::Quit),
            Some(&vec![KeyBind::new(KeyCode::Esc, KeyModifiers::NONE)])
        );
    }

    #[test]
    fn modifier_rich_binding_wins_ties() {
        let config = AppConfig::with_defaults();
        let event = KeyEvent::new(KeyCode::Down, KeyModifiers::ALT);
        assert_eq!(config.match_key(event), Some(Action::JumpSectionDown));
    }

    #[test]
    fn key_string_parsing() {
        assert_eq!(
            KeyBind::parse("Alt+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::ALT))
        );
        assert_eq!(
            KeyBind::parse("Space"),
            Some(KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE))
        );
        assert_eq!(KeyBind::parse("Hyper+x"), None);
    }
}
