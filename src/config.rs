use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use directories::BaseDirs;
use lazy_static::lazy_static;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize, de::Deserializer};

use crate::action::Action;

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Global,
    FilterPopover,
}

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Embedded defaults only, no file sources.
    pub fn embedded() -> Result<Self, config::ConfigError> {
        json5::from_str(CONFIG).map_err(|e| config::ConfigError::Message(e.to_string()))
    }

    /// Load config from an explicit path, or from the discovered default file when it exists
    /// (`$FILTERPOP_CONFIG/config.json5`, else `~/.filterpop-config.json5`).
    /// User bindings and styles are layered over the embedded defaults per mode.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let default_config = Self::embedded()?;
        let mut builder = config::Config::builder();

        builder = match config_path {
            Some(p) => builder.add_source(
                config::File::from(expand_tilde(p)).format(config::FileFormat::Json5).required(true),
            ),
            None => builder.add_source(
                config::File::from(default_config_path()).format(config::FileFormat::Json5).required(false),
            ),
        };

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        for (mode, default_bindings) in default_config.keybindings.iter() {
            let user_bindings = cfg.keybindings.entry(*mode).or_default();
            for (key, cmd) in default_bindings.iter() {
                user_bindings
                    .entry(key.clone())
                    .or_insert_with(|| cmd.clone());
            }
        }
        for (mode, default_styles) in default_config.styles.iter() {
            let user_styles = cfg.styles.entry(*mode).or_default();
            for (style_key, style) in default_styles.iter() {
                user_styles.entry(style_key.clone()).or_insert(*style);
            }
        }

        Ok(cfg)
    }

    /// Build instructions string from list of (mode, action) tuples
    pub fn actions_to_instructions(&self, actions: &[(Mode, Action)]) -> String {
        actions.iter()
            .map(|(mode, action)| {
                let friendly_name = action_to_friendly_name(action);
                if let Some(key) = self.key_for_action(*mode, action) {
                    format!("{key}: {friendly_name}")
                } else {
                    friendly_name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Resolve an action for a full key sequence for a given mode.
    pub fn action_for_keys(&self, mode: Mode, keys: &[KeyEvent]) -> Option<Action> {
        let map = self.keybindings.get(&mode)?;
        map.get(keys).cloned()
    }

    /// Resolve an action for a single key event for a given mode.
    pub fn action_for_key(&self, mode: Mode, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        // Terminals differ on whether BackTab carries SHIFT; normalize before lookup.
        let key = if key.code == KeyCode::BackTab {
            KeyEvent::new(KeyCode::BackTab, key.modifiers | KeyModifiers::SHIFT)
        } else {
            KeyEvent::new(key.code, key.modifiers)
        };
        self.action_for_keys(mode, &[key])
    }

    /// Shortest key sequence bound to `action` in `mode`, formatted for display.
    pub fn key_for_action(&self, mode: Mode, action: &Action) -> Option<String> {
        let mode_bindings = self.keybindings.get(&mode)?;
        mode_bindings
            .iter()
            .filter(|(_, bound)| *bound == action)
            .map(|(seq, _)| seq)
            .min_by_key(|seq| (seq.len(), seq.iter().map(key_event_to_string).collect::<String>()))
            .map(|seq| seq.iter().map(key_event_to_string).collect::<Vec<_>>().join(" "))
    }

    /// Style for a named element of a mode, falling back to `fallback` when not configured.
    pub fn style_for(&self, mode: Mode, name: &str, fallback: Style) -> Style {
        self.styles
            .get(&mode)
            .and_then(|styles| styles.get(name))
            .copied()
            .unwrap_or(fallback)
    }
}

/// Convert an action to a friendly name
pub fn action_to_friendly_name(action: &Action) -> &'static str {
    match action {
        Action::Escape => "Close",
        Action::Enter => "Activate",
        Action::Backspace => "Backspace",
        Action::Up => "Up",
        Action::Down => "Down",
        Action::Left => "Prev Option",
        Action::Right => "Next Option",
        Action::Tab => "Next Field",
        Action::BackTab => "Prev Field",
        Action::ToggleInstructions => "Toggle Instructions",
        Action::TogglePopover => "Filter",
        Action::AddFilter => "Add Filter",
        Action::RemoveFilter => "Remove Filter",
        Action::Quit => "Quit",
        _ => "Unknown",
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    match (path.strip_prefix("~"), BaseDirs::new()) {
        (Ok(rest), Some(base)) => base.home_dir().join(rest),
        _ => path.clone(),
    }
}

fn default_config_path() -> PathBuf {
    let home = BaseDirs::new().map(|base| base.home_dir().to_path_buf());
    config_file_in(CONFIG_FOLDER.as_deref(), home.as_deref())
}

fn config_file_in(config_dir: Option<&Path>, home: Option<&Path>) -> PathBuf {
    match (config_dir, home) {
        (Some(dir), _) => dir.join("config.json5"),
        (None, Some(home)) => home.join(".filterpop-config.json5"),
        (None, None) => PathBuf::from(".filterpop-config.json5"),
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

        let mut keybindings = HashMap::with_capacity(parsed_map.len());
        for (mode, inner_map) in parsed_map {
            let mut converted = HashMap::with_capacity(inner_map.len());
            for (key_string, action) in inner_map {
                let sequence = parse_key_sequence(&key_string).map_err(serde::de::Error::custom)?;
                converted.insert(sequence, action);
            }
            keybindings.insert(mode, converted);
        }

        Ok(KeyBindings(keybindings))
    }
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        if let Some(rest) = current.strip_prefix("ctrl-") {
            modifiers.insert(KeyModifiers::CONTROL);
            current = rest;
        } else if let Some(rest) = current.strip_prefix("alt-") {
            modifiers.insert(KeyModifiers::ALT);
            current = rest;
        } else if let Some(rest) = current.strip_prefix("shift-") {
            modifiers.insert(KeyModifiers::SHIFT);
            current = rest;
        } else {
            break;
        }
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(
    raw: &str,
    mut modifiers: KeyModifiers,
) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "minus" | "hyphen" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') => {
            let n = f[1..].parse::<u8>().map_err(|_| format!("Unable to parse {raw}"))?;
            KeyCode::F(n)
        }
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().unwrap_or_default();
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        }
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => String::new(),
    };

    let mut parts: Vec<String> = Vec::with_capacity(4);
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        parts.push("ctrl".to_string());
    }
    // BackTab already implies shift
    if key_event.modifiers.intersects(KeyModifiers::SHIFT) && key_event.code != KeyCode::BackTab {
        parts.push("shift".to_string());
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        parts.push("alt".to_string());
    }
    parts.push(key_code);
    parts.join("-")
}

pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{raw}`"));
    }
    let trimmed = raw.strip_prefix('<').unwrap_or(raw);
    let trimmed = trimmed.strip_suffix('>').unwrap_or(trimmed);
    trimmed.split("><").map(parse_key_event).collect()
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<Mode, HashMap<String, Style>>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, String>>::deserialize(deserializer)?;

        let styles = parsed_map
            .into_iter()
            .map(|(mode, inner_map)| {
                let converted = inner_map
                    .into_iter()
                    .map(|(key, style_string)| (key, parse_style(&style_string)))
                    .collect();
                (mode, converted)
            })
            .collect();

        Ok(Styles(styles))
    }
}

/// Parse `"[bold] [underline] fg on bg"` into a Style.
pub fn parse_style(line: &str) -> Style {
    let lower = line.to_lowercase();
    let (foreground, background) = match lower.split_once("on ") {
        Some((fg, bg)) => (fg, bg),
        None => (lower.as_str(), ""),
    };

    let mut style = Style::default();
    let mut modifiers = Modifier::empty();
    for word in foreground.split_whitespace() {
        match word {
            "bold" => modifiers |= Modifier::BOLD,
            "underline" => modifiers |= Modifier::UNDERLINED,
            "inverse" => modifiers |= Modifier::REVERSED,
            other => {
                if let Some(fg) = parse_color(other) {
                    style = style.fg(fg);
                }
            }
        }
    }
    if let Some(bg) = background.split_whitespace().last().and_then(parse_color) {
        style = style.bg(bg);
    }
    style.add_modifier(modifiers)
}

fn parse_color(s: &str) -> Option<Color> {
    match s.trim().replace("grey", "gray").as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" => Some(Color::Gray),
        "darkgray" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        other => other
            .strip_prefix("color")
            .and_then(|n| n.parse::<u8>().ok())
            .map(Color::Indexed),
    }
}
