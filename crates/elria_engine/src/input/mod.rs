//! Input management system
//!
//! Tracks keyboard and mouse state per frame and maps keys to scene commands.

use std::collections::{HashMap, HashSet};

use crate::config::ConfigError;
use crate::core::config::ControlsConfig;
use crate::foundation::math::Vec2;
use crate::scene::CameraMove;

/// Keyboard and mouse state for the current frame
///
/// Held state persists across frames; pressed, released and click state is
/// cleared by [`InputManager::begin_frame`].
#[derive(Debug)]
pub struct InputManager {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
    mouse_position: Vec2,
    mouse_held: HashSet<MouseButton>,
    clicks: Vec<(MouseButton, Vec2)>,
}

impl InputManager {
    /// Create an input manager with nothing held
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
            mouse_position: Vec2::zeros(),
            mouse_held: HashSet::new(),
            clicks: Vec::new(),
        }
    }

    /// Clear per-frame state
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.clicks.clear();
    }

    /// Record a key transition
    ///
    /// Returns `true` when this is a fresh press (the key was not already held).
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) -> bool {
        if pressed {
            let fresh = self.held.insert(key);
            if fresh {
                self.pressed.insert(key);
            }
            fresh
        } else {
            if self.held.remove(&key) {
                self.released.insert(key);
            }
            false
        }
    }

    /// Handle mouse button input; a press records a click at the cursor
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            if self.mouse_held.insert(button) {
                self.clicks.push((button, self.mouse_position));
            }
        } else {
            self.mouse_held.remove(&button);
        }
    }

    /// Record the cursor position
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.mouse_position = Vec2::new(x as f32, y as f32);
    }

    /// Whether a key is currently held
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Whether any of the keys is held
    pub fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.is_held(*key))
    }

    /// Whether a key went down this frame
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether a key went up this frame
    pub fn was_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    /// Keys currently held
    pub fn held_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.held.iter().copied()
    }

    /// Last known cursor position
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Whether a mouse button is held
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Clicks recorded this frame, in order
    pub fn clicks(&self) -> &[(MouseButton, Vec2)] {
        &self.clicks
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyboard keys the frontends can report
///
/// Letter variants are named after their key.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Space,
    Enter,
    Escape,
    /// Arrow keys
    Up,
    Down,
    Left,
    Right,
}

impl KeyCode {
    const LETTERS: [Self; 26] = [
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F, Self::G, Self::H, Self::I,
        Self::J, Self::K, Self::L, Self::M, Self::N, Self::O, Self::P, Self::Q, Self::R,
        Self::S, Self::T, Self::U, Self::V, Self::W, Self::X, Self::Y, Self::Z,
    ];

    /// Key for a typed character (letters in either case, space, newline)
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Self::Space),
            '\n' | '\r' => Some(Self::Enter),
            '\u{1b}' => Some(Self::Escape),
            c if c.is_ascii_alphabetic() => {
                let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
                Self::LETTERS.get(index).copied()
            }
            _ => None,
        }
    }

    /// Key for a configuration name such as `"W"`, `"Space"` or `"ArrowUp"`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return if ch.is_ascii_alphabetic() { Self::from_char(ch) } else { None };
        }
        match name.to_ascii_lowercase().as_str() {
            "space" => Some(Self::Space),
            "enter" | "return" => Some(Self::Enter),
            "escape" | "esc" => Some(Self::Escape),
            "up" | "arrowup" => Some(Self::Up),
            "down" | "arrowdown" => Some(Self::Down),
            "left" | "arrowleft" => Some(Self::Left),
            "right" | "arrowright" => Some(Self::Right),
            _ => None,
        }
    }

    /// Value of `KeyboardEvent.key` (lowercased) for this key in a browser
    pub fn dom_key(self) -> String {
        match self {
            Self::Space => " ".to_string(),
            Self::Enter => "enter".to_string(),
            Self::Escape => "escape".to_string(),
            Self::Up => "arrowup".to_string(),
            Self::Down => "arrowdown".to_string(),
            Self::Left => "arrowleft".to_string(),
            Self::Right => "arrowright".to_string(),
            letter => format!("{letter:?}").to_ascii_lowercase(),
        }
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Actions a key can trigger on the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneCommand {
    /// Step the camera
    MoveCamera(CameraMove),
    /// Switch between play and edit mode
    ToggleEditMode,
    /// Weave a platform (edit mode only)
    WeavePlatform,
    /// Return the camera to its home pose
    ResetCamera,
    /// Stop the engine
    Quit,
}

impl SceneCommand {
    /// Stable action name, used by the HTML key map
    pub fn action_name(self) -> &'static str {
        match self {
            Self::MoveCamera(CameraMove::Forward) => "forward",
            Self::MoveCamera(CameraMove::Backward) => "backward",
            Self::MoveCamera(CameraMove::Left) => "left",
            Self::MoveCamera(CameraMove::Right) => "right",
            Self::MoveCamera(CameraMove::Up) => "up",
            Self::MoveCamera(CameraMove::Down) => "down",
            Self::ToggleEditMode => "toggleEdit",
            Self::WeavePlatform => "weave",
            Self::ResetCamera => "reset",
            Self::Quit => "quit",
        }
    }
}

/// Key to command map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, SceneCommand>,
}

impl KeyBindings {
    /// Build bindings from key names
    ///
    /// Unknown names and keys bound twice are configuration errors.
    pub fn from_config(config: &ControlsConfig) -> Result<Self, ConfigError> {
        let entries = [
            (&config.forward, SceneCommand::MoveCamera(CameraMove::Forward)),
            (&config.backward, SceneCommand::MoveCamera(CameraMove::Backward)),
            (&config.left, SceneCommand::MoveCamera(CameraMove::Left)),
            (&config.right, SceneCommand::MoveCamera(CameraMove::Right)),
            (&config.up, SceneCommand::MoveCamera(CameraMove::Up)),
            (&config.down, SceneCommand::MoveCamera(CameraMove::Down)),
            (&config.toggle_edit, SceneCommand::ToggleEditMode),
            (&config.weave, SceneCommand::WeavePlatform),
            (&config.reset_camera, SceneCommand::ResetCamera),
            (&config.quit, SceneCommand::Quit),
        ];

        let mut bindings = HashMap::with_capacity(entries.len());
        for (name, command) in entries {
            let key = KeyCode::from_name(name)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown key '{name}' for {}", command.action_name())))?;
            if let Some(existing) = bindings.insert(key, command) {
                return Err(ConfigError::Invalid(format!(
                    "key '{name}' bound to both {} and {}",
                    existing.action_name(),
                    command.action_name()
                )));
            }
        }
        Ok(Self { bindings })
    }

    /// Command bound to a key
    pub fn command_for(&self, key: KeyCode) -> Option<SceneCommand> {
        self.bindings.get(&key).copied()
    }

    /// Key bound to a command
    pub fn key_for(&self, command: SceneCommand) -> Option<KeyCode> {
        self.bindings
            .iter()
            .find(|(_, bound)| **bound == command)
            .map(|(key, _)| *key)
    }

    /// All bindings, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (KeyCode, SceneCommand)> + '_ {
        self.bindings.iter().map(|(key, command)| (*key, *command))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = [
            (KeyCode::W, SceneCommand::MoveCamera(CameraMove::Forward)),
            (KeyCode::S, SceneCommand::MoveCamera(CameraMove::Backward)),
            (KeyCode::A, SceneCommand::MoveCamera(CameraMove::Left)),
            (KeyCode::D, SceneCommand::MoveCamera(CameraMove::Right)),
            (KeyCode::Q, SceneCommand::MoveCamera(CameraMove::Up)),
            (KeyCode::C, SceneCommand::MoveCamera(CameraMove::Down)),
            (KeyCode::E, SceneCommand::ToggleEditMode),
            (KeyCode::X, SceneCommand::WeavePlatform),
            (KeyCode::Space, SceneCommand::ResetCamera),
            (KeyCode::Escape, SceneCommand::Quit),
        ];
        Self { bindings: bindings.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!(KeyCode::from_char('w'), Some(KeyCode::W));
        assert_eq!(KeyCode::from_char('Z'), Some(KeyCode::Z));
        assert_eq!(KeyCode::from_char(' '), Some(KeyCode::Space));
        assert_eq!(KeyCode::from_char('1'), None);

        assert_eq!(KeyCode::from_name("x"), Some(KeyCode::X));
        assert_eq!(KeyCode::from_name("Space"), Some(KeyCode::Space));
        assert_eq!(KeyCode::from_name("ArrowLeft"), Some(KeyCode::Left));
        assert_eq!(KeyCode::from_name("esc"), Some(KeyCode::Escape));
        assert_eq!(KeyCode::from_name("Hyper"), None);
        assert_eq!(KeyCode::from_name("7"), None);
    }

    #[test]
    fn test_dom_keys() {
        assert_eq!(KeyCode::W.dom_key(), "w");
        assert_eq!(KeyCode::Space.dom_key(), " ");
        assert_eq!(KeyCode::Up.dom_key(), "arrowup");
    }

    #[test]
    fn test_press_edges() {
        let mut input = InputManager::new();
        assert!(input.handle_key_input(KeyCode::W, true));
        assert!(!input.handle_key_input(KeyCode::W, true));
        assert!(input.is_held(KeyCode::W));
        assert!(input.was_pressed(KeyCode::W));

        input.begin_frame();
        assert!(input.is_held(KeyCode::W));
        assert!(!input.was_pressed(KeyCode::W));

        input.handle_key_input(KeyCode::W, false);
        assert!(!input.is_held(KeyCode::W));
        assert!(input.was_released(KeyCode::W));
    }

    #[test]
    fn test_clicks_record_cursor() {
        let mut input = InputManager::new();
        input.handle_mouse_move(12.0, 34.0);
        input.handle_mouse_button(MouseButton::Left, true);
        input.handle_mouse_button(MouseButton::Left, true);
        assert_eq!(input.clicks(), &[(MouseButton::Left, Vec2::new(12.0, 34.0))]);
        assert!(input.is_mouse_held(MouseButton::Left));

        input.handle_mouse_button(MouseButton::Left, false);
        input.begin_frame();
        assert!(input.clicks().is_empty());
        assert!(!input.is_mouse_held(MouseButton::Left));
    }

    #[test]
    fn test_default_bindings_match_config_defaults() {
        let from_config = KeyBindings::from_config(&ControlsConfig::default()).expect("defaults resolve");
        assert_eq!(from_config, KeyBindings::default());
        assert_eq!(from_config.command_for(KeyCode::X), Some(SceneCommand::WeavePlatform));
        assert_eq!(from_config.command_for(KeyCode::C), Some(SceneCommand::MoveCamera(CameraMove::Down)));
        assert_eq!(from_config.key_for(SceneCommand::ResetCamera), Some(KeyCode::Space));
        assert_eq!(from_config.command_for(KeyCode::Z), None);
    }

    #[test]
    fn test_bad_bindings_rejected() {
        let unknown = ControlsConfig {
            weave: "Hyper".to_string(),
            ..ControlsConfig::default()
        };
        assert!(matches!(KeyBindings::from_config(&unknown), Err(ConfigError::Invalid(_))));

        let duplicate = ControlsConfig {
            weave: "E".to_string(),
            ..ControlsConfig::default()
        };
        assert!(matches!(KeyBindings::from_config(&duplicate), Err(ConfigError::Invalid(_))));
    }
}
