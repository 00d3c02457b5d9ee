// Keyboard/pointer input and its translation into character commands.

use crate::domain::Position;
use crate::use_cases::CharacterCommand;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    D,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Pointer press in canvas coordinates.
    PointerDown(Position),
}

#[derive(Debug, Clone, Copy)]
struct KeyBinding {
    key: KeyCode,
    on_key_down: Option<CharacterCommand>,
    on_key_up: Option<CharacterCommand>,
}

/// Maps keys to commands. Held keys do not repeat their key-down command.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,
    held: HashSet<KeyCode>,
}

impl KeyBindings {
    /// A/D run left/right, Space jumps.
    pub fn character_defaults() -> Self {
        Self {
            bindings: vec![
                KeyBinding {
                    key: KeyCode::D,
                    on_key_down: Some(CharacterCommand::StartMoveRight),
                    on_key_up: Some(CharacterCommand::StopMoveRight),
                },
                KeyBinding {
                    key: KeyCode::A,
                    on_key_down: Some(CharacterCommand::StartMoveLeft),
                    on_key_up: Some(CharacterCommand::StopMoveLeft),
                },
                KeyBinding {
                    key: KeyCode::Space,
                    on_key_down: Some(CharacterCommand::Jump),
                    on_key_up: None,
                },
            ],
            held: HashSet::new(),
        }
    }

    pub fn translate(&mut self, event: InputEvent) -> Option<CharacterCommand> {
        match event {
            InputEvent::KeyDown(key) => {
                if !self.held.insert(key) {
                    return None;
                }
                self.binding(key).and_then(|b| b.on_key_down)
            }
            InputEvent::KeyUp(key) => {
                if !self.held.remove(&key) {
                    return None;
                }
                self.binding(key).and_then(|b| b.on_key_up)
            }
            InputEvent::PointerDown(position) => Some(CharacterCommand::ShootAt(position)),
        }
    }

    fn binding(&self, key: KeyCode) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    UnknownCommand(String),
    BadCoordinates(String),
}

impl fmt::Display for InputParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputParseError::UnknownCommand(line) => write!(f, "unknown input command: {line}"),
            InputParseError::BadCoordinates(line) => {
                write!(f, "expected `shoot <x> <y>`, got: {line}")
            }
        }
    }
}

impl std::error::Error for InputParseError {}

/// Parses one console line: `+a`, `-a`, `+d`, `-d`, `+space`, `-space`, `jump`, `shoot X Y`.
pub fn parse_line(line: &str) -> Result<Vec<InputEvent>, InputParseError> {
    let line = line.trim();
    let mut words = line.split_whitespace();

    let events = match words.next().map(str::to_ascii_lowercase).as_deref() {
        Some("+a") => vec![InputEvent::KeyDown(KeyCode::A)],
        Some("-a") => vec![InputEvent::KeyUp(KeyCode::A)],
        Some("+d") => vec![InputEvent::KeyDown(KeyCode::D)],
        Some("-d") => vec![InputEvent::KeyUp(KeyCode::D)],
        Some("+space") => vec![InputEvent::KeyDown(KeyCode::Space)],
        Some("-space") => vec![InputEvent::KeyUp(KeyCode::Space)],
        Some("jump") => vec![
            InputEvent::KeyDown(KeyCode::Space),
            InputEvent::KeyUp(KeyCode::Space),
        ],
        Some("shoot") => {
            let mut coordinate = || words.next().and_then(|w| w.parse::<f32>().ok());
            match (coordinate(), coordinate()) {
                (Some(x), Some(y)) => vec![InputEvent::PointerDown(Position::new(x, y))],
                _ => return Err(InputParseError::BadCoordinates(line.to_string())),
            }
        }
        Some(_) => return Err(InputParseError::UnknownCommand(line.to_string())),
        None => Vec::new(),
    };

    Ok(events)
}
