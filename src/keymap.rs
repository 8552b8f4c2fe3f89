// src/keymap.rs - Key chords, input events, and chord-to-command bindings

use crate::command::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("Unterminated key group starting at byte {0}")]
    Unterminated(usize),
    #[error("Unsupported key event: {0}")]
    Unsupported(String),
    #[error("{0}")]
    UnknownCommand(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(u8),
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Enter,
    Backspace,
    Delete,
    Tab,
    Esc,
    F(u8),
}

impl Key {
    /// Virtual-key style code used when packing a chord.
    fn code(&self) -> u8 {
        match self {
            Key::Char(c) => *c,
            Key::Backspace => 0x08,
            Key::Tab => 0x09,
            Key::Enter => 0x0d,
            Key::Esc => 0x1b,
            Key::End => 0x23,
            Key::Home => 0x24,
            Key::Left => 0x25,
            Key::Up => 0x26,
            Key::Right => 0x27,
            Key::Down => 0x28,
            Key::Delete => 0x2e,
            Key::F(n) => 0x6f_u8.wrapping_add(*n),
        }
    }

    fn from_name(name: &str) -> Result<Key, KeymapError> {
        if let [byte] = name.as_bytes() {
            if byte.is_ascii_graphic() {
                return Ok(Key::Char(*byte));
            }
        }
        let key = match name.to_ascii_lowercase().as_str() {
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "home" => Key::Home,
            "end" => Key::End,
            "enter" | "return" | "cr" => Key::Enter,
            "backspace" | "bs" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "tab" => Key::Tab,
            "esc" | "escape" => Key::Esc,
            "space" => Key::Char(b' '),
            "lt" => Key::Char(b'<'),
            "gt" => Key::Char(b'>'),
            lower => match lower.strip_prefix('f').map(str::parse::<u8>) {
                Some(Ok(n)) if (1..=24).contains(&n) => Key::F(n),
                _ => return Err(KeymapError::UnknownKey(name.to_string())),
            },
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(b' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{}", *c as char),
            Key::F(n) => write!(f, "f{}", n),
            other => f.write_str(&format!("{:?}", other).to_ascii_lowercase()),
        }
    }
}

/// A key together with the modifiers held while it was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Key code in the low byte, then one bit each for ctrl, alt, shift.
    pub fn packed(&self) -> u16 {
        u16::from(self.key.code())
            | (u16::from(self.ctrl) << 8)
            | (u16::from(self.alt) << 9)
            | (u16::from(self.shift) << 10)
    }

    /// The character this chord types, or 0 when it types nothing.
    pub fn character(&self) -> u8 {
        if self.ctrl || self.alt {
            return 0;
        }
        match self.key {
            Key::Char(c) => c,
            Key::Enter => b'\n',
            Key::Tab => b'\t',
            _ => 0,
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for KeyChord {
    type Err = KeymapError;

    /// Parse `"ctrl+alt+shift+<key>"`. Modifiers are case-insensitive; a
    /// trailing `"++"` names the plus key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = if s == "+" {
            ("", "+")
        } else if let Some(prefix) = s.strip_suffix("++") {
            (prefix, "+")
        } else {
            s.rsplit_once('+').unwrap_or(("", s))
        };

        let mut chord = KeyChord::new(Key::from_name(key)?);
        for modifier in modifiers.split('+').filter(|m| !m.is_empty()) {
            chord = match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "c" => chord.ctrl(),
                "alt" | "meta" | "a" | "m" => chord.alt(),
                "shift" | "s" => chord.shift(),
                _ => return Err(KeymapError::UnknownModifier(modifier.to_string())),
            };
        }
        Ok(chord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEventKind {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub chord: KeyChord,
    pub character: u8,
    pub kind: InputEventKind,
}

impl InputEvent {
    pub fn pressed(chord: KeyChord) -> Self {
        Self {
            chord,
            character: chord.character(),
            kind: InputEventKind::Pressed,
        }
    }
}

impl TryFrom<KeyEvent> for InputEvent {
    type Error = KeymapError;

    fn try_from(event: KeyEvent) -> Result<Self, Self::Error> {
        let key = match event.code {
            KeyCode::Char(c) if c.is_ascii() => Key::Char(c as u8),
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::Esc => Key::Esc,
            KeyCode::F(n) if (1..=24).contains(&n) => Key::F(n),
            other => return Err(KeymapError::Unsupported(format!("{:?}", other))),
        };
        let chord = KeyChord {
            key,
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
        };
        let kind = match event.kind {
            KeyEventKind::Release => InputEventKind::Released,
            KeyEventKind::Press | KeyEventKind::Repeat => InputEventKind::Pressed,
        };
        Ok(Self {
            chord,
            character: chord.character(),
            kind,
        })
    }
}

/// Parse a key script such as `"Hello<Enter><Up><C-q>"` into pressed events.
///
/// Plain characters type themselves. A `<...>` group names one chord, either
/// with `C-`/`A-`/`S-` prefixes or in the `ctrl+x` form.
pub fn parse_key_script(script: &str) -> Result<Vec<InputEvent>, KeymapError> {
    let mut events = Vec::new();
    let mut rest = script;
    let mut offset = 0;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            let close = rest
                .find('>')
                .ok_or(KeymapError::Unterminated(offset))?;
            events.push(InputEvent::pressed(parse_group(&rest[1..close])?));
            offset += close + 1;
            rest = &rest[close + 1..];
            continue;
        }

        let chord = match ch {
            '\n' => KeyChord::new(Key::Enter),
            '\t' => KeyChord::new(Key::Tab),
            c if c.is_ascii() && !c.is_ascii_control() => KeyChord::new(Key::Char(c as u8)),
            c => return Err(KeymapError::UnknownKey(c.to_string())),
        };
        events.push(InputEvent::pressed(chord));
        offset += ch.len_utf8();
        rest = &rest[ch.len_utf8()..];
    }
    Ok(events)
}

fn parse_group(group: &str) -> Result<KeyChord, KeymapError> {
    let (mut ctrl, mut alt, mut shift) = (false, false, false);
    let mut rest = group;
    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        match rest.as_bytes()[0].to_ascii_lowercase() {
            b'c' => ctrl = true,
            b'a' | b'm' => alt = true,
            b's' => shift = true,
            _ => break,
        }
        rest = &rest[2..];
    }
    let mut chord: KeyChord = rest.parse()?;
    chord.ctrl |= ctrl;
    chord.alt |= alt;
    chord.shift |= shift;
    Ok(chord)
}

/// Chord-to-command table. Unbound chords resolve to `Command::Null`.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyChord, Command>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, chord: KeyChord, command: Command) {
        self.bindings.insert(chord, command);
    }

    pub fn lookup(&self, chord: &KeyChord) -> Command {
        self.bindings.get(chord).copied().unwrap_or(Command::Null)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind one `"chord" = "command"` pair given as strings.
    pub fn bind_named(&mut self, chord: &str, command: &str) -> Result<(), KeymapError> {
        let chord: KeyChord = chord.parse()?;
        let command: Command = command.parse().map_err(KeymapError::UnknownCommand)?;
        self.bind(chord, command);
        Ok(())
    }

    /// Overlay string bindings; malformed entries are logged and skipped.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (chord, command) in overrides {
            if let Err(e) = self.bind_named(chord, command) {
                warn!("Ignoring binding {:?} = {:?}: {}", chord, command, e);
            }
        }
        self
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Keymap::empty();
        for c in b' '..=b'~' {
            keymap.bind(KeyChord::new(Key::Char(c)), Command::SelfInsertCharacter);
            keymap.bind(KeyChord::new(Key::Char(c)).shift(), Command::SelfInsertCharacter);
        }

        // Movement
        keymap.bind(KeyChord::new(Key::Right), Command::NextCharacter);
        keymap.bind(KeyChord::new(Key::Left), Command::PrevCharacter);
        keymap.bind(KeyChord::new(Key::Up), Command::PrevLine);
        keymap.bind(KeyChord::new(Key::Down), Command::NextLine);
        keymap.bind(KeyChord::new(Key::Enter), Command::InsertNewline);
        keymap.bind(KeyChord::new(Key::End), Command::EndOfLine);
        keymap.bind(KeyChord::new(Key::Home), Command::StartOfLine);

        // Deletion
        keymap.bind(KeyChord::new(Key::Backspace), Command::DeleteBackwardCharacter);
        keymap.bind(KeyChord::new(Key::Delete), Command::DeleteForwardCharacter);

        keymap.bind(KeyChord::new(Key::F(4)).alt(), Command::Exit);
        keymap.bind(KeyChord::new(Key::Char(b'q')).ctrl(), Command::Exit);
        keymap
    }
}
