// src/editor.rs - Editing session: one buffer, one keymap, command dispatch

use crate::buffer::{BufferError, Cursor, GapBuffer};
use crate::command::Command;
use crate::config::QedConfig;
use crate::keymap::{InputEvent, InputEventKind, Keymap};
use crate::motion;
use log::debug;

pub struct Editor {
    pub buffer: GapBuffer,
    pub keymap: Keymap,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            buffer: GapBuffer::default(),
            keymap: Keymap::default(),
        }
    }
}

impl Editor {
    pub fn new(config: &QedConfig) -> Result<Self, BufferError> {
        Ok(Self {
            buffer: GapBuffer::with_min_gap(config.initial_gap, config.min_gap_growth)?,
            keymap: Keymap::default().with_overrides(&config.bindings),
        })
    }

    /// Seed the buffer by inserting `text` byte by byte at increasing cursors.
    pub fn load_text(&mut self, text: &str) -> Result<(), BufferError> {
        for (i, ch) in text.bytes().enumerate() {
            self.buffer.insert(i, ch)?;
        }
        Ok(())
    }

    pub fn point(&self) -> Cursor {
        self.buffer.point()
    }

    pub fn set_point(&mut self, cursor: Cursor) -> Result<(), BufferError> {
        self.buffer.set_point(cursor)
    }

    /// Route a key press through the keymap. Returns true if the session
    /// should end.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<bool, BufferError> {
        if event.kind != InputEventKind::Pressed {
            return Ok(false);
        }
        let command = match self.keymap.lookup(&event.chord) {
            Command::SelfInsertCharacter if event.character != 0 => {
                Command::InsertChar(event.character)
            }
            Command::SelfInsertCharacter => Command::Null,
            other => other,
        };
        debug!(
            "Keys: {} ({:#05x}), Command: {}, Cursor: {}",
            event.chord,
            event.chord.packed(),
            command,
            self.buffer.point()
        );
        self.execute_command(command)
    }

    pub fn execute_command(&mut self, cmd: Command) -> Result<bool, BufferError> {
        // Returns true if should quit
        let point = self.buffer.point();
        match cmd {
            Command::Exit => return Ok(true),
            Command::Null | Command::SelfInsertCharacter => {
                debug!("{} has no effect here", cmd);
            }
            Command::InsertChar(ch) => self.buffer.insert(point, ch)?,
            Command::NextCharacter => {
                self.buffer.set_point(motion::next_char(&self.buffer, point))?;
            }
            Command::PrevCharacter => {
                self.buffer.set_point(motion::prev_char(&self.buffer, point))?;
            }
            Command::DeleteBackwardCharacter => {
                self.buffer.delete_backward(point)?;
            }
            Command::DeleteForwardCharacter => {
                self.buffer.delete_forward(point)?;
            }
            Command::InsertNewline => {
                self.buffer.insert(point, b'\n')?;
                let start = motion::line_start(&self.buffer, self.buffer.point());
                self.buffer.set_point(start)?;
            }
            Command::NextLine => {
                self.buffer.set_point(motion::line_down(&self.buffer, point))?;
            }
            Command::PrevLine => {
                self.buffer.set_point(motion::line_up(&self.buffer, point))?;
            }
            Command::EndOfLine => {
                self.buffer.set_point(motion::line_end(&self.buffer, point))?;
            }
            Command::StartOfLine => {
                self.buffer.set_point(motion::line_start(&self.buffer, point))?;
            }
        }
        Ok(false)
    }

    pub fn render_lines(&self) -> Vec<String> {
        self.buffer
            .lines()
            .map(|line| String::from_utf8_lossy(&line).into_owned())
            .collect()
    }

    /// Like `render_lines`, with `marker` spliced into the point's line at the
    /// point's byte column. The split happens on raw bytes, so a point inside
    /// a multi-byte character still lands where the buffer has it.
    pub fn render_lines_marked(&self, marker: &str) -> Vec<String> {
        let (point_line, point_col) = self.point_line_col();
        self.buffer
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i != point_line {
                    return String::from_utf8_lossy(&line).into_owned();
                }
                let (before, after) = line.split_at(point_col.min(line.len()));
                format!(
                    "{}{}{}",
                    String::from_utf8_lossy(before),
                    marker,
                    String::from_utf8_lossy(after)
                )
            })
            .collect()
    }

    pub fn point_line_col(&self) -> (usize, usize) {
        motion::line_col(&self.buffer, self.buffer.point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{Key, KeyChord};

    fn editor_with(text: &str) -> Editor {
        let mut editor = Editor::default();
        editor.load_text(text).unwrap();
        editor
    }

    #[test]
    fn test_load_text_leaves_point_at_end() {
        let editor = editor_with("Hello\nWorld");
        assert_eq!(editor.buffer.to_string(), "Hello\nWorld");
        assert_eq!(editor.point(), 11);
    }

    #[test]
    fn test_insert_char_advances_point() {
        let mut editor = editor_with("ac");
        editor.set_point(1).unwrap();
        editor.execute_command(Command::InsertChar(b'b')).unwrap();
        assert_eq!(editor.buffer.to_string(), "abc");
        assert_eq!(editor.point(), 2);
    }

    #[test]
    fn test_insert_newline_moves_to_new_line_start() {
        let mut editor = editor_with("abcd");
        editor.set_point(2).unwrap();
        editor.execute_command(Command::InsertNewline).unwrap();
        assert_eq!(editor.buffer.to_string(), "ab\ncd");
        assert_eq!(editor.point(), 3);
        assert_eq!(editor.point_line_col(), (1, 0));
    }

    #[test]
    fn test_deletes_at_point() {
        let mut editor = editor_with("abcd");
        editor.set_point(2).unwrap();
        editor.execute_command(Command::DeleteBackwardCharacter).unwrap();
        assert_eq!(editor.buffer.to_string(), "acd");
        assert_eq!(editor.point(), 1);
        editor.execute_command(Command::DeleteForwardCharacter).unwrap();
        assert_eq!(editor.buffer.to_string(), "ad");
        assert_eq!(editor.point(), 1);
    }

    #[test]
    fn test_line_commands() {
        let mut editor = editor_with("Hello\nWorld\nfoo bar bazzle");
        editor.set_point(8).unwrap();
        editor.execute_command(Command::PrevLine).unwrap();
        assert_eq!(editor.point(), 2);
        editor.execute_command(Command::NextLine).unwrap();
        assert_eq!(editor.point(), 8);
        editor.execute_command(Command::EndOfLine).unwrap();
        assert_eq!(editor.point(), 11);
        editor.execute_command(Command::StartOfLine).unwrap();
        assert_eq!(editor.point(), 6);
    }

    #[test]
    fn test_exit_and_null() {
        let mut editor = editor_with("x");
        assert_eq!(editor.execute_command(Command::Null), Ok(false));
        assert_eq!(editor.execute_command(Command::SelfInsertCharacter), Ok(false));
        assert_eq!(editor.buffer.to_string(), "x");
        assert_eq!(editor.execute_command(Command::Exit), Ok(true));
    }

    #[test]
    fn test_dispatch_self_insert_and_release() {
        let mut editor = Editor::default();
        let press = InputEvent::pressed(KeyChord::new(Key::Char(b'q')));
        assert_eq!(editor.dispatch(press), Ok(false));
        let release = InputEvent {
            kind: InputEventKind::Released,
            ..press
        };
        assert_eq!(editor.dispatch(release), Ok(false));
        assert_eq!(editor.buffer.to_string(), "q");

        let quit = InputEvent::pressed(KeyChord::new(Key::Char(b'q')).ctrl());
        assert_eq!(editor.dispatch(quit), Ok(true));
    }

    #[test]
    fn test_config_bindings_apply() {
        let mut config = QedConfig::default();
        config
            .bindings
            .insert("ctrl+e".to_string(), "SelfEndOfLine".to_string());
        let mut editor = Editor::new(&config).unwrap();
        editor.load_text("abc\ndef").unwrap();
        editor.set_point(1).unwrap();
        editor
            .dispatch(InputEvent::pressed(KeyChord::new(Key::Char(b'e')).ctrl()))
            .unwrap();
        assert_eq!(editor.point(), 3);
    }

    #[test]
    fn test_render_lines() {
        let editor = editor_with("one\ntwo\n");
        assert_eq!(editor.render_lines(), vec!["one", "two", ""]);
    }

    #[test]
    fn test_render_lines_marked_uses_byte_column() {
        // "é" is two bytes, so byte column 3 sits between 'a' and 'b'.
        let mut editor = editor_with("x\néab");
        editor.set_point(5).unwrap();
        assert_eq!(editor.point_line_col(), (1, 3));
        assert_eq!(editor.render_lines_marked("|"), vec!["x", "éa|b"]);

        editor.set_point(0).unwrap();
        assert_eq!(editor.render_lines_marked("|"), vec!["|x", "éab"]);
    }

    #[test]
    fn test_new_reports_allocation_failure() {
        let config = QedConfig {
            initial_gap: usize::MAX,
            ..QedConfig::default()
        };
        assert!(matches!(
            Editor::new(&config),
            Err(BufferError::Allocation { .. })
        ));
    }
}
