use std::fmt;
use std::str::FromStr;

/// Editing actions an input event can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Null,
    Exit,
    /// Insert the character carried by the triggering input event.
    SelfInsertCharacter,
    InsertChar(u8),
    NextCharacter,
    PrevCharacter,
    DeleteBackwardCharacter,
    DeleteForwardCharacter,
    InsertNewline,
    NextLine,
    PrevLine,
    EndOfLine,
    StartOfLine,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Null => "null",
            Command::Exit => "exit",
            Command::SelfInsertCharacter => "SelfInsertCharacter",
            Command::InsertChar(_) => "InsertChar",
            Command::NextCharacter => "SelfNextCharacter",
            Command::PrevCharacter => "SelfPrevCharacter",
            Command::DeleteBackwardCharacter => "SelfDeleteBackwardCharacter",
            Command::DeleteForwardCharacter => "SelfDeleteForwardCharacter",
            Command::InsertNewline => "SelfInsertNewline",
            Command::NextLine => "SelfNextLine",
            Command::PrevLine => "SelfPrevLine",
            Command::EndOfLine => "SelfEndOfLine",
            Command::StartOfLine => "SelfStartOfLine",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = String;

    /// Parse a command name. `InsertChar` carries data and cannot be named.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const NAMED: [Command; 12] = [
            Command::Null,
            Command::Exit,
            Command::SelfInsertCharacter,
            Command::NextCharacter,
            Command::PrevCharacter,
            Command::DeleteBackwardCharacter,
            Command::DeleteForwardCharacter,
            Command::InsertNewline,
            Command::NextLine,
            Command::PrevLine,
            Command::EndOfLine,
            Command::StartOfLine,
        ];
        NAMED
            .into_iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown command: {}", s))
    }
}
