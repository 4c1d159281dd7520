//! Host signals typed on stdin.

use peace_presence::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Visibility(Visibility),
    Focus,
    Quit,
}

impl Command {
    /// Parse one input line. Case and surrounding whitespace are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Command::Visibility(Visibility::Visible)),
            "hidden" => Some(Command::Visibility(Visibility::Hidden)),
            "focus" => Some(Command::Focus),
            "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}
