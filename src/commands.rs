use crate::error::CommandError;
use crate::locale::Locale;
use std::path::PathBuf;
use std::str::FromStr;

/// A shell command. Positions are typed 1-based and stored 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    Goto(usize),
    /// `None` toggles.
    Loop(Option<bool>),
    PlaylistLoop(Option<bool>),
    Shuffle,
    Sort,
    Add(PathBuf),
    Remove(usize),
    Move { from: usize, to: usize },
    Clear,
    List,
    /// `None` reports the active locale.
    Locale(Option<Locale>),
    Save,
    Help,
    Quit,
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Goto(_) => "goto",
            Self::Loop(_) => "loop",
            Self::PlaylistLoop(_) => "playlist-loop",
            Self::Shuffle => "shuffle",
            Self::Sort => "sort",
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Move { .. } => "move",
            Self::Clear => "clear",
            Self::List => "list",
            Self::Locale(_) => "locale",
            Self::Save => "save",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        let mut split = input.splitn(2, char::is_whitespace);
        let command = split.next().unwrap_or_default();
        let rest = split.next().unwrap_or("").trim();

        let command = match command.to_ascii_lowercase().as_str() {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "stop" => Self::Stop,
            "next" | "n" => Self::Next,
            "previous" | "prev" | "p" => Self::Previous,
            "goto" => Self::Goto(position(rest, "goto <n>")?),
            "loop" => Self::Loop(switch(rest, "loop [on|off]")?),
            "playlist-loop" => Self::PlaylistLoop(switch(rest, "playlist-loop [on|off]")?),
            "shuffle" => Self::Shuffle,
            "sort" => Self::Sort,
            "add" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("add <path>"));
                }
                Self::Add(PathBuf::from(rest))
            }
            "remove" | "rm" => Self::Remove(position(rest, "remove <n>")?),
            "move" | "mv" => {
                const USAGE: &str = "move <from> <to>";
                let mut args = rest.split_whitespace();
                let (Some(from), Some(to), None) = (args.next(), args.next(), args.next()) else {
                    return Err(CommandError::Usage(USAGE));
                };
                Self::Move {
                    from: position(from, USAGE)?,
                    to: position(to, USAGE)?,
                }
            }
            "clear" => Self::Clear,
            "list" | "ls" => Self::List,
            "locale" => match rest {
                "" => Self::Locale(None),
                tag => Self::Locale(Some(
                    Locale::new(tag).map_err(|_| CommandError::Usage("locale [tag]"))?,
                )),
            },
            "save" => Self::Save,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn position(raw: &str, usage: &'static str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn switch(raw: &str, usage: &'static str) -> Result<Option<bool>, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "on" | "true" | "yes" => Ok(Some(true)),
        "off" | "false" | "no" => Ok(Some(false)),
        _ => Err(CommandError::Usage(usage)),
    }
}
