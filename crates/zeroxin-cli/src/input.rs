//! Parsing of interactive session commands.

use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Open(PathBuf),
    /// Zero-based suggestion index.
    Pick(usize),
    Custom(String),
    Change,
    Another(Option<PathBuf>),
    Save,
    Dismiss,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    if let Ok(n) = word.parse::<usize>() {
        if n >= 1 && rest.is_empty() {
            return Input::Pick(n - 1);
        }
        return Input::Unknown(line.to_string());
    }

    match word.to_ascii_lowercase().as_str() {
        "open" | "upload" if !rest.is_empty() => Input::Open(PathBuf::from(rest)),
        "custom" => Input::Custom(rest.to_string()),
        "change" => Input::Change,
        "another" => Input::Another((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "save" | "download" => Input::Save,
        "dismiss" => Input::Dismiss,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}
