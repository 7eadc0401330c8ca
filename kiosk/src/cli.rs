//! Parsing of terminal input lines: plain lines are card scans, lines
//! starting with `/` are staff commands.

use thiserror::Error;

use crate::state::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Page(Screen),
    Search(String),
    RemoteSearch(String),
    Calendar(String),
    PreviousMonth,
    NextMonth,
    CheckIn(String),
    /// Award to the given student, or the selected one
    Award { id: Option<String>, amount: String },
    Preset(usize),
    Focus(String),
    Set { field: String, value: String },
    Submit,
    Confirm,
    Admin(String),
    AdminOff,
    Url(String),
    Refresh,
    InitSheet,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Scan(String),
    Command(Command),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("알 수 없는 명령입니다: /{0} (/help)")]
    Unknown(String),
    #[error("사용법: {0}")]
    Usage(&'static str),
}

pub fn parse_line(line: &str) -> Result<Input, ParseError> {
    let trimmed = line.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Ok(Input::Scan(trimmed.to_string()));
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    let required = |usage: &'static str| -> Result<String, ParseError> {
        if rest.is_empty() {
            Err(ParseError::Usage(usage))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "page" | "p" => Command::Page(
            Screen::from_name(rest).ok_or(ParseError::Usage("/page <화면 이름>"))?,
        ),
        "search" | "s" => Command::Search(rest.to_string()),
        "remote" => Command::RemoteSearch(required("/remote <이름>")?),
        "calendar" | "cal" => Command::Calendar(required("/calendar <ID>")?),
        "prev" => Command::PreviousMonth,
        "next" => Command::NextMonth,
        "checkin" => Command::CheckIn(required("/checkin <ID>")?),
        "award" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            match parts.as_slice() {
                [amount] => Command::Award {
                    id: None,
                    amount: amount.to_string(),
                },
                [id, amount] => Command::Award {
                    id: Some(id.to_string()),
                    amount: amount.to_string(),
                },
                _ => return Err(ParseError::Usage("/award [ID] <포인트>")),
            }
        }
        "preset" => Command::Preset(
            rest.parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ParseError::Usage("/preset <번호>"))?,
        ),
        "focus" => Command::Focus(required("/focus <필드|point>")?),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(ParseError::Usage("/set <필드> <값>"))?;
            Command::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            }
        }
        "submit" => Command::Submit,
        "confirm" => Command::Confirm,
        "admin" if rest.eq_ignore_ascii_case("off") => Command::AdminOff,
        "admin" => Command::Admin(required("/admin <비밀번호> | /admin off")?),
        "url" => Command::Url(required("/url <주소>")?),
        "refresh" => Command::Refresh,
        "initsheet" => Command::InitSheet,
        "status" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Input::Command(command))
}
