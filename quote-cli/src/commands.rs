//! Line-oriented commands accepted by the terminal front end.

use std::str::FromStr;

use quote_core::models::{ContactPreference, PersonalField};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  choose <field> [value]       answer a question (blank value clears it)
  set <field> [text]           fill a contact field: firstName, lastName,
                               email, phone, company, message
  opt <newsletter|urgent> <on|off>
  next | back                  move between steps
  estimate                     show the current estimate
  status                       show step, answers and contact details
  services                     list services and base prices
  save                         save a draft now
  reset                        clear everything, draft included
  submit                       send the quote request (last step only)
  log <level>                  change the log filter, e.g. `log debug`
  log console <on|off>         show or hide log output
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Choose { field: String, value: String },
    Set { field: PersonalField, value: String },
    Opt { preference: ContactPreference, enabled: bool },
    Next,
    Back,
    Estimate,
    Status,
    Services,
    Save,
    Reset,
    Submit,
    LogLevel(String),
    LogConsole(bool),
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', type `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown contact field '{0}'")]
    UnknownField(String),

    #[error("unknown option '{0}', expected newsletter or urgent")]
    UnknownPreference(String),

    #[error("expected on or off, got '{0}'")]
    InvalidToggle(String),
}

/// Splits off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn parse_toggle(s: &str) -> Result<bool, CommandError> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(CommandError::InvalidToggle(s.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, rest) = split_word(line);

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "choose" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(CommandError::Usage("choose <field> [value]"));
                }
                Ok(Self::Choose {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            "set" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(CommandError::Usage("set <field> [text]"));
                }
                let field = PersonalField::parse(field)
                    .ok_or_else(|| CommandError::UnknownField(field.to_string()))?;
                Ok(Self::Set {
                    field,
                    value: value.to_string(),
                })
            }
            "opt" => {
                let (name, toggle) = split_word(rest);
                if name.is_empty() || toggle.is_empty() {
                    return Err(CommandError::Usage("opt <newsletter|urgent> <on|off>"));
                }
                let preference = ContactPreference::parse(name)
                    .ok_or_else(|| CommandError::UnknownPreference(name.to_string()))?;
                Ok(Self::Opt {
                    preference,
                    enabled: parse_toggle(toggle)?,
                })
            }
            "log" => match split_word(rest) {
                ("", _) => Err(CommandError::Usage("log <level> | log console <on|off>")),
                ("console", toggle) => Ok(Self::LogConsole(parse_toggle(toggle)?)),
                _ => Ok(Self::LogLevel(rest.to_string())),
            },
            "next" => Ok(Self::Next),
            "back" => Ok(Self::Back),
            "estimate" => Ok(Self::Estimate),
            "status" => Ok(Self::Status),
            "services" => Ok(Self::Services),
            "save" => Ok(Self::Save),
            "reset" => Ok(Self::Reset),
            "submit" => Ok(Self::Submit),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
