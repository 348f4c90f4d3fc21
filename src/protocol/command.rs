//! Panel command grammar
//!
//! One datagram carries one command line:
//!
//! ```text
//! sliders 50|30|75
//! switch
//! mute master
//! unmute mic
//! set {0.0.0.00000000}.{a3ce8b3f-a28c-4cb8-b22c-af914782737e}
//! ```
//!
//! Prefixes are case-sensitive and checked in the order above. Anything
//! else becomes [`Command::Unknown`].

use std::fmt;

use crate::error::CommandError;

const SLIDERS_PREFIX: &str = "sliders ";
const SWITCH_PREFIX: &str = "switch";
const MUTE_PREFIX: &str = "mute ";
const UNMUTE_PREFIX: &str = "unmute ";
const SET_PREFIX: &str = "set ";

/// Separator between slider levels
const LEVEL_SEPARATOR: char = '|';

/// A decoded panel command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Volume levels, index 0 is the default output
    SetSliders(Vec<f64>),
    /// Swap the default output between speakers and headphones
    Switch,
    /// Mute a target (`master` or anything else)
    Mute(String),
    /// Unmute a target
    Unmute(String),
    /// Make the named device the default, forwarded verbatim
    SetDefault(String),
    /// Unrecognized text, kept for logging
    Unknown(String),
}

impl Command {
    /// Parse one command line.
    ///
    /// Leading and trailing whitespace is ignored. A malformed slider
    /// entry rejects the whole command.
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let text = text.trim();

        if let Some(rest) = text.strip_prefix(SLIDERS_PREFIX) {
            return parse_levels(rest).map(Command::SetSliders);
        }

        if text.starts_with(SWITCH_PREFIX) {
            return Ok(Command::Switch);
        }

        if text.starts_with(MUTE_PREFIX) {
            return Ok(Command::Mute(second_token(text)));
        }

        if text.starts_with(UNMUTE_PREFIX) {
            return Ok(Command::Unmute(second_token(text)));
        }

        if text.starts_with(SET_PREFIX) {
            return Ok(Command::SetDefault(second_token(text)));
        }

        Ok(Command::Unknown(text.to_string()))
    }

    /// Short name of the command, used in log fields
    pub fn verb(&self) -> &'static str {
        match self {
            Command::SetSliders(_) => "sliders",
            Command::Switch => "switch",
            Command::Mute(_) => "mute",
            Command::Unmute(_) => "unmute",
            Command::SetDefault(_) => "set",
            Command::Unknown(_) => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Command::Unknown(_))
    }
}

impl fmt::Display for Command {
    /// Writes the canonical wire text, which parses back to `self`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetSliders(levels) => {
                f.write_str(SLIDERS_PREFIX)?;
                for (i, level) in levels.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", LEVEL_SEPARATOR)?;
                    }
                    write!(f, "{}", level)?;
                }
                Ok(())
            }
            Command::Switch => f.write_str(SWITCH_PREFIX),
            Command::Mute(target) => write!(f, "{}{}", MUTE_PREFIX, target),
            Command::Unmute(target) => write!(f, "{}{}", UNMUTE_PREFIX, target),
            Command::SetDefault(device) => write!(f, "{}{}", SET_PREFIX, device),
            Command::Unknown(raw) => f.write_str(raw),
        }
    }
}

fn parse_levels(rest: &str) -> Result<Vec<f64>, CommandError> {
    rest.split(LEVEL_SEPARATOR)
        .enumerate()
        .map(|(index, token)| parse_level(index, token))
        .collect()
}

fn parse_level(index: usize, token: &str) -> Result<f64, CommandError> {
    let token = token.trim();
    let invalid = || CommandError::InvalidLevel {
        index,
        token: token.to_string(),
    };

    if !is_decimal(token) {
        return Err(invalid());
    }
    token.parse::<f64>().map_err(|_| invalid())
}

/// `["-"] 1*DIGIT ["." 1*DIGIT]`
///
/// Stricter than `f64::from_str`, which also takes `inf`, `NaN`, exponents
/// and a leading `+`.
fn is_decimal(token: &str) -> bool {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match unsigned.split_once('.') {
        Some((whole, frac)) => digits(whole) && digits(frac),
        None => digits(unsigned),
    }
}

/// Text is trimmed and every prefix ends in a space, so a second token
/// always exists once a prefix matched.
fn second_token(text: &str) -> String {
    text.split_whitespace().nth(1).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_sliders() {
        assert_eq!(
            Command::parse("sliders 50|30").unwrap(),
            Command::SetSliders(vec![50.0, 30.0])
        );
        assert_eq!(
            Command::parse("  sliders -1.5|0|100.25 \n").unwrap(),
            Command::SetSliders(vec![-1.5, 0.0, 100.25])
        );
        // Panel firmware may pad around separators
        assert_eq!(
            Command::parse("sliders 10 | 20").unwrap(),
            Command::SetSliders(vec![10.0, 20.0])
        );
    }

    #[test]
    fn test_parse_sliders_rejects_bad_entry() {
        assert_eq!(
            Command::parse("sliders 50|abc|30"),
            Err(CommandError::InvalidLevel {
                index: 1,
                token: "abc".to_string()
            })
        );
        assert_eq!(
            Command::parse("sliders 50||30"),
            Err(CommandError::InvalidLevel {
                index: 1,
                token: String::new()
            })
        );

        for token in ["NaN", "inf", "1e3", "+5", ".5", "5.", "--1", "0x10"] {
            let text = format!("sliders {}", token);
            assert!(
                matches!(Command::parse(&text), Err(CommandError::InvalidLevel { index: 0, .. })),
                "{} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_parse_switch() {
        assert_eq!(Command::parse("switch").unwrap(), Command::Switch);
        // Remaining text is ignored
        assert_eq!(Command::parse("switch now").unwrap(), Command::Switch);
    }

    #[test]
    fn test_parse_mute_targets() {
        assert_eq!(
            Command::parse("mute master").unwrap(),
            Command::Mute("master".to_string())
        );
        assert_eq!(
            Command::parse("unmute mic").unwrap(),
            Command::Unmute("mic".to_string())
        );
        // Only the second token counts
        assert_eq!(
            Command::parse("mute   master extra").unwrap(),
            Command::Mute("master".to_string())
        );
    }

    #[test]
    fn test_parse_set_default_verbatim() {
        let id = "{0.0.0.00000000}.{a3ce8b3f-a28c-4cb8-b22c-af914782737e}";
        assert_eq!(
            Command::parse(&format!("set {}", id)).unwrap(),
            Command::SetDefault(id.to_string())
        );
    }

    #[test]
    fn test_verbs_with_padding_keep_their_argument() {
        assert_eq!(
            Command::parse("set  \t Speakers  ").unwrap(),
            Command::SetDefault("Speakers".to_string())
        );
        assert_eq!(
            Command::parse(" unmute \t\tmic\n").unwrap(),
            Command::Unmute("mic".to_string())
        );
        // Padding alone trims back to the bare verb
        assert!(Command::parse("mute    ").unwrap().is_unknown());
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse("ping").unwrap(),
            Command::Unknown("ping".to_string())
        );
        // Case-sensitive, and a bare verb lacks its separator
        for text in ["SWITCH", "Mute master", "sliders", "mute", "settings x", ""] {
            assert!(Command::parse(text).unwrap().is_unknown(), "{:?}", text);
        }
    }

    #[test]
    fn test_display_is_wire_text() {
        assert_eq!(Command::SetSliders(vec![50.0, 30.5]).to_string(), "sliders 50|30.5");
        assert_eq!(Command::Switch.to_string(), "switch");
        assert_eq!(Command::Unmute("mic".into()).to_string(), "unmute mic");
    }

    proptest! {
        #[test]
        fn prop_sliders_round_trip(levels in prop::collection::vec(-1000.0f64..1000.0, 1..8)) {
            let command = Command::SetSliders(levels);
            prop_assert_eq!(Command::parse(&command.to_string()).unwrap(), command);
        }

        #[test]
        fn prop_parse_is_deterministic(text in "\\PC{0,40}") {
            let first = Command::parse(&text);
            prop_assert_eq!(&first, &Command::parse(&text));

            if let Ok(command) = first {
                prop_assert_eq!(Command::parse(&command.to_string()).unwrap(), command);
            }
        }

        #[test]
        fn prop_unprefixed_text_is_unknown(text in "[a-z]{1,12}") {
            prop_assume!(!text.starts_with("switch"));
            prop_assert_eq!(Command::parse(&text).unwrap(), Command::Unknown(text.clone()));
        }
    }
}
