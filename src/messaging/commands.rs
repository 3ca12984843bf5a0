/// Command types for the wizard
///
/// Commands represent user actions (imperative) dispatched by the view layer.
use std::str::FromStr;

use thiserror::Error;

use crate::wizard::{AgeRange, ClaimResponse, IncomeRange, UnknownOption};

/// Wizard commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer the claim question
    SubmitClaimAnswer(ClaimResponse),

    /// Raw postal code input, sanitized by the controller
    UpdatePostalCode(String),

    /// Submit the postal code for validation
    SubmitPostalCode,

    /// Select an age range
    UpdateAgeRange(AgeRange),

    /// Select an income range
    UpdateIncomeRange(IncomeRange),

    /// Submit age and income
    SubmitDetails,

    /// Tear down the session
    Shutdown,
}

/// Text command could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Option(#[from] UnknownOption),
}

impl Command {
    /// Get a short description of the command
    pub fn description(&self) -> String {
        match self {
            Command::SubmitClaimAnswer(answer) => format!("Claim answer: {}", answer.label()),
            Command::UpdatePostalCode(raw) => format!("Update postal code: {:?}", raw),
            Command::SubmitPostalCode => "Submit postal code".to_string(),
            Command::UpdateAgeRange(range) => format!("Age range: {}", range.label()),
            Command::UpdateIncomeRange(range) => format!("Income range: {}", range.label()),
            Command::SubmitDetails => "Submit details".to_string(),
            Command::Shutdown => "Shutdown".to_string(),
        }
    }

    /// Parse a line typed into a text host.
    ///
    /// `yes`, `no`, `not sure`, `zip <code>`, `submit`, `age <range>`,
    /// `income <range>`, `details`, `quit`
    pub fn parse(line: &str) -> Result<Command, ParseCommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseCommandError::Empty);
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(ParseCommandError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };

        match keyword.to_ascii_lowercase().as_str() {
            "yes" | "no" | "not" => Ok(Command::SubmitClaimAnswer(line.parse()?)),
            "claim" => Ok(Command::SubmitClaimAnswer(argument("claim")?.parse()?)),
            "zip" | "postal" => Ok(Command::UpdatePostalCode(argument("zip")?.to_string())),
            "submit" | "continue" => Ok(Command::SubmitPostalCode),
            "age" => Ok(Command::UpdateAgeRange(argument("age")?.parse()?)),
            "income" => Ok(Command::UpdateIncomeRange(argument("income")?.parse()?)),
            "details" | "check" => Ok(Command::SubmitDetails),
            "quit" | "exit" => Ok(Command::Shutdown),
            _ => Err(ParseCommandError::UnknownCommand(keyword.to_string())),
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_claim_answers() {
        assert_eq!(
            Command::parse("Yes"),
            Ok(Command::SubmitClaimAnswer(ClaimResponse::Yes))
        );
        assert_eq!(
            Command::parse("  not sure "),
            Ok(Command::SubmitClaimAnswer(ClaimResponse::NotSure))
        );
        assert_eq!(
            Command::parse("claim No"),
            Ok(Command::SubmitClaimAnswer(ClaimResponse::No))
        );
    }

    #[test]
    fn test_parse_postal_code_keeps_raw_input() {
        assert_eq!(
            Command::parse("zip 902-10"),
            Ok(Command::UpdatePostalCode("902-10".to_string()))
        );
        assert_eq!(Command::parse("submit"), Ok(Command::SubmitPostalCode));
    }

    #[test]
    fn test_parse_details() {
        assert_eq!(
            Command::parse("age 25-34"),
            Ok(Command::UpdateAgeRange(AgeRange::From25To34))
        );
        assert_eq!(
            Command::parse("income $75,000 - $100,000"),
            Ok(Command::UpdateIncomeRange(IncomeRange::From75kTo100k))
        );
        assert_eq!(Command::parse("details"), Ok(Command::SubmitDetails));
        assert_eq!(Command::parse("quit"), Ok(Command::Shutdown));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("   "), Err(ParseCommandError::Empty));
        assert_eq!(
            Command::parse("zip"),
            Err(ParseCommandError::MissingArgument("zip"))
        );
        assert!(matches!(
            Command::parse("jump"),
            Err(ParseCommandError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("age 12-17"),
            Err(ParseCommandError::Option(_))
        ));
    }
}
