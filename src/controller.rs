//! Controller reading actions from text input.
//!
//! An action is written as two whitespace or comma separated numbers, the forward and the
//! angular component, e.g. `1 -0.5` or `[0.3, 0.0]`.

use std::num::ParseFloatError;

use thiserror::Error;

use crate::simulator::ACTION_SIZE;

pub const PROMPT: &str = "[forward, angle]: ";

/// Parses a line into an action. Surrounding brackets are optional.
pub fn parse_action(line: &str) -> Result<[f32; ACTION_SIZE], ParseActionError> {
    let values = line
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|source| ParseActionError::InvalidNumber {
                    token: token.to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = values.len();
    let action: [f32; ACTION_SIZE] = values
        .try_into()
        .map_err(|_| ParseActionError::WrongArity(count))?;
    if action.iter().any(|v| !v.is_finite()) {
        return Err(ParseActionError::NotFinite);
    }
    Ok(action)
}

#[derive(Error, Debug)]
pub enum ParseActionError {
    #[error("expected {expected} values, got {0}", expected = ACTION_SIZE)]
    WrongArity(usize),
    #[error("invalid number {token:?}")]
    InvalidNumber {
        token: String,
        source: ParseFloatError,
    },
    #[error("action values must be finite")]
    NotFinite,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::spaces("1 -0.5", [1.0, -0.5])]
    #[case::comma("0.3,0", [0.3, 0.0])]
    #[case::brackets("[0.3, 0.0]", [0.3, 0.0])]
    #[case::padded("  -1\t1  \n", [-1.0, 1.0])]
    fn test_parse_action(#[case] line: &str, #[case] expected: [f32; 2]) {
        assert_eq!(parse_action(line).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", 0)]
    #[case::single("1", 1)]
    #[case::triple("1 2 3", 3)]
    fn test_parse_action_wrong_arity(#[case] line: &str, #[case] count: usize) {
        assert!(matches!(
            parse_action(line),
            Err(ParseActionError::WrongArity(c)) if c == count
        ));
    }

    #[test]
    fn test_parse_action_wrong_arity_message() {
        let error = parse_action("1 2 3").unwrap_err();
        insta::assert_snapshot!(error.to_string(), @"expected 2 values, got 3");
    }

    #[test]
    fn test_parse_action_invalid_number() {
        let error = parse_action("1 fast").unwrap_err();
        insta::assert_snapshot!(error.to_string(), @r#"invalid number "fast""#);
    }

    #[test]
    fn test_parse_action_not_finite() {
        assert!(matches!(
            parse_action("NaN 0"),
            Err(ParseActionError::NotFinite)
        ));
    }
}
