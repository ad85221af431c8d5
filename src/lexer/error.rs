use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("Invalid character '{character}' at line {line}, column {column}")]
    InvalidCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    #[error("Unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("Invalid number literal '{literal}' at line {line}, column {column}")]
    InvalidNumberLiteral {
        literal: String,
        line: usize,
        column: usize,
    },
}

impl LexError {
    /// Advisory text shown by the CLI alongside the error message.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            LexError::InvalidCharacter { character, .. } if matches!(character, '=' | '!') => {
                Some(format!(
                    "'{character}' must be part of a comparison operator like '==' or '!='"
                ))
            }
            LexError::InvalidCharacter { character, .. }
                if character.is_ascii() && !character.is_ascii_graphic() =>
            {
                Some("Remove non-printable characters from the source code".to_string())
            }
            LexError::UnterminatedString { .. } => {
                Some("Add a closing quote to terminate the string".to_string())
            }
            _ => None,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;
