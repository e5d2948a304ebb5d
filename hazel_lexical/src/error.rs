//! Contains all kinds of lexical errors that can occur while tokenizing the source code.

use std::fmt::Display;

use derive_more::From;
use enum_as_inner::EnumAsInner;
use hazel_base::{
    log::{Message, Severity, SourceCodeDisplay},
    source_file::Span,
};
use thiserror::Error;

use crate::token_stream::Delimiter;

/// Is an enumeration of the reasons a lexeme can be illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum LexicalErrorKind {
    /// A line break or the end of the source code was reached before the closing `"`.
    #[error("found an unterminated string literal")]
    UnterminatedString,

    /// The end of the source code was reached before the closing `*/`.
    #[error("found an unclosed `/*` comment")]
    UnterminatedComment,

    /// A line break or the end of the source code was reached before the closing `'`.
    #[error("found an unterminated character literal")]
    UnterminatedChar,

    /// A backslash is followed by something that isn't a known escape sequence.
    #[error("found an invalid escape sequence")]
    InvalidEscape,

    /// The character can't start any token.
    #[error("found an unexpected character")]
    UnexpectedCharacter,

    /// The character literal is `''`.
    #[error("found an empty character literal")]
    EmptyCharacterLiteral,

    /// The character literal holds more than one character.
    #[error("found a character literal with more than one character")]
    MultiCharacterLiteral,
}

impl LexicalErrorKind {
    fn help(self) -> &'static str {
        match self {
            Self::UnterminatedString => "this string literal is missing its closing `\"`",
            Self::UnterminatedComment => "this comment is never closed by `*/`",
            Self::UnterminatedChar => "this character literal is missing its closing `'`",
            Self::InvalidEscape => "unknown or malformed escape sequence",
            Self::UnexpectedCharacter => "this character can't start any token",
            Self::EmptyCharacterLiteral => "a character literal must contain a character",
            Self::MultiCharacterLiteral => "use a string literal for more than one character",
        }
    }
}

/// Is the payload of an illegal token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LexicalError {
    /// The reason the lexeme is illegal.
    pub kind: LexicalErrorKind,

    /// The span of the whole illegal lexeme.
    pub span: Span,

    /// The part of the lexeme the diagnostic points at, e.g. the opening quote of an unterminated
    /// string or the offending escape sequence.
    pub culprit: Span,
}

impl Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, self.kind),
            SourceCodeDisplay::new(&self.culprit, Some(self.kind.help()))
        )
    }
}

/// The delimiter is not closed by its corresponding closing pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UndelimitedDelimiter {
    /// The span of the opening delimiter.
    pub opening_span: Span,

    /// The kind of the delimiter.
    pub delimiter: Delimiter,
}

impl Display for UndelimitedDelimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, "found an undelimited delimiter"),
            SourceCodeDisplay::new(
                &self.opening_span,
                Some("this delimiter is not closed by its corresponding closing pair")
            )
        )
    }
}

/// The closing delimiter doesn't match the innermost opening delimiter, or there is none.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnexpectedDelimiter {
    /// The span of the closing delimiter.
    pub span: Span,

    /// The kind of the delimiter.
    pub delimiter: Delimiter,
}

impl Display for UnexpectedDelimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, "found an unexpected closing delimiter"),
            SourceCodeDisplay::new(&self.span, Some("this delimiter closes nothing"))
        )
    }
}

/// Is an enumeration containing all kinds of lexical errors that can occur while tokenizing the
/// source code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner, From)]
#[allow(missing_docs)]
pub enum Error {
    Lexical(LexicalError),
    UndelimitedDelimiter(UndelimitedDelimiter),
    UnexpectedDelimiter(UnexpectedDelimiter),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical(err) => write!(f, "{err}"),
            Self::UndelimitedDelimiter(err) => write!(f, "{err}"),
            Self::UnexpectedDelimiter(err) => write!(f, "{err}"),
        }
    }
}
