//! Contains the [`TokenStream`] struct and its related types.

use std::{ops::Index, sync::Arc};

use derive_more::Deref;
use hazel_base::{
    diagnostic::Handler,
    source_file::{SourceFile, Span},
};

use crate::{
    error::{self, UndelimitedDelimiter, UnexpectedDelimiter},
    lexer::{Lexer, Options},
    token::{Token, TokenKind},
};

/// Is an enumeration of the different types of delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Delimiter {
    Parenthesis,
    Brace,
    Bracket,
}

impl Delimiter {
    /// Gets the opening and closing characters of the delimiter.
    #[must_use]
    pub fn pair(self) -> (char, char) {
        match self {
            Self::Parenthesis => ('(', ')'),
            Self::Brace => ('{', '}'),
            Self::Bracket => ('[', ']'),
        }
    }
}

/// Is the list of every token of a source file, ending with a single [`TokenKind::Eof`] token.
///
/// This struct is the final output of the lexical analysis phase and is meant to be used by the
/// next stage of the compilation process.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Tokenizes the given source code.
    ///
    /// This function calls [`Lexer::next_token()`] repeatedly until the end of the source code is
    /// reached. Every illegal token is reported to the `handler` and kept in the stream, so that the
    /// stream always covers the whole source code. Delimiters that aren't balanced are reported as
    /// well.
    #[must_use]
    pub fn tokenize(
        source_file: &Arc<SourceFile>,
        options: Options,
        handler: &dyn Handler<error::Error>,
    ) -> Self {
        let mut lexer = Lexer::with_options(source_file.clone(), options);

        // list of tokens to return
        let mut tokens = Vec::new();
        let mut open_delimiters = Vec::new();

        loop {
            let token = lexer.next_token();

            match &token.kind {
                TokenKind::Illegal(error) => handler.receive(error.clone().into()),
                TokenKind::Operator(operator) => {
                    if let Some(delimiter) = operator.opening_delimiter() {
                        open_delimiters.push((delimiter, token.span.clone()));
                    } else if let Some(delimiter) = operator.closing_delimiter() {
                        Self::handle_closing_delimiter(
                            &mut open_delimiters,
                            delimiter,
                            &token.span,
                            handler,
                        );
                    }
                }
                _ => {}
            }

            let is_eof = token.is_eof();
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        for (delimiter, opening_span) in open_delimiters {
            handler.receive(
                UndelimitedDelimiter {
                    opening_span,
                    delimiter,
                }
                .into(),
            );
        }

        Self { tokens }
    }

    fn handle_closing_delimiter(
        open_delimiters: &mut Vec<(Delimiter, Span)>,
        delimiter: Delimiter,
        span: &Span,
        handler: &dyn Handler<error::Error>,
    ) {
        if open_delimiters.last().map(|(open, _)| *open) == Some(delimiter) {
            open_delimiters.pop();
        } else {
            handler.receive(
                UnexpectedDelimiter {
                    span: span.clone(),
                    delimiter,
                }
                .into(),
            );
        }
    }

    /// Gets the tokens that aren't comments or line breaks.
    pub fn significant_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(|token| !matches!(token.kind, TokenKind::Comment(..) | TokenKind::Newline))
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Self::Output { &self.tokens[index] }
}
