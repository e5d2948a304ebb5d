//! Contains the [`Lexer`], the cursor that turns a source buffer into [`Token`]s one at a time.

use std::{ops::Range, str::FromStr, sync::Arc};

use getset::{CopyGetters, Getters};
use hazel_base::source_file::{ByteIndex, Position, SourceFile, Span};

use crate::{
    error::{LexicalError, LexicalErrorKind},
    token::{AttributeKind, CommentKind, KeywordKind, NumericKind, OperatorKind, Token, TokenKind},
};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Is an enumeration of the scanning modes of the [`Lexer`].
///
/// The lexer is back in [`State::Default`] whenever [`Lexer::next_token`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum State {
    /// Between tokens.
    #[default]
    Default,

    /// Inside a string literal.
    InString,

    /// Inside a comment.
    InComment,

    /// Inside a macro name.
    InMacro,
}

/// Is the configuration of a [`Lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Options {
    /// Emits comments as [`TokenKind::Comment`] tokens instead of discarding them.
    pub retain_comments: bool,
}

/// Produces the tokens of a [`SourceFile`] on demand.
///
/// The lexer never fails: malformed lexemes come out as [`TokenKind::Illegal`] tokens and the
/// scan resumes right after them. Once the end of the source code is reached every call to
/// [`Lexer::next_token`] yields a [`TokenKind::Eof`] token.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Lexer {
    /// Gets the source file being tokenized.
    #[get = "pub"]
    source_file: Arc<SourceFile>,

    /// Gets the position of the cursor.
    #[get_copy = "pub"]
    position: Position,

    /// Gets the number of `{` seen so far minus the number of `}`.
    #[get_copy = "pub"]
    nest_level: i32,

    /// Gets the scanning mode of the lexer.
    #[get_copy = "pub"]
    state: State,

    /// Gets the configuration of the lexer.
    #[get_copy = "pub"]
    options: Options,
}

fn is_whitespace(character: char) -> bool { character != '\n' && character.is_whitespace() }

fn is_identifier_start(character: char) -> bool { character == '_' || character.is_alphabetic() }

fn is_identifier_continue(character: char) -> bool {
    character == '_' || character.is_alphanumeric()
}

fn is_digit_or_separator(character: char) -> bool { character == '_' || character.is_ascii_digit() }

impl Lexer {
    /// Creates a lexer positioned at the start of the given source file, using the default
    /// [`Options`].
    #[must_use]
    pub fn new(source_file: Arc<SourceFile>) -> Self {
        Self::with_options(source_file, Options::default())
    }

    /// Creates a lexer positioned at the start of the given source file.
    ///
    /// A leading byte order mark is skipped; the position after it is still line 1, column 1.
    #[must_use]
    pub fn with_options(source_file: Arc<SourceFile>, options: Options) -> Self {
        let offset = if source_file.content().starts_with(BYTE_ORDER_MARK) {
            BYTE_ORDER_MARK.len_utf8()
        } else {
            0
        };

        Self {
            source_file,
            position: Position {
                offset,
                ..Position::default()
            },
            nest_level: 0,
            state: State::Default,
            options,
        }
    }

    /// Checks whether the lexer is in the middle of a string literal.
    #[must_use]
    pub fn is_inside_string(&self) -> bool { self.state == State::InString }

    fn remaining(&self) -> &str { &self.source_file.content()[self.position.offset..] }

    /// Gets the character `n` characters ahead of the cursor without moving it.
    ///
    /// `peek(0)` is the character under the cursor. Returns [`None`] past the end of the source
    /// code.
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<char> { self.remaining().chars().nth(n) }

    /// Consumes the character under the cursor and returns it.
    ///
    /// At the end of the source code nothing moves and [`None`] is returned.
    pub fn advance(&mut self) -> Option<char> {
        let character = self.peek(0)?;

        self.position.offset += character.len_utf8();
        if character == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }

        Some(character)
    }

    /// Moves the cursor `n` characters ahead and returns the character under the new cursor.
    ///
    /// If fewer than `n + 1` characters remain the cursor doesn't move at all and [`None`] is
    /// returned.
    pub fn advance_n(&mut self, n: usize) -> Option<char> {
        self.peek(n)?;

        for _ in 0..n {
            self.advance();
        }

        self.peek(0)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek(0) == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances the cursor until the predicate returns false.
    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(character) = self.peek(0) {
            if !predicate(character) {
                break;
            }

            self.advance();
        }
    }

    fn create_span(&self, range: Range<ByteIndex>) -> Span {
        Span::new(self.source_file.clone(), range.start, range.end)
            .expect("the cursor always stays on a character boundary")
    }

    /// Creates an illegal token kind whose lexeme starts at `start` and ends at the cursor.
    fn error(
        &self,
        kind: LexicalErrorKind,
        start: Position,
        culprit: Range<ByteIndex>,
    ) -> TokenKind {
        TokenKind::Illegal(LexicalError {
            kind,
            span: self.create_span(start.offset..self.position.offset),
            culprit: self.create_span(culprit),
        })
    }

    /// Scans the next token and moves the cursor past it.
    ///
    /// Whitespace other than `\n` is skipped before the token. Comments are skipped too unless
    /// [`Options::retain_comments`] is set.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.eat_while(is_whitespace);

            let start = self.position;
            let kind = match self.peek(0) {
                None => TokenKind::Eof,
                Some('\n') => {
                    self.advance();
                    TokenKind::Newline
                }
                Some(character) if character.is_ascii_digit() => self.scan_number(),
                Some(character) if is_identifier_start(character) => {
                    self.scan_identifier_or_keyword(start)
                }
                Some('"') => self.scan_string(start),
                Some('\'') => self.scan_character(start),
                Some('/') if matches!(self.peek(1), Some('/' | '*')) => self.scan_comment(start),
                Some('#') if start.line == 1 && start.column == 1 && self.peek(1) == Some('!') => {
                    self.scan_shebang()
                }
                Some('@') => self.scan_macro(start),
                Some('[') => self
                    .scan_attribute()
                    .unwrap_or_else(|| self.scan_operator(start)),
                Some(_) => self.scan_operator(start),
            };

            if kind.is_comment() && !self.options.retain_comments {
                continue;
            }

            return Token {
                span: self.create_span(start.offset..self.position.offset),
                kind,
                position: start,
            };
        }
    }

    fn scan_identifier_or_keyword(&mut self, start: Position) -> TokenKind {
        self.eat_while(is_identifier_continue);

        let word = &self.source_file.content()[start.offset..self.position.offset];
        KeywordKind::from_str(word).map_or(TokenKind::Identifier, TokenKind::Keyword)
    }

    fn scan_number(&mut self) -> TokenKind {
        let prefixed = match (self.peek(0), self.peek(1)) {
            (Some('0'), Some('x' | 'X')) => Some(NumericKind::Hexadecimal),
            (Some('0'), Some('o' | 'O')) => Some(NumericKind::Octal),
            (Some('0'), Some('b' | 'B')) => Some(NumericKind::Binary),
            _ => None,
        };

        // the digits of a prefixed literal aren't validated here
        if let Some(kind) = prefixed {
            self.advance();
            self.advance();
            self.eat_while(|character| character == '_' || character.is_ascii_alphanumeric());

            return TokenKind::Number(kind);
        }

        let mut kind = NumericKind::Integer;
        self.eat_while(is_digit_or_separator);

        // a `.` only continues the literal when a digit follows, `1..2` is a range
        while self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            kind = NumericKind::Float;
            self.advance();
            self.eat_while(is_digit_or_separator);
        }

        if matches!(self.peek(0), Some('e' | 'E')) {
            let digits_at = if matches!(self.peek(1), Some('+' | '-')) {
                2
            } else {
                1
            };

            if self.peek(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                kind = NumericKind::Float;
                self.advance_n(digits_at);
                self.eat_while(is_digit_or_separator);
            }
        }

        TokenKind::Number(kind)
    }

    /// Consumes an escape sequence starting at the backslash and returns the character it
    /// denotes.
    ///
    /// Returns [`None`] for an invalid escape. A line break or the end of the source code right
    /// after the backslash is left unconsumed.
    fn scan_escape(&mut self) -> Option<char> {
        self.advance();

        let character = self.peek(0).filter(|character| *character != '\n')?;
        self.advance();

        let escaped = match character {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'e' => '\u{1b}',
            'f' => '\u{0c}',
            'v' => '\u{0b}',
            '?' => '?',
            // `\1` through `\7` are the low control characters
            digit @ '1'..='7' => char::from_u32(digit.to_digit(8)?)?,
            'x' => return self.scan_hex_escape(),
            'u' => return self.scan_unicode_escape(),
            _ => return None,
        };

        Some(escaped)
    }

    // `\xHH`, limited to ASCII
    fn scan_hex_escape(&mut self) -> Option<char> {
        let high = self.peek(0)?.to_digit(16)?;
        let low = self.peek(1)?.to_digit(16)?;

        self.advance();
        self.advance();

        char::from_u32(high * 16 + low).filter(char::is_ascii)
    }

    // `\u{H}` up to `\u{HHHHHH}`
    fn scan_unicode_escape(&mut self) -> Option<char> {
        if !self.eat('{') {
            return None;
        }

        let mut value = 0u32;
        let mut digits = 0;
        while let Some(digit) = self.peek(0).and_then(|character| character.to_digit(16)) {
            self.advance();

            value = value.saturating_mul(16).saturating_add(digit);
            digits += 1;
        }

        if digits == 0 || digits > 6 || !self.eat('}') {
            return None;
        }

        char::from_u32(value)
    }

    fn scan_string(&mut self, start: Position) -> TokenKind {
        self.state = State::InString;
        self.advance();

        let mut value = String::new();
        let mut invalid_escape = None;

        let kind = loop {
            match self.peek(0) {
                None | Some('\n') => {
                    break self.error(
                        LexicalErrorKind::UnterminatedString,
                        start,
                        start.offset..start.offset + 1,
                    );
                }
                Some('"') => {
                    self.advance();

                    break match invalid_escape {
                        Some(culprit) => self.error(LexicalErrorKind::InvalidEscape, start, culprit),
                        None => TokenKind::String(value),
                    };
                }
                Some('\\') => {
                    let escape_start = self.position.offset;

                    if let Some(character) = self.scan_escape() {
                        value.push(character);
                    } else if invalid_escape.is_none() {
                        invalid_escape = Some(escape_start..self.position.offset);
                    }
                }
                Some(character) => {
                    self.advance();
                    value.push(character);
                }
            }
        };

        self.state = State::Default;
        kind
    }

    fn scan_character(&mut self, start: Position) -> TokenKind {
        self.advance();

        let quote = start.offset..start.offset + 1;
        let character = match self.peek(0) {
            None | Some('\n') => {
                return self.error(LexicalErrorKind::UnterminatedChar, start, quote);
            }
            Some('\'') => {
                self.advance();
                return self.error(
                    LexicalErrorKind::EmptyCharacterLiteral,
                    start,
                    start.offset..self.position.offset,
                );
            }
            Some('\\') => {
                let escape_start = self.position.offset;
                self.scan_escape().ok_or(escape_start..self.position.offset)
            }
            Some(character) => {
                self.advance();
                Ok(character)
            }
        };

        if self.eat('\'') {
            return match character {
                Ok(character) => TokenKind::Character(character),
                Err(culprit) => self.error(LexicalErrorKind::InvalidEscape, start, culprit),
            };
        }

        // more than one character, the literal still ends at a `'` on the same line
        let extra_start = self.position.offset;
        self.eat_while(|character| character != '\'' && character != '\n');

        if self.peek(0) == Some('\'') {
            let extra_end = self.position.offset;
            self.advance();

            self.error(
                LexicalErrorKind::MultiCharacterLiteral,
                start,
                extra_start..extra_end,
            )
        } else {
            self.error(LexicalErrorKind::UnterminatedChar, start, quote)
        }
    }

    fn scan_comment(&mut self, start: Position) -> TokenKind {
        self.state = State::InComment;
        self.advance();

        let kind = if self.advance() == Some('/') {
            self.eat_while(|character| character != '\n');
            TokenKind::Comment(CommentKind::Line)
        } else {
            // delimited comments don't nest, the first `*/` closes it
            loop {
                match self.advance() {
                    None => {
                        break self.error(
                            LexicalErrorKind::UnterminatedComment,
                            start,
                            start.offset..start.offset + 2,
                        );
                    }
                    Some('*') => {
                        if self.eat('/') {
                            break TokenKind::Comment(CommentKind::Delimited);
                        }
                    }
                    Some(_) => {}
                }
            }
        };

        self.state = State::Default;
        kind
    }

    fn scan_shebang(&mut self) -> TokenKind {
        self.state = State::InComment;
        self.eat_while(|character| character != '\n');
        self.state = State::Default;

        TokenKind::Comment(CommentKind::Shebang)
    }

    fn scan_macro(&mut self, start: Position) -> TokenKind {
        self.advance();

        if !self.peek(0).is_some_and(is_identifier_start) {
            return self.error(
                LexicalErrorKind::UnexpectedCharacter,
                start,
                start.offset..self.position.offset,
            );
        }

        self.state = State::InMacro;
        self.eat_while(is_identifier_continue);
        self.state = State::Default;

        TokenKind::Macro
    }

    /// Scans an attribute such as `[inline]`.
    ///
    /// Returns [`None`] without moving the cursor if the bracket doesn't enclose a known attribute
    /// name.
    fn scan_attribute(&mut self) -> Option<TokenKind> {
        // skips the `[`
        let rest = &self.remaining()[1..];
        let name_length = rest
            .char_indices()
            .take(AttributeKind::MAX_LENGTH + 1)
            .find(|(_, character)| !is_identifier_continue(*character))
            .map(|(index, _)| index)?;

        if !rest[name_length..].starts_with(']') {
            return None;
        }

        let attribute = AttributeKind::from_str(&rest[..name_length]).ok()?;

        // attribute names are ASCII, so bytes and characters coincide
        for _ in 0..name_length + 2 {
            self.advance();
        }

        Some(TokenKind::Attribute(attribute))
    }

    fn scan_operator(&mut self, start: Position) -> TokenKind {
        let remaining = self.remaining();
        let operator = (1..=OperatorKind::MAX_LENGTH).rev().find_map(|length| {
            remaining
                .get(..length)
                .and_then(|candidate| OperatorKind::from_str(candidate).ok())
                .map(|operator| (operator, length))
        });

        let Some((operator, length)) = operator else {
            self.advance();
            return self.error(
                LexicalErrorKind::UnexpectedCharacter,
                start,
                start.offset..self.position.offset,
            );
        };

        for _ in 0..length {
            self.advance();
        }

        match operator {
            OperatorKind::LeftBrace => self.nest_level += 1,
            OperatorKind::RightBrace => self.nest_level -= 1,
            _ => {}
        }

        TokenKind::Operator(operator)
    }
}

#[cfg(test)]
mod tests;
