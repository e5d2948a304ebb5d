//! Is a module containing the [`Token`] type and all of its related types.

use std::{borrow::Cow, collections::HashMap, fmt::Display, str::FromStr};

use bitflags::bitflags;
use enum_as_inner::EnumAsInner;
use hazel_base::source_file::{Position, SourceElement, Span};
use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::{error::LexicalError, token_stream::Delimiter};

/// Is an enumeration representing keywords in the Hazel programming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum KeywordKind {
    Alias,
    As,
    Break,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    ElseIf,
    Enum,
    Export,
    Fallthrough,
    False,
    For,
    From,
    Func,
    Global,
    If,
    Import,
    In,
    Loop,
    Macro,
    Match,
    Module,
    Mutable,
    Nil,
    Not,
    OrElse,
    Put,
    Raise,
    Range,
    Return,
    Struct,
    True,
    Try,
    Type,
    TypeOf,
    Union,
    Use,
    Var,
    When,
    Where,
    While,
}

impl Display for KeywordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Is an error that is returned when a string cannot be parsed into a [`KeywordKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of keyword.")]
pub struct KeywordParseError;

impl FromStr for KeywordKind {
    type Err = KeywordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_KEYWORD_MAP: HashMap<&'static str, KeywordKind> = {
                let mut map = HashMap::new();

                for keyword in KeywordKind::iter() {
                    map.insert(keyword.as_str(), keyword);
                }

                map
            };
        }
        STRING_KEYWORD_MAP.get(s).copied().ok_or(KeywordParseError)
    }
}

impl KeywordKind {
    /// Gets the string representation of the keyword as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::As => "as",
            Self::Break => "break",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Defer => "defer",
            Self::Else => "else",
            Self::ElseIf => "elseif",
            Self::Enum => "enum",
            Self::Export => "export",
            Self::Fallthrough => "fallthrough",
            Self::False => "false",
            Self::For => "for",
            Self::From => "from",
            Self::Func => "func",
            Self::Global => "global",
            Self::If => "if",
            Self::Import => "import",
            Self::In => "in",
            Self::Loop => "loop",
            Self::Macro => "macro",
            Self::Match => "match",
            Self::Module => "module",
            Self::Mutable => "mutable",
            Self::Nil => "nil",
            Self::Not => "not",
            Self::OrElse => "orelse",
            Self::Put => "put",
            Self::Raise => "raise",
            Self::Range => "range",
            Self::Return => "return",
            Self::Struct => "struct",
            Self::True => "true",
            Self::Try => "try",
            Self::Type => "type",
            Self::TypeOf => "typeof",
            Self::Union => "union",
            Self::Use => "use",
            Self::Var => "var",
            Self::When => "when",
            Self::Where => "where",
            Self::While => "while",
        }
    }
}

/// Is an enumeration of all operators and punctuators of the Hazel programming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum OperatorKind {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PercentPercent,
    PlusPlus,
    MinusMinus,
    StarStar,
    Hash,
    Question,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    EqualEqual,
    NotEqual,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    AmpersandEqual,
    PipeEqual,
    CaretEqual,
    ShiftLeftEqual,
    ShiftRightEqual,
    Tilde,
    TildeEqual,
    ColonEqual,
    FatArrow,
    RightArrow,
    LeftArrow,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    LeftParenthesis,
    RightParenthesis,
    ShiftLeft,
    ShiftRight,
    Ampersand,
    Pipe,
    Exclamation,
    Caret,
    AmpersandCaret,
    AmpersandAmpersand,
    PipePipe,
    Colon,
    ColonColon,
    Semicolon,
    Comma,
    Dot,
    DotDot,
    Ellipsis,
    Backslash,
}

impl Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Is an error that is returned when a string cannot be parsed into an [`OperatorKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of operator.")]
pub struct OperatorParseError;

impl FromStr for OperatorKind {
    type Err = OperatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_OPERATOR_MAP: HashMap<&'static str, OperatorKind> = {
                let mut map = HashMap::new();

                for operator in OperatorKind::iter() {
                    map.insert(operator.as_str(), operator);
                }

                map
            };
        }
        STRING_OPERATOR_MAP.get(s).copied().ok_or(OperatorParseError)
    }
}

impl OperatorKind {
    /// The number of characters of the longest operator.
    pub const MAX_LENGTH: usize = 3;

    /// Gets the string representation of the operator as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PercentPercent => "%%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::StarStar => "**",
            Self::Hash => "#",
            Self::Question => "?",
            Self::Greater => ">",
            Self::Less => "<",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::EqualEqual => "==",
            Self::NotEqual => "!=",
            Self::Equal => "=",
            Self::PlusEqual => "+=",
            Self::MinusEqual => "-=",
            Self::StarEqual => "*=",
            Self::SlashEqual => "/=",
            Self::PercentEqual => "%=",
            Self::AmpersandEqual => "&=",
            Self::PipeEqual => "|=",
            Self::CaretEqual => "^=",
            Self::ShiftLeftEqual => "<<=",
            Self::ShiftRightEqual => ">>=",
            Self::Tilde => "~",
            Self::TildeEqual => "~=",
            Self::ColonEqual => ":=",
            Self::FatArrow => "=>",
            Self::RightArrow => "->",
            Self::LeftArrow => "<-",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftParenthesis => "(",
            Self::RightParenthesis => ")",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Exclamation => "!",
            Self::Caret => "^",
            Self::AmpersandCaret => "&^",
            Self::AmpersandAmpersand => "&&",
            Self::PipePipe => "||",
            Self::Colon => ":",
            Self::ColonColon => "::",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::DotDot => "..",
            Self::Ellipsis => "...",
            Self::Backslash => "\\",
        }
    }

    /// Gets the [`Delimiter`] this operator opens, if any.
    #[must_use]
    pub fn opening_delimiter(self) -> Option<Delimiter> {
        match self {
            Self::LeftParenthesis => Some(Delimiter::Parenthesis),
            Self::LeftBrace => Some(Delimiter::Brace),
            Self::LeftBracket => Some(Delimiter::Bracket),
            _ => None,
        }
    }

    /// Gets the [`Delimiter`] this operator closes, if any.
    #[must_use]
    pub fn closing_delimiter(self) -> Option<Delimiter> {
        match self {
            Self::RightParenthesis => Some(Delimiter::Parenthesis),
            Self::RightBrace => Some(Delimiter::Brace),
            Self::RightBracket => Some(Delimiter::Bracket),
            _ => None,
        }
    }
}

/// Is an enumeration of the attributes that can be written as `[name]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum AttributeKind {
    Comptime,
    Inline,
    NoInline,
    NoReturn,
    Likely,
    Unlikely,
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Is an error that is returned when a string cannot be parsed into an [`AttributeKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of attribute.")]
pub struct AttributeParseError;

impl FromStr for AttributeKind {
    type Err = AttributeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_ATTRIBUTE_MAP: HashMap<&'static str, AttributeKind> = {
                let mut map = HashMap::new();

                for attribute in AttributeKind::iter() {
                    map.insert(attribute.as_str(), attribute);
                }

                map
            };
        }
        STRING_ATTRIBUTE_MAP
            .get(s)
            .copied()
            .ok_or(AttributeParseError)
    }
}

impl AttributeKind {
    /// The number of characters of the longest attribute name.
    pub const MAX_LENGTH: usize = 8;

    /// Gets the name of the attribute as a `&str`, without the brackets.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comptime => "comptime",
            Self::Inline => "inline",
            Self::NoInline => "noinline",
            Self::NoReturn => "noreturn",
            Self::Likely => "likely",
            Self::Unlikely => "unlikely",
        }
    }
}

bitflags! {
    /// Is a set of [`AttributeKind`]s attached to a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct AttributeSet: u8 {
        /// `[comptime]`
        const COMPTIME = 1 << 0;
        /// `[inline]`
        const INLINE = 1 << 1;
        /// `[noinline]`
        const NO_INLINE = 1 << 2;
        /// `[noreturn]`
        const NO_RETURN = 1 << 3;
        /// `[likely]`
        const LIKELY = 1 << 4;
        /// `[unlikely]`
        const UNLIKELY = 1 << 5;
    }
}

impl From<AttributeKind> for AttributeSet {
    fn from(kind: AttributeKind) -> Self {
        match kind {
            AttributeKind::Comptime => Self::COMPTIME,
            AttributeKind::Inline => Self::INLINE,
            AttributeKind::NoInline => Self::NO_INLINE,
            AttributeKind::NoReturn => Self::NO_RETURN,
            AttributeKind::Likely => Self::LIKELY,
            AttributeKind::Unlikely => Self::UNLIKELY,
        }
    }
}

impl FromIterator<AttributeKind> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = AttributeKind>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, kind| set | Self::from(kind))
    }
}

impl AttributeSet {
    /// Checks whether the set contains the given attribute.
    #[must_use]
    pub fn contains_kind(self, kind: AttributeKind) -> bool { self.contains(Self::from(kind)) }

    /// Gets the attributes in the set, in declaration order.
    pub fn kinds(self) -> impl Iterator<Item = AttributeKind> {
        AttributeKind::iter().filter(move |kind| self.contains_kind(*kind))
    }
}

/// Is an enumeration of the different notations of numeric literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    /// A decimal integer such as `42` or `1_000`.
    Integer,

    /// A decimal number with a fractional part, an exponent, or both, such as `1.5` or `2e10`.
    Float,

    /// An integer prefixed with `0x`.
    Hexadecimal,

    /// An integer prefixed with `0o`.
    Octal,

    /// An integer prefixed with `0b`.
    Binary,
}

/// Is an enumeration representing the kinds of comments in the Hazel programming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommentKind {
    /// A comment that starts with `//` and ends at the end of the line.
    Line,

    /// A comment that starts with `/*` and ends with `*/`.
    Delimited,

    /// A `#!` line at the very start of the source code.
    Shebang,
}

/// Is an enumeration containing all kinds of tokens in the Hazel programming language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum TokenKind {
    /// A lexeme that couldn't be tokenized; the payload describes why.
    Illegal(LexicalError),

    /// The end of the source code.
    Eof,

    /// A `\n` line break.
    Newline,

    /// An identifier that isn't a keyword.
    Identifier,

    /// A reserved word.
    Keyword(KeywordKind),

    /// A numeric literal of the given notation.
    Number(NumericKind),

    /// A string literal; the payload is the value with the escape sequences resolved.
    String(String),

    /// A character literal; the payload is the value with the escape sequence resolved.
    Character(char),

    /// An operator or punctuator.
    Operator(OperatorKind),

    /// A macro invocation name such as `@assert`.
    Macro,

    /// An attribute such as `[inline]`.
    Attribute(AttributeKind),

    /// A comment. Only produced when the lexer is configured to retain comments.
    Comment(CommentKind),
}

impl TokenKind {
    /// Gets the upper-case name of the token kind, e.g. `IDENTIFIER`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Illegal(..) => "ILLEGAL",
            Self::Eof => "EOF",
            Self::Newline => "NEWLINE",
            Self::Identifier => "IDENTIFIER",
            Self::Keyword(..) => "KEYWORD",
            Self::Number(..) => "NUMBER",
            Self::String(..) => "STRING",
            Self::Character(..) => "CHAR",
            Self::Operator(..) => "OPERATOR",
            Self::Macro => "MACRO",
            Self::Attribute(..) => "ATTRIBUTE",
            Self::Comment(..) => "COMMENT",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Illegal(error) => write!(f, "{}({})", self.name(), error.kind),
            Self::Keyword(keyword) => write!(f, "{}({keyword})", self.name()),
            Self::Number(numeric) => write!(f, "{}({numeric:?})", self.name()),
            Self::Operator(operator) => write!(f, "{}({operator})", self.name()),
            Self::Attribute(attribute) => write!(f, "{}({attribute})", self.name()),
            Self::Comment(comment) => write!(f, "{}({comment:?})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// Represents a single lexeme of the source code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token {
    /// Is the kind of the token along with its payload.
    pub kind: TokenKind,

    /// Is the span that makes up the token.
    pub span: Span,

    /// Is the position of the first character of the token.
    pub position: Position,
}

impl Token {
    /// Gets the text of the token.
    ///
    /// String and character literals yield their value with the escape sequences resolved, every
    /// other token yields the source text it spans.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match &self.kind {
            TokenKind::String(value) => Cow::Borrowed(value),
            TokenKind::Character(character) => Cow::Owned(character.to_string()),
            _ => Cow::Borrowed(self.span.str()),
        }
    }

    /// Gets the number of bytes the token spans in the source code.
    #[must_use]
    pub fn length(&self) -> usize { self.span.len() }

    /// Checks whether the token marks the end of the source code.
    #[must_use]
    pub fn is_eof(&self) -> bool { self.kind.is_eof() }
}

impl SourceElement for Token {
    fn span(&self) -> Span { self.span.clone() }
}
