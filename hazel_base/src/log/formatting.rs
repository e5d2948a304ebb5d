//! Contains the ANSI escape codes used to style text printed to the console.

use std::fmt::Display;

/// Represents a style that can be applied to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Style {
    /// Bold text.
    Bold,

    /// Underlined text.
    Underline,

    /// Text in the given foreground color.
    Foreground(Color),
}

impl Style {
    /// Applies the style to the given displayable object.
    pub fn with<T>(self, display: T) -> Styled<T> {
        Styled {
            style: self,
            display,
        }
    }

    fn escape_code(self) -> &'static str {
        match self {
            Self::Bold => "\x1B[1m",
            Self::Underline => "\x1B[4m",
            Self::Foreground(color) => color.escape_code(),
        }
    }
}

/// Is a struct implementing [`Display`] that represents a displayable object with a style applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Styled<T> {
    /// The style applied to the displayable object.
    pub style: Style,

    /// The displayable object.
    pub display: T,
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}\x1B[0m", self.style.escape_code(), self.display)
    }
}

/// Represents a foreground color that can be applied to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
}

impl Color {
    /// Applies the color to the given displayable object.
    pub fn with<T>(self, display: T) -> Styled<T> { Style::Foreground(self).with(display) }

    fn escape_code(self) -> &'static str {
        match self {
            Self::Red => "\x1B[31m",
            Self::Green => "\x1B[32m",
            Self::Yellow => "\x1B[33m",
            Self::Cyan => "\x1B[36m",
        }
    }
}
