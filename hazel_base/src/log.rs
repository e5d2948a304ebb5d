//! Provides the functions related to logging/printing messages to the console.

use std::fmt::{Display, Formatter, Result};

use derive_new::new;
use formatting::{Color, Style};

use crate::source_file::{Position, SourceFile, Span};

pub mod formatting;

/// Represents the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

/// Is a struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = match self.severity {
            Severity::Error => Color::Red.with("[error]:"),
            Severity::Info => Color::Green.with("[info]:"),
            Severity::Warning => Color::Yellow.with("[warning]:"),
        };

        write!(
            f,
            "{} {}",
            Style::Bold.with(header),
            Style::Bold.with(&self.display)
        )
    }
}

fn get_digit(mut number: usize) -> usize {
    let mut digit = 0;

    while number > 0 {
        number /= 10;
        digit += 1;
    }

    digit
}

/// The position right after the last character of the source file.
fn end_of_file_position(source_file: &SourceFile) -> Position {
    let line = source_file.line_number();
    let column = source_file
        .get_line(line)
        .map_or(0, |line| line.chars().count())
        + 1;

    Position::new(source_file.len(), line, column)
}

/// Structure implementing [`Display`] that prints the particular span of the source code.
///
/// The output shows the line before the span, the lines of the span with the spanned characters
/// underlined, and the line after the span. The help message is printed under the span when the
/// span fits on a single line, and at the bottom otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct SourceCodeDisplay<'a, T> {
    /// The span of the source code to be printed.
    pub span: &'a Span,

    /// The help message to be displayed.
    pub help_display: Option<T>,
}

impl<'a, T> SourceCodeDisplay<'a, T> {
    fn write_gutter(f: &mut Formatter<'_>, width: usize, symbol: &str) -> Result {
        write!(
            f,
            "{:width$} {} ",
            "",
            Style::Bold.with(Color::Cyan.with(symbol))
        )
    }

    /// Prints the given line; characters within `[start, end)` are underlined.
    fn write_source_line(
        &self,
        f: &mut Formatter<'_>,
        width: usize,
        line_number: usize,
        highlight: Option<(Position, Position)>,
    ) -> Result {
        let Some(line) = self.span.source_file().get_line(line_number) else {
            return Ok(());
        };

        write!(
            f,
            "{}{:padding$} {} ",
            Style::Bold.with(Color::Cyan.with(line_number)),
            "",
            Style::Bold.with(Color::Cyan.with("┃")),
            padding = width - get_digit(line_number),
        )?;

        for (index, character) in line.chars().enumerate() {
            let here = (line_number, index + 1);
            let is_in_span = highlight.is_some_and(|(start, end)| {
                (start.line, start.column) <= here && here < (end.line, end.column)
            });

            match character {
                // tabs are printed as 4 spaces
                '\t' => write!(f, "    ")?,
                '\n' => {}
                character if is_in_span => write!(
                    f,
                    "{}",
                    Style::Underline.with(Style::Bold.with(Color::Red.with(character)))
                )?,
                character => write!(f, "{character}")?,
            }
        }

        writeln!(f)
    }
}

impl<'a, T: Display> Display for SourceCodeDisplay<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let source_file = self.span.source_file();
        let start = self
            .span
            .start_position()
            .unwrap_or_else(|| end_of_file_position(source_file));
        let end = self
            .span
            .end_position()
            .unwrap_or_else(|| end_of_file_position(source_file));

        // a span that ends right after a line break doesn't reach into the next line
        let last_line = if end.column == 1 && end.line > start.line {
            end.line - 1
        } else {
            end.line
        };
        let is_multiline = start.line != last_line;

        // the line after the span has the widest line number
        let width = get_digit(last_line + 1);

        writeln!(
            f,
            "{:width$}{} {}:{start}",
            "",
            Style::Bold.with(Color::Cyan.with("-->")),
            source_file.full_path().display(),
        )?;
        Self::write_gutter(f, width, "┃")?;
        writeln!(f)?;

        if start.line > 1 {
            self.write_source_line(f, width, start.line - 1, None)?;
        }

        for line_number in start.line..=last_line {
            self.write_source_line(f, width, line_number, Some((start, end)))?;
        }

        match &self.help_display {
            Some(help) if !is_multiline => {
                Self::write_gutter(f, width, "┃")?;

                // aligns the message with the start of the span
                let line = source_file.get_line(start.line).unwrap_or_default();
                for character in line.chars().take(start.column - 1) {
                    write!(f, "{}", if character == '\t' { "    " } else { " " })?;
                }

                writeln!(f, "{}: {help}", Style::Bold.with("help"))?;
            }
            _ => {}
        }

        self.write_source_line(f, width, last_line + 1, None)?;

        Self::write_gutter(f, width, "┃")?;
        writeln!(f)?;

        match &self.help_display {
            Some(help) if is_multiline => {
                Self::write_gutter(f, width, "=")?;
                writeln!(f, "{}: {help}", Style::Bold.with("help"))
            }
            _ => Ok(()),
        }
    }
}
