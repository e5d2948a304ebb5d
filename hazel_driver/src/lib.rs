//! Is the command line front end of the Hazel lexer: it tokenizes a source file and prints the
//! tokens along with every lexical diagnostic.

use std::{fmt::Display, fs::File, path::PathBuf, process::ExitCode};

pub use clap::Parser;
use hazel_base::{
    diagnostic::{Counter, Handler},
    log::{Message, Severity},
    source_file::{self, SourceFile},
};
use hazel_lexical::{lexer::Options, token::Token, token_stream::TokenStream};

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "hazel",
    about = "Tokenizes a Hazel source file and prints its tokens."
)]
pub struct Argument {
    /// The input file to tokenize.
    pub file: PathBuf,

    /// Keeps the comments in the token list.
    #[clap(long = "comments")]
    pub comments: bool,

    /// Only prints the diagnostics.
    #[clap(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Prints every diagnostic to the standard error stream and keeps count of them.
#[derive(Debug, Default)]
struct Printer {
    counter: Counter,
}

impl<E: Display> Handler<E> for Printer {
    fn receive(&self, error: E) {
        eprintln!("{error}");
        self.counter.receive(());
    }
}

fn summary(count: usize) -> Message<String> {
    let plural = if count == 1 { "" } else { "s" };
    Message::new(Severity::Info, format!("found {count} lexical error{plural}"))
}

/// Formats a token as a `line:column`, kind, and text row separated by tabs.
fn token_row(token: &Token) -> String {
    format!("{}\t{}\t{:?}", token.position, token.kind, token.text())
}

fn report(argument: &Argument, error: impl Display) -> ExitCode {
    let msg = Message::new(
        Severity::Error,
        format!("{}: {error}", argument.file.display()),
    );

    eprintln!("{msg}");
    ExitCode::FAILURE
}

/// Runs the program with the given arguments.
pub fn run(argument: Argument) -> ExitCode {
    let file = match File::open(&argument.file) {
        Ok(file) => file,
        Err(error) => return report(&argument, error),
    };

    let source_file = match SourceFile::load(file, argument.file.clone()) {
        Ok(file) => file,
        Err(source_file::Error::IoError(error)) => return report(&argument, error),
        Err(source_file::Error::Utf8Error(error)) => {
            return report(&argument, format!("the file is not valid UTF-8 ({error})"))
        }
    };

    let printer = Printer::default();

    // token stream
    let token_stream = TokenStream::tokenize(
        &source_file,
        Options {
            retain_comments: argument.comments,
        },
        &printer,
    );

    if !argument.quiet {
        for token in token_stream.iter() {
            println!("{}", token_row(token));
        }
    }

    match printer.counter.count() {
        0 => ExitCode::SUCCESS,
        count => {
            eprintln!("{}", summary(count));
            ExitCode::FAILURE
        }
    }
}
