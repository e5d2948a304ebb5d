//! This crate implements the lexical analysis phase of the Hazel compiler. This phase is
//! responsible for tokenizing the source code into a stream of tokens.
//!
//! The [`lexer::Lexer`] produces the tokens one at a time, the [`token_stream::TokenStream`]
//! collects all of them and reports the lexical errors of a source file.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod error;
pub mod lexer;
pub mod token;
pub mod token_stream;
