//! Parser for ninja build descriptions.
//!
//! This crate provides:
//! - Logical line reassembly (comments, `$` continuations, pushback)
//! - Escape-aware head splitting and value tokenization
//! - The statement parser producing a [`Manifest`](cnobi_manifest::Manifest)
//!
//! # Architecture
//!
//! ```text
//! file → LineStream → ManifestParser (+ tokenizer, recursive include) → Manifest
//! ```

mod edge;
mod error;
mod lexer;
mod parser;
pub mod tokenizer;

pub use edge::{InputState, OutputState};
pub use error::{ParseError, Result};
pub use lexer::{LineStream, LogicalLine};
pub use parser::{ManifestParser, ParseOptions, ParsedManifest, UnrecognizedPolicy};

use std::path::Path;

/// Parse a root file and everything it includes.
pub fn parse_file(path: impl AsRef<Path>, options: ParseOptions) -> Result<ParsedManifest> {
    ManifestParser::new(options).parse_file(path)
}
