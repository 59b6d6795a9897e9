//! Errors raised while parsing a build description.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Where in which file a statement failed.
#[derive(Debug)]
pub(crate) struct Site {
    pub file: String,
    pub line: usize,
    pub src: NamedSource<String>,
    pub span: SourceSpan,
}

/// Every way a parse can fail. Each one aborts the whole translation.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The root file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    #[diagnostic(code(cnobi::parse::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `build` line without a `:` or without a rule.
    #[error("{file}:{line}: malformed build statement: {reason}")]
    #[diagnostic(
        code(cnobi::parse::malformed_edge),
        help("expected `build OUTPUTS: RULE INPUTS`")
    )]
    MalformedEdge {
        reason: &'static str,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this statement")]
        span: SourceSpan,
    },

    /// A statement kind this translator refuses to handle.
    #[error("{file}:{line}: `{keyword}` is not supported")]
    #[diagnostic(
        code(cnobi::parse::unsupported),
        help("merge the file into the same scope with `include` instead")
    )]
    UnsupportedConstruct {
        keyword: String,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("unsupported")]
        span: SourceSpan,
    },

    #[error("{file}:{line}: invalid pool depth `{value}`")]
    #[diagnostic(
        code(cnobi::parse::invalid_pool_depth),
        help("depth must be a non-negative integer")
    )]
    InvalidPoolDepth {
        value: String,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a non-negative integer")]
        span: SourceSpan,
    },

    #[error("{file}:{line}: cannot read included file {}: {source}", .path.display())]
    #[diagnostic(code(cnobi::parse::unresolved_include))]
    UnresolvedInclude {
        path: PathBuf,
        #[source]
        source: io::Error,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("included here")]
        span: SourceSpan,
    },

    #[error("{file}:{line}: {} includes itself", .path.display())]
    #[diagnostic(code(cnobi::parse::include_cycle))]
    IncludeCycle {
        path: PathBuf,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("included again here")]
        span: SourceSpan,
    },

    /// Only raised under [`UnrecognizedPolicy::Error`](crate::UnrecognizedPolicy::Error).
    #[error("{file}:{line}: unrecognized statement `{text}`")]
    #[diagnostic(code(cnobi::parse::unrecognized_statement))]
    UnrecognizedStatement {
        text: String,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a pool, rule, build, default, include or binding")]
        span: SourceSpan,
    },

    #[error("{file}:{line}: invalid value `{value}`: {reason}")]
    #[diagnostic(code(cnobi::parse::invalid_value))]
    InvalidValue {
        value: String,
        reason: String,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this value")]
        span: SourceSpan,
    },

    #[error("{file}:{line}: `{keyword}` requires a name")]
    #[diagnostic(code(cnobi::parse::missing_name))]
    MissingName {
        keyword: String,
        file: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("name expected")]
        span: SourceSpan,
    },
}

impl ParseError {
    pub(crate) fn malformed_edge(site: Site, reason: &'static str) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::MalformedEdge { reason, file, line, src, span }
    }

    pub(crate) fn unsupported(site: Site, keyword: impl Into<String>) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::UnsupportedConstruct { keyword: keyword.into(), file, line, src, span }
    }

    pub(crate) fn invalid_pool_depth(site: Site, value: impl Into<String>) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::InvalidPoolDepth { value: value.into(), file, line, src, span }
    }

    pub(crate) fn unresolved_include(site: Site, path: PathBuf, source: io::Error) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::UnresolvedInclude { path, source, file, line, src, span }
    }

    pub(crate) fn include_cycle(site: Site, path: PathBuf) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::IncludeCycle { path, file, line, src, span }
    }

    pub(crate) fn unrecognized(site: Site, text: impl Into<String>) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::UnrecognizedStatement { text: text.into(), file, line, src, span }
    }

    pub(crate) fn invalid_value(site: Site, value: impl Into<String>, reason: impl ToString) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::InvalidValue {
            value: value.into(),
            reason: reason.to_string(),
            file,
            line,
            src,
            span,
        }
    }

    pub(crate) fn missing_name(site: Site, keyword: impl Into<String>) -> Self {
        let Site { file, line, src, span } = site;
        ParseError::MissingName { keyword: keyword.into(), file, line, src, span }
    }

    /// 1-based line of the offending statement, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io { .. } => None,
            ParseError::MalformedEdge { line, .. }
            | ParseError::UnsupportedConstruct { line, .. }
            | ParseError::InvalidPoolDepth { line, .. }
            | ParseError::UnresolvedInclude { line, .. }
            | ParseError::IncludeCycle { line, .. }
            | ParseError::UnrecognizedStatement { line, .. }
            | ParseError::InvalidValue { line, .. }
            | ParseError::MissingName { line, .. } => Some(*line),
        }
    }
}
