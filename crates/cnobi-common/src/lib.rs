mod span;
mod source;
mod diagnostic;

pub use span::Span;
pub use source::{SourceFile, SourceId, SourceMap};
pub use diagnostic::Diagnostic;
