//! In-memory model of a parsed build description.
//!
//! Values are kept unevaluated: every path and binding is an [`EvalString`]
//! that remembers the text as written and its literal/variable token form.
//! Expansion belongs to the runtime that consumes the generated manifest.

mod eval;
mod bindings;
mod decl;
mod manifest;
mod display;

pub use eval::*;
pub use bindings::*;
pub use decl::*;
pub use manifest::*;
