//! C initializer generation for parsed ninja manifests.
//!
//! The generated file is a single translation unit that includes
//! [`HEADER_NAME`] and declares one `manifest` aggregate. The header itself
//! ships with this crate as [`HEADER`].

mod codegen;
pub mod ident;

pub use codegen::{escape_c_string, eval_expr, CodeGenerator, GeneratedCode};

use cnobi_manifest::Manifest;

/// File name the generated code includes.
pub const HEADER_NAME: &str = "manifest.h";

/// Contents of the companion header.
pub const HEADER: &str = include_str!("../include/manifest.h");

/// Generate C code for a manifest.
pub fn generate(manifest: &Manifest) -> GeneratedCode {
    CodeGenerator::new().generate(manifest)
}
