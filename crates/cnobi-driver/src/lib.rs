//! Translator driver: configuration, parsing, generation and output.

pub mod config;
pub mod error;

pub use config::{Config, OutputConfig, ParserConfig, Unrecognized, CONFIG_FILE_NAME};
pub use error::DriverError;

use cnobi_codegen::{GeneratedCode, HEADER, HEADER_NAME};
use cnobi_common::Diagnostic;
use cnobi_parser::ParsedManifest;
use miette::Result;
use std::path::{Path, PathBuf};

/// Files written by one translation.
#[derive(Debug, Clone)]
pub struct Translation {
    pub output: PathBuf,
    /// Where the companion header was copied, if it was.
    pub header: Option<PathBuf>,
    /// Warnings raised while generating code.
    pub warnings: Vec<Diagnostic>,
}

/// Driver that runs the parse → generate → write pipeline.
pub struct Driver {
    config: Config,
}

impl Driver {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Parse a root file and everything it includes.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedManifest> {
        let parsed = cnobi_parser::parse_file(path.as_ref(), self.config.parse_options())?;
        if !parsed.warnings.is_empty() {
            tracing::info!(
                count = parsed.warnings.len(),
                "parsed {} with warnings",
                path.as_ref().display()
            );
        }
        Ok(parsed)
    }

    /// Generate C code for a parsed manifest.
    pub fn generate(&self, parsed: &ParsedManifest) -> GeneratedCode {
        cnobi_codegen::generate(&parsed.manifest)
    }

    /// Default output path for an input: its extension replaced by the
    /// configured suffix.
    pub fn default_output_path(&self, input: impl AsRef<Path>) -> Result<PathBuf> {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .ok_or_else(|| DriverError::NoOutputPath(input.to_path_buf()))?;

        let mut name = stem.to_os_string();
        name.push(&self.config.output.suffix);
        Ok(input.with_file_name(name))
    }

    /// Translate `input` into C at `output`, or at the default output path.
    ///
    /// Nothing is written unless the whole inclusion tree parses.
    pub fn translate(&self, input: impl AsRef<Path>, output: Option<&Path>) -> Result<Translation> {
        let parsed = self.parse_file(input.as_ref())?;
        self.emit(&parsed, input, output)
    }

    /// Generate and write an already parsed manifest. When the header cannot
    /// be written, the generated file is removed again.
    pub fn emit(
        &self,
        parsed: &ParsedManifest,
        input: impl AsRef<Path>,
        output: Option<&Path>,
    ) -> Result<Translation> {
        let generated = self.generate(parsed);

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => self.default_output_path(input.as_ref())?,
        };
        write_file(&output, &generated.code)?;

        let header = if self.config.output.copy_header {
            let path = output.with_file_name(HEADER_NAME);
            if let Err(err) = write_file(&path, HEADER) {
                // Do not leave a generated file behind without its header.
                if let Err(cleanup) = std::fs::remove_file(&output) {
                    tracing::warn!(path = %output.display(), "failed to remove output: {cleanup}");
                }
                return Err(err);
            }
            Some(path)
        } else {
            None
        };

        Ok(Translation {
            output,
            header,
            warnings: generated.warnings,
        })
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| DriverError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}
