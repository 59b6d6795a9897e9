//! Non-fatal diagnostics collected while translating a manifest.
//!
//! Hard failures are typed errors owned by each crate; this type carries the
//! warnings that let a translation continue (skipped statements, ignored
//! bindings, identifier collisions).

use crate::source::{SourceId, SourceMap};
use crate::span::Span;
use miette::{Diagnostic as MietteDiagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

#[derive(Debug, Clone, Error, MietteDiagnostic)]
#[error("{message}")]
#[diagnostic(severity(Warning))]
pub struct Diagnostic {
    pub message: String,
    #[label("{label}")]
    pub span: Option<SourceSpan>,
    /// File the span points into.
    pub file: Option<SourceId>,
    pub label: String,
    #[help]
    pub help: Option<String>,
    /// 1-based line number, when the diagnostic refers to a line.
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            file: None,
            label: String::new(),
            help: None,
            line: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span.into());
        self.file = Some(span.source);
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// A renderable report, with the snippet of the file the span points
    /// into when that file is registered in `sources`.
    pub fn to_report(&self, sources: &SourceMap) -> Report {
        let report = Report::new(self.clone());
        match self.file.and_then(|id| sources.get(id)) {
            Some(file) => report.with_source_code(NamedSource::new(
                file.path.display().to_string(),
                file.content.clone(),
            )),
            None => report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::{GraphicalReportHandler, GraphicalTheme, Severity};

    fn render(report: &Report) -> String {
        let mut out = String::new();
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .render_report(&mut out, &**report)
            .unwrap();
        out
    }

    #[test]
    fn test_report_shows_source_line() {
        let mut sources = SourceMap::new();
        let content = "rule cc\nbogus line\n";
        let id = sources.add_file("build.ninja", content.to_string());

        let warning = Diagnostic::warning("skipping unrecognized statement")
            .with_span(Span::new(id, 8, 18))
            .with_line(2)
            .with_label("here");
        let report = warning.to_report(&sources);

        assert_eq!(report.severity(), Some(Severity::Warning));
        let text = render(&report);
        assert!(text.contains("skipping unrecognized statement"));
        assert!(text.contains("build.ninja"));
        assert!(text.contains("bogus line"));
    }

    #[test]
    fn test_report_without_source() {
        let warning = Diagnostic::warning("`a-b` and `a.b` both map to `a_b`").with_help("rename one");
        let report = warning.to_report(&SourceMap::new());

        assert!(report.source_code().is_none());
        assert!(render(&report).contains("rename one"));
    }
}
