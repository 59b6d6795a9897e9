//! Statement parser: turns logical lines into a [`Manifest`].

use crate::edge::{InputState, OutputState};
use crate::error::{ParseError, Result, Site};
use crate::lexer::{LineStream, LogicalLine};
use crate::tokenizer::{find_unescaped, split_head, tokenize_value, trim_end_unescaped};
use cnobi_common::{Diagnostic, SourceId, SourceMap, Span};
use cnobi_manifest::{EdgeDecl, EvalString, Manifest, PoolDecl, RuleDecl};
use miette::NamedSource;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with a top-level line that is neither a statement nor a
/// binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnrecognizedPolicy {
    /// Record a warning and keep going.
    #[default]
    Warn,
    /// Fail with [`ParseError::UnrecognizedStatement`].
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub unrecognized: UnrecognizedPolicy,
}

/// Result of a successful parse of a root file and everything it includes.
#[derive(Debug)]
pub struct ParsedManifest {
    pub manifest: Manifest,
    pub warnings: Vec<Diagnostic>,
    pub sources: SourceMap,
}

/// Per-file state: the stream being read and what errors should point at.
struct FileContext<'a> {
    path: &'a Path,
    id: SourceId,
    source: &'a str,
    lines: LineStream<'a>,
}

impl FileContext<'_> {
    fn span(&self, line: &LogicalLine) -> Span {
        Span::new(self.id, line.start as u32, line.end as u32)
    }

    fn site(&self, line: &LogicalLine) -> Site {
        let file = self.path.display().to_string();
        Site {
            src: NamedSource::new(file.clone(), self.source.to_string()),
            span: self.span(line).into(),
            file,
            line: line.line,
        }
    }
}

/// Parses a root file into one flat [`Manifest`]. `include` is textual:
/// included files write into the same manifest.
pub struct ManifestParser {
    options: ParseOptions,
    manifest: Manifest,
    warnings: Vec<Diagnostic>,
    sources: SourceMap,
    include_stack: Vec<PathBuf>,
}

impl ManifestParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            manifest: Manifest::new(),
            warnings: Vec::new(),
            sources: SourceMap::new(),
            include_stack: Vec::new(),
        }
    }

    /// Parse the file at `path`.
    pub fn parse_file(mut self, path: impl AsRef<Path>) -> Result<ParsedManifest> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse_source(path, content)?;
        Ok(self.finish())
    }

    /// Parse in-memory text as if it were the file at `path`. Includes are
    /// still resolved relative to `path`.
    pub fn parse_str(mut self, path: impl AsRef<Path>, content: &str) -> Result<ParsedManifest> {
        self.parse_source(path.as_ref(), content.to_string())?;
        Ok(self.finish())
    }

    fn finish(self) -> ParsedManifest {
        ParsedManifest {
            manifest: self.manifest,
            warnings: self.warnings,
            sources: self.sources,
        }
    }

    fn parse_source(&mut self, path: &Path, content: String) -> Result<()> {
        tracing::debug!(path = %path.display(), "parsing");

        let id = self.sources.add_file(path, content.clone());
        let mut ctx = FileContext {
            path,
            id,
            source: &content,
            lines: LineStream::new(&content),
        };

        self.include_stack.push(canonical(path));
        let result = self.parse_statements(&mut ctx);
        self.include_stack.pop();
        result
    }

    fn parse_statements(&mut self, ctx: &mut FileContext<'_>) -> Result<()> {
        while let Some(line) = ctx.lines.next_line() {
            let text = line.text.trim_start();
            let (keyword, rest) = match text.split_once(char::is_whitespace) {
                Some((keyword, rest)) => (keyword, rest.trim_start()),
                None => (text, ""),
            };

            // `pool = 4` assigns a variable, it does not declare a pool named `=`.
            if rest.starts_with('=') {
                self.parse_global_binding(ctx, &line)?;
                continue;
            }

            match keyword {
                "pool" => self.parse_pool(ctx, &line, rest)?,
                "rule" => self.parse_rule(ctx, &line, rest)?,
                "build" => self.parse_edge(ctx, &line, rest)?,
                "default" => self.parse_default(ctx, &line, rest)?,
                "include" => self.parse_include(ctx, &line, rest)?,
                "subninja" => return Err(ParseError::unsupported(ctx.site(&line), keyword)),
                _ if text.contains('=') => self.parse_global_binding(ctx, &line)?,
                _ => self.unrecognized(ctx, &line, text)?,
            }
        }
        Ok(())
    }

    fn parse_global_binding(&mut self, ctx: &FileContext<'_>, line: &LogicalLine) -> Result<()> {
        if let Some((name, value)) = self.parse_binding(ctx, line)? {
            self.manifest.bindings.insert(name, value);
        }
        Ok(())
    }

    fn parse_pool(&mut self, ctx: &mut FileContext<'_>, line: &LogicalLine, rest: &str) -> Result<()> {
        let name = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| ParseError::missing_name(ctx.site(line), "pool"))?;
        let mut pool = PoolDecl::new(name);

        while let Some(body) = ctx.lines.next_indented() {
            match split_binding(&body.text) {
                Some(("depth", value)) => {
                    let depth = value
                        .parse::<u32>()
                        .map_err(|_| ParseError::invalid_pool_depth(ctx.site(&body), value))?;
                    pool.depth = Some(depth);
                }
                _ => {
                    let message = format!("ignoring `{}` in pool `{}`", body.text.trim(), name);
                    self.warn(ctx, &body, message);
                }
            }
        }

        if self.manifest.add_pool(pool).is_some() {
            self.warn(ctx, line, format!("pool `{name}` redeclared, keeping the last declaration"));
        }
        Ok(())
    }

    fn parse_rule(&mut self, ctx: &mut FileContext<'_>, line: &LogicalLine, rest: &str) -> Result<()> {
        let name = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| ParseError::missing_name(ctx.site(line), "rule"))?;
        let mut rule = RuleDecl::new(name);

        while let Some(body) = ctx.lines.next_indented() {
            if let Some((key, value)) = self.parse_binding(ctx, &body)? {
                rule.bindings.insert(key, value);
            }
        }

        if self.manifest.add_rule(rule).is_some() {
            self.warn(ctx, line, format!("rule `{name}` redeclared, keeping the last declaration"));
        }
        Ok(())
    }

    fn parse_edge(&mut self, ctx: &mut FileContext<'_>, line: &LogicalLine, rest: &str) -> Result<()> {
        let colon = find_unescaped(rest, ':')
            .ok_or_else(|| ParseError::malformed_edge(ctx.site(line), "missing `:`"))?;
        let (outputs, inputs) = (&rest[..colon], &rest[colon + 1..]);

        let mut tokens = split_head(inputs).into_iter();
        let rule = tokens
            .next()
            .ok_or_else(|| ParseError::malformed_edge(ctx.site(line), "missing rule name"))?;
        let mut edge = EdgeDecl::new(rule);

        let mut state = OutputState::default();
        for token in split_head(outputs) {
            let (next, path) = state.advance(&token);
            state = next;
            if let Some(path) = path {
                let value = self.value(ctx, line, path)?;
                state.list(&mut edge).push(value);
            }
        }

        let mut state = InputState::default();
        for token in tokens {
            let (next, path) = state.advance(&token);
            state = next;
            if let Some(path) = path {
                let value = self.value(ctx, line, path)?;
                state.list(&mut edge).push(value);
            }
        }

        while let Some(body) = ctx.lines.next_indented() {
            if let Some(("pool", raw)) = split_binding(&body.text) {
                // Only a literal names a pool record; anything built from
                // variables stays a binding for the runtime to expand.
                let pool = self.value(ctx, &body, raw)?;
                if pool.is_empty() {
                    edge.pool = Some("".into());
                } else if let Some(name) = pool.as_single_literal() {
                    edge.pool = Some(name.into());
                } else {
                    edge.bindings.insert("pool", pool);
                }
                continue;
            }
            if let Some((key, value)) = self.parse_binding(ctx, &body)? {
                edge.bindings.insert(key, value);
            }
        }

        self.manifest.add_edge(edge);
        Ok(())
    }

    fn parse_default(&mut self, ctx: &FileContext<'_>, line: &LogicalLine, rest: &str) -> Result<()> {
        let targets = split_head(rest);
        if targets.is_empty() {
            self.warn(ctx, line, "`default` without targets".to_string());
        }
        for target in targets {
            let value = self.value(ctx, line, &target)?;
            self.manifest.add_default(value);
        }
        Ok(())
    }

    fn parse_include(&mut self, ctx: &FileContext<'_>, line: &LogicalLine, rest: &str) -> Result<()> {
        let target = trim_end_unescaped(rest.trim_start());
        if target.is_empty() {
            return Err(ParseError::missing_name(ctx.site(line), "include"));
        }

        let base = ctx.path.parent().unwrap_or_else(|| Path::new(""));
        let path = base.join(target);
        if self.include_stack.contains(&canonical(&path)) {
            return Err(ParseError::include_cycle(ctx.site(line), path));
        }

        tracing::debug!(from = %ctx.path.display(), path = %path.display(), "including");
        let content = fs::read_to_string(&path)
            .map_err(|source| ParseError::unresolved_include(ctx.site(line), path.clone(), source))?;
        self.parse_source(&path, content)
    }

    /// `name = value` with both sides trimmed, keeping an escaped trailing
    /// space. Lines without `=`, without a name or with an empty value yield
    /// nothing.
    fn parse_binding(
        &mut self,
        ctx: &FileContext<'_>,
        line: &LogicalLine,
    ) -> Result<Option<(String, EvalString)>> {
        let text = line.text.trim_start();
        let Some((name, value)) = split_binding(text) else {
            self.warn(ctx, line, format!("ignoring `{text}`, expected `name = value`"));
            return Ok(None);
        };

        if name.is_empty() {
            self.warn(ctx, line, format!("ignoring `{text}`, binding has no name"));
            return Ok(None);
        }
        if value.is_empty() {
            tracing::debug!(line = line.line, name, "dropping empty binding");
            return Ok(None);
        }

        let value = self.value(ctx, line, value)?;
        Ok(Some((name.to_string(), value)))
    }

    fn value(&self, ctx: &FileContext<'_>, line: &LogicalLine, raw: &str) -> Result<EvalString> {
        tokenize_value(raw).map_err(|err| ParseError::invalid_value(ctx.site(line), raw, err))
    }

    fn unrecognized(&mut self, ctx: &FileContext<'_>, line: &LogicalLine, text: &str) -> Result<()> {
        match self.options.unrecognized {
            UnrecognizedPolicy::Warn => {
                self.warn(ctx, line, format!("skipping unrecognized statement `{text}`"));
                Ok(())
            }
            UnrecognizedPolicy::Error => Err(ParseError::unrecognized(ctx.site(line), text)),
        }
    }

    fn warn(&mut self, ctx: &FileContext<'_>, line: &LogicalLine, message: String) {
        tracing::debug!(file = %ctx.path.display(), line = line.line, "{message}");
        self.warnings.push(
            Diagnostic::warning(message)
                .with_span(ctx.span(line))
                .with_line(line.line)
                .with_label("here"),
        );
    }
}

fn split_binding(text: &str) -> Option<(&str, &str)> {
    let (name, value) = text.split_once('=')?;
    Some((name.trim(), trim_end_unescaped(value.trim_start())))
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
