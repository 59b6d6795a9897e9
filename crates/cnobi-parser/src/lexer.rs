//! Physical-to-logical line reassembly.
//!
//! A logical line is one physical line with its comment removed, joined with
//! the lines that follow it as long as it ends in an unescaped `$`.

use crate::tokenizer::{find_unescaped, trim_end_unescaped};

/// One logical line and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    /// 1-based number of the first physical line.
    pub line: usize,
    /// Byte range in the file, from the first physical line to the end of
    /// the last one that was joined.
    pub start: usize,
    pub end: usize,
}

impl LogicalLine {
    /// Indented lines belong to the block opened by the previous statement.
    pub fn is_indented(&self) -> bool {
        self.text.starts_with([' ', '\t'])
    }
}

/// Lazy sequence of logical lines over one file's text, with a one-slot
/// pushback buffer.
pub struct LineStream<'a> {
    rest: &'a str,
    offset: usize,
    line: usize,
    pending: Option<LogicalLine>,
}

impl<'a> LineStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            rest: source,
            offset: 0,
            line: 0,
            pending: None,
        }
    }

    /// Return a line so the next call to [`next_line`](Self::next_line)
    /// yields it again.
    pub fn push_back(&mut self, line: LogicalLine) {
        debug_assert!(self.pending.is_none(), "pushback slot already full");
        self.pending = Some(line);
    }

    /// Next line of the current indented block. The first non-indented line
    /// ends the block and is pushed back for the caller's caller.
    pub fn next_indented(&mut self) -> Option<LogicalLine> {
        let line = self.next_line()?;
        if line.is_indented() {
            Some(line)
        } else {
            self.push_back(line);
            None
        }
    }

    /// Next non-blank logical line, or `None` at end of input.
    pub fn next_line(&mut self) -> Option<LogicalLine> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }

        loop {
            let (line, start, raw) = self.next_physical()?;
            let mut end = start + raw.len();
            let mut text = String::new();
            let mut piece = strip_comment(raw);

            while let Some(head) = strip_continuation(piece) {
                text.push_str(head);
                match self.next_physical() {
                    Some((_, next_start, next_raw)) => {
                        end = next_start + next_raw.len();
                        piece = strip_comment(next_raw).trim_start();
                    }
                    None => {
                        piece = "";
                        break;
                    }
                }
            }
            text.push_str(piece);

            let text = trim_end_unescaped(&text);
            if text.is_empty() {
                continue;
            }

            return Some(LogicalLine {
                text: text.to_string(),
                line,
                start,
                end,
            });
        }
    }

    fn next_physical(&mut self) -> Option<(usize, usize, &'a str)> {
        if self.rest.is_empty() {
            return None;
        }

        let (raw, consumed) = match self.rest.find('\n') {
            Some(i) => (&self.rest[..i], i + 1),
            None => (self.rest, self.rest.len()),
        };
        let raw = raw.strip_suffix('\r').unwrap_or(raw);

        let start = self.offset;
        self.rest = &self.rest[consumed..];
        self.offset += consumed;
        self.line += 1;
        Some((self.line, start, raw))
    }
}

impl Iterator for LineStream<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        self.next_line()
    }
}

fn strip_comment(line: &str) -> &str {
    match find_unescaped(line, '#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// The text before a trailing continuation `$`, if the line has one.
/// `$$` at the end is an escaped dollar, not a continuation.
fn strip_continuation(line: &str) -> Option<&str> {
    let dollars = line.bytes().rev().take_while(|&b| b == b'$').count();
    if dollars % 2 == 1 {
        Some(&line[..line.len() - 1])
    } else {
        None
    }
}
