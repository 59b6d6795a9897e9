//! Escape-aware splitting and value tokenization.
//!
//! Escapes: `$$` is a dollar, `$ ` a space, `$:` a colon. A variable is
//! written `${name}` or `$name`, where a bare name runs over alphanumerics,
//! `_`, `-` and `.`.

use cnobi_manifest::{EvalString, EvalToken};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated `${{` starting at byte {offset}")]
    UnterminatedBrace { offset: usize },
}

/// Characters allowed in a bare `$name` reference.
pub fn is_var_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Byte index of the first `target` not escaped by a preceding `$`.
pub fn find_unescaped(s: &str, target: char) -> Option<usize> {
    let mut dollars = 0usize;
    for (i, c) in s.char_indices() {
        if c == target && dollars % 2 == 0 {
            return Some(i);
        }
        if c == '$' {
            dollars += 1;
        } else {
            dollars = 0;
        }
    }
    None
}

/// Trim trailing whitespace, keeping one whitespace character that is
/// escaped by an odd run of `$` before it.
pub fn trim_end_unescaped(s: &str) -> &str {
    let trimmed = s.trim_end();
    if trimmed.len() == s.len() {
        return s;
    }
    let dollars = trimmed.bytes().rev().take_while(|&b| b == b'$').count();
    if dollars % 2 == 0 {
        return trimmed;
    }
    let escaped = s[trimmed.len()..].chars().next().map_or(0, char::len_utf8);
    &s[..trimmed.len() + escaped]
}

/// Split a statement head on whitespace. `$ ` becomes a literal space inside
/// the current word; every other escape is kept for [`tokenize_value`].
pub fn split_head(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => match chars.peek() {
                Some(' ') => {
                    chars.next();
                    current.push(' ');
                }
                Some('$') => {
                    chars.next();
                    current.push_str("$$");
                }
                _ => current.push('$'),
            },
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Turn a raw value into literal and variable tokens without evaluating it.
pub fn tokenize_value(s: &str) -> Result<EvalString, TokenizeError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = s.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '$' {
            literal.push(c);
            continue;
        }

        match chars.peek().map(|&(_, next)| next) {
            // A lone dollar at the very end stays literal.
            None => literal.push('$'),
            Some(escaped @ ('$' | ' ' | ':')) => {
                chars.next();
                literal.push(escaped);
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TokenizeError::UnterminatedBrace { offset: pos }),
                    }
                }
                if !name.is_empty() {
                    flush_literal(&mut tokens, &mut literal);
                    tokens.push(EvalToken::Var(name));
                }
            }
            Some(next) if is_var_char(next) => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_var_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                flush_literal(&mut tokens, &mut literal);
                tokens.push(EvalToken::Var(name));
            }
            // `$` before anything else is dropped; the character is kept.
            Some(_) => {}
        }
    }

    flush_literal(&mut tokens, &mut literal);
    Ok(EvalString::new(s, tokens))
}

fn flush_literal(tokens: &mut Vec<EvalToken>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(EvalToken::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_end_keeps_escaped_space() {
        assert_eq!(trim_end_unescaped("foo$   "), "foo$ ");
        assert_eq!(trim_end_unescaped("foo$$  "), "foo$$");
        assert_eq!(trim_end_unescaped("foo$$$ \t"), "foo$$$ ");
        assert_eq!(trim_end_unescaped("foo  "), "foo");
        assert_eq!(trim_end_unescaped("foo$"), "foo$");
        assert_eq!(trim_end_unescaped(""), "");
    }

    fn lit(s: &str) -> EvalToken {
        EvalToken::Literal(s.to_string())
    }

    fn var(s: &str) -> EvalToken {
        EvalToken::Var(s.to_string())
    }

    #[test]
    fn test_plain_value_is_one_literal() {
        let value = tokenize_value("g++ -O2 -c main.cc").unwrap();
        assert_eq!(value.tokens(), &[lit("g++ -O2 -c main.cc")]);
        assert_eq!(value.raw(), "g++ -O2 -c main.cc");
    }

    #[test]
    fn test_escapes_are_literal() {
        assert_eq!(tokenize_value("$$").unwrap().tokens(), &[lit("$")]);
        assert_eq!(tokenize_value("$ ").unwrap().tokens(), &[lit(" ")]);
        assert_eq!(tokenize_value("$:").unwrap().tokens(), &[lit(":")]);
        assert_eq!(
            tokenize_value("c$:/a$ b$$c").unwrap().tokens(),
            &[lit("c:/a b$c")]
        );
    }

    #[test]
    fn test_variables() {
        let value = tokenize_value("$cxx $cflags -c ${in} -o $out").unwrap();
        assert_eq!(
            value.tokens(),
            &[
                var("cxx"),
                lit(" "),
                var("cflags"),
                lit(" -c "),
                var("in"),
                lit(" -o "),
                var("out"),
            ]
        );
    }

    #[test]
    fn test_bare_name_character_class() {
        assert_eq!(
            tokenize_value("$out.d/x").unwrap().tokens(),
            &[var("out.d"), lit("/x")]
        );
        assert_eq!(
            tokenize_value("$my-var_2,").unwrap().tokens(),
            &[var("my-var_2"), lit(",")]
        );
        assert_eq!(
            tokenize_value("${out}.d").unwrap().tokens(),
            &[var("out"), lit(".d")]
        );
    }

    #[test]
    fn test_unterminated_brace() {
        assert_eq!(
            tokenize_value("abc ${name"),
            Err(TokenizeError::UnterminatedBrace { offset: 4 })
        );
    }

    #[test]
    fn test_stray_dollars() {
        assert_eq!(tokenize_value("a$").unwrap().tokens(), &[lit("a$")]);
        assert_eq!(tokenize_value("a$#b").unwrap().tokens(), &[lit("a#b")]);
        assert!(tokenize_value("${}").unwrap().is_empty());
    }

    #[test]
    fn test_split_head() {
        assert_eq!(split_head("build  a b\tc"), vec!["build", "a", "b", "c"]);
        assert_eq!(split_head("my$ file.c other"), vec!["my file.c", "other"]);
        assert_eq!(split_head("a$$ b"), vec!["a$$", "b"]);
        assert_eq!(split_head("x$:y"), vec!["x$:y"]);
        assert!(split_head("   ").is_empty());
    }

    #[test]
    fn test_find_unescaped() {
        assert_eq!(find_unescaped("out: cc in", ':'), Some(3));
        assert_eq!(find_unescaped("c$:/out: cc", ':'), Some(7));
        assert_eq!(find_unescaped("a$$: cc", ':'), Some(3));
        assert_eq!(find_unescaped("no colon", ':'), None);
    }
}
