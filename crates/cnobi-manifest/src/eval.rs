use std::fmt;

/// One piece of an unevaluated value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EvalToken {
    /// Text copied through as is, with escapes already resolved.
    Literal(String),
    /// A variable reference, resolved by the runtime.
    Var(String),
}

/// A value that has been tokenized but not evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvalString {
    raw: String,
    tokens: Vec<EvalToken>,
}

impl EvalString {
    pub fn new(raw: impl Into<String>, tokens: Vec<EvalToken>) -> Self {
        Self {
            raw: raw.into(),
            tokens,
        }
    }

    /// A value made of one literal, with nothing to escape.
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = if text.is_empty() {
            Vec::new()
        } else {
            vec![EvalToken::Literal(text.clone())]
        };
        Self { raw: text, tokens }
    }

    /// The value as it appeared in the source, after head splitting.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[EvalToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The literal text when the value holds exactly one literal token.
    pub fn as_single_literal(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [EvalToken::Literal(s)] => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for EvalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_literal_has_no_tokens() {
        let value = EvalString::literal("");
        assert!(value.is_empty());
        assert_eq!(value.as_single_literal(), None);
    }

    #[test]
    fn test_single_literal() {
        let value = EvalString::literal("-O2");
        assert_eq!(value.as_single_literal(), Some("-O2"));
        assert_eq!(value.tokens(), &[EvalToken::Literal("-O2".into())]);
    }

    #[test]
    fn test_mixed_tokens() {
        let value = EvalString::new(
            "$cc -c",
            vec![
                EvalToken::Var("cc".into()),
                EvalToken::Literal(" -c".into()),
            ],
        );
        assert_eq!(value.as_single_literal(), None);
        assert_eq!(value.to_string(), "$cc -c");
    }
}
