use crate::bindings::Bindings;
use crate::eval::EvalString;
use smol_str::SmolStr;

/// Name of the built-in rule that only groups its inputs.
pub const PHONY_RULE: &str = "phony";

/// Name of the built-in pool of depth one.
pub const CONSOLE_POOL: &str = "console";

/// A named concurrency limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDecl {
    pub name: SmolStr,
    pub depth: Option<u32>,
}

impl PoolDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            depth: None,
        }
    }
}

/// A named command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDecl {
    pub name: SmolStr,
    pub bindings: Bindings,
}

impl RuleDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            bindings: Bindings::new(),
        }
    }

    /// The pool requested through the rule's own `pool` binding.
    pub fn pool(&self) -> Option<&EvalString> {
        self.bindings.get("pool")
    }
}

/// One build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDecl {
    pub outputs: Vec<EvalString>,
    pub implicit_outputs: Vec<EvalString>,
    pub rule: SmolStr,
    pub inputs: Vec<EvalString>,
    pub implicit_inputs: Vec<EvalString>,
    pub order_only_inputs: Vec<EvalString>,
    pub validation_inputs: Vec<EvalString>,
    /// `Some("")` selects the default pool explicitly.
    pub pool: Option<SmolStr>,
    pub bindings: Bindings,
}

impl EdgeDecl {
    pub fn new(rule: impl Into<SmolStr>) -> Self {
        Self {
            outputs: Vec::new(),
            implicit_outputs: Vec::new(),
            rule: rule.into(),
            inputs: Vec::new(),
            implicit_inputs: Vec::new(),
            order_only_inputs: Vec::new(),
            validation_inputs: Vec::new(),
            pool: None,
            bindings: Bindings::new(),
        }
    }

    pub fn is_phony(&self) -> bool {
        self.rule.as_str() == PHONY_RULE
    }
}
