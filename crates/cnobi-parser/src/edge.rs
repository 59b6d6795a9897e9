//! Classification of the paths on a `build` line.

use cnobi_manifest::{EdgeDecl, EvalString};

/// Which list the next unprefixed input goes to.
///
/// The state is sticky: `||` moves every following input into the
/// order-only list until another prefix changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputState {
    #[default]
    Plain,
    Implicit,
    OrderOnly,
    Validation,
}

impl InputState {
    /// Feed one head token. Returns the state after the token and the path
    /// it carries, if any. A prefix glued to a path (`||dir`) both switches
    /// the state and yields the path.
    pub fn advance(self, token: &str) -> (InputState, Option<&str>) {
        let (next, rest) = if let Some(rest) = token.strip_prefix("|@") {
            (InputState::Validation, rest)
        } else if let Some(rest) = token.strip_prefix("||") {
            (InputState::OrderOnly, rest)
        } else if let Some(rest) = token.strip_prefix('|') {
            (InputState::Implicit, rest)
        } else {
            return (self, Some(token));
        };
        (next, (!rest.is_empty()).then_some(rest))
    }

    /// The list of `edge` this state appends to.
    pub fn list(self, edge: &mut EdgeDecl) -> &mut Vec<EvalString> {
        match self {
            InputState::Plain => &mut edge.inputs,
            InputState::Implicit => &mut edge.implicit_inputs,
            InputState::OrderOnly => &mut edge.order_only_inputs,
            InputState::Validation => &mut edge.validation_inputs,
        }
    }
}

/// Same idea for the output side, which only knows explicit and implicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputState {
    #[default]
    Explicit,
    Implicit,
}

impl OutputState {
    pub fn advance(self, token: &str) -> (OutputState, Option<&str>) {
        match token.strip_prefix('|') {
            Some(rest) => (OutputState::Implicit, (!rest.is_empty()).then_some(rest)),
            None => (self, Some(token)),
        }
    }

    pub fn list(self, edge: &mut EdgeDecl) -> &mut Vec<EvalString> {
        match self {
            OutputState::Explicit => &mut edge.outputs,
            OutputState::Implicit => &mut edge.implicit_outputs,
        }
    }
}
