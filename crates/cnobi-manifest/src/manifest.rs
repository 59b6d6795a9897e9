use crate::bindings::Bindings;
use crate::decl::{EdgeDecl, PoolDecl, RuleDecl};
use crate::eval::EvalString;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Everything declared by a root file and the files it includes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub pools: IndexMap<SmolStr, PoolDecl>,
    pub rules: IndexMap<SmolStr, RuleDecl>,
    pub bindings: Bindings,
    pub edges: Vec<EdgeDecl>,
    pub defaults: Vec<EvalString>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a pool. A later declaration with the same name replaces the
    /// earlier one; the replaced pool is returned.
    pub fn add_pool(&mut self, pool: PoolDecl) -> Option<PoolDecl> {
        self.pools.insert(pool.name.clone(), pool)
    }

    /// Declare a rule, replacing any rule of the same name.
    pub fn add_rule(&mut self, rule: RuleDecl) -> Option<RuleDecl> {
        self.rules.insert(rule.name.clone(), rule)
    }

    pub fn add_edge(&mut self, edge: EdgeDecl) {
        self.edges.push(edge);
    }

    pub fn add_default(&mut self, target: EvalString) {
        self.defaults.push(target);
    }

    pub fn pool(&self, name: &str) -> Option<&PoolDecl> {
        self.pools.get(name)
    }

    pub fn rule(&self, name: &str) -> Option<&RuleDecl> {
        self.rules.get(name)
    }
}
