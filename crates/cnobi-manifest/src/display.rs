//! Human-readable dump of a manifest, used by `cnobi --display`.

use crate::decl::EdgeDecl;
use crate::eval::EvalString;
use crate::manifest::Manifest;
use std::fmt;

struct PathList<'a>(&'a [EvalString]);

impl fmt::Display for PathList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", path.raw())?;
        }
        f.write_str("]")
    }
}

fn write_edge(f: &mut fmt::Formatter<'_>, edge: &EdgeDecl) -> fmt::Result {
    writeln!(f, "  {{")?;
    writeln!(f, "    outputs: {}", PathList(&edge.outputs))?;
    writeln!(f, "    implicit_outputs: {}", PathList(&edge.implicit_outputs))?;
    writeln!(f, "    rule: {}", edge.rule)?;
    writeln!(f, "    inputs: {}", PathList(&edge.inputs))?;
    writeln!(f, "    implicit_inputs: {}", PathList(&edge.implicit_inputs))?;
    writeln!(f, "    validation_inputs: {}", PathList(&edge.validation_inputs))?;
    writeln!(f, "    order_only: {}", PathList(&edge.order_only_inputs))?;
    match &edge.pool {
        Some(pool) => writeln!(f, "    pool: {:?}", pool.as_str())?,
        None => writeln!(f, "    pool: none")?,
    }
    writeln!(f, "    bindings: {{")?;
    for (key, value) in edge.bindings.iter() {
        writeln!(f, "      {}: {}", key, value)?;
    }
    writeln!(f, "    }}")?;
    writeln!(f, "  }}")
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pools:")?;
        for pool in self.pools.values() {
            writeln!(f, "  {}:", pool.name)?;
            match pool.depth {
                Some(depth) => writeln!(f, "    depth: {}", depth)?,
                None => writeln!(f, "    depth: none")?,
            }
        }
        writeln!(f)?;

        writeln!(f, "Rules:")?;
        for rule in self.rules.values() {
            writeln!(f, "  {}:", rule.name)?;
            for (key, value) in rule.bindings.iter() {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Bindings:")?;
        for (key, value) in self.bindings.iter() {
            writeln!(f, "  {}: {}", key, value)?;
        }
        writeln!(f)?;

        writeln!(f, "Edges:")?;
        for edge in &self.edges {
            write_edge(f, edge)?;
        }
        writeln!(f)?;

        writeln!(f, "Defaults:")?;
        writeln!(f, "  {}", PathList(&self.defaults))
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_display_sections_in_order() {
        let mut manifest = Manifest::new();
        let mut pool = PoolDecl::new("link_pool");
        pool.depth = Some(2);
        manifest.add_pool(pool);

        let mut rule = RuleDecl::new("cc");
        rule.bindings.insert("command", EvalString::literal("cc -c"));
        manifest.add_rule(rule);

        let mut edge = EdgeDecl::new("cc");
        edge.outputs.push(EvalString::literal("a.o"));
        edge.inputs.push(EvalString::literal("a.c"));
        manifest.add_edge(edge);
        manifest.add_default(EvalString::literal("a.o"));

        let text = manifest.to_string();
        let pools = text.find("Pools:").unwrap();
        let rules = text.find("Rules:").unwrap();
        let edges = text.find("Edges:").unwrap();
        let defaults = text.find("Defaults:").unwrap();
        assert!(pools < rules && rules < edges && edges < defaults);

        assert!(text.contains("  link_pool:\n    depth: 2\n"));
        assert!(text.contains("    command: cc -c\n"));
        assert!(text.contains("    inputs: [\"a.c\"]\n"));
        assert!(text.contains("    pool: none\n"));
        assert!(text.ends_with("Defaults:\n  [\"a.o\"]\n"));
    }
}
