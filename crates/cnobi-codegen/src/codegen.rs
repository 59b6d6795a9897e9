//! Manifest to C initializer generation.
//!
//! The output is a list of `POOL`/`RULE` declarations followed by one
//! `MANIFEST` aggregate. All record layout lives in the companion header;
//! this module only writes macro invocations and string literals.

use crate::ident::sanitize_identifier;
use crate::HEADER_NAME;
use cnobi_common::Diagnostic;
use cnobi_manifest::{
    Bindings, EdgeDecl, EvalString, EvalToken, Manifest, PoolDecl, RuleDecl, CONSOLE_POOL,
};
use rustc_hash::FxHashMap;

/// Suffix split off variable names so the runtime never has to append it.
const DEPFILE_SUFFIX: &str = ".d";

/// Generated source text and the warnings raised while producing it.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub code: String,
    pub warnings: Vec<Diagnostic>,
}

/// Pools and rules share one C namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Pool,
    Rule,
}

impl DeclKind {
    fn as_str(self) -> &'static str {
        match self {
            DeclKind::Pool => "pool",
            DeclKind::Rule => "rule",
        }
    }
}

/// C code generator for one manifest.
pub struct CodeGenerator {
    output: String,
    indent: usize,
    /// Declared identifier → the declaration that claimed it first.
    declared: FxHashMap<String, (DeclKind, String)>,
    warnings: Vec<Diagnostic>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            declared: FxHashMap::default(),
            warnings: Vec::new(),
        }
    }

    /// Generate the complete translation unit.
    pub fn generate(mut self, manifest: &Manifest) -> GeneratedCode {
        self.writeln(&format!("#include \"{}\"", HEADER_NAME));
        self.writeln("");

        self.writeln("// Pool declarations");
        for pool in manifest.pools.values() {
            self.generate_pool(pool);
        }
        if manifest.pools.is_empty() {
            self.writeln("");
        }

        self.writeln("// Rule declarations");
        for rule in manifest.rules.values() {
            self.generate_rule(rule);
        }
        if manifest.rules.is_empty() {
            self.writeln("");
        }

        self.writeln("// Main manifest");
        self.writeln("MANIFEST = {");
        self.indent += 1;
        // ISO C rejects an empty initializer list.
        if manifest.bindings.is_empty()
            && manifest.edges.is_empty()
            && manifest.defaults.is_empty()
        {
            self.writeln("0");
        }
        self.generate_bindings(&manifest.bindings, None, "END,");
        self.generate_edges(&manifest.edges);
        self.generate_paths("defaults", &manifest.defaults);
        self.indent -= 1;
        self.writeln("};");

        GeneratedCode {
            code: self.output,
            warnings: self.warnings,
        }
    }

    fn generate_pool(&mut self, pool: &PoolDecl) {
        let ident = self.declare(DeclKind::Pool, &pool.name);
        self.writeln(&format!("POOL({}, \"{}\")", ident, escape_c_string(&pool.name)));
        self.indent += 1;
        if let Some(depth) = pool.depth {
            self.writeln(&format!(".depth = {},", depth));
        }
        self.indent -= 1;
        self.writeln("END_POOL");
        self.writeln("");
    }

    fn generate_rule(&mut self, rule: &RuleDecl) {
        let ident = self.declare(DeclKind::Rule, &rule.name);
        self.writeln(&format!("RULE({}, \"{}\")", ident, escape_c_string(&rule.name)));
        self.indent += 1;

        // A literal `pool` binding becomes a reference to the pool record.
        // One built from variables is left for the runtime to expand.
        let pool = rule.pool().and_then(EvalString::as_single_literal);
        if let Some(pool) = pool {
            self.writeln(&format!(".pool = &{},", pool_ref(pool)));
        }
        let skip = pool.map(|_| "pool");
        self.generate_bindings(&rule.bindings, skip, "END");

        self.indent -= 1;
        self.writeln("END_RULE");
        self.writeln("");
    }

    /// `BINDINGS … END` block, or nothing when no binding is left to write.
    fn generate_bindings(&mut self, bindings: &Bindings, skip: Option<&str>, close: &str) {
        let entries: Vec<_> = bindings
            .iter()
            .filter(|(key, _)| Some(*key) != skip)
            .collect();
        if entries.is_empty() {
            return;
        }

        self.writeln("BINDINGS");
        self.indent += 1;
        for (key, value) in entries {
            self.writeln(&binding_entry(key, value));
        }
        self.indent -= 1;
        self.writeln(close);
    }

    fn generate_edges(&mut self, edges: &[EdgeDecl]) {
        if edges.is_empty() {
            return;
        }

        self.writeln("EDGES");
        self.indent += 1;
        for edge in edges {
            self.generate_edge(edge);
        }
        self.indent -= 1;
        self.writeln("END,");
    }

    fn generate_edge(&mut self, edge: &EdgeDecl) {
        self.writeln("{");
        self.indent += 1;

        let rule = if edge.is_phony() {
            "PHONY_RULE".to_string()
        } else {
            sanitize_identifier(&edge.rule)
        };
        self.writeln(&format!(".rule = &{},", rule));

        if let Some(pool) = &edge.pool {
            self.writeln(&format!(".pool = &{},", pool_ref(pool)));
        }

        self.generate_paths("in", &edge.inputs);
        self.generate_paths("implicit_deps", &edge.implicit_inputs);
        self.generate_paths("order_only_deps", &edge.order_only_inputs);
        self.generate_paths("out", &edge.outputs);
        self.generate_paths("implicit_outs", &edge.implicit_outputs);
        self.generate_paths("validations", &edge.validation_inputs);
        self.generate_bindings(&edge.bindings, None, "END");

        self.indent -= 1;
        self.writeln("},");
    }

    /// `.field = PATHS … END_PATHS,`, omitted entirely for an empty list.
    fn generate_paths(&mut self, field: &str, paths: &[EvalString]) {
        if paths.is_empty() {
            return;
        }

        self.writeln(&format!(".{} = PATHS", field));
        self.indent += 1;
        for path in paths {
            self.writeln(&format!("{},", eval_expr(path)));
        }
        self.indent -= 1;
        self.writeln("END_PATHS,");
    }

    /// Sanitize a declared name and remember which declaration claimed the
    /// result. A second claim on the same identifier is a warning.
    fn declare(&mut self, kind: DeclKind, name: &str) -> String {
        let ident = sanitize_identifier(name);
        match self.declared.get(&ident) {
            Some((previous_kind, previous)) => {
                let message = format!(
                    "{} `{}` and {} `{}` both map to the C identifier `{}`",
                    previous_kind.as_str(),
                    previous,
                    kind.as_str(),
                    name,
                    ident
                );
                tracing::debug!("{message}");
                self.warnings.push(
                    Diagnostic::warning(message)
                        .with_help("rename one of them; the generated file will not compile"),
                );
            }
            None => {
                self.declared.insert(ident.clone(), (kind, name.to_string()));
            }
        }
        ident
    }

    fn writeln(&mut self, s: &str) {
        if !s.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str("  ");
            }
            self.output.push_str(s);
        }
        self.output.push('\n');
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of the pool record a pool name refers to.
fn pool_ref(name: &str) -> String {
    match name {
        "" => "DEFAULT_POOL".to_string(),
        CONSOLE_POOL => "CONSOLE_POOL".to_string(),
        _ => sanitize_identifier(name),
    }
}

/// Keys the `BL` macro can stringify as written.
fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn binding_entry(key: &str, value: &EvalString) -> String {
    match value.as_single_literal() {
        Some(text) if is_plain_key(key) => format!("BL({}, \"{}\")", key, escape_c_string(text)),
        _ => format!("{{\"{}\", {}}},", escape_c_string(key), eval_expr(value)),
    }
}

/// `EVAL LIT("…") VAR("…") … END` for one value.
pub fn eval_expr(value: &EvalString) -> String {
    let mut expr = String::from("EVAL");
    for token in value.tokens() {
        match token {
            EvalToken::Literal(text) => push_token(&mut expr, "LIT", text),
            EvalToken::Var(name) => match name.strip_suffix(DEPFILE_SUFFIX) {
                Some(base) if !base.is_empty() => {
                    push_token(&mut expr, "VAR", base);
                    push_token(&mut expr, "LIT", DEPFILE_SUFFIX);
                }
                _ => push_token(&mut expr, "VAR", name),
            },
        }
    }
    expr.push_str(" END");
    expr
}

fn push_token(expr: &mut String, kind: &str, text: &str) {
    expr.push(' ');
    expr.push_str(kind);
    expr.push_str("(\"");
    expr.push_str(&escape_c_string(text));
    expr.push_str("\")");
}

/// Escape backslashes and double quotes for a C string literal.
pub fn escape_c_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnobi_parser::{ManifestParser, ParseOptions};

    fn generate(source: &str) -> GeneratedCode {
        let parsed = ManifestParser::new(ParseOptions::default())
            .parse_str("build.ninja", source)
            .expect("Failed to parse");
        CodeGenerator::new().generate(&parsed.manifest)
    }

    #[test]
    fn test_full_manifest() {
        let source = "\
cflags = -O2
pool link_pool
  depth = 1
rule cc
  command = gcc $cflags -c $in -o $out
  depfile = $out.d
rule link
  command = gcc $in -o $out
  pool = link_pool
build a.o: cc a.c
build app: link a.o
  pool = console
build all: phony app
default app
";
        let generated = generate(source);
        assert!(generated.warnings.is_empty());

        insta::assert_snapshot!(generated.code, @r##"
#include "manifest.h"

// Pool declarations
POOL(link_pool, "link_pool")
  .depth = 1,
END_POOL

// Rule declarations
RULE(cc, "cc")
  BINDINGS
    {"command", EVAL LIT("gcc ") VAR("cflags") LIT(" -c ") VAR("in") LIT(" -o ") VAR("out") END},
    {"depfile", EVAL VAR("out") LIT(".d") END},
  END
END_RULE

RULE(link_, "link")
  .pool = &link_pool,
  BINDINGS
    {"command", EVAL LIT("gcc ") VAR("in") LIT(" -o ") VAR("out") END},
  END
END_RULE

// Main manifest
MANIFEST = {
  BINDINGS
    BL(cflags, "-O2")
  END,
  EDGES
    {
      .rule = &cc,
      .in = PATHS
        EVAL LIT("a.c") END,
      END_PATHS,
      .out = PATHS
        EVAL LIT("a.o") END,
      END_PATHS,
    },
    {
      .rule = &link_,
      .pool = &CONSOLE_POOL,
      .in = PATHS
        EVAL LIT("a.o") END,
      END_PATHS,
      .out = PATHS
        EVAL LIT("app") END,
      END_PATHS,
    },
    {
      .rule = &PHONY_RULE,
      .in = PATHS
        EVAL LIT("app") END,
      END_PATHS,
      .out = PATHS
        EVAL LIT("all") END,
      END_PATHS,
    },
  END,
  .defaults = PATHS
    EVAL LIT("app") END,
  END_PATHS,
};
"##);
    }

    #[test]
    fn test_empty_input_list_is_omitted() {
        let code = generate("rule touch\n  command = touch $out\nbuild stamp: touch\n").code;

        assert!(code.contains(".out = PATHS"));
        assert!(!code.contains(".in ="));
        assert!(!code.contains(".implicit_deps"));
        assert!(!code.contains(".order_only_deps"));
        assert!(!code.contains(".validations"));
        assert!(!code.contains(".defaults"));
    }

    #[test]
    fn test_every_path_category() {
        let code = generate("build out | out.d: r in | dep || order |@ check\n").code;

        for field in [
            ".in = PATHS",
            ".implicit_deps = PATHS",
            ".order_only_deps = PATHS",
            ".out = PATHS",
            ".implicit_outs = PATHS",
            ".validations = PATHS",
        ] {
            assert!(code.contains(field), "missing {field}");
        }
        let order: Vec<_> = ["\"in\"", "\"dep\"", "\"order\"", "\"out\"", "\"out.d\"", "\"check\""]
            .iter()
            .map(|needle| code.find(needle).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_binding_forms() {
        let code = generate("a = plain\nb = $var\nc = x$$y\nd = one $x two\n").code;

        assert!(code.contains("BL(a, \"plain\")"));
        assert!(code.contains("{\"b\", EVAL VAR(\"var\") END},"));
        assert!(code.contains("BL(c, \"x$y\")"));
        assert!(code.contains("{\"d\", EVAL LIT(\"one \") VAR(\"x\") LIT(\" two\") END},"));
    }

    #[test]
    fn test_strings_are_escaped() {
        let code = generate("msg = say \"hi\" C:\\dir\n").code;
        assert!(code.contains(r#"BL(msg, "say \"hi\" C:\\dir")"#));
    }

    #[test]
    fn test_depfile_suffix_split() {
        let value = cnobi_parser::tokenizer::tokenize_value("${out.d} $.d").unwrap();
        assert_eq!(
            eval_expr(&value),
            r#"EVAL VAR("out") LIT(".d") LIT(" ") VAR(".d") END"#
        );
    }

    #[test]
    fn test_builtin_pools() {
        let code = generate("build a: r\n  pool =\nbuild b: r\n  pool = console\nbuild c: r\n  pool = my-pool\n").code;

        assert!(code.contains(".pool = &DEFAULT_POOL,"));
        assert!(code.contains(".pool = &CONSOLE_POOL,"));
        assert!(code.contains(".pool = &my_pool,"));
    }

    #[test]
    fn test_rule_pool_from_variable_stays_a_binding() {
        let code = generate("rule r\n  pool = $p\n  command = x\n").code;

        assert!(!code.contains(".pool ="));
        assert!(code.contains("{\"pool\", EVAL VAR(\"p\") END},"));
    }

    #[test]
    fn test_identifier_collision_warns() {
        let generated = generate("rule a-b\n  command = x\nrule a.b\n  command = y\n");

        assert_eq!(generated.warnings.len(), 1);
        assert!(generated.warnings[0].message.contains("a_b"));
    }

    #[test]
    fn test_pool_and_rule_with_same_name_warn() {
        let generated = generate("pool cc\n  depth = 1\nrule cc\n  command = cc\n  pool = cc\n");

        assert_eq!(generated.warnings.len(), 1);
        assert!(generated.warnings[0].message.contains("pool `cc` and rule `cc`"));
    }

    #[test]
    fn test_edge_pool_from_variable_is_a_binding() {
        let code = generate("build o: r i\n  pool = $p\n").code;

        assert!(!code.contains(".pool ="));
        assert!(code.contains("{\"pool\", EVAL VAR(\"p\") END},"));
    }

    #[test]
    fn test_path_lists_use_their_own_terminator() {
        let code = generate("build o: r i\ndefault o\n").code;

        assert!(code.contains(".in = PATHS\n        EVAL LIT(\"i\") END,\n      END_PATHS,"));
        assert!(code.contains(".defaults = PATHS\n    EVAL LIT(\"o\") END,\n  END_PATHS,"));
    }

    #[test]
    fn test_empty_manifest() {
        let code = CodeGenerator::new().generate(&Manifest::new()).code;
        assert_eq!(
            code,
            "#include \"manifest.h\"\n\n// Pool declarations\n\n// Rule declarations\n\n// Main manifest\nMANIFEST = {\n  0\n};\n"
        );
    }
}
