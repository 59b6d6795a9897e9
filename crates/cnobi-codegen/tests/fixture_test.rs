//! Generation over the shared ninja fixtures.

use cnobi_parser::{parse_file, ParseOptions};
use std::path::PathBuf;

fn generate_fixture(rel: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/ninja")
        .join(rel);
    let parsed = parse_file(&path, ParseOptions::default()).expect("Failed to parse fixture");
    let generated = cnobi_codegen::generate(&parsed.manifest);
    assert!(generated.warnings.is_empty());
    generated.code
}

/// Declarations come from the included rules file, edges from the root.
#[test]
fn test_hello_fixture() {
    let code = generate_fixture("hello/build.ninja");

    assert!(code.contains("POOL(link_pool, \"link_pool\")\n  .depth = 1,\nEND_POOL"));
    assert!(code.contains("RULE(compile, \"compile\")"));
    assert!(code.contains("RULE(link_, \"link\")\n  .pool = &link_pool,"));
    assert!(code.contains("{\"depfile\", EVAL VAR(\"out\") LIT(\".d\") END},"));
    assert!(code.contains(".rule = &link_,"));
    assert!(code.contains(".rule = &PHONY_RULE,"));
    assert!(code.contains(".implicit_deps = PATHS\n        EVAL LIT(\"libs.stamp\") END,"));
    assert!(code.contains(".order_only_deps = PATHS\n        EVAL VAR(\"builddir\") END,"));
    assert!(code.contains("BL(cflags, \"-O2\")"));
    assert!(code.contains("BL(cflags, \"-O3\")"));
}

/// Same input, same bytes.
#[test]
fn test_output_is_deterministic() {
    assert_eq!(
        generate_fixture("hello/build.ninja"),
        generate_fixture("hello/build.ninja")
    );
}
