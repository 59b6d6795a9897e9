//! Mapping of manifest names onto C identifiers.

/// C and C++ keywords, plus `link`, which clashes with linker symbols on
/// some toolchains.
const C_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto",
    "bitand", "bitor", "bool", "break", "case", "catch",
    "char", "char8_t", "char16_t", "char32_t", "class", "compl",
    "concept", "const", "consteval", "constexpr", "constinit",
    "const_cast", "continue", "co_await", "co_return", "co_yield",
    "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false",
    "float", "for", "friend", "goto", "if", "inline", "int",
    "link",
    "long", "mutable", "namespace", "new", "noexcept", "not",
    "not_eq", "nullptr", "operator", "or", "or_eq", "private",
    "protected", "public", "register", "reinterpret_cast",
    "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch",
    "template", "this", "thread_local", "throw", "true", "try",
    "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
    "restrict", "_Bool", "_Complex", "_Imaginary",
];

/// Identifiers and macros declared by the companion header.
const HEADER_NAMES: &[&str] = &[
    "manifest", "MANIFEST", "PHONY_RULE", "DEFAULT_POOL", "CONSOLE_POOL",
    "TOKEN_END", "TOKEN_LIT", "TOKEN_VAR", "LIT", "VAR", "EVAL", "PATHS",
    "BINDINGS", "EDGES", "END", "END_PATHS", "BL", "POOL", "END_POOL", "RULE", "END_RULE",
];

pub fn is_reserved(ident: &str) -> bool {
    C_KEYWORDS.contains(&ident) || HEADER_NAMES.contains(&ident)
}

/// Turn a pool or rule name into a C identifier.
///
/// Anything that is not an ASCII letter or digit becomes `_`, runs of `_`
/// collapse to one, a leading digit gets a `_` prefix and reserved names get
/// a `_` suffix. Distinct names can map to the same identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && result.ends_with('_') {
            continue;
        }
        result.push(c);
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if result.is_empty() {
        result.push('_');
    }
    if is_reserved(&result) {
        result.push('_');
    }
    result
}
