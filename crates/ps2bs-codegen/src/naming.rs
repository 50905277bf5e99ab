//! Name transforms applied to each type identifier while rendering.
//!
//! All transforms touch only the first character. `uintptr` becomes
//! `Uintptr` and `int8` becomes `Int8`; nothing past the first character
//! is re-cased.

/// Go types the generated file provides helpers for, in output order.
pub const TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex128",
    "complex64",
    "error",
    "float32",
    "float64",
    "int",
    "int16",
    "int32",
    "int64",
    "int8",
    "rune",
    "string",
    "uint",
    "uint16",
    "uint32",
    "uint64",
    "uint8",
    "uintptr",
    "time.Time",
];

/// Name of the generated file. The resolver also uses it to recognize prior output.
pub const OUTPUT_FILE_NAME: &str = "ps2bs_gen.go";

/// Trailing component of a possibly qualified type name.
pub fn simple_name(ty: &str) -> &str {
    match ty.rsplit_once('.') {
        Some((_, name)) => name,
        None => ty,
    }
}

/// Package qualifier of a type name, if any (`time.Time` -> `time`).
pub fn qualifier(ty: &str) -> Option<&str> {
    ty.rsplit_once('.').map(|(pkg, _)| pkg)
}

/// Uppercase the first character.
pub fn title_case(s: &str) -> String {
    map_first(s, |c| c.to_uppercase().collect())
}

/// Lowercase the first character.
pub fn first_as_lower(s: &str) -> String {
    map_first(s, |c| c.to_lowercase().collect())
}

fn map_first(s: &str, f: impl FnOnce(char) -> String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut result = f(first);
            result.push_str(chars.as_str());
            result
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("int"), "int");
        assert_eq!(simple_name("time.Time"), "Time");
        assert_eq!(simple_name("a.b.C"), "C");
    }

    #[test]
    fn test_qualifier() {
        assert_eq!(qualifier("time.Time"), Some("time"));
        assert_eq!(qualifier("uintptr"), None);
    }

    #[test]
    fn test_title_case_only_touches_first_char() {
        assert_eq!(title_case("uintptr"), "Uintptr");
        assert_eq!(title_case("int8"), "Int8");
        assert_eq!(title_case("complex128"), "Complex128");
        assert_eq!(title_case("Time"), "Time");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_first_as_lower() {
        assert_eq!(first_as_lower("Time"), "time");
        assert_eq!(first_as_lower("int"), "int");
        assert_eq!(first_as_lower("ABC"), "aBC");
    }

    #[test]
    fn test_type_list_order() {
        assert_eq!(TYPES.len(), 21);
        assert_eq!(TYPES.first(), Some(&"bool"));
        assert_eq!(TYPES.last(), Some(&"time.Time"));

        let mut sorted = TYPES.to_vec();
        sorted.sort();
        assert_ne!(sorted, TYPES.to_vec());
    }
}
