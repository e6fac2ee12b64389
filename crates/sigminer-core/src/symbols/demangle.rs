//! Symbol demangling utilities.
//!
//! Only Rust mangling is decoded (`rustc-demangle`). C++ names keep their
//! raw form but are still tagged with their language, so callers can tell an
//! Itanium name from a plain C one.
//!
//! ## Language Detection
//!
//! - Rust symbols: start with `_R`, or are legacy `_ZN` names ending in a
//!   `17h<hash>E` segment
//! - C++ symbols: any other `_Z` name
//! - C symbols: everything else
//!
//! Mach-O adds a leading underscore to every name; it is ignored here.

use rustc_demangle::try_demangle;

use crate::types::{SymbolLanguage, SymbolName};

/// Create a `SymbolName` from a raw symbol table entry.
///
/// The demangled form is rendered without the trailing hash
/// (`foo::bar`, not `foo::bar::h0123456789abcdef`), which is what a user
/// would type on a command line.
pub(crate) fn make_symbol_name(raw: String) -> SymbolName
{
    let body = if raw.starts_with("__") { &raw[1..] } else { raw.as_str() };
    let language = detect_language(body);
    let demangled = match language {
        SymbolLanguage::Rust => try_demangle(body).ok().map(|name| format!("{name:#}")),
        SymbolLanguage::Cpp | SymbolLanguage::C => None,
    };

    SymbolName::new(raw, demangled, language)
}

fn detect_language(body: &str) -> SymbolLanguage
{
    if body.starts_with("_R") || (body.starts_with("_ZN") && has_legacy_rust_hash(body)) {
        SymbolLanguage::Rust
    } else if body.starts_with("_Z") {
        SymbolLanguage::Cpp
    } else {
        SymbolLanguage::C
    }
}

/// Legacy Rust mangling ends every path with `17h` and sixteen hex digits.
fn has_legacy_rust_hash(body: &str) -> bool
{
    let trimmed = body.split('.').next().unwrap_or(body);
    let Some(path) = trimmed.strip_suffix('E') else {
        return false;
    };
    path.len() > 19
        && path[path.len() - 19..].starts_with("17h")
        && path[path.len() - 16..].bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_plain_c_name()
    {
        let name = make_symbol_name("add_numbers".to_string());
        assert_eq!(name.language(), SymbolLanguage::C);
        assert_eq!(name.demangled(), None);
        assert_eq!(name.display_name(), "add_numbers");
    }

    #[test]
    fn test_legacy_rust_name_drops_hash()
    {
        let name = make_symbol_name("_ZN4core3fmt5write17h0123456789abcdefE".to_string());
        assert_eq!(name.language(), SymbolLanguage::Rust);
        assert_eq!(name.demangled(), Some("core::fmt::write"));
    }

    #[test]
    fn test_macho_prefix_is_ignored()
    {
        let name = make_symbol_name("__ZN4core3fmt5write17h0123456789abcdefE".to_string());
        assert_eq!(name.language(), SymbolLanguage::Rust);
        assert_eq!(name.demangled(), Some("core::fmt::write"));
        assert_eq!(name.raw(), "__ZN4core3fmt5write17h0123456789abcdefE");
    }

    #[test]
    fn test_itanium_name_is_cpp()
    {
        let name = make_symbol_name("_ZN3foo3barEi".to_string());
        assert_eq!(name.language(), SymbolLanguage::Cpp);
        assert_eq!(name.demangled(), None);

        assert_eq!(make_symbol_name("_Z3addii".to_string()).language(), SymbolLanguage::Cpp);
    }
}
