//! Presentation types for symbol table entries and line-table lookups.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Mangling scheme a linkage name was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SymbolLanguage
{
    /// Legacy (`_ZN...17h<hash>E`) or v0 (`_R...`) Rust mangling.
    Rust,
    /// Itanium C++ mangling.
    Cpp,
    /// Unmangled; usually C or `extern "C"`.
    C,
}

impl SymbolLanguage
{
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            SymbolLanguage::Rust => "rust",
            SymbolLanguage::Cpp => "c++",
            SymbolLanguage::C => "c",
        }
    }
}

/// Linkage name of a function, as the resolver matches it.
///
/// Lookups compare against [`raw`](Self::raw) first and
/// [`demangled`](Self::demangled) last; `Display` shows whichever a user
/// would recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SymbolName
{
    raw: String,
    demangled: Option<String>,
    language: SymbolLanguage,
}

impl SymbolName
{
    #[must_use]
    pub fn new(raw: String, demangled: Option<String>, language: SymbolLanguage) -> Self
    {
        Self {
            raw,
            demangled,
            language,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str
    {
        &self.raw
    }

    /// Rust path without its hash suffix; `None` for C and C++ names.
    #[must_use]
    pub fn demangled(&self) -> Option<&str>
    {
        self.demangled.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> &str
    {
        self.demangled().unwrap_or(self.raw())
    }

    #[must_use]
    pub fn language(&self) -> SymbolLanguage
    {
        self.language
    }
}

impl fmt::Display for SymbolName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.display_name())
    }
}

/// File, line and column reported by the line table for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SourceLocation
{
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl fmt::Display for SourceLocation
{
    /// `file`, `file:line` or `file:line:column`. A column without a line
    /// is not shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&self.file)?;
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, ":{line}:{column}"),
            (Some(line), None) => write!(f, ":{line}"),
            (None, _) => Ok(()),
        }
    }
}
