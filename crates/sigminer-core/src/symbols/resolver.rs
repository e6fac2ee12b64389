//! Symbol name → address → subprogram entry.

use object::{Object, ObjectSymbol, SymbolKind};
use tracing::debug;

use super::demangle::make_symbol_name;
use super::{DebugGraph, DieRef};
use crate::error::{Result, SigminerError};
use crate::types::{Address, SymbolName};

/// A defined function symbol from `.symtab` or `.dynsym`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionSymbol
{
    name: SymbolName,
    address: Address,
    size: u64,
}

impl FunctionSymbol
{
    pub fn new(name: SymbolName, address: Address, size: u64) -> Self
    {
        Self { name, address, size }
    }

    pub fn name(&self) -> &SymbolName
    {
        &self.name
    }

    /// Link-time (file) address of the first instruction.
    pub fn address(&self) -> Address
    {
        self.address
    }

    /// Size in bytes; zero when the symbol table does not record one.
    pub fn size(&self) -> u64
    {
        self.size
    }
}

/// Every defined text symbol, static table first, then the dynamic one.
///
/// A name exported from both tables appears twice; lookups take the first.
pub(crate) fn function_symbols(file: &object::File<'_>) -> Vec<FunctionSymbol>
{
    let mut found = Vec::new();
    for symbol in file.symbols().chain(file.dynamic_symbols()) {
        if symbol.kind() != SymbolKind::Text || !symbol.is_definition() {
            continue;
        }
        let Ok(name) = symbol.name() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        found.push(FunctionSymbol::new(
            make_symbol_name(name.to_string()),
            Address::new(symbol.address()),
            symbol.size(),
        ));
    }
    found
}

/// Find a function by name.
///
/// Each pass scans every symbol before the next, looser pass runs:
///
/// 1. exact raw name
/// 2. raw name without the Mach-O `_` prefix (only when `macho` is set)
/// 3. demangled name without hash
pub fn find_function_symbol<'s>(symbols: &'s [FunctionSymbol], name: &str, macho: bool) -> Option<&'s FunctionSymbol>
{
    symbols
        .iter()
        .find(|symbol| symbol.name.raw() == name)
        .or_else(|| {
            if !macho {
                return None;
            }
            symbols
                .iter()
                .find(|symbol| symbol.name.raw().strip_prefix('_') == Some(name))
        })
        .or_else(|| symbols.iter().find(|symbol| symbol.name.demangled() == Some(name)))
}

/// The subprogram entry covering a symbol's address.
///
/// ## Errors
///
/// - [`SigminerError::FunctionNotInRange`] if no subprogram covers it
/// - [`SigminerError::Dwarf`] if the unit trees cannot be walked
pub fn locate_subprogram(graph: &DebugGraph<'_>, symbol: &FunctionSymbol) -> Result<DieRef>
{
    match graph.function_containing(symbol.address)? {
        Some(die) => Ok(die),
        None => {
            debug!(symbol = %symbol.name, address = %symbol.address, "no subprogram covers symbol");
            Err(SigminerError::FunctionNotInRange {
                symbol: symbol.name.display_name().to_string(),
                address: symbol.address,
            })
        }
    }
}
