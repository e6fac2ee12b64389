//! Binary image loading.

use std::fs;
use std::path::{Path, PathBuf};

use addr2line::Context;
use object::{BinaryFormat, Object};
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use super::resolver::{find_function_symbol, function_symbols, locate_subprogram, FunctionSymbol};
use super::{DebugGraph, DebugSections, OwnedDwarf, OwnedReader};
use crate::error::{Result, SigminerError};
use crate::query::UnknownTypePolicy;
use crate::signature::SignatureBuilder;
use crate::types::{Address, Architecture, Signature, SignatureResult, SourceLocation};

/// A shared object or executable loaded from disk.
///
/// Opening only reads the file, copies its DWARF sections and lists its
/// function symbols. The gimli context and the addr2line context are built
/// on first use and cached. Each signature query still re-reads the unit
/// headers through a fresh `DebugGraph`.
pub struct BinaryImage
{
    path: PathBuf,
    architecture: Architecture,
    format: BinaryFormat,
    sections: DebugSections,
    symbols: Vec<FunctionSymbol>,
    dwarf_cache: OnceCell<OwnedDwarf>,
    context_cache: OnceCell<Context<OwnedReader>>,
}

impl BinaryImage
{
    /// Read and parse the object file at `path`.
    ///
    /// A missing debug section is not an error here; it is reported by the
    /// first call that needs DWARF.
    ///
    /// ## Errors
    ///
    /// - [`SigminerError::FileOpen`] if the file cannot be read
    /// - [`SigminerError::ObjectParse`] if it is not an object file
    /// - [`SigminerError::DwarfUnavailable`] if a debug section cannot be decompressed
    pub fn open(path: impl AsRef<Path>) -> Result<Self>
    {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SigminerError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let file = object::File::parse(&*bytes).map_err(|err| SigminerError::ObjectParse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let architecture = Architecture::from(file.architecture());
        let sections = DebugSections::from_object(path, &file)?;
        let symbols = function_symbols(&file);

        info!(
            path = %path.display(),
            %architecture,
            symbols = symbols.len(),
            debug_info = sections.has_debug_info(),
            "opened binary image"
        );

        Ok(Self {
            path: path.to_path_buf(),
            architecture,
            format: file.format(),
            sections,
            symbols,
            dwarf_cache: OnceCell::new(),
            context_cache: OnceCell::new(),
        })
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    pub fn architecture(&self) -> Architecture
    {
        self.architecture
    }

    /// Defined function symbols, static table first.
    pub fn symbols(&self) -> &[FunctionSymbol]
    {
        &self.symbols
    }

    /// Whether the image carries a non-empty `.debug_info`.
    pub fn has_debug_info(&self) -> bool
    {
        self.sections.has_debug_info()
    }

    /// Look a function symbol up by raw or demangled name.
    pub fn find_symbol(&self, name: &str) -> Option<&FunctionSymbol>
    {
        find_function_symbol(&self.symbols, name, self.format == BinaryFormat::MachO)
    }

    /// The image's DWARF, loaded on first call.
    ///
    /// ## Errors
    ///
    /// [`SigminerError::DwarfUnavailable`] if there is no `.debug_info` or
    /// gimli rejects the sections.
    pub fn dwarf(&self) -> Result<&OwnedDwarf>
    {
        self.dwarf_cache.get_or_try_init(|| {
            if !self.sections.has_debug_info() {
                return Err(self.dwarf_unavailable("no .debug_info section"));
            }
            self.sections
                .load_dwarf()
                .map_err(|err| self.dwarf_unavailable(&format!("failed to load DWARF: {err}")))
        })
    }

    /// Canonical signature of `symbol`, folded into a [`SignatureResult`].
    pub fn signature(&self, symbol: &str, policy: UnknownTypePolicy) -> SignatureResult
    {
        self.try_signature(symbol, policy).into()
    }

    /// Canonical signature of `symbol`.
    ///
    /// DWARF availability is checked before the symbol is looked up, so a
    /// stripped binary reports [`SigminerError::DwarfUnavailable`] for any
    /// name.
    ///
    /// ## Errors
    ///
    /// Any [`SigminerError`] except `FileOpen` and `ObjectParse`.
    pub fn try_signature(&self, symbol: &str, policy: UnknownTypePolicy) -> Result<Signature>
    {
        let dwarf = self.dwarf()?;
        let graph = DebugGraph::new(dwarf)?;
        if graph.unit_count() == 0 {
            return Err(self.dwarf_unavailable("no compilation units"));
        }

        let function = self
            .find_symbol(symbol)
            .ok_or_else(|| SigminerError::SymbolNotFound(symbol.to_string()))?;
        debug!(symbol, address = %function.address(), "resolved symbol");

        let die = locate_subprogram(&graph, function)?;
        let signature = SignatureBuilder::new(&graph).try_build(Some(die))?;
        policy.enforce(signature)
    }

    /// File, line and column of the code at `address`, if the line table knows.
    pub fn source_location(&self, address: Address) -> Option<SourceLocation>
    {
        let context = match self.line_context() {
            Ok(context) => context,
            Err(err) => {
                debug!(%err, "no line information");
                return None;
            }
        };

        match context.find_location(address.value()) {
            Ok(Some(location)) => location.file.map(|file| SourceLocation {
                file: file.to_string(),
                line: location.line,
                column: location.column,
            }),
            Ok(None) => None,
            Err(err) => {
                debug!(%address, %err, "line table lookup failed");
                None
            }
        }
    }

    fn line_context(&self) -> Result<&Context<OwnedReader>>
    {
        self.context_cache.get_or_try_init(|| {
            // addr2line takes ownership of its own gimli context.
            self.dwarf()?;
            let dwarf = self
                .sections
                .load_dwarf()
                .map_err(|err| self.dwarf_unavailable(&format!("failed to load DWARF: {err}")))?;
            Context::from_dwarf(dwarf)
                .map_err(|err| self.dwarf_unavailable(&format!("failed to build addr2line context: {err}")))
        })
    }

    fn dwarf_unavailable(&self, reason: &str) -> SigminerError
    {
        SigminerError::DwarfUnavailable {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
