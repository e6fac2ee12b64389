//! # Error Types
//!
//! Internal error handling for signature queries.
//!
//! Everything below the public query boundary returns [`Result<T>`] and
//! propagates with `?`. At the boundary, [`SigminerError::return_code`]
//! collapses the error into the [`ReturnCode`] carried by a
//! [`SignatureResult`](crate::types::SignatureResult).

use std::path::PathBuf;

use thiserror::Error;

use tracing::debug;

use crate::types::{Address, ReturnCode, Signature, SignatureResult};

/// Main error type for loading binaries and building signatures
///
/// ## Error Categories
///
/// 1. **Input errors**: InvalidInput
/// 2. **Container errors**: FileOpen, ObjectParse
/// 3. **Debug info errors**: DwarfUnavailable, Dwarf
/// 4. **Lookup errors**: SymbolNotFound, FunctionNotInRange
/// 5. **Policy errors**: UnsupportedType
/// 6. **Everything else**: Internal
#[derive(Error, Debug)]
pub enum SigminerError
{
    /// The caller passed an empty path or symbol name.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The binary could not be read from disk.
    #[error("Failed to open {}: {source}", path.display())]
    FileOpen
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not an object file `object` understands.
    #[error("Failed to parse {}: {reason}", path.display())]
    ObjectParse
    {
        path: PathBuf,
        reason: String,
    },

    /// The binary has no `.debug_info`, or it could not be loaded.
    ///
    /// This is what a binary run through `strip --strip-debug` reports.
    #[error("No usable DWARF in {}: {reason}", path.display())]
    DwarfUnavailable
    {
        path: PathBuf,
        reason: String,
    },

    /// A gimli error while walking units that were expected to be readable.
    #[error("DWARF error while {context}: {source}")]
    Dwarf
    {
        context: String,
        #[source]
        source: gimli::Error,
    },

    /// No defined function symbol has this name.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol has an address, but no `DW_TAG_subprogram` covers it.
    #[error("No subprogram entry covers {symbol} at {address}")]
    FunctionNotInRange
    {
        symbol: String,
        address: Address,
    },

    /// A slot could not be classified and the strict policy is in force.
    #[error("Unsupported type in {slot}")]
    UnsupportedType
    {
        /// `"return"` or `"parameter N"`
        slot: String,
    },

    /// Anything that should not happen.
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl SigminerError
{
    /// Public return code for this error.
    #[must_use]
    pub fn return_code(&self) -> ReturnCode
    {
        match self {
            SigminerError::InvalidInput(_) => ReturnCode::InvalidInput,
            SigminerError::FileOpen { .. } | SigminerError::ObjectParse { .. } => ReturnCode::FileOpenFailure,
            SigminerError::DwarfUnavailable { .. } | SigminerError::Dwarf { .. } => ReturnCode::DwarfUnavailable,
            SigminerError::SymbolNotFound(_) => ReturnCode::SymbolResolutionFailure,
            SigminerError::FunctionNotInRange { .. } => ReturnCode::FunctionDieNotInRange,
            SigminerError::UnsupportedType { .. } => ReturnCode::UnsupportedType,
            SigminerError::Internal(_) => ReturnCode::InternalFailure,
        }
    }
}

impl From<Result<Signature>> for SignatureResult
{
    fn from(result: Result<Signature>) -> Self
    {
        match result {
            Ok(sig) => SignatureResult::success(sig),
            Err(err) => {
                debug!(%err, code = %err.return_code(), "signature query failed");
                SignatureResult::failure(err.return_code())
            }
        }
    }
}

/// Wrap a gimli error with what was being done when it happened.
pub(crate) fn map_dwarf_error(context: &str, err: gimli::Error) -> SigminerError
{
    SigminerError::Dwarf {
        context: context.to_string(),
        source: err,
    }
}

/// Convenience type alias for `Result<T, SigminerError>`
///
/// ```rust
/// use sigminer_core::error::Result;
/// fn foo() -> Result<()>
/// {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SigminerError>;
