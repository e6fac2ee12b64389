//! Public outcome of a signature query.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::signature::Signature;

/// Outcome code of a signature query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReturnCode
{
    Success,
    /// Empty path or symbol name.
    InvalidInput,
    /// The binary could not be read or is not a recognised object file.
    FileOpenFailure,
    /// The symbol name is not defined in the binary.
    SymbolResolutionFailure,
    /// The binary carries no usable DWARF.
    DwarfUnavailable,
    /// The symbol resolved to an address no subprogram entry covers.
    FunctionDieNotInRange,
    /// A slot classified as unknown under the strict policy.
    UnsupportedType,
    InternalFailure,
}

impl ReturnCode
{
    /// Stable upper-case name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            ReturnCode::Success => "SUCCESS",
            ReturnCode::InvalidInput => "INVALID_INPUT",
            ReturnCode::FileOpenFailure => "FILE_OPEN_FAILURE",
            ReturnCode::SymbolResolutionFailure => "SYMBOL_RESOLUTION_FAILURE",
            ReturnCode::DwarfUnavailable => "DWARF_UNAVAILABLE",
            ReturnCode::FunctionDieNotInRange => "FUNCTION_DIE_NOT_IN_RANGE",
            ReturnCode::UnsupportedType => "UNSUPPORTED_TYPE",
            ReturnCode::InternalFailure => "INTERNAL_FAILURE",
        }
    }
}

impl fmt::Display for ReturnCode
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

/// A signature or the reason there is none.
///
/// The signature is present if and only if the code is
/// [`ReturnCode::Success`]. The two constructors are the only way to build a
/// value, so the pairing cannot drift.
///
/// ## Example
///
/// ```rust
/// use sigminer_core::types::{ReturnCode, Signature, SignatureResult, TypeEntry};
///
/// let ok = SignatureResult::success(Signature::new(TypeEntry::void(), Vec::new(), false));
/// assert_eq!(ok.ret_code(), ReturnCode::Success);
/// assert!(ok.signature().is_some());
///
/// let failed = SignatureResult::failure(ReturnCode::SymbolResolutionFailure);
/// assert!(failed.signature().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SignatureResult
{
    #[cfg_attr(feature = "serde", serde(rename = "signature"))]
    sig: Option<Signature>,
    ret_code: ReturnCode,
}

impl SignatureResult
{
    #[must_use]
    pub fn success(sig: Signature) -> Self
    {
        Self {
            sig: Some(sig),
            ret_code: ReturnCode::Success,
        }
    }

    /// A failed query. Passing `Success` here has no signature to carry, so
    /// it is recorded as an internal failure.
    #[must_use]
    pub fn failure(code: ReturnCode) -> Self
    {
        let ret_code = match code {
            ReturnCode::Success => ReturnCode::InternalFailure,
            other => other,
        };
        Self { sig: None, ret_code }
    }

    #[must_use]
    pub fn ret_code(&self) -> ReturnCode
    {
        self.ret_code
    }

    #[must_use]
    pub fn signature(&self) -> Option<&Signature>
    {
        self.sig.as_ref()
    }

    #[must_use]
    pub fn into_signature(self) -> Option<Signature>
    {
        self.sig
    }

    #[must_use]
    pub fn is_success(&self) -> bool
    {
        self.ret_code == ReturnCode::Success
    }
}
