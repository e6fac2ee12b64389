//! Canonical type and signature model.
//!
//! Every DWARF type shape a compiler can emit is collapsed into the small
//! taxonomy in [`PrimitiveKind`]. Callers can branch exhaustively on it without
//! knowing anything about the debug format the entry came from.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Canonical kind of a single type slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PrimitiveKind
{
    /// No value (a function without a return type, or `const void`).
    Void,
    /// Boolean (`DW_ATE_boolean`).
    Bool,
    /// Integer of either signedness, including character types.
    Int,
    /// Floating point, real or complex.
    Float,
    /// Pointer or reference. The pointee is not modelled.
    Pointer,
    /// Enumeration.
    Enum,
    /// Structure, union, class or array. Member layout is not modelled.
    Aggregate,
    /// Anything that could not be classified.
    Unknown,
}

impl fmt::Display for PrimitiveKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Pointer => "pointer",
            PrimitiveKind::Enum => "enum",
            PrimitiveKind::Aggregate => "aggregate",
            PrimitiveKind::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Debug-format-agnostic description of one type.
///
/// `signed` is only ever `true` for [`PrimitiveKind::Int`] and
/// [`PrimitiveKind::Enum`]; the constructors enforce this so a caller never
/// sees a "signed pointer".
///
/// ## Example
///
/// ```rust
/// use sigminer_core::types::{PrimitiveKind, TypeEntry};
///
/// let int = TypeEntry::int(4, true);
/// assert_eq!(int.kind(), PrimitiveKind::Int);
/// assert_eq!(int.size(), 4);
/// assert!(int.is_signed());
///
/// let ptr = TypeEntry::new(PrimitiveKind::Pointer, 8);
/// assert!(!ptr.is_signed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TypeEntry
{
    kind: PrimitiveKind,
    size: usize,
    signed: bool,
}

impl TypeEntry
{
    /// An unsigned entry of the given kind and byte size.
    #[must_use]
    pub const fn new(kind: PrimitiveKind, size: usize) -> Self
    {
        Self {
            kind,
            size,
            signed: false,
        }
    }

    /// `void`, size zero.
    #[must_use]
    pub const fn void() -> Self
    {
        Self::new(PrimitiveKind::Void, 0)
    }

    /// An unclassifiable slot, size zero.
    #[must_use]
    pub const fn unknown() -> Self
    {
        Self::new(PrimitiveKind::Unknown, 0)
    }

    #[must_use]
    pub const fn int(size: usize, signed: bool) -> Self
    {
        Self {
            kind: PrimitiveKind::Int,
            size,
            signed,
        }
    }

    /// An enumeration whose underlying integer has the given signedness.
    #[must_use]
    pub const fn enumeration(size: usize, signed: bool) -> Self
    {
        Self {
            kind: PrimitiveKind::Enum,
            size,
            signed,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind
    {
        self.kind
    }

    /// Size in bytes. Zero for `void` or when the size is not known.
    #[must_use]
    pub const fn size(&self) -> usize
    {
        self.size
    }

    #[must_use]
    pub const fn is_signed(&self) -> bool
    {
        self.signed
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool
    {
        self.kind == PrimitiveKind::Unknown
    }
}

impl Default for TypeEntry
{
    fn default() -> Self
    {
        Self::unknown()
    }
}

impl fmt::Display for TypeEntry
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.kind {
            PrimitiveKind::Void | PrimitiveKind::Unknown => write!(f, "{}", self.kind),
            PrimitiveKind::Int | PrimitiveKind::Float => {
                let prefix = match self.kind {
                    PrimitiveKind::Float => 'f',
                    _ if self.signed => 'i',
                    _ => 'u',
                };
                match self.size.checked_mul(8) {
                    Some(bits) => write!(f, "{prefix}{bits}"),
                    // Too wide to count in bits; show the byte size instead.
                    None => write!(f, "{prefix}[{} bytes]", self.size),
                }
            }
            _ => write!(f, "{}({})", self.kind, self.size),
        }
    }
}

/// Full call shape of one function.
///
/// Built once per query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Signature
{
    ret: TypeEntry,
    params: Vec<TypeEntry>,
    has_var_args: bool,
}

impl Signature
{
    #[must_use]
    pub fn new(ret: TypeEntry, params: Vec<TypeEntry>, has_var_args: bool) -> Self
    {
        Self {
            ret,
            params,
            has_var_args,
        }
    }

    /// Return type (`void` when the function declares none).
    #[must_use]
    pub fn ret(&self) -> TypeEntry
    {
        self.ret
    }

    /// Formal parameters in declaration (argument) order.
    #[must_use]
    pub fn params(&self) -> &[TypeEntry]
    {
        &self.params
    }

    /// Whether the function accepts untyped arguments after `params`.
    #[must_use]
    pub fn has_var_args(&self) -> bool
    {
        self.has_var_args
    }

    /// Return type followed by each parameter.
    pub fn slots(&self) -> impl Iterator<Item = &TypeEntry>
    {
        std::iter::once(&self.ret).chain(self.params.iter())
    }

    /// True if any slot could not be classified.
    #[must_use]
    pub fn has_unknown_slots(&self) -> bool
    {
        self.slots().any(TypeEntry::is_unknown)
    }
}

impl fmt::Display for Signature
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "fn(")?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        if self.has_var_args {
            if self.params.is_empty() {
                write!(f, "...")?;
            } else {
                write!(f, ", ...")?;
            }
        }
        write!(f, ") -> {}", self.ret)
    }
}
