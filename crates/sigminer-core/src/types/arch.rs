//! Target architecture of a binary image.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// CPU architecture a binary was compiled for.
///
/// Only used for reporting. Pointer sizes in signatures come from the
/// address size recorded in each DWARF unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Architecture
{
    /// 64-bit ARM
    Arm64,
    /// 64-bit x86
    X86_64,
    /// 32-bit ARM
    Arm,
    /// 32-bit x86
    X86,
    /// Anything else; the name comes from the object parser.
    Unknown(&'static str),
}

impl Architecture
{
    /// Size of a pointer in bytes for this architecture.
    #[must_use]
    pub const fn pointer_size_bytes(self) -> u8
    {
        match self {
            Architecture::Arm64 | Architecture::X86_64 | Architecture::Unknown(_) => 8,
            Architecture::Arm | Architecture::X86 => 4,
        }
    }
}

impl From<object::Architecture> for Architecture
{
    fn from(arch: object::Architecture) -> Self
    {
        match arch {
            object::Architecture::Aarch64 => Architecture::Arm64,
            object::Architecture::X86_64 => Architecture::X86_64,
            object::Architecture::Arm => Architecture::Arm,
            object::Architecture::I386 => Architecture::X86,
            _ => Architecture::Unknown("unknown"),
        }
    }
}

impl fmt::Display for Architecture
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Architecture::Arm64 => write!(f, "arm64"),
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Arm => write!(f, "arm"),
            Architecture::X86 => write!(f, "x86"),
            Architecture::Unknown(name) => write!(f, "{name}"),
        }
    }
}
