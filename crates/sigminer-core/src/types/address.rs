//! Virtual address type.

use std::fmt;
use std::ops::Add;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Link-time virtual address inside a binary image.
///
/// Symbol table values and DWARF `DW_AT_low_pc`/`DW_AT_high_pc` live in the
/// same address space for an unrelocated shared object, so no slide is
/// applied anywhere in this crate.
///
/// ## Example
///
/// ```rust
/// use sigminer_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// assert_eq!((addr + 0x10).value(), 0x1010);
/// assert_eq!(addr.to_string(), "0x0000000000001000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Address(u64);

impl Address
{
    pub const ZERO: Self = Address(0);

    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Whether this address lies in the half-open range `[begin, end)`.
    pub const fn within(self, begin: u64, end: u64) -> bool
    {
        self.0 >= begin && self.0 < end
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}
