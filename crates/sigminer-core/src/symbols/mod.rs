//! # Symbols
//!
//! Everything between a path on disk and a function's DWARF entry:
//!
//! - [`sections`]: copies the DWARF sections out of the container
//! - [`image`]: [`BinaryImage`], the loaded binary
//! - [`graph`]: [`DebugGraph`], a read-only view over every unit
//! - [`resolver`]: symbol name → address → `DW_TAG_subprogram`
//! - [`demangle`]: symbol name presentation and matching

use gimli::{Dwarf, EndianArcSlice, RunTimeEndian};

pub mod demangle;
pub mod graph;
pub mod image;
pub mod resolver;
pub mod sections;

pub use graph::{DebugGraph, DieRef};
pub use image::BinaryImage;
pub use resolver::FunctionSymbol;
pub use sections::DebugSections;

/// Reader over section data shared through an `Arc`.
pub type OwnedReader = EndianArcSlice<RunTimeEndian>;
/// DWARF context whose sections are owned by the [`BinaryImage`].
pub type OwnedDwarf = Dwarf<OwnedReader>;
