//! DWARF section extraction.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use gimli::{Dwarf, EndianArcSlice, RunTimeEndian, SectionId};
use object::{Object, ObjectSection};

use super::{OwnedDwarf, OwnedReader};
use crate::error::{Result, SigminerError};

/// Canonical section name followed by the names it goes by in ELF and Mach-O.
const DWARF_SECTIONS: &[(&str, &[&str])] = &[
    (".debug_abbrev", &[".debug_abbrev", "__debug_abbrev"]),
    (".debug_addr", &[".debug_addr", "__debug_addr"]),
    (".debug_info", &[".debug_info", "__debug_info"]),
    (".debug_line", &[".debug_line", "__debug_line"]),
    (".debug_line_str", &[".debug_line_str", "__debug_line_str"]),
    (".debug_ranges", &[".debug_ranges", "__debug_ranges"]),
    (".debug_rnglists", &[".debug_rnglists", "__debug_rnglists"]),
    (".debug_str", &[".debug_str", "__debug_str"]),
    (".debug_str_offsets", &[".debug_str_offsets", "__debug_str_offs", "__debug_str_offsets"]),
    (".debug_types", &[".debug_types", "__debug_types"]),
    (".debug_loc", &[".debug_loc", "__debug_loc"]),
    (".debug_loclists", &[".debug_loclists", "__debug_loclists"]),
    (".debug_cu_index", &[".debug_cu_index"]),
    (".debug_tu_index", &[".debug_tu_index"]),
];

/// DWARF section bytes keyed by canonical name.
///
/// Buffers are `Arc<[u8]>`, so every reader handed to gimli is a cheap
/// clone and the resulting [`OwnedDwarf`] does not borrow the file.
#[derive(Clone)]
pub struct DebugSections
{
    endian: RunTimeEndian,
    sections: HashMap<&'static str, Arc<[u8]>>,
}

impl DebugSections
{
    /// Copy (and decompress, if needed) every DWARF section the file has.
    pub(crate) fn from_object(path: &Path, file: &object::File<'_>) -> Result<Self>
    {
        let endian = if file.is_little_endian() {
            RunTimeEndian::Little
        } else {
            RunTimeEndian::Big
        };

        let mut sections = HashMap::new();
        for (canonical, aliases) in DWARF_SECTIONS {
            if let Some(data) = load_section_bytes(path, file, aliases)? {
                sections.insert(*canonical, data);
            }
        }

        Ok(Self { endian, sections })
    }

    /// Build from already-extracted section contents.
    ///
    /// Names must be the canonical ELF names (`.debug_info`, ...). Empty
    /// buffers are dropped.
    pub fn from_raw<I>(endian: RunTimeEndian, raw: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Vec<u8>)>,
    {
        let sections = raw
            .into_iter()
            .filter(|(_, data)| !data.is_empty())
            .map(|(name, data)| (name, Arc::<[u8]>::from(data)))
            .collect();
        Self { endian, sections }
    }

    pub fn endian(&self) -> RunTimeEndian
    {
        self.endian
    }

    /// Whether there is any `.debug_info` content to parse.
    pub fn has_debug_info(&self) -> bool
    {
        self.sections.contains_key(".debug_info")
    }

    /// Build a gimli context over these sections.
    pub fn load_dwarf(&self) -> std::result::Result<OwnedDwarf, gimli::Error>
    {
        Dwarf::load(|section| Ok::<_, gimli::Error>(self.section_reader(section)))
    }

    fn section_reader(&self, id: SectionId) -> OwnedReader
    {
        let data = self
            .sections
            .get(id.name())
            .cloned()
            .unwrap_or_else(|| Arc::<[u8]>::from(Vec::new()));
        EndianArcSlice::new(data, self.endian)
    }
}

fn load_section_bytes(path: &Path, file: &object::File<'_>, names: &[&str]) -> Result<Option<Arc<[u8]>>>
{
    for name in names {
        if let Some(section) = file.section_by_name(name) {
            let data = section.uncompressed_data().map_err(|err| SigminerError::DwarfUnavailable {
                path: path.to_path_buf(),
                reason: format!("failed to read {name}: {err}"),
            })?;
            if data.is_empty() {
                return Ok(None);
            }
            return Ok(Some(match data {
                Cow::Borrowed(bytes) => Arc::<[u8]>::from(bytes),
                Cow::Owned(vec) => vec.into(),
            }));
        }
    }

    Ok(None)
}
