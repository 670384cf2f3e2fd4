use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Storage sizes an enum may have, in bytes.
pub const VALID_WIDTHS: [u32; 4] = [1, 2, 4, 8];

pub fn is_valid_width(width: u32) -> bool {
    VALID_WIDTHS.contains(&width)
}

/// Returns the smallest valid width that can hold `value`.
///
/// A width of `n` bytes is considered to hold both the signed and the unsigned interpretation of
/// its bit pattern, so the accepted range is `-(2^(8n-1)) ..= 2^(8n) - 1`. `0xFF` therefore fits in
/// a single byte, and so does `-128`.
pub fn natural_width(value: i64) -> u32 {
    VALID_WIDTHS
        .into_iter()
        .find(|&width| fits_width(value, width))
        .unwrap_or(8)
}

/// Whether `value` can be stored in an enum of the given width.
pub fn fits_width(value: i64, width: u32) -> bool {
    if width >= 8 {
        return true;
    }
    if width == 0 {
        return false;
    }
    let bits = width * 8;
    let min = -(1_i64 << (bits - 1));
    let max = (1_i64 << bits) - 1;
    (min..=max).contains(&value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub name: String,
    pub value: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// An enumeration data type: a named, fixed-width list of uniquely named integer values.
///
/// Entries keep the order they were added in. Values may repeat; names may not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawEnumDef", into = "RawEnumDef")]
pub struct EnumDef {
    name: String,
    /// Size of the type in bytes. Sources may carry a placeholder of `0`.
    width: u32,
    entries: Vec<EnumEntry>,
    /// Maps entry names to their position in `entries`.
    index: HashMap<String, usize>,
    /// Archive the type was defined in, if it has been committed to one.
    source_archive: Option<Uuid>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
            entries: vec![],
            index: HashMap::new(),
            source_archive: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn source_archive(&self) -> Option<Uuid> {
        self.source_archive
    }

    pub fn set_source_archive(&mut self, archive: Option<Uuid>) {
        self.source_archive = archive;
    }

    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&EnumEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn value(&self, name: &str) -> Option<i64> {
        self.get(name).map(|entry| entry.value)
    }

    /// Appends an entry. Fails if the name is empty or an entry with the same name already exists.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        value: i64,
        comment: impl Into<String>,
    ) -> Result<(), Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyEntryName {
                enum_name: self.name.clone(),
            });
        }
        if self.index.contains_key(&name) {
            return Err(Error::DuplicateEntryName {
                enum_name: self.name.clone(),
                entry_name: name,
            });
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(EnumEntry {
            name,
            value,
            comment: comment.into(),
        });
        Ok(())
    }

    /// Builder-style variant of [`EnumDef::add`] without a comment.
    pub fn with(mut self, name: impl Into<String>, value: i64) -> Result<Self, Error> {
        self.add(name, value, "")?;
        Ok(self)
    }

    /// Checks the invariants that [`EnumDef::add`] does not enforce: the width must be one of
    /// [`VALID_WIDTHS`], and every value must fit in it.
    pub fn validate(&self) -> Result<(), Error> {
        if !is_valid_width(self.width) {
            return Err(Error::InvalidWidth {
                enum_name: self.name.clone(),
                width: self.width,
            });
        }
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| natural_width(entry.value) > self.width)
        {
            return Err(Error::ValueOutOfRange {
                enum_name: self.name.clone(),
                entry_name: entry.name.clone(),
                value: entry.value,
                width: self.width,
            });
        }
        Ok(())
    }
}

impl PartialEq for EnumDef {
    fn eq(&self, other: &Self) -> bool {
        // `index` is derived from `entries`.
        self.name == other.name
            && self.width == other.width
            && self.entries == other.entries
            && self.source_archive == other.source_archive
    }
}

impl Eq for EnumDef {}

/// On-disk shape of [`EnumDef`]. Deserialization replays the entries through [`EnumDef::add`] so
/// that the name index is rebuilt and duplicate names are rejected.
#[derive(Serialize, Deserialize)]
struct RawEnumDef {
    name: String,
    width: u32,
    #[serde(default)]
    entries: Vec<EnumEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_archive: Option<Uuid>,
}

impl TryFrom<RawEnumDef> for EnumDef {
    type Error = Error;

    fn try_from(raw: RawEnumDef) -> Result<Self, Self::Error> {
        let mut def = EnumDef::new(raw.name, raw.width);
        def.source_archive = raw.source_archive;
        for entry in raw.entries {
            def.add(entry.name, entry.value, entry.comment)?;
        }
        Ok(def)
    }
}

impl From<EnumDef> for RawEnumDef {
    fn from(def: EnumDef) -> Self {
        Self {
            name: def.name,
            width: def.width,
            entries: def.entries,
            source_archive: def.source_archive,
        }
    }
}
