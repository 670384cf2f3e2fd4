use bitflags::bitflags;
use enumkit_types::EnumDef;

use crate::{writer::ListingWriter, Error};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ListingFlags: u8 {
        /// Print values in hexadecimal, zero-padded to the enum's width.
        const HEX = 0x1;
        /// Print entry comments after each entry.
        const COMMENTS = 0x2;
        /// Print the archive a type was committed to, if any.
        const SOURCE = 0x4;
    }
}

/// Comments are on by default: they are where a merge records renamed entries.
impl Default for ListingFlags {
    fn default() -> Self {
        ListingFlags::COMMENTS
    }
}

/// A single enum to be rendered as a C-style listing.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    pub def: &'a EnumDef,
    pub flags: ListingFlags,
}

impl<'a> Listing<'a> {
    pub fn new(def: &'a EnumDef) -> Self {
        Self {
            def,
            flags: ListingFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: ListingFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn render(&self) -> Result<String, Error> {
        let mut writer = ListingWriter::new(String::new(), self.flags);
        writer.write_enum(self.def)?;
        Ok(writer.into_inner())
    }
}
