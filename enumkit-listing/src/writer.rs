use std::fmt::Write;

use enumkit_types::{DataType, EnumDef, EnumEntry, TypeArchive};

use crate::structure::ListingFlags;
use crate::Error;

const INDENT: &str = "    ";

#[derive(Debug, Clone)]
pub struct ListingWriter<W> {
    level: usize,
    flags: ListingFlags,
    writer: W,
}

impl<W> ListingWriter<W>
where
    W: Write,
{
    pub fn new(writer: W, flags: ListingFlags) -> Self {
        Self {
            level: 0,
            flags,
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn descend(&mut self) {
        self.level += 1;
    }

    pub fn ascend(&mut self) {
        self.level -= 1;
    }

    fn indent(&mut self) -> Result<(), Error> {
        for _ in 0..self.level {
            self.writer.write_str(INDENT)?;
        }
        Ok(())
    }

    pub fn write_enum(&mut self, def: &EnumDef) -> Result<(), Error> {
        if def.name().is_empty() {
            return Err(Error::Unnamed);
        }

        if self.flags.contains(ListingFlags::SOURCE) {
            if let Some(source) = def.source_archive() {
                self.indent()?;
                writeln!(self.writer, "// source archive {source}")?;
            }
        }

        self.indent()?;
        let unit = if def.width() == 1 { "byte" } else { "bytes" };
        writeln!(
            self.writer,
            "typedef enum {} {{ // {} {unit}",
            def.name(),
            def.width()
        )?;

        self.descend();
        let entries = def
            .entries()
            .iter()
            .try_for_each(|entry| self.write_entry(entry, def.width()));
        self.ascend();
        entries?;

        self.indent()?;
        writeln!(self.writer, "}} {};", def.name())?;
        Ok(())
    }

    fn write_entry(&mut self, entry: &EnumEntry, width: u32) -> Result<(), Error> {
        self.indent()?;
        write!(self.writer, "{} = ", entry.name)?;
        if self.flags.contains(ListingFlags::HEX) {
            // Negative values are shown as their two's complement bit pattern at the enum's width.
            let digits = width.clamp(1, 8) as usize * 2;
            let bits = digits * 4;
            let mask = if bits >= 64 {
                u64::MAX
            } else {
                (1u64 << bits) - 1
            };
            write!(self.writer, "0x{:0digits$X}", entry.value as u64 & mask)?;
        } else {
            write!(self.writer, "{}", entry.value)?;
        }
        self.writer.write_char(',')?;
        if self.flags.contains(ListingFlags::COMMENTS) && !entry.comment.is_empty() {
            write!(self.writer, " // {}", entry.comment)?;
        }
        self.writer.write_char('\n')?;
        Ok(())
    }

    pub fn write_typedef(&mut self, name: &str, target: &str) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::Unnamed);
        }
        self.indent()?;
        writeln!(self.writer, "typedef {target} {name};")?;
        Ok(())
    }

    /// Writes every type in the archive, separated by blank lines.
    pub fn write_archive(&mut self, archive: &TypeArchive) -> Result<(), Error> {
        self.indent()?;
        writeln!(self.writer, "// archive {} ({})", archive.name, archive.id)?;
        for data_type in archive.types() {
            self.writer.write_char('\n')?;
            match data_type {
                DataType::Enum(def) => self.write_enum(def)?,
                DataType::Typedef { name, target } => self.write_typedef(name, target)?,
            }
        }
        Ok(())
    }
}
