//! Creating a merged enum from a selection of existing ones.
//!
//! The merge itself does not know where enums come from or where the result goes. Those concerns
//! belong to an [`EnumHost`], which validates the selection, asks the user for a name, and stores
//! the result.

use tracing::{debug, info};

use crate::{merge, ConflictHandler, DataType, EnumDef, Error, TypeArchive};

pub trait EnumHost {
    /// Refers to the committed enum after [`EnumHost::commit`].
    type Handle;

    /// Turns the user's selection into enum snapshots, in the order they should be merged.
    fn validate_selection(&self, selection: &[String]) -> Result<Vec<EnumDef>, Error>;

    /// Asks for a name that is not empty and not yet used by the destination. `None` means the
    /// user cancelled.
    fn prompt_for_unique_name(&mut self) -> Result<Option<String>, Error>;

    fn commit(&mut self, merged: EnumDef) -> Result<Self::Handle, Error>;
}

/// Merges the selected enums into a new one and commits it to the host.
///
/// Returns `Ok(None)` if the user cancelled naming the new enum, in which case nothing is
/// committed.
pub fn create_enum_from_selection<H>(
    host: &mut H,
    selection: &[String],
) -> Result<Option<H::Handle>, Error>
where
    H: EnumHost,
{
    let sources = host.validate_selection(selection)?;

    let Some(name) = host.prompt_for_unique_name()? else {
        debug!("Naming the new enum was cancelled");
        return Ok(None);
    };

    let merged = merge(&name, &sources)?;
    info!(
        "Merged {} enums into {} ({} entries, {} byte(s))",
        sources.len(),
        merged.name(),
        merged.len(),
        merged.width()
    );
    host.commit(merged).map(Some)
}

/// Something that can ask the user a question and read back a line of text.
pub trait NamePrompt {
    /// Returns `None` if the user cancelled.
    fn ask(&mut self, title: &str, message: &str) -> Option<String>;
}

impl<P> NamePrompt for &mut P
where
    P: NamePrompt + ?Sized,
{
    fn ask(&mut self, title: &str, message: &str) -> Option<String> {
        (**self).ask(title, message)
    }
}

pub const NAME_TITLE: &str = "Name new ENUM";
pub const NAME_MESSAGE: &str = "Please enter a name for the new ENUM: ";
pub const DUPLICATE_NAME_TITLE: &str = "Duplicate ENUM Name";
pub const DUPLICATE_NAME_MESSAGE: &str = "Please enter a unique name for the new ENUM: ";

/// Keeps asking until the answer is non-empty and `exists` returns false for it.
pub fn prompt_unique_name(
    prompt: &mut impl NamePrompt,
    exists: impl Fn(&str) -> bool,
) -> Option<String> {
    let mut name = ask_non_empty(prompt, NAME_TITLE, NAME_MESSAGE)?;
    while exists(&name) {
        debug!("A type named {name:?} already exists");
        name = ask_non_empty(prompt, DUPLICATE_NAME_TITLE, DUPLICATE_NAME_MESSAGE)?;
    }
    Some(name)
}

fn ask_non_empty(prompt: &mut impl NamePrompt, title: &str, message: &str) -> Option<String> {
    loop {
        let answer = prompt.ask(title, message)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Some(answer.to_owned());
        }
    }
}

/// Answers the first question with a fixed name and cancels every question after that.
///
/// Useful when the name comes from somewhere that cannot be asked again, such as a command line
/// flag.
#[derive(Debug, Clone)]
pub struct FixedPrompt(Option<String>);

impl FixedPrompt {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }
}

impl NamePrompt for FixedPrompt {
    fn ask(&mut self, _title: &str, _message: &str) -> Option<String> {
        self.0.take()
    }
}

/// Host that merges enums from a [`TypeArchive`] and commits the result back into it.
pub struct ArchiveHost<'a, P> {
    archive: &'a mut TypeArchive,
    prompt: P,
}

impl<'a, P> ArchiveHost<'a, P>
where
    P: NamePrompt,
{
    pub fn new(archive: &'a mut TypeArchive, prompt: P) -> Self {
        Self { archive, prompt }
    }
}

impl<'a, P> EnumHost for ArchiveHost<'a, P>
where
    P: NamePrompt,
{
    /// Name of the committed type.
    type Handle = String;

    fn validate_selection(&self, selection: &[String]) -> Result<Vec<EnumDef>, Error> {
        self.archive.resolve_selection(selection)
    }

    fn prompt_for_unique_name(&mut self) -> Result<Option<String>, Error> {
        let archive = &*self.archive;
        Ok(prompt_unique_name(&mut self.prompt, |name| {
            archive.contains(name)
        }))
    }

    fn commit(&mut self, mut merged: EnumDef) -> Result<String, Error> {
        merged.set_source_archive(Some(self.archive.id));
        let name = self
            .archive
            .add(DataType::Enum(merged), ConflictHandler::Replace)?
            .name()
            .to_owned();
        debug!("Committed {name} to {}", self.archive.name);
        Ok(name)
    }
}
