use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{EnumDef, Error};

/// A data type stored in a [`TypeArchive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataType {
    Enum(EnumDef),
    /// An alias for another type. Only carried so that archives can hold something other than
    /// enums; it cannot take part in a merge.
    Typedef { name: String, target: String },
}

impl DataType {
    pub fn name(&self) -> &str {
        match self {
            DataType::Enum(def) => def.name(),
            DataType::Typedef { name, .. } => name,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDef> {
        match self {
            DataType::Enum(def) => Some(def),
            DataType::Typedef { .. } => None,
        }
    }
}

/// What [`TypeArchive::add`] does when a type with the same name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictHandler {
    /// Replace the existing type, keeping its position in the archive.
    #[default]
    Replace,
    /// Fail with [`Error::DuplicateTypeName`].
    Reject,
}

/// A flat, named collection of data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeArchive {
    pub name: String,
    /// Identifies the archive as the source of types committed to it.
    pub id: Uuid,
    #[serde(default)]
    types: Vec<DataType>,
}

impl TypeArchive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Uuid::new_v4(),
            types: vec![],
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        debug!(?path, "Loading type archive");
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read type archive at {path:?}"))?;
        let archive: TypeArchive = serde_json::from_str(&text)
            .with_context(|| format!("cannot parse type archive at {path:?}"))?;
        archive.check_unique_names()?;
        debug!("{} types loaded from {}", archive.types.len(), archive.name);
        Ok(archive)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        debug!(?path, "Saving type archive");
        let text = serde_json::to_string_pretty(self).context("cannot serialize type archive")?;
        fs::write(path, text).with_context(|| format!("cannot write type archive to {path:?}"))
    }

    fn check_unique_names(&self) -> Result<(), Error> {
        for (i, data_type) in self.types.iter().enumerate() {
            if self.types[..i]
                .iter()
                .any(|other| other.name() == data_type.name())
            {
                return Err(Error::DuplicateTypeName(data_type.name().to_owned()));
            }
        }
        Ok(())
    }

    pub fn types(&self) -> &[DataType] {
        &self.types
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDef> {
        self.types.iter().filter_map(DataType::as_enum)
    }

    pub fn get(&self, name: &str) -> Option<&DataType> {
        self.types.iter().find(|data_type| data_type.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn add(&mut self, data_type: DataType, handler: ConflictHandler) -> Result<&DataType, Error> {
        if let DataType::Enum(def) = &data_type {
            if let Err(error) = def.validate() {
                warn!("Adding enum that does not pass validation: {error}");
            }
        }

        let existing = self
            .types
            .iter()
            .position(|other| other.name() == data_type.name());
        let index = match (existing, handler) {
            (Some(_), ConflictHandler::Reject) => {
                return Err(Error::DuplicateTypeName(data_type.name().to_owned()))
            }
            (Some(index), ConflictHandler::Replace) => {
                debug!("Replacing existing type {}", data_type.name());
                self.types[index] = data_type;
                index
            }
            (None, _) => {
                self.types.push(data_type);
                self.types.len() - 1
            }
        };
        Ok(&self.types[index])
    }

    /// Resolves selected type names to snapshots of the enums they refer to, in selection order.
    ///
    /// A selection is only mergeable if it has at least two items and every item is an enum.
    pub fn resolve_selection<S>(&self, selection: &[S]) -> Result<Vec<EnumDef>, Error>
    where
        S: AsRef<str>,
    {
        if selection.len() < 2 {
            return Err(Error::SelectionTooSmall(selection.len()));
        }
        selection
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let data_type = self
                    .get(name)
                    .ok_or_else(|| Error::UnknownType(name.to_owned()))?;
                data_type
                    .as_enum()
                    .cloned()
                    .ok_or_else(|| Error::NotAnEnum(name.to_owned()))
            })
            .collect()
    }
}
