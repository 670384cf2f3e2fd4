use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("enum {enum_name:?} cannot have an entry with an empty name")]
    EmptyEntryName { enum_name: String },
    #[error("enum {enum_name:?} already has an entry named {entry_name:?}")]
    DuplicateEntryName {
        enum_name: String,
        entry_name: String,
    },
    #[error("enum {enum_name:?} has invalid width {width} (must be 1, 2, 4, or 8 bytes)")]
    InvalidWidth { enum_name: String, width: u32 },
    #[error("value {value} of entry {entry_name:?} in enum {enum_name:?} does not fit in {width} byte(s)")]
    ValueOutOfRange {
        enum_name: String,
        entry_name: String,
        value: i64,
        width: u32,
    },
    #[error("could not find a free name for entry {entry_name:?} while merging into enum {enum_name:?}")]
    DeconflictionExhausted {
        enum_name: String,
        entry_name: String,
    },

    #[error("at least two enums must be selected, but the selection contains {0} item(s)")]
    SelectionTooSmall(usize),
    #[error("no data type named {0:?}")]
    UnknownType(String),
    #[error("data type {0:?} is not an enum")]
    NotAnEnum(String),
    #[error("a data type named {0:?} already exists")]
    DuplicateTypeName(String),
}
