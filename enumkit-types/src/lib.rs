mod archive;
mod enums;
mod error;
pub mod host;
mod merge;

pub use archive::*;
pub use enums::*;
pub use error::*;
pub use merge::*;
