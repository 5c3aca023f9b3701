//! Collection of generic internal data types that are used widely.

#[macro_use]
mod macros;

pub mod block;
pub mod buf;
pub mod errors;
pub mod serde_helpers;

pub use block::BlockInfo;
pub use buf::Buf32;
pub use errors::ParseError;
