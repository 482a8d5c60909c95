//! Core types for Swiftbox

mod container;
mod credentials;
mod object;

pub use container::*;
pub use credentials::*;
pub use object::*;
