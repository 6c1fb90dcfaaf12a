//! Data types for the stylesheet model.

mod color;
mod descriptor;
mod format;
mod style;

pub use color::*;
pub use descriptor::*;
pub use format::*;
pub use style::*;
