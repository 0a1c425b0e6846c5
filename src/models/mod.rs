//! Foreman API model types.

mod base;
mod domain;
mod host;
mod puppet_class;

pub use base::*;
pub use domain::*;
pub use host::*;
pub use puppet_class::*;
