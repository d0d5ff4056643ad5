//! Configuration loader and schema types.
//!
//! Settings are assembled once at startup from defaults, an optional TOML
//! file, `TUNESORT__*` environment variables and command-line overrides, in
//! that order.

mod load;
mod schema;

pub use load::*;
pub use schema::*;
