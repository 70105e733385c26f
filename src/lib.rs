//! Configuration compiler for IS31FL3731 LED-matrix displays
//!
//! A build document lists display instances. Each one is validated against
//! the schema of its platform variant and turned into the ordered driver
//! initialization steps, which can be rendered as C++ statements.

pub mod constants;
pub mod document;
pub mod emit;
pub mod helpers;
pub mod pipeline;
pub mod schema;
pub mod validate;
pub mod variant;
