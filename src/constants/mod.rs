pub mod defaults;
pub mod driver;
pub mod envvars;
pub mod keys;
