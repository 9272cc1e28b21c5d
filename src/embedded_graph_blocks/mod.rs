pub(crate) mod builder;
pub mod crossings;
pub mod face;
pub(crate) mod structures;
pub(crate) mod validate;
