pub mod actions;
pub mod deduce;
pub mod error;
pub mod merge;
pub mod project;
pub mod report;
pub mod scope;
pub mod validators;
pub mod wasm;
