//! Read-only project graph model: types, path conventions, queries, and the
//! structural rules the validators delegate to.

pub mod paths;
pub mod queries;
pub mod rules;
pub mod types;
