// The binary entry point is main.rs; the library target exists so
// integration tests can import types via `linedrill::parser::*` /
// `linedrill::learning::*`.

pub mod config;
pub mod error;
pub mod hash;
pub mod learning;
pub mod parser;
pub mod store;
pub mod usecases;
