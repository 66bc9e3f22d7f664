#![warn(clippy::pedantic)]
pub mod arena;
pub mod builder;
pub mod document;
pub(crate) mod enums_impl;
pub mod errors;
pub mod nodes;
pub(crate) mod nodes_impl;
pub mod reference;
