#![warn(clippy::pedantic)]
//! Name resolution for MiniProb documents.
//!
//! - [`computation`] - per-document export lists
//! - [`index`] - the workspace-wide export index
//! - [`cache`] - per-document scope tiers with explicit invalidation
//! - [`provider`] - candidate scopes per reference site
//! - [`linker`] - binds `Lval` and `FuncCall` references
//!
//! A build indexes every document first and links afterwards, so imports
//! see the exports of documents that were rebuilt in the same pass.

pub mod cache;
pub mod computation;
pub mod description;
pub mod errors;
pub mod index;
pub mod linker;
pub mod provider;
pub mod scope;
