//! End-to-end tests for the MiniProb front-end.
//!
//! Programs are assembled with the AST builder and run through the full
//! index, link and validate pipeline.


mod inference;
mod linking;
mod validation;
mod workspace;
