//! Apexdoc Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Apexdoc parser,
//! facade, and command-line tool. It includes:
//!
//! - **Positions**: Source locations and spans ([`position`] module)
//! - **Diagnostics**: Error codes, severities and rich messages ([`error`] module)
//! - **IR**: The intermediate representation of parsed units ([`ir`] module)
//! - **Registry**: A cross-file store of parsed units ([`registry::Registry`])

pub mod error;
pub mod ir;
pub mod position;
pub mod registry;

pub use position::{Position, Span};
