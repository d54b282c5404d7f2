//! Grammar productions turning tokens into IR.
//!
//! Each production reads from a [`TokenStream`] and returns a
//! [`PResult`]: the construct, [`Failure::NoMatch`](crate::error::Failure)
//! when the input does not start with it, or a fatal diagnostic.

mod common;
mod trigger;
mod unit;

use apexdoc_core::ir::IrNode;

use crate::{dispatch::Grammar, error::PResult, stream::TokenStream};

/// Run the top-level production of `grammar`.
pub(crate) fn parse(grammar: Grammar, stream: &mut TokenStream) -> PResult<Vec<IrNode>> {
    match grammar {
        Grammar::Unit => unit::parse(stream),
        Grammar::Trigger => trigger::parse(stream),
    }
}
