//! Grammar for `.trigger` files.

use apexdoc_core::ir::{IrKind, IrNode, Trigger, TriggerOperation, TriggerTiming};

use crate::{
    error::{Failure, PResult},
    grammar::common::{body, preamble},
    stream::TokenStream,
    tokens::TokenKind,
};

const CONTEXT: &str = "trigger";

/// Parse a `.trigger` file.
///
/// The trigger is parsed committed, so running out of input inside its
/// body is reported as unexpected end of input.
pub(crate) fn parse(stream: &mut TokenStream) -> PResult<Vec<IrNode>> {
    let first = stream.look_ahead()?;
    match trigger(stream) {
        Ok(trigger) => Ok(vec![IrNode::new(IrKind::Trigger(trigger))]),
        Err(Failure::NoMatch) => Err(stream.unrecognized(
            CONTEXT,
            &first,
            format!("Unable to identify structure at {first}"),
        )),
        Err(fatal) => Err(fatal),
    }
}

/// Parse `trigger Name on Object (timing operation, ...) { ... }`.
///
/// Repeating an event sets the same flag again.
pub(crate) fn trigger(stream: &mut TokenStream) -> PResult<Trigger> {
    let preamble = preamble(stream, CONTEXT)?;
    let keyword = stream.advance()?;
    if !keyword.is_text("trigger") {
        return Err(Failure::NoMatch);
    }

    let name = stream.advance()?;
    if !name.is(TokenKind::Word) {
        return Err(stream.malformed(
            CONTEXT,
            &name,
            "Unable to identify structure on trigger. Expected trigger name",
        ));
    }
    let on = stream.advance()?;
    if !on.is_text("on") {
        return Err(stream.malformed(
            CONTEXT,
            &on,
            "Unable to identify structure on trigger. Expected `on`",
        ));
    }
    let object = stream.advance()?;
    if !object.is(TokenKind::Word) {
        return Err(stream.malformed(
            CONTEXT,
            &object,
            "Unable to identify structure on trigger. Expected object name",
        ));
    }
    let open = stream.advance()?;
    if !open.is(TokenKind::LParen) {
        return Err(stream.malformed(
            CONTEXT,
            &open,
            "Unable to identify structure on trigger. Expected `(`",
        ));
    }

    let mut trigger = Trigger {
        name: name.text,
        on_object: object.text,
        doc_comment: preamble.doc_comment,
        comments: preamble.comments,
        start_line: keyword.line(),
        ..Trigger::default()
    };

    loop {
        let timing = stream.advance()?;
        let Ok(timing_value) = timing.text.parse::<TriggerTiming>() else {
            return Err(stream.malformed(
                CONTEXT,
                &timing,
                "Unable to identify structure on trigger. Expected `before` or `after`",
            ));
        };
        let operation = stream.advance()?;
        let Ok(operation_value) = operation.text.parse::<TriggerOperation>() else {
            return Err(stream.malformed(
                CONTEXT,
                &operation,
                "Unable to identify structure on trigger. Expected `insert`, `update`, `delete` or `undelete`",
            ));
        };
        trigger.set_event(timing_value, operation_value);

        let separator = stream.advance()?;
        match separator.kind {
            TokenKind::Comma => {}
            TokenKind::RParen => break,
            _ => {
                return Err(stream.malformed(
                    CONTEXT,
                    &separator,
                    "Unable to identify structure on trigger. Expected `,` or `)`",
                ));
            }
        }
    }

    let token = stream.look_ahead()?;
    if !token.is(TokenKind::LBrace) {
        return Err(stream.malformed(
            CONTEXT,
            &token,
            "Unable to identify structure on trigger. Expected `{`",
        ));
    }
    let extent = body(stream, CONTEXT)?;
    trigger.end_line = extent.end_line;
    trigger.max_nest_depth = extent.max_nest_depth;
    Ok(trigger)
}
