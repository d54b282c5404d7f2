//! Grammar for `.cls` files: classes, interfaces and enums with their
//! members.
//!
//! Every production is written so it can run both inside
//! [`TokenStream::attempt`] and committed. Nested classes are parsed into
//! [`ClassUnit::inner_classes`] and hoisted into the result list only once
//! the whole file has been parsed.

use log::debug;

use apexdoc_core::{
    Span,
    ir::{Attribute, ClassUnit, EnumUnit, EnumValue, IrKind, IrNode, Method, StaticBlock},
};

use crate::{
    error::{Failure, PResult},
    grammar::common::{
        access_modifier, block_comment, body, doc_comment, line_comment, parameters, preamble,
        require, skip_block, type_ref, word,
    },
    stream::TokenStream,
    tokens::TokenKind,
};

/// Parse a `.cls` file: a class or interface, or else an enum.
///
/// The outermost class comes first, followed by every nested class in
/// pre-order.
pub(crate) fn parse(stream: &mut TokenStream) -> PResult<Vec<IrNode>> {
    if stream.attempt("class", |s| class(s, &[]))? {
        let unit = class(stream, &[])?;
        return Ok(hoist(unit));
    }
    if stream.attempt("enum", enumeration)? {
        let unit = enumeration(stream)?;
        return Ok(vec![IrNode::new(IrKind::Enum(unit))]);
    }

    let token = stream.look_ahead()?;
    Err(stream.unrecognized(
        "class",
        &token,
        format!("Unable to identify structure at {token}"),
    ))
}

/// Flatten a class and its nested classes in pre-order.
fn hoist(unit: ClassUnit) -> Vec<IrNode> {
    let mut nodes = Vec::new();
    let mut pending = vec![unit];
    while let Some(unit) = pending.pop() {
        pending.extend(unit.inner_classes.iter().rev().cloned());
        nodes.push(IrNode::new(IrKind::Class(unit)));
    }
    nodes
}

/// Parse a class or interface declaration with its body.
///
/// `outer` holds the names of the enclosing classes, outermost first.
/// Returns `NoMatch` unless the declaration reaches the `class` or
/// `interface` keyword; anything wrong after that is malformed.
pub(crate) fn class(stream: &mut TokenStream, outer: &[String]) -> PResult<ClassUnit> {
    let preamble = preamble(stream, "class")?;
    let start = stream.look_ahead()?;
    let access = access_modifier(stream)?;

    let mut with_sharing = false;
    let mut is_abstract = false;
    let mut is_virtual = false;
    loop {
        let token = stream.look_ahead()?;
        if token.is_text("with") || token.is_text("without") || token.is_text("inherited") {
            stream.advance()?;
            if !stream.advance()?.is_text("sharing") {
                return Err(Failure::NoMatch);
            }
            with_sharing = token.is_text("with");
        } else if token.is_text("abstract") {
            stream.advance()?;
            is_abstract = true;
        } else if token.is_text("virtual") {
            stream.advance()?;
            is_virtual = true;
        } else {
            break;
        }
    }

    let keyword = stream.advance()?;
    let is_class = if keyword.is_text("class") {
        true
    } else if keyword.is_text("interface") {
        false
    } else {
        return Err(Failure::NoMatch);
    };

    let name = stream.advance()?;
    if !name.is(TokenKind::Word) {
        return Err(stream.malformed(
            "class",
            &name,
            format!("Expected a name after `{}`", keyword.text),
        ));
    }

    let header = name.span();
    let mut unit = ClassUnit::new(name.text, outer.to_vec());
    unit.access = access;
    unit.with_sharing = with_sharing;
    unit.is_abstract = is_abstract;
    unit.is_virtual = is_virtual;
    unit.is_class = is_class;
    unit.annotations = preamble.annotations;
    unit.doc_comment = preamble.doc_comment;
    unit.comments = preamble.comments;
    unit.start_line = start.line();

    if stream.look_ahead()?.is_text("extends") {
        stream.advance()?;
        unit.base = Some(require(
            stream,
            "class",
            "Expected a type after `extends`",
            type_ref,
        )?);
    }
    if stream.look_ahead()?.is_text("implements") {
        stream.advance()?;
        loop {
            unit.interfaces.push(require(
                stream,
                "class",
                "Expected a type after `implements`",
                type_ref,
            )?);
            if stream.kind()? != TokenKind::Comma {
                break;
            }
            stream.advance()?;
        }
    }

    let open = stream.advance()?;
    if !open.is(TokenKind::LBrace) {
        return Err(stream.malformed(
            "class",
            &open,
            format!("Expected `{{` after declaration of {}", unit.name),
        ));
    }

    class_body(stream, &mut unit, header)?;
    Ok(unit)
}

/// Parse members until the closing brace of `unit`, whose name spans
/// `header`.
fn class_body(stream: &mut TokenStream, unit: &mut ClassUnit, header: Span) -> PResult<()> {
    let mut chain = unit.outer.clone();
    chain.push(unit.name.clone());
    let in_interface = !unit.is_class;

    loop {
        let token = stream.look_ahead()?;
        match token.kind {
            TokenKind::RBrace => {
                stream.advance()?;
                unit.end_line = token.line();
                return Ok(());
            }
            TokenKind::Eof => {
                let failure = stream.malformed(
                    "class body",
                    &token,
                    format!("Unexpected end of input in body of {}", unit.name),
                );
                return Err(failure.with_secondary_label(header, "class starts here"));
            }
            _ => {}
        }

        if stream.attempt("method", |s| method(s, in_interface))? {
            unit.methods.push(method(stream, in_interface)?);
        } else if stream.attempt("inner class", |s| class(s, &chain))? {
            unit.inner_classes.push(class(stream, &chain)?);
        } else if stream.attempt("constructor", |s| constructor(s, &unit.name))? {
            let constructor = constructor(stream, &unit.name)?;
            if unit.constructor.is_none() {
                unit.constructor = Some(constructor.clone());
            }
            unit.methods.push(constructor);
        } else if stream.attempt("static block", static_block)? {
            unit.static_blocks.push(static_block(stream)?);
        } else if stream.attempt("attribute", attribute)? {
            unit.attributes.push(attribute(stream)?);
        } else if stream.attempt("enum", enumeration)? {
            unit.enums.push(enumeration(stream)?);
        } else {
            match token.kind {
                TokenKind::BlockCommentStart => {
                    unit.comments.push(block_comment(stream, "class body")?);
                }
                TokenKind::DocCommentStart => {
                    doc_comment(stream, "class body")?;
                    debug!(unit = unit.name.as_str(), line = token.line(); "Dropping detached doc comment");
                }
                TokenKind::LineComment => unit.comments.push(line_comment(stream)?),
                _ => {
                    return Err(stream.malformed(
                        "class body",
                        &token,
                        "Unable to understand structure in class body",
                    ));
                }
            }
        }
    }
}

/// Parse a method declaration, with a body or, for interface and abstract
/// methods, a terminating `;`.
pub(crate) fn method(stream: &mut TokenStream, in_interface: bool) -> PResult<Method> {
    let preamble = preamble(stream, "method")?;
    let start = stream.look_ahead()?;

    let mut method = Method {
        access: access_modifier(stream)?,
        is_test_method: preamble.has_annotation("isTest"),
        ..Method::default()
    };
    loop {
        let token = stream.look_ahead()?;
        match token.text.to_ascii_lowercase().as_str() {
            "static" => method.is_static = true,
            "abstract" => method.is_abstract = true,
            "virtual" => method.is_virtual = true,
            "override" => method.is_override = true,
            "testmethod" => method.is_test_method = true,
            "final" | "webservice" | "transient" => {}
            _ => break,
        }
        stream.advance()?;
    }

    let return_type = type_ref(stream)?;
    let name = word(stream)?;
    if stream.kind()? != TokenKind::LParen {
        return Err(Failure::NoMatch);
    }
    method.parameters = parameters(stream, "method")?;
    method.name = name.text;
    method.return_type = Some(return_type);
    method.annotations = preamble.annotations;
    method.doc_comment = preamble.doc_comment;
    method.comments = preamble.comments;
    method.start_line = start.line();

    let token = stream.look_ahead()?;
    match token.kind {
        TokenKind::Semicolon if in_interface || method.is_abstract => {
            stream.advance()?;
            method.end_line = token.line();
        }
        TokenKind::LBrace => {
            let extent = body(stream, "method")?;
            method.end_line = extent.end_line;
            method.max_nest_depth = extent.max_nest_depth;
        }
        _ => {
            return Err(stream.malformed(
                "method",
                &token,
                format!("Expected `{{` to open the body of {}", method.name),
            ));
        }
    }
    Ok(method)
}

/// Parse a constructor of the class named `class_name`.
pub(crate) fn constructor(stream: &mut TokenStream, class_name: &str) -> PResult<Method> {
    let preamble = preamble(stream, "constructor")?;
    let start = stream.look_ahead()?;
    let access = access_modifier(stream)?;

    let name = word(stream)?;
    if !name.is_text(class_name) || stream.kind()? != TokenKind::LParen {
        return Err(Failure::NoMatch);
    }
    let parameters = parameters(stream, "constructor")?;

    let token = stream.look_ahead()?;
    if !token.is(TokenKind::LBrace) {
        return Err(stream.malformed(
            "constructor",
            &token,
            format!("Expected `{{` to open the body of constructor {}", name.text),
        ));
    }
    let extent = body(stream, "constructor")?;

    Ok(Method {
        name: name.text,
        access,
        is_constructor: true,
        parameters,
        annotations: preamble.annotations,
        doc_comment: preamble.doc_comment,
        comments: preamble.comments,
        start_line: start.line(),
        end_line: extent.end_line,
        max_nest_depth: extent.max_nest_depth,
        ..Method::default()
    })
}

/// Parse a `static { ... }` initializer.
pub(crate) fn static_block(stream: &mut TokenStream) -> PResult<StaticBlock> {
    let preamble = preamble(stream, "static block")?;
    let keyword = stream.advance()?;
    if !keyword.is_text("static") || stream.kind()? != TokenKind::LBrace {
        return Err(Failure::NoMatch);
    }
    let extent = body(stream, "static block")?;

    Ok(StaticBlock {
        start_line: keyword.line(),
        end_line: extent.end_line,
        max_nest_depth: extent.max_nest_depth,
        doc_comment: preamble.doc_comment,
        comments: preamble.comments,
    })
}

/// Parse a field or property declaration. Initializers and accessor blocks
/// are skipped.
pub(crate) fn attribute(stream: &mut TokenStream) -> PResult<Attribute> {
    let preamble = preamble(stream, "attribute")?;
    let access = access_modifier(stream)?;

    let mut is_static = false;
    let mut is_final = false;
    loop {
        let token = stream.look_ahead()?;
        if token.is_text("static") {
            is_static = true;
        } else if token.is_text("final") {
            is_final = true;
        } else if !token.is_text("transient") {
            break;
        }
        stream.advance()?;
    }

    let type_ref = type_ref(stream)?;
    let name = word(stream)?;

    match stream.kind()? {
        TokenKind::LBrace => {
            skip_block(stream)?;
            // An initializer block may follow the accessors.
            if stream.kind()? == TokenKind::LBrace {
                skip_block(stream)?;
            }
        }
        TokenKind::Semicolon | TokenKind::Assign | TokenKind::Comma => loop {
            match stream.kind()? {
                TokenKind::Semicolon => break,
                TokenKind::Eof => return Err(Failure::NoMatch),
                _ => {
                    stream.advance()?;
                }
            }
        },
        _ => return Err(Failure::NoMatch),
    }
    if stream.kind()? == TokenKind::Semicolon {
        stream.advance()?;
    }

    Ok(Attribute {
        line: name.line(),
        name: name.text,
        type_ref,
        access,
        is_static,
        is_final,
        annotations: preamble.annotations,
        doc_comment: preamble.doc_comment,
        comments: preamble.comments,
    })
}

/// Parse an enum declaration.
///
/// Each value keeps only the comments written directly in front of it.
pub(crate) fn enumeration(stream: &mut TokenStream) -> PResult<EnumUnit> {
    let header = preamble(stream, "enum")?;
    let access = access_modifier(stream)?;
    if !stream.advance()?.is_text("enum") {
        return Err(Failure::NoMatch);
    }

    let name = stream.advance()?;
    if !name.is(TokenKind::Word) {
        return Err(stream.malformed("enum", &name, "Expected a name after `enum`"));
    }
    let open = stream.advance()?;
    if !open.is(TokenKind::LBrace) {
        return Err(stream.malformed(
            "enum",
            &open,
            format!("Expected `{{` after declaration of enum {}", name.text),
        ));
    }

    let mut unit = EnumUnit {
        name: name.text,
        access,
        values: Vec::new(),
        doc_comment: header.doc_comment,
        comments: header.comments,
    };

    loop {
        let leading = preamble(stream, "enum value")?;
        let token = stream.advance()?;
        match token.kind {
            TokenKind::RBrace => break,
            TokenKind::Word => {
                unit.values.push(EnumValue {
                    name: token.text,
                    doc_comment: leading.doc_comment,
                    comments: leading.comments,
                });
            }
            _ => {
                return Err(stream.malformed(
                    "enum",
                    &token,
                    format!("Expected a value name in enum {}", unit.name),
                ));
            }
        }

        let separator = stream.advance()?;
        match separator.kind {
            TokenKind::Comma => {}
            TokenKind::RBrace => break,
            _ => {
                return Err(stream.malformed(
                    "enum",
                    &separator,
                    "Expected a comma `,` or closing curly bracket `}` after enum value",
                ));
            }
        }
    }
    Ok(unit)
}
