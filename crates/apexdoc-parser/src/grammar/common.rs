//! Productions shared by every grammar: comments, annotations, types,
//! parameter lists and brace-balanced bodies.

use apexdoc_core::ir::{
    AccessModifier, Annotation, AnnotationParam, Comment, DocAnnotation, DocComment, Parameter,
    TypeRef,
};

use crate::{
    error::{Failure, PResult},
    stream::TokenStream,
    tokens::{Token, TokenKind},
};

/// Comments and annotations written in front of a declaration.
#[derive(Debug, Default)]
pub(crate) struct Preamble {
    /// The last documentation comment seen.
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
    pub annotations: Vec<Annotation>,
}

impl Preamble {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.is(name))
    }
}

/// Collect comments and annotations in any order until something else
/// shows up.
pub(crate) fn preamble(stream: &mut TokenStream, context: &str) -> PResult<Preamble> {
    let mut preamble = Preamble::default();
    loop {
        match stream.kind()? {
            TokenKind::DocCommentStart => {
                preamble.doc_comment = Some(doc_comment(stream, context)?);
            }
            TokenKind::BlockCommentStart => preamble.comments.push(block_comment(stream, context)?),
            TokenKind::LineComment => preamble.comments.push(line_comment(stream)?),
            TokenKind::Annotation => preamble.annotations.push(annotation(stream, context)?),
            _ => return Ok(preamble),
        }
    }
}

/// Joins comment words, separating words on different lines with a line
/// break.
#[derive(Default)]
struct CommentText {
    text: String,
    line: u32,
}

impl CommentText {
    fn push(&mut self, word: &str, line: u32) {
        if !self.text.is_empty() {
            self.text.push(if line > self.line { '\n' } else { ' ' });
        }
        self.text.push_str(word);
        self.line = line;
    }
}

/// `*` markers that only continue a comment onto a new line.
fn is_continuation_marker(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c == '*')
}

/// Parse a `/** ... */` documentation comment.
///
/// Free text is accumulated into [`DocComment::text`]. A `@tag` starts a
/// [`DocAnnotation`] whose explanation runs to the end of its line; only
/// `@param` takes the following word as its parameter name.
pub(crate) fn doc_comment(stream: &mut TokenStream, context: &str) -> PResult<DocComment> {
    let start = stream.advance()?;
    if !start.is(TokenKind::DocCommentStart) {
        return Err(Failure::NoMatch);
    }

    let mut text = CommentText::default();
    let mut annotations: Vec<DocAnnotation> = Vec::new();
    let mut explanations: Vec<CommentText> = Vec::new();
    let mut annotation_line = None;
    let mut last_line = start.line();

    loop {
        let token = stream.advance()?;
        let first_on_line = token.line() != last_line;
        last_line = token.line();

        let word = match token.kind {
            TokenKind::Eof => {
                return Err(stream.malformed(
                    context,
                    &token,
                    "Unexpected end of input inside documentation comment",
                ));
            }
            TokenKind::DocAnnotation => {
                let param = if token.is_text("@param") {
                    next_word_on_line(stream, &token)?
                } else {
                    None
                };
                annotations.push(DocAnnotation {
                    name: token.text.clone(),
                    param,
                    explanation: String::new(),
                });
                explanations.push(CommentText::default());
                annotation_line = Some(token.line());
                continue;
            }
            TokenKind::BlockCommentEnd => terminator_prefix(&token.text),
            _ if first_on_line && is_continuation_marker(&token.text) => continue,
            _ => token.text.as_str(),
        };

        if !word.is_empty() {
            match explanations.last_mut() {
                Some(explanation) if annotation_line == Some(token.line()) => {
                    explanation.push(word, token.line());
                }
                _ => text.push(word, token.line()),
            }
        }
        if token.is(TokenKind::BlockCommentEnd) {
            break;
        }
    }

    for (annotation, explanation) in annotations.iter_mut().zip(explanations) {
        annotation.explanation = explanation.text;
    }
    Ok(DocComment {
        text: text.text,
        multiline: true,
        annotations,
    })
}

/// The word following `annotation` on the same line, consumed if present.
fn next_word_on_line(stream: &mut TokenStream, annotation: &Token) -> PResult<Option<String>> {
    let next = stream.look_ahead()?;
    if next.is(TokenKind::CommentWord) && next.line() == annotation.line() {
        stream.advance()?;
        Ok(Some(next.text))
    } else {
        Ok(None)
    }
}

/// Text written against a comment terminator, e.g. `note` in `note*/`.
fn terminator_prefix(text: &str) -> &str {
    text.trim_end_matches('/').trim_end_matches('*')
}

/// Parse a plain `/* ... */` comment.
pub(crate) fn block_comment(stream: &mut TokenStream, context: &str) -> PResult<Comment> {
    let start = stream.advance()?;
    if !start.is(TokenKind::BlockCommentStart) {
        return Err(Failure::NoMatch);
    }

    let mut text = CommentText::default();
    let mut last_line = start.line();
    loop {
        let token = stream.advance()?;
        let first_on_line = token.line() != last_line;
        last_line = token.line();

        match token.kind {
            TokenKind::Eof => {
                return Err(stream.malformed(
                    context,
                    &token,
                    "Unexpected end of input inside comment",
                ));
            }
            TokenKind::BlockCommentEnd => {
                let prefix = terminator_prefix(&token.text);
                if !prefix.is_empty() {
                    text.push(prefix, token.line());
                }
                return Ok(Comment::block(text.text));
            }
            _ if first_on_line && is_continuation_marker(&token.text) => {}
            _ => text.push(&token.text, token.line()),
        }
    }
}

/// Parse a `// ...` comment.
pub(crate) fn line_comment(stream: &mut TokenStream) -> PResult<Comment> {
    let token = stream.advance()?;
    if !token.is(TokenKind::LineComment) {
        return Err(Failure::NoMatch);
    }
    Ok(Comment::line(token.text.trim_start_matches('/').trim()))
}

/// Parse an annotation application such as `@isTest` or
/// `@AuraEnabled(cacheable=true)`.
///
/// Parameters may be separated by commas or blanks. A value runs until the
/// next `,`, `)` or blank-separated `name=`, so dotted and signed values such
/// as `System.Label.Title` or `-1` are kept whole. Statement punctuation
/// inside a value is malformed.
pub(crate) fn annotation(stream: &mut TokenStream, context: &str) -> PResult<Annotation> {
    let token = stream.advance()?;
    if !token.is(TokenKind::Annotation) {
        return Err(Failure::NoMatch);
    }

    let mut annotation = Annotation::new(token.text.trim_start_matches('@'));
    if stream.kind()? != TokenKind::LParen {
        return Ok(annotation);
    }
    stream.advance()?;

    loop {
        let token = stream.advance()?;
        match token.kind {
            TokenKind::RParen => return Ok(annotation),
            TokenKind::Comma => {}
            TokenKind::Word | TokenKind::ReservedWord => {
                let mut param = AnnotationParam {
                    name: token.text,
                    value: None,
                };
                if stream.kind()? == TokenKind::Assign {
                    stream.advance()?;
                    param.value = Some(annotation_value(stream, context, &param.name)?);
                }
                annotation.params.push(param);
            }
            TokenKind::Eof => {
                return Err(stream.malformed(
                    context,
                    &token,
                    format!("Unexpected end of input in parameters of @{}", annotation.name),
                ));
            }
            _ => {
                return Err(stream.malformed(
                    context,
                    &token,
                    format!("Expected a parameter name in @{}", annotation.name),
                ));
            }
        }
    }
}

/// Collect the tokens of an annotation parameter value into one string.
fn annotation_value(stream: &mut TokenStream, context: &str, name: &str) -> PResult<String> {
    let mut value = String::new();
    loop {
        let token = stream.look_ahead()?;
        match token.kind {
            TokenKind::Comma | TokenKind::RParen => break,
            TokenKind::Eof => {
                return Err(stream.malformed(
                    context,
                    &token,
                    format!("Unexpected end of input in value of `{name}`"),
                ));
            }
            TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace => {
                return Err(stream.malformed(
                    context,
                    &token,
                    format!("Unexpected {} in value of `{name}`", token.kind),
                ));
            }
            _ => {}
        }
        if !value.is_empty() && stream.attempt("annotation param", param_start)? {
            break;
        }
        stream.advance()?;
        value.push_str(&token.text);
    }

    if value.is_empty() {
        let token = stream.look_ahead()?;
        return Err(stream.malformed(
            context,
            &token,
            format!("Expected a value for parameter `{name}`"),
        ));
    }
    Ok(value)
}

/// Matches `name=`, the start of the next blank-separated parameter.
fn param_start(stream: &mut TokenStream) -> PResult<()> {
    let name = stream.advance()?;
    let is_name = name.is(TokenKind::Word) || name.is(TokenKind::ReservedWord);
    if !is_name || !stream.advance()?.is(TokenKind::Assign) {
        return Err(Failure::NoMatch);
    }
    Ok(())
}

/// Consume an access modifier if one is present.
pub(crate) fn access_modifier(stream: &mut TokenStream) -> PResult<AccessModifier> {
    let token = stream.look_ahead()?;
    if !token.is(TokenKind::ReservedWord) {
        return Ok(AccessModifier::Package);
    }
    match token.text.parse::<AccessModifier>() {
        Ok(access) => {
            stream.advance()?;
            Ok(access)
        }
        Err(_) => Ok(AccessModifier::Package),
    }
}

/// Consume a [`TokenKind::Word`].
pub(crate) fn word(stream: &mut TokenStream) -> PResult<Token> {
    let token = stream.advance()?;
    if token.is(TokenKind::Word) {
        Ok(token)
    } else {
        Err(Failure::NoMatch)
    }
}

/// Run `production`, turning a `NoMatch` into a malformed-structure failure
/// at the token it started on. Used once a construct is committed to.
pub(crate) fn require<T>(
    stream: &mut TokenStream,
    context: &str,
    message: &str,
    production: impl FnOnce(&mut TokenStream) -> PResult<T>,
) -> PResult<T> {
    let at = stream.look_ahead()?;
    match production(stream) {
        Err(Failure::NoMatch) => Err(stream.malformed(context, &at, message)),
        other => other,
    }
}

/// Parse a type reference: a dotted name, optional generic arguments and
/// any number of `[]` suffixes.
pub(crate) fn type_ref(stream: &mut TokenStream) -> PResult<TypeRef> {
    let mut name = word(stream)?.text;
    while stream.kind()? == TokenKind::Dot {
        stream.advance()?;
        name.push('.');
        name.push_str(&word(stream)?.text);
    }

    let mut type_ref = TypeRef::new(name);
    if stream.kind()? == TokenKind::Less {
        stream.advance()?;
        loop {
            type_ref.generics.push(self::type_ref(stream)?);
            match stream.advance()?.kind {
                TokenKind::Comma => {}
                TokenKind::Greater => break,
                _ => return Err(Failure::NoMatch),
            }
        }
    }

    while stream.kind()? == TokenKind::LBracket {
        stream.advance()?;
        if !stream.advance()?.is(TokenKind::RBracket) {
            return Err(Failure::NoMatch);
        }
        type_ref.array_dims += 1;
    }
    Ok(type_ref)
}

/// Parse `( [final] Type name, ... )`.
///
/// Anything other than a parameter list start is `NoMatch`; a bad
/// separator inside the list is malformed.
pub(crate) fn parameters(stream: &mut TokenStream, context: &str) -> PResult<Vec<Parameter>> {
    if !stream.advance()?.is(TokenKind::LParen) {
        return Err(Failure::NoMatch);
    }

    let mut parameters = Vec::new();
    if stream.kind()? == TokenKind::RParen {
        stream.advance()?;
        return Ok(parameters);
    }

    loop {
        let is_final = stream.look_ahead()?.is_text("final");
        if is_final {
            stream.advance()?;
        }
        let type_ref = type_ref(stream)?;
        let name = word(stream)?;

        let separator = stream.advance()?;
        parameters.push(Parameter {
            name: name.text,
            type_ref,
            is_final,
        });
        match separator.kind {
            TokenKind::Comma => {}
            TokenKind::RParen => return Ok(parameters),
            _ => {
                return Err(stream.malformed(
                    context,
                    &separator,
                    "Expected `,` or `)` after parameter",
                ));
            }
        }
    }
}

/// Lines and nesting of a brace-delimited body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BodyExtent {
    /// Line of the closing brace.
    pub end_line: u32,
    /// Deepest nesting, the body's own braces counting as 1.
    pub max_nest_depth: u32,
}

/// Scan a `{ ... }` body up to its matching closing brace.
///
/// Running out of input is `NoMatch` while attempting, and malformed once
/// committed.
pub(crate) fn body(stream: &mut TokenStream, context: &str) -> PResult<BodyExtent> {
    if !stream.advance()?.is(TokenKind::LBrace) {
        return Err(Failure::NoMatch);
    }

    let mut depth = 1u32;
    let mut max_nest_depth = 1u32;
    loop {
        let token = stream.advance()?;
        match token.kind {
            TokenKind::LBrace => {
                depth += 1;
                max_nest_depth = max_nest_depth.max(depth);
            }
            TokenKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Ok(BodyExtent {
                        end_line: token.line(),
                        max_nest_depth,
                    });
                }
            }
            TokenKind::Eof if stream.is_attempting() => return Err(Failure::NoMatch),
            TokenKind::Eof => {
                return Err(stream.malformed(
                    context,
                    &token,
                    format!("Unexpected end of input in {context} body"),
                ));
            }
            _ => {}
        }
    }
}

/// Skip a balanced `{ ... }` block, such as property accessors.
pub(crate) fn skip_block(stream: &mut TokenStream) -> PResult<()> {
    if !stream.advance()?.is(TokenKind::LBrace) {
        return Err(Failure::NoMatch);
    }

    let mut depth = 1u32;
    while depth > 0 {
        match stream.advance()?.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth -= 1,
            TokenKind::Eof => return Err(Failure::NoMatch),
            _ => {}
        }
    }
    Ok(())
}
