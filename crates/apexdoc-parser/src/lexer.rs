//! Streaming lexer for Apex source text.
//!
//! The lexer pulls text from a [`CharSource`] into a growable buffer and
//! produces one [`Token`] per [`Lexer::next_token`] call. Tokens are matched
//! with anchored regular expressions tried in a fixed priority order, which
//! depends on whether the lexer is inside a block comment.
//!
//! Two cursors track progress through the buffer: the committed cursor marks
//! the start of the next token, and the lookahead cursor marks the end of the
//! text matched by the last pattern attempt. A match only becomes a token once
//! it is consumed.

use std::{cmp::Reverse, io};

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use apexdoc_core::{
    Position, Span,
    error::{Diagnostic, ErrorCode},
};

use crate::{
    config::ParseConfig,
    source::CharSource,
    tokens::{Token, TokenKind},
};

/// Keywords recognised as [`TokenKind::ReservedWord`], case-insensitively.
const RESERVED_WORDS: &[&str] = &[
    "public",
    "private",
    "protected",
    "global",
    "null",
    "return",
    "static",
    "final",
    "class",
    "interface",
    "if",
    "else",
    "for",
    "while",
    "do",
    "virtual",
    "abstract",
    "enum",
    "override",
    "extends",
    "implements",
    "trigger",
    "before",
    "after",
    "insert",
    "update",
    "delete",
    "undelete",
    "on",
    "new",
];

/// Characters that may follow a reserved word.
const RESERVED_WORD_STOP: &str = r"[\s;,()\[\]{}]";

/// Maximum number of characters rendered by [`Lexer::snapshot`].
const SNAPSHOT_CHARS: usize = 100;

/// An anchored token pattern.
struct Pattern {
    kind: TokenKind,
    regex: Regex,
}

impl Pattern {
    /// Compile `pattern`, optionally requiring `stop` (or the end of the
    /// buffer) right after it. Only the text matched by `pattern` becomes the
    /// token; the stop text is left for the next token.
    fn new(kind: TokenKind, pattern: &str, stop: Option<&str>, case_insensitive: bool) -> Self {
        let source = match stop {
            Some(stop) => format!("^({pattern})(?:{stop}|$)"),
            None => format!("^({pattern})"),
        };
        let regex = RegexBuilder::new(&source)
            .dot_matches_new_line(true)
            .case_insensitive(case_insensitive)
            .build()
            .expect("token patterns are valid regular expressions");
        Self { kind, regex }
    }

    fn plain(kind: TokenKind, pattern: &str) -> Self {
        Self::new(kind, pattern, None, false)
    }

    /// The token text at the start of `text`, if this pattern matches there.
    fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .filter(|matched| !matched.is_empty())
    }
}

static CODE_PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    let mut words = RESERVED_WORDS.to_vec();
    words.sort_by_key(|word| Reverse(word.len()));

    vec![
        Pattern::new(
            TokenKind::ReservedWord,
            &words.join("|"),
            Some(RESERVED_WORD_STOP),
            true,
        ),
        Pattern::new(TokenKind::DocCommentStart, r"/\*\*+", Some("[^/]"), false),
        Pattern::plain(TokenKind::BlockCommentStart, r"/\*"),
        Pattern::plain(TokenKind::StringLiteral, r"'[^'\\]*(?:\\.[^'\\]*)*'"),
        Pattern::plain(TokenKind::LineComment, r"//[^\n]*"),
        Pattern::new(
            TokenKind::Query,
            r"\[\s*(?:SELECT|FIND)\b[^\]]*\]",
            None,
            true,
        ),
        Pattern::plain(TokenKind::LBrace, r"\{"),
        Pattern::plain(TokenKind::RBrace, r"\}"),
        Pattern::plain(TokenKind::LParen, r"\("),
        Pattern::plain(TokenKind::RParen, r"\)"),
        Pattern::plain(TokenKind::LBracket, r"\["),
        Pattern::plain(TokenKind::RBracket, r"\]"),
        Pattern::plain(TokenKind::Comma, ","),
        Pattern::plain(TokenKind::Semicolon, ";"),
        Pattern::plain(TokenKind::Number, r"[0-9]+(?:\.[0-9]+)?"),
        Pattern::plain(TokenKind::LessEqual, "<="),
        Pattern::plain(TokenKind::GreaterEqual, ">="),
        Pattern::plain(TokenKind::Equals, "=="),
        Pattern::plain(TokenKind::NotEquals, "!="),
        Pattern::plain(TokenKind::Greater, ">"),
        Pattern::plain(TokenKind::Less, "<"),
        Pattern::plain(TokenKind::Assign, "="),
        Pattern::plain(TokenKind::Increment, r"\+\+"),
        Pattern::plain(TokenKind::Decrement, "--"),
        Pattern::plain(TokenKind::AddAssign, r"\+="),
        Pattern::plain(TokenKind::SubAssign, "-="),
        Pattern::plain(TokenKind::MultiplyAssign, r"\*="),
        Pattern::plain(TokenKind::DivideAssign, "/="),
        Pattern::plain(TokenKind::Add, r"\+"),
        Pattern::plain(TokenKind::Sub, "-"),
        Pattern::plain(TokenKind::Multiply, r"\*"),
        Pattern::plain(TokenKind::Divide, "/"),
        Pattern::plain(TokenKind::Dot, r"\."),
        Pattern::plain(TokenKind::Annotation, "@[A-Za-z0-9_]+"),
        Pattern::plain(TokenKind::Word, r"[^\s{}()\[\],;.<>=+\-'*/]+"),
    ]
});

static COMMENT_PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    vec![
        Pattern::plain(TokenKind::BlockCommentEnd, r"[^ \t\n\r]*?\*+/"),
        Pattern::new(
            TokenKind::DocAnnotation,
            "@[A-Za-z0-9_]+",
            Some(r"[ \t\n\r]"),
            false,
        ),
        Pattern::plain(TokenKind::CommentWord, r"[^ \t\n\r]+"),
    ]
});

/// Errors raised while producing tokens. All of them end the parse.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("Unrecognized text inside comment at {position}")]
    Comment { position: Position, snapshot: String },

    #[error("Unrecognized input at {position}")]
    Unrecognized { position: Position, snapshot: String },

    #[error("End of input requested {reads} times at {position}")]
    RunawayEof { position: Position, reads: u32 },

    #[error("Failed to read source at {position}: {source}")]
    Io {
        position: Position,
        #[source]
        source: io::Error,
    },
}

impl LexError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexError::Comment { .. } => ErrorCode::E001,
            LexError::Unrecognized { .. } => ErrorCode::E002,
            LexError::RunawayEof { .. } => ErrorCode::E003,
            LexError::Io { .. } => ErrorCode::E004,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            LexError::Comment { position, .. }
            | LexError::Unrecognized { position, .. }
            | LexError::RunawayEof { position, .. }
            | LexError::Io { position, .. } => *position,
        }
    }

    /// Convert into a diagnostic pointing at the offending character.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let position = self.position();
        let span = Span::new(position.index()..position.index() + 1);
        let diagnostic = Diagnostic::error(self.to_string())
            .with_code(self.code())
            .with_position(position);

        match self {
            LexError::Comment { snapshot, .. } | LexError::Unrecognized { snapshot, .. } => {
                diagnostic
                    .with_label(span, "no token matches here")
                    .with_snapshot(snapshot.clone())
            }
            LexError::RunawayEof { .. } => diagnostic
                .with_help("the parser kept reading after the end of the input"),
            LexError::Io { .. } => diagnostic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Code,
    BlockComment,
}

/// Produces tokens from a character source.
///
/// The lexer owns the source and closes it exactly once: either when the
/// source reports that it is exhausted, or on [`Lexer::dismiss`].
pub struct Lexer {
    source: Box<dyn CharSource>,
    buffer: String,
    /// Byte offset of the next token in `buffer`.
    committed: usize,
    /// Byte offset of the end of the last pattern match in `buffer`.
    lookahead: usize,
    committed_pos: Position,
    lookahead_pos: Position,
    source_ended: bool,
    state: LexState,
    eof_reads: u32,
    chunk_size: usize,
    max_eof_reads: u32,
}

impl Lexer {
    pub fn new(source: Box<dyn CharSource>, config: &ParseConfig) -> Self {
        Self {
            source,
            buffer: String::new(),
            committed: 0,
            lookahead: 0,
            committed_pos: Position::start(),
            lookahead_pos: Position::start(),
            source_ended: false,
            state: LexState::Code,
            eof_reads: 0,
            chunk_size: config.chunk_size(),
            max_eof_reads: config.max_eof_reads(),
        }
    }

    /// Produce the next token.
    ///
    /// Once the input is exhausted every call returns a [`TokenKind::Eof`]
    /// token, up to the configured number of extra reads.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when no token matches, when the end of input is
    /// requested too often, or when the source fails.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_blanks()?;

        if self.is_eof() {
            self.eof_reads += 1;
            if self.eof_reads > self.max_eof_reads {
                return Err(LexError::RunawayEof {
                    position: self.committed_pos,
                    reads: self.eof_reads,
                });
            }
            return Ok(Token::new(TokenKind::Eof, "", self.committed_pos));
        }

        loop {
            let matched = self.match_next();
            // A match touching the end of the buffer may continue in text
            // not read yet. So may a bracket opening a query whose closing
            // bracket is not buffered.
            let pending_query = matches!(&matched, Some((TokenKind::LBracket, _)))
                && may_open_query(&self.buffer[self.committed..]);
            let complete =
                self.source_ended || (self.lookahead < self.buffer.len() && !pending_query);
            match matched {
                Some((kind, text)) if complete => {
                    let token = Token::new(kind, text, self.committed_pos);
                    self.consume();
                    self.update_state(kind);
                    trace!(kind:? = token.kind, line = token.line(), offset = token.offset(); "Token");
                    return Ok(token);
                }
                _ if !self.source_ended => {
                    self.desist();
                    self.grow()?;
                }
                _ => {
                    let snapshot = self.snapshot();
                    let position = self.committed_pos;
                    return Err(match self.state {
                        LexState::Code => LexError::Unrecognized { position, snapshot },
                        LexState::BlockComment => LexError::Comment { position, snapshot },
                    });
                }
            }
        }
    }

    /// `true` once the source is exhausted and every character is committed.
    pub fn is_eof(&self) -> bool {
        self.source_ended && self.committed >= self.buffer.len()
    }

    /// Position of the next token.
    pub fn position(&self) -> Position {
        self.committed_pos
    }

    /// The buffered text after the committed cursor, truncated.
    pub fn snapshot(&self) -> String {
        self.buffer[self.committed..]
            .chars()
            .take(SNAPSHOT_CHARS)
            .collect()
    }

    /// Stop lexing and release the source if it is still open.
    pub fn dismiss(&mut self) {
        if self.source.is_open() {
            debug!(position = self.committed_pos.to_string(); "Dismissing lexer");
            self.source.close();
        }
        self.source_ended = true;
    }

    /// Try the patterns of the current state in order and remember the first
    /// match in the lookahead cursor.
    fn match_next(&mut self) -> Option<(TokenKind, String)> {
        let patterns = match self.state {
            LexState::Code => &*CODE_PATTERNS,
            LexState::BlockComment => &*COMMENT_PATTERNS,
        };
        patterns
            .iter()
            .find_map(|pattern| self.attempt_pattern(pattern))
    }

    /// Match `pattern` at the committed cursor, advancing only the lookahead
    /// cursor.
    fn attempt_pattern(&mut self, pattern: &Pattern) -> Option<(TokenKind, String)> {
        let matched = pattern.find(&self.buffer[self.committed..])?;
        self.lookahead = self.committed + matched.len();
        self.lookahead_pos = self.committed_pos.advance_over(matched);

        let text = match pattern.kind {
            TokenKind::LineComment => matched.trim_end_matches('\r'),
            _ => matched,
        };
        Some((pattern.kind, text.to_string()))
    }

    fn consume(&mut self) {
        self.committed = self.lookahead;
        self.committed_pos = self.lookahead_pos;
    }

    fn desist(&mut self) {
        self.lookahead = self.committed;
        self.lookahead_pos = self.committed_pos;
    }

    fn update_state(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::DocCommentStart | TokenKind::BlockCommentStart => {
                self.state = LexState::BlockComment;
            }
            TokenKind::BlockCommentEnd => self.state = LexState::Code,
            _ => {}
        }
    }

    /// Advance the committed cursor past whitespace, reading more input as
    /// long as the buffer holds nothing else.
    fn skip_blanks(&mut self) -> Result<(), LexError> {
        loop {
            self.desist();
            self.fill()?;

            let rest = &self.buffer[self.committed..];
            let skipped = rest.len() - rest.trim_start_matches(is_blank).len();
            if skipped > 0 {
                let end = self.committed + skipped;
                self.committed_pos = self
                    .committed_pos
                    .advance_over(&self.buffer[self.committed..end]);
                self.committed = end;
                self.desist();
            }

            if self.committed < self.buffer.len() || self.source_ended {
                return Ok(());
            }
        }
    }

    /// Read until at least one chunk is buffered ahead of the lookahead
    /// cursor or the source is exhausted.
    fn fill(&mut self) -> Result<(), LexError> {
        while !self.source_ended && self.buffer.len() - self.lookahead < self.chunk_size {
            self.grow()?;
        }
        Ok(())
    }

    /// Drop committed text and append one chunk from the source.
    fn grow(&mut self) -> Result<(), LexError> {
        if self.committed > 0 {
            self.buffer.drain(..self.committed);
            self.lookahead -= self.committed;
            self.committed = 0;
        }

        let chunk = self
            .source
            .read(self.chunk_size)
            .map_err(|source| LexError::Io {
                position: self.committed_pos,
                source,
            })?;

        if chunk.is_empty() {
            debug!(position = self.committed_pos.to_string(); "Character source exhausted");
            self.source_ended = true;
            self.source.close();
        } else {
            debug!(read = chunk.len(), buffered = self.buffer.len(); "Refilling lexer buffer");
            self.buffer.push_str(&chunk);
        }
        Ok(())
    }
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// `true` when `rest`, starting at `[`, may still become a query once more
/// text is read.
fn may_open_query(rest: &str) -> bool {
    let Some(after) = rest.strip_prefix('[') else {
        return false;
    };
    if after.contains(']') {
        return false;
    }
    let head = after.trim_start();
    let word_len = head
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(head.len());
    let word = &head[..word_len];
    let is_keyword = |keyword: &str| {
        if word_len == head.len() {
            // The word runs to the end of the buffer and may be cut short.
            keyword.len() >= word.len() && keyword[..word.len()].eq_ignore_ascii_case(word)
        } else {
            keyword.eq_ignore_ascii_case(word)
        }
    };
    is_keyword("select") || is_keyword("find")
}
