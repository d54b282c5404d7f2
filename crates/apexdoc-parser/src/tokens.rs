//! Token types produced by the lexer.

use std::fmt;

use apexdoc_core::{Position, Span};

/// The closed set of token kinds.
///
/// Kinds from [`TokenKind::LineComment`] to [`TokenKind::DocAnnotation`]
/// belong to comments. [`TokenKind::Eof`] ends either mode; all other kinds
/// are produced while lexing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A keyword such as `class` or `trigger`, matched case-insensitively.
    ReservedWord,
    /// Any other identifier-like run of characters.
    Word,
    /// A single-quoted string literal, quotes included.
    StringLiteral,
    /// A bracketed SOQL or SOSL query, e.g. `[SELECT Id FROM Account]`.
    Query,
    Number,
    /// `@Name` applied in code.
    Annotation,

    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,

    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equals,
    NotEquals,
    Assign,

    Add,
    Sub,
    Multiply,
    Divide,
    Increment,
    Decrement,
    AddAssign,
    SubAssign,
    MultiplyAssign,
    DivideAssign,

    /// `// ...` up to the end of the line.
    LineComment,
    /// `/*`
    BlockCommentStart,
    /// `/**`
    DocCommentStart,
    /// `*/`, possibly preceded by text written against it.
    BlockCommentEnd,
    /// A blank-separated word inside a comment.
    CommentWord,
    /// `@tag` inside a documentation comment.
    DocAnnotation,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::ReservedWord => "reserved word",
            TokenKind::Word => "word",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Query => "query",
            TokenKind::Number => "number",
            TokenKind::Annotation => "annotation",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Less => "`<`",
            TokenKind::LessEqual => "`<=`",
            TokenKind::Greater => "`>`",
            TokenKind::GreaterEqual => "`>=`",
            TokenKind::Equals => "`==`",
            TokenKind::NotEquals => "`!=`",
            TokenKind::Assign => "`=`",
            TokenKind::Add => "`+`",
            TokenKind::Sub => "`-`",
            TokenKind::Multiply => "`*`",
            TokenKind::Divide => "`/`",
            TokenKind::Increment => "`++`",
            TokenKind::Decrement => "`--`",
            TokenKind::AddAssign => "`+=`",
            TokenKind::SubAssign => "`-=`",
            TokenKind::MultiplyAssign => "`*=`",
            TokenKind::DivideAssign => "`/=`",
            TokenKind::LineComment => "line comment",
            TokenKind::BlockCommentStart => "`/*`",
            TokenKind::DocCommentStart => "`/**`",
            TokenKind::BlockCommentEnd => "`*/`",
            TokenKind::CommentWord => "comment text",
            TokenKind::DocAnnotation => "doc annotation",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A token with its text and the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn line(&self) -> u32 {
        self.position.line()
    }

    pub fn offset(&self) -> u32 {
        self.position.offset()
    }

    pub fn index(&self) -> usize {
        self.position.index()
    }

    /// Character range covered by the token.
    pub fn span(&self) -> Span {
        let start = self.position.index();
        Span::new(start..start + self.text.chars().count())
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Case-insensitive comparison of the token text.
    pub fn is_text(&self, text: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input at {}", self.position),
            _ => write!(f, "`{}` ({}) at {}", self.text, self.kind, self.position),
        }
    }
}
