//! Backtracking access to the token sequence.
//!
//! [`TokenStream`] pulls tokens from the [`Lexer`] on demand and keeps every
//! token it has seen, so grammar productions can be tried speculatively and
//! rolled back by resetting a cursor.

use log::trace;

use apexdoc_core::error::{Diagnostic, ErrorCode};

use crate::{
    config::ParseConfig,
    error::{Failure, PResult},
    lexer::{LexError, Lexer},
    tokens::{Token, TokenKind},
};

pub(crate) struct TokenStream {
    lexer: Lexer,
    tokens: Vec<Token>,
    cursor: usize,
    /// Cursor values saved by the attempts in progress.
    attempts: Vec<usize>,
    snapshot_tokens: usize,
}

impl TokenStream {
    pub fn new(lexer: Lexer, config: &ParseConfig) -> Self {
        Self {
            lexer,
            tokens: Vec::new(),
            cursor: 0,
            attempts: Vec::new(),
            snapshot_tokens: config.snapshot_tokens(),
        }
    }

    /// The current token, lexing it if it has not been seen yet.
    pub fn look_ahead(&mut self) -> PResult<Token> {
        self.pull()?;
        Ok(self.tokens[self.cursor].clone())
    }

    /// Kind of the current token.
    pub fn kind(&mut self) -> PResult<TokenKind> {
        self.pull()?;
        Ok(self.tokens[self.cursor].kind)
    }

    /// Return the current token and move past it.
    pub fn advance(&mut self) -> PResult<Token> {
        let token = self.look_ahead()?;
        self.cursor += 1;
        Ok(token)
    }

    /// Run `production` as a lookahead test.
    ///
    /// The cursor is restored whatever the outcome, so a successful attempt
    /// has to be followed by a committed call of the same production.
    /// `NoMatch` yields `false`; fatal failures propagate.
    pub fn attempt<T>(
        &mut self,
        context: &str,
        production: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<bool> {
        let start = self.cursor;
        self.attempts.push(start);
        let result = production(self);
        self.attempts.pop();
        self.cursor = start;

        match result {
            Ok(_) => {
                trace!(context = context, depth = self.attempts.len(); "Attempt matched");
                Ok(true)
            }
            Err(Failure::NoMatch) => Ok(false),
            Err(fatal) => Err(fatal),
        }
    }

    /// `true` while an [`attempt`](Self::attempt) is running.
    pub fn is_attempting(&self) -> bool {
        !self.attempts.is_empty()
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Render the tokens from the cursor onwards, bounded, for diagnostics.
    ///
    /// The text keeps the line breaks between tokens and is framed by the
    /// positions of the first and last token: `///3:4 - text - 5:1///`.
    pub fn snapshot(&mut self) -> String {
        let start = self.cursor;
        let mut end = start;
        while end - start < self.snapshot_tokens {
            if end >= self.tokens.len() {
                match self.lexer.next_token() {
                    Ok(token) => self.tokens.push(token),
                    Err(_) => break,
                }
            }
            let at_eof = self.tokens[end].is(TokenKind::Eof);
            end += 1;
            if at_eof {
                break;
            }
        }

        let tokens = &self.tokens[start..end];
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return format!("///{}///", self.lexer.position());
        };

        let mut text = String::new();
        let mut line = first.line();
        for token in tokens.iter().filter(|t| !t.is(TokenKind::Eof)) {
            if !text.is_empty() {
                text.push(if token.line() > line { '\n' } else { ' ' });
            }
            text.push_str(&token.text);
            line = token.line();
        }
        format!("///{} - {} - {}///", first.position, text, last.position)
    }

    /// Build the fatal failure for a construct that cannot continue at
    /// `token`.
    ///
    /// End of input is reported as [`ErrorCode::E101`], anything else as
    /// [`ErrorCode::E100`].
    pub fn malformed(&mut self, context: &str, token: &Token, message: impl Into<String>) -> Failure {
        let code = match token.kind {
            TokenKind::Eof => ErrorCode::E101,
            _ => ErrorCode::E100,
        };
        self.fatal(code, context, token, message.into())
    }

    /// Build the fatal failure for input that starts no known unit.
    pub fn unrecognized(&mut self, context: &str, token: &Token, message: impl Into<String>) -> Failure {
        self.fatal(ErrorCode::E102, context, token, message.into())
    }

    fn fatal(&mut self, code: ErrorCode, context: &str, token: &Token, message: String) -> Failure {
        let label = match token.kind {
            TokenKind::Eof => "input ends here".to_string(),
            kind => format!("unexpected {kind}"),
        };
        let diagnostic = Diagnostic::error(message)
            .with_code(code)
            .with_position(token.position)
            .with_label(token.span(), label)
            .with_snapshot(self.snapshot())
            .with_help(format!("while parsing {context}"));
        Failure::Fatal(Box::new(diagnostic))
    }

    /// Stop reading and release the source.
    pub fn dismiss(&mut self) {
        self.lexer.dismiss();
    }

    fn pull(&mut self) -> Result<(), LexError> {
        while self.cursor >= self.tokens.len() {
            let token = self.lexer.next_token()?;
            self.tokens.push(token);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn stream_for(source: &str) -> TokenStream {
    use crate::source::StrSource;

    let config = ParseConfig::default();
    TokenStream::new(
        Lexer::new(Box::new(StrSource::new(source)), &config),
        &config,
    )
}
