//! Tuning knobs for a single parse.

/// Limits and buffer sizes used by the lexer and the token stream.
///
/// # Example
///
/// ```
/// # use apexdoc_parser::ParseConfig;
/// let config = ParseConfig::default().with_chunk_size(1024);
/// assert_eq!(config.chunk_size(), 1024);
/// assert_eq!(config.max_eof_reads(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    chunk_size: usize,
    max_eof_reads: u32,
    snapshot_tokens: usize,
}

impl ParseConfig {
    /// Size of each read from the character source. The lexer refills its
    /// buffer whenever less than this remains ahead of the lookahead cursor.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// How many extra end-of-input tokens the lexer hands out before
    /// reporting a runaway read.
    pub fn max_eof_reads(&self) -> u32 {
        self.max_eof_reads
    }

    /// Number of tokens rendered into a diagnostic snapshot.
    pub fn snapshot_tokens(&self) -> usize {
        self.snapshot_tokens
    }

    /// Set the read size. Values below 16 are raised to 16.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(16);
        self
    }

    pub fn with_max_eof_reads(mut self, max_eof_reads: u32) -> Self {
        self.max_eof_reads = max_eof_reads;
        self
    }

    pub fn with_snapshot_tokens(mut self, snapshot_tokens: usize) -> Self {
        self.snapshot_tokens = snapshot_tokens;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            max_eof_reads: 5,
            snapshot_tokens: 40,
        }
    }
}
