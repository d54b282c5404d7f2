//! Character sources the lexer pulls text from.
//!
//! A [`CharSource`] hands out text in chunks. [`StrSource`] serves text that
//! is already in memory, [`FileSource`] streams a file and decodes UTF-8
//! incrementally so a multi-byte character split across two reads is carried
//! over instead of being corrupted.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use log::trace;

/// A chunked, closable supplier of characters.
pub trait CharSource {
    /// Read up to `max` characters. An empty string means the source is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the source cannot be read.
    fn read(&mut self, max: usize) -> io::Result<String>;

    /// Release the source. Calling this more than once has no effect.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// In-memory text.
#[derive(Debug)]
pub struct StrSource {
    text: String,
    /// Byte position of the next unread character.
    pos: usize,
    open: bool,
}

impl StrSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
            open: true,
        }
    }
}

impl CharSource for StrSource {
    fn read(&mut self, max: usize) -> io::Result<String> {
        if !self.open {
            return Ok(String::new());
        }
        let rest = &self.text[self.pos..];
        let end = rest
            .char_indices()
            .nth(max)
            .map_or(rest.len(), |(index, _)| index);
        let chunk = rest[..end].to_string();
        self.pos += end;
        Ok(chunk)
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// A file decoded as UTF-8 while it is read.
///
/// Invalid byte sequences are replaced with `U+FFFD`.
#[derive(Debug)]
pub struct FileSource {
    reader: Option<BufReader<File>>,
    /// Bytes of a character whose encoding continues in the next read.
    pending: Vec<u8>,
}

impl FileSource {
    /// Open `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening the file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self {
            reader: Some(BufReader::new(file)),
            pending: Vec::new(),
        })
    }
}

impl CharSource for FileSource {
    fn read(&mut self, max: usize) -> io::Result<String> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(String::new());
        };

        let mut chunk = vec![0u8; max.max(4)];
        loop {
            let read = match reader.read(&mut chunk) {
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            if read == 0 {
                // A truncated character at the very end of the file.
                let tail = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                return Ok(tail);
            }

            self.pending.extend_from_slice(&chunk[..read]);
            let complete = self.pending.len() - incomplete_tail_len(&self.pending);
            let head: Vec<u8> = self.pending.drain(..complete).collect();
            if !head.is_empty() {
                trace!(bytes = head.len(), carried = self.pending.len(); "Decoded file chunk");
                return Ok(String::from_utf8_lossy(&head).into_owned());
            }
        }
    }

    fn close(&mut self) {
        self.reader = None;
        self.pending.clear();
    }

    fn is_open(&self) -> bool {
        self.reader.is_some()
    }
}

/// Number of trailing bytes that start a UTF-8 sequence not yet complete.
fn incomplete_tail_len(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let needed = match byte {
            0xF0.. => 4,
            0xE0.. => 3,
            0xC0.. => 2,
            _ => return 0,
        };
        return if needed > back { back } else { 0 };
    }
    0
}
