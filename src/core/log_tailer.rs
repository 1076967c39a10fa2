//! Backward line reader for log files.
//!
//! Reads a file from the end in fixed-size blocks so that fetching the last
//! few lines of a large log costs a couple of block reads, not a full scan.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{HostMetricsError, Result};

/// Block size used when scanning backwards
pub const DEFAULT_BLOCK_SIZE: usize = 8 * 1024;

/// Default number of lines returned per log
pub const DEFAULT_TAIL_LINES: usize = 10;

/// Iterator over the lines of a seekable source, last line first.
///
/// Lines are split on `\n`; a single trailing newline at EOF does not yield
/// an empty line, and a `\r` preceding the newline is stripped.
///
/// Each byte is scanned once. A line longer than one block is collected as
/// a list of blocks and joined once when its start is found.
pub struct TailReader<R> {
    reader: R,
    pos: u64,
    block_size: usize,
    block: Vec<u8>,
    /// End of the part of `block` not yet split into lines
    cursor: usize,
    /// Pieces of the line in progress, later pieces first
    pieces: Vec<Vec<u8>>,
    is_empty: bool,
    first: bool,
    done: bool,
}

impl<R: Read + Seek> TailReader<R> {
    pub fn new(reader: R) -> io::Result<Self> {
        Self::with_block_size(reader, DEFAULT_BLOCK_SIZE)
    }

    pub fn with_block_size(mut reader: R, block_size: usize) -> io::Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;

        Ok(Self {
            reader,
            pos: len,
            block_size: block_size.max(1),
            block: Vec::new(),
            cursor: 0,
            pieces: Vec::new(),
            is_empty: len == 0,
            first: true,
            done: false,
        })
    }

    /// Load the block that ends at the current position.
    fn read_previous_block(&mut self) -> io::Result<()> {
        let read_len = (self.block_size as u64).min(self.pos);
        self.pos -= read_len;
        self.reader.seek(SeekFrom::Start(self.pos))?;

        let mut block = vec![0u8; read_len as usize];
        self.reader.read_exact(&mut block)?;
        self.cursor = block.len();
        self.block = block;

        Ok(())
    }

    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            if self.done || self.is_empty {
                return Ok(None);
            }

            let unscanned = &self.block[..self.cursor];
            if let Some(idx) = unscanned.iter().rposition(|&b| b == b'\n') {
                let end = self.cursor;
                self.cursor = idx;

                let trailing = self.first && end == idx + 1 && self.pieces.is_empty();
                self.first = false;
                if trailing {
                    continue;
                }

                let line = join_line(&self.block[idx + 1..end], &mut self.pieces);
                return Ok(Some(line));
            }

            // No line break left in this block: the rest belongs to the line in progress
            let mut rest = std::mem::take(&mut self.block);
            rest.truncate(self.cursor);
            self.cursor = 0;
            if !rest.is_empty() {
                self.pieces.push(rest);
            }

            if self.pos == 0 {
                // Whatever is left before the first newline is the file's first line
                self.done = true;
                self.first = false;
                return Ok(Some(join_line(&[], &mut self.pieces)));
            }

            self.read_previous_block()?;
        }
    }
}

impl<R: Read + Seek> Iterator for TailReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Join `head` with the pending pieces into one line, in file order.
fn join_line(head: &[u8], pieces: &mut Vec<Vec<u8>>) -> Vec<u8> {
    let len = head.len() + pieces.iter().map(Vec::len).sum::<usize>();
    let mut line = Vec::with_capacity(len);
    line.extend_from_slice(head);
    for piece in pieces.drain(..).rev() {
        line.extend_from_slice(&piece);
    }
    strip_cr(line)
}

fn strip_cr(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

/// Return the last `count` lines of the file at `path`, most recent first.
pub fn tail_lines(path: &Path, count: usize) -> Result<Vec<String>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|e| HostMetricsError::log_read(path, e))?;
    let reader = TailReader::new(file).map_err(|e| HostMetricsError::log_read(path, e))?;

    let mut lines = Vec::with_capacity(count.min(1024));
    for line in reader.take(count) {
        let bytes = line.map_err(|e| HostMetricsError::log_read(path, e))?;
        let text =
            String::from_utf8(bytes).map_err(|_| HostMetricsError::InvalidUtf8(path.into()))?;
        lines.push(text);
    }

    Ok(lines)
}
