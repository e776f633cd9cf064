use std::io::BufRead;

use crate::{lexical::is_comment_or_blank, MineLibParseError};

/// Sequential line supplier over a buffered reader.
///
/// Keeps track of the 1-based number of the line it handed out last and can
/// take back a single line, which the section readers use to return a
/// terminating header to the header loop.
#[derive(Debug)]
pub struct LineCursor<R> {
    reader: R,
    buffer: String,
    line_num: usize,
    pushed_back: Option<String>,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line_num: 0,
            pushed_back: None,
        }
    }

    /// Number of the line returned by the last call to `next_line` or
    /// `next_data_line`. Zero before anything was read.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    /// Next raw line without its line terminator, `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>, MineLibParseError> {
        if let Some(line) = self.pushed_back.take() {
            return Ok(Some(line));
        }

        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_num += 1;

        Ok(Some(
            self.buffer
                .trim_end_matches(|c: char| c == '\n' || c == '\r')
                .to_owned(),
        ))
    }

    /// Next line that is neither blank nor a `%` comment, trimmed.
    pub fn next_data_line(&mut self) -> Result<Option<String>, MineLibParseError> {
        while let Some(line) = self.next_line()? {
            if !is_comment_or_blank(&line) {
                return Ok(Some(line.trim().to_owned()));
            }
        }

        Ok(None)
    }

    /// Hand the last returned line back so the next read yields it again.
    pub fn push_back(&mut self, line: String) {
        debug_assert!(self.pushed_back.is_none());
        self.pushed_back = Some(line);
    }
}
