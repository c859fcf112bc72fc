use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::trace;

use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};
use crate::results::LocalResults;

const BUFFER_CAPACITY: usize = 8192; // Initial buffer size for reading files
const LINE_CAPACITY: usize = 256;

/// Decodes one line according to the encoding mode
fn decode_line<'a>(
    bytes: &'a [u8],
    path: &Path,
    encoding_mode: EncodingMode,
) -> SearchResult<Cow<'a, str>> {
    if let Ok(line) = std::str::from_utf8(bytes) {
        return Ok(Cow::Borrowed(line));
    }

    match encoding_mode {
        EncodingMode::Ignore => {
            let mut line = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                line.push_str(chunk.valid());
            }
            Ok(Cow::Owned(line))
        }
        EncodingMode::Lossy => Ok(String::from_utf8_lossy(bytes)),
        EncodingMode::FailFast => String::from_utf8(bytes.to_vec())
            .map(Cow::Owned)
            .map_err(|e| SearchError::encoding_error(path, e)),
    }
}

/// Strips the line terminator (`\n` or `\r\n`) left by `read_until`
fn trim_line_ending(mut bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_suffix(b"\n") {
        bytes = rest;
        if let Some(rest) = bytes.strip_suffix(b"\r") {
            bytes = rest;
        }
    }
    bytes
}

/// Lines read and matches recorded for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileScan {
    pub lines: u64,
    pub matches: u64,
}

/// Reads files line by line and records every keyword contained in each line
#[derive(Debug, Clone, Copy)]
pub struct LineScanner<'k> {
    keywords: &'k [String],
    encoding_mode: EncodingMode,
}

impl<'k> LineScanner<'k> {
    pub fn new(keywords: &'k [String], encoding_mode: EncodingMode) -> Self {
        Self {
            keywords,
            encoding_mode,
        }
    }

    /// Scans `path`, appending one `(keyword, path)` entry to `local` per matching line and
    /// counting lines and matches into `scan`.
    ///
    /// If reading fails part-way, the matches from the lines already read stay in `local`, their
    /// counts stay in `scan`, and the error is returned.
    pub fn scan_file(
        &self,
        path: &Path,
        local: &mut LocalResults,
        scan: &mut FileScan,
    ) -> SearchResult<()> {
        trace!("Scanning file: {}", path.display());
        let file = File::open(path).map_err(|e| SearchError::from_open(path, e))?;

        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut buffer = Vec::with_capacity(LINE_CAPACITY);

        loop {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|e| SearchError::read_error(path, e))?;
            if read == 0 {
                break;
            }
            scan.lines += 1;

            let line = decode_line(trim_line_ending(&buffer), path, self.encoding_mode)?;
            scan.matches += self.scan_line(&line, path, local);
        }

        trace!(
            "Found {} matches in {} lines of {}",
            scan.matches,
            scan.lines,
            path.display()
        );
        Ok(())
    }

    /// Records every keyword found in `line`, returning how many matched
    fn scan_line(&self, line: &str, path: &Path, local: &mut LocalResults) -> u64 {
        let mut matched = 0;
        for keyword in self.keywords {
            if line.contains(keyword.as_str()) {
                local.record(keyword, path);
                matched += 1;
            }
        }
        matched
    }
}
