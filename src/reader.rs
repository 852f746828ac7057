//! WOD file reading and record reassembly.
//!
//! WOD select exports are gzip-compressed ASCII files in which each cast
//! record is wrapped across several physical lines. A new record starts at
//! every line beginning with the record marker; the lines up to the next
//! marker line are concatenated into one logical record for the decoder.

use crate::constants::{GZIP_EXTENSION, RECORD_MARKER};
use crate::decoder::{DecodeError, decode_cast_record};
use crate::error::Result;
use crate::models::CastRecord;
use flate2::read::MultiGzDecoder;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Instrument code with an optional volume number, e.g. `XBT` or `XBT3`
static INSTRUMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\d*$").expect("instrument pattern is a valid regex")
});

/// One logical cast record as reassembled from physical lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number where the record starts
    pub line_number: usize,
    pub text: String,
}

/// Iterator over the logical records of a WOD text stream
pub struct RecordReader<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
    pending: Option<RawRecord>,
    finished: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_number: 0,
            pending: None,
            finished: false,
        }
    }

    /// Next physical line with its terminator removed, `None` at end of input
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than failing the
    /// whole file; the decoder rejects them if they land in a field.
    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        while matches!(self.buffer.last(), Some(b'\n' | b'\r')) {
            self.buffer.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buffer).into_owned()))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = std::io::Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finished = true;
                    return self.pending.take().map(Ok);
                }
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            };

            if line.is_empty() {
                continue;
            }

            if line.as_bytes()[0] == RECORD_MARKER {
                let started = RawRecord {
                    line_number: self.line_number,
                    text: line,
                };
                if let Some(complete) = self.pending.replace(started) {
                    return Some(Ok(complete));
                }
            } else {
                let line_number = self.line_number;
                self.pending
                    .get_or_insert_with(|| RawRecord {
                        line_number,
                        text: String::new(),
                    })
                    .text
                    .push_str(&line);
            }
        }
    }
}

/// Open a WOD file, decompressing `.gz` files on the fly
pub fn open_wod_file(path: &Path) -> Result<RecordReader<Box<dyn BufRead + Send>>> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead + Send> = if is_gzip(path) {
        debug!("Opening gzip WOD file: {}", path.display());
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        debug!("Opening plain WOD file: {}", path.display());
        Box::new(BufReader::new(file))
    };
    Ok(RecordReader::new(reader))
}

/// Decode every logical record in an in-memory WOD text
pub fn decode_str(
    text: &str,
    instrument_hint: &str,
) -> Vec<std::result::Result<CastRecord, DecodeError>> {
    RecordReader::new(text.as_bytes())
        .map_while(std::io::Result::ok)
        .map(|raw| decode_cast_record(&raw.text, instrument_hint))
        .collect()
}

/// Instrument category encoded in a WOD export file name
///
/// `ocldb1753579979.3150694.OSD2.gz` yields `OSD`: a `.gz` suffix is
/// dropped, the last dotted component is taken, and a trailing volume number
/// is removed. Plain exports (`ocldb1.XBT`) have no suffix to drop.
pub fn extract_instrument(file_name: &str) -> String {
    let core = file_name
        .strip_suffix(GZIP_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name);
    let component = match core.rsplit('.').next() {
        Some(component) if !component.is_empty() => component,
        _ => return file_name.to_string(),
    };

    INSTRUMENT_PATTERN
        .captures(component)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str().to_string())
        .unwrap_or_else(|| component.to_string())
}

/// Instrument category for a file path
pub fn instrument_from_path(path: &Path) -> String {
    path.file_name()
        .map(|name| extract_instrument(&name.to_string_lossy()))
        .unwrap_or_default()
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == GZIP_EXTENSION)
}
