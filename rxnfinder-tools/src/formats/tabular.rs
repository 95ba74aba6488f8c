//! BLAST tabular (outfmt 6) parsing
//!
//! Column order is positional:
//! 0: query id, 1: subject id, 2: identity%, 3: align_len,
//! 4: mismatches, 5: gap opens, 6: q_start, 7: q_end,
//! 8: s_start, 9: s_end, 10: evalue, 11: bit_score

use rxnfinder_core::{AlignmentRecord, RxnFinderError, RxnFinderResult};
use std::io::BufRead;
use std::str::FromStr;
use tracing::{error, warn};

/// Number of columns in the standard tabular format
pub const TABULAR_COLUMNS: usize = 12;

/// Parse one data row. `line_no` is 1-based and only used for error messages.
pub fn parse_tabular_line(line: &str, line_no: usize) -> RxnFinderResult<AlignmentRecord> {
    let parts: Vec<&str> = if line.contains('\t') {
        line.trim_end_matches(['\r', '\n']).split('\t').collect()
    } else {
        line.split_whitespace().collect()
    };

    if parts.len() < TABULAR_COLUMNS {
        return Err(RxnFinderError::MalformedAlignmentRecord {
            line: line_no,
            reason: format!(
                "expected {} columns, found {}",
                TABULAR_COLUMNS,
                parts.len()
            ),
        });
    }

    let query_gene = parts[0].trim();
    let target_gene = parts[1].trim();
    if query_gene.is_empty() || target_gene.is_empty() {
        return Err(RxnFinderError::MalformedAlignmentRecord {
            line: line_no,
            reason: "empty query or subject id".to_string(),
        });
    }

    Ok(AlignmentRecord {
        query_gene: query_gene.to_string(),
        target_gene: target_gene.to_string(),
        percent_identity: finite_column(parts[2], "percent identity", line_no)?,
        alignment_length: column(parts[3], "alignment length", line_no)?,
        mismatches: column(parts[4], "mismatches", line_no)?,
        gap_opens: column(parts[5], "gap opens", line_no)?,
        query_start: column(parts[6], "query start", line_no)?,
        query_end: column(parts[7], "query end", line_no)?,
        subject_start: column(parts[8], "subject start", line_no)?,
        subject_end: column(parts[9], "subject end", line_no)?,
        e_value: column(parts[10], "e-value", line_no)?,
        bit_score: finite_column(parts[11], "bit score", line_no)?,
    })
}

fn column<T: FromStr>(raw: &str, name: &str, line_no: usize) -> RxnFinderResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| RxnFinderError::MalformedAlignmentRecord {
            line: line_no,
            reason: format!("invalid {} '{}'", name, raw),
        })
}

fn finite_column(raw: &str, name: &str, line_no: usize) -> RxnFinderResult<f64> {
    let value: f64 = column(raw, name, line_no)?;
    if !value.is_finite() {
        return Err(RxnFinderError::MalformedAlignmentRecord {
            line: line_no,
            reason: format!("non-finite {} '{}'", name, raw),
        });
    }
    Ok(value)
}

/// Streaming reader over tabular output. Comment (`#`) and blank lines are skipped;
/// every other line yields a parsed record or the reason it could not be parsed.
pub struct TabularRecords<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> TabularRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Drop malformed rows with a warning instead of yielding them
    pub fn skip_malformed(self) -> SkipMalformed<R> {
        SkipMalformed {
            inner: self,
            skipped: 0,
            io_error: None,
        }
    }
}

impl<R: BufRead> Iterator for TabularRecords<R> {
    type Item = RxnFinderResult<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buf.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    return Some(parse_tabular_line(&self.buf, self.line_no));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Iterator of well-formed records; malformed rows are logged and counted
pub struct SkipMalformed<R> {
    inner: TabularRecords<R>,
    skipped: usize,
    io_error: Option<std::io::Error>,
}

impl<R: BufRead> SkipMalformed<R> {
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of skipped rows, or the read error that ended the stream early
    pub fn finish(self) -> RxnFinderResult<usize> {
        match self.io_error {
            Some(e) => Err(e.into()),
            None => Ok(self.skipped),
        }
    }
}

impl<R: BufRead> Iterator for SkipMalformed<R> {
    type Item = AlignmentRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.io_error.is_some() {
            return None;
        }
        loop {
            match self.inner.next()? {
                Ok(record) => return Some(record),
                Err(RxnFinderError::Io(e)) => {
                    error!("Failed reading alignment output: {}", e);
                    self.io_error = Some(e);
                    return None;
                }
                Err(e) => {
                    warn!("Skipping alignment row: {}", e);
                    self.skipped += 1;
                }
            }
        }
    }
}
