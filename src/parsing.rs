//! word2vec text format loader.
//!
//! ```text
//! 3 2
//! Q42 0.12 -0.40
//! Q64 0.10 -0.38
//! Q90 0.95 0.22
//! ```
//!
//! The header holds exactly two unsigned integers: entity count and dimensions.
//! Every following non-blank line is a label followed by `dimensions` values.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, error, info};

use crate::core::EmbeddingSpace;
use crate::errors::EmbeddingError;

/// Upper bound on values preallocated from the header, which is not trusted.
const PREALLOC_VALUES: usize = 1 << 20;

/// Parses `<count> <dims>`; anything else is an invalid header.
pub fn parse_header(line: &str) -> Result<(usize, usize), EmbeddingError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let invalid = || EmbeddingError::InvalidHeader(line.trim_end().to_string());

    if fields.len() != 2 || !fields.iter().all(|f| f.bytes().all(|b| b.is_ascii_digit())) {
        return Err(invalid());
    }
    let count = fields[0].parse::<usize>().map_err(|_| invalid())?;
    let dims = fields[1].parse::<usize>().map_err(|_| invalid())?;
    Ok((count, dims))
}

pub fn read_word2vec(path: impl AsRef<Path>) -> Result<EmbeddingSpace, EmbeddingError> {
    let path = path.as_ref();
    info!("Loading embedding from {}", path.display());
    let file = File::open(path).map_err(|e| {
        error!("Unable to open embedding file {}: {}", path.display(), e);
        EmbeddingError::Io(e)
    })?;
    parse_word2vec(BufReader::new(file))
}

pub fn parse_word2vec<R: BufRead>(reader: R) -> Result<EmbeddingSpace, EmbeddingError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(EmbeddingError::InvalidHeader(String::new())),
    };
    let (count, dims) = parse_header(&header)?;
    debug!("Header declares {} entities x {} dimensions", count, dims);

    let values_hint = count.checked_mul(dims).unwrap_or(usize::MAX);
    let mut labels = Vec::with_capacity(count.min(PREALLOC_VALUES / dims.max(1)));
    let mut flat = Vec::with_capacity(values_hint.min(PREALLOC_VALUES));

    for (idx, line) in lines.enumerate() {
        let line = line?;
        let lineno = idx + 2;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let label = fields
            .next()
            .ok_or_else(|| EmbeddingError::parse(lineno, "missing label"))?;

        let before = flat.len();
        for field in fields {
            let value = field.parse::<f64>().map_err(|e| {
                EmbeddingError::parse(lineno, format!("bad value {:?}: {}", field, e))
            })?;
            flat.push(value);
        }

        let found = flat.len() - before;
        if found != dims {
            return Err(EmbeddingError::RaggedRow {
                row: labels.len(),
                expected: dims,
                actual: found,
            });
        }
        labels.push(label.to_string());
    }

    if labels.len() != count {
        return Err(EmbeddingError::LabelCountMismatch {
            labels: labels.len(),
            rows: count,
        });
    }

    EmbeddingSpace::from_flat(labels, flat, dims)
}
