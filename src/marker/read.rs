//! Reading and decoding marker content.

use crate::error::{MarkerFormatError, PidfileError, Result};
use crate::pid::Pid;
use nix::fcntl::OFlag;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Longest content excerpt carried in a parse error.
const MAX_EXCERPT_CHARS: usize = 64;

/// Most bytes read from a PID file. A decimal `i32` needs 11; the rest is
/// room for surrounding whitespace.
pub(super) const MAX_MARKER_BYTES: usize = 64;

/// Read the process id recorded in a PID file.
///
/// Returns `Ok(None)` if the file does not exist or holds only whitespace.
/// Surrounding ASCII whitespace is ignored, so markers written by other tools
/// with a trailing newline are accepted.
///
/// # Errors
///
/// * `MarkerReadFailed` - the file exists but could not be read
/// * `MarkerParseFailed` - the content is not a decimal `i32`, or is longer
///   than [`MAX_MARKER_BYTES`]
pub fn read_marker<P: AsRef<Path>>(path: P) -> Result<Option<Pid>> {
    let path = path.as_ref();
    match load(path)? {
        Some(content) => decode(path, &content),
        None => Ok(None),
    }
}

/// Read the raw marker content, or `None` if the file does not exist.
pub(super) fn load(path: &Path) -> Result<Option<String>> {
    // Non-blocking so a FIFO without a writer reads as empty instead of hanging.
    let opened = OpenOptions::new()
        .read(true)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(path);

    match opened {
        Ok(mut file) => read_bounded(&mut file, path).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PidfileError::MarkerReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read the marker content through an already open (and locked) handle.
pub(super) fn load_from(file: &mut File, path: &Path) -> Result<String> {
    file.seek(SeekFrom::Start(0))
        .map_err(|source| PidfileError::MarkerReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    read_bounded(file, path)
}

/// Read at most [`MAX_MARKER_BYTES`]; anything longer is not a marker.
fn read_bounded<R: Read>(reader: R, path: &Path) -> Result<String> {
    let mut bytes = Vec::with_capacity(MAX_MARKER_BYTES + 1);
    reader
        .take(MAX_MARKER_BYTES as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|source| PidfileError::MarkerReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let content = String::from_utf8_lossy(&bytes).into_owned();
    if bytes.len() > MAX_MARKER_BYTES {
        return Err(PidfileError::MarkerParseFailed {
            path: path.to_path_buf(),
            content: excerpt(content.trim_ascii()),
            source: MarkerFormatError::TooLong {
                max: MAX_MARKER_BYTES,
            },
        });
    }
    Ok(content)
}

fn excerpt(content: &str) -> String {
    content.chars().take(MAX_EXCERPT_CHARS).collect()
}

/// Decode marker content into a process id.
///
/// Empty content is the window between a claimant creating the file and
/// writing its id, and counts as no claim.
pub(super) fn decode(path: &Path, content: &str) -> Result<Option<Pid>> {
    let trimmed = content.trim_ascii();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<Pid>()
        .map(Some)
        .map_err(|source| PidfileError::MarkerParseFailed {
            path: path.to_path_buf(),
            content: excerpt(trimmed),
            source: source.into(),
        })
}
