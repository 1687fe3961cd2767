//! Length-prefixed frames exchanged with process workers.
//!
//! Every frame is an 8-byte little-endian payload length followed by the
//! bincode encoding of the payload. The explicit length lets the reader
//! tell a truncated transfer apart from a wrong answer.

use std::borrow::Cow;
use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matrix::dense::{Element, Matrix};
use crate::matrix::partition::RowRange;

pub const LEN_PREFIX: usize = 8;

/// Upper bound on a payload; anything larger is treated as garbage.
pub const MAX_PAYLOAD: u64 = 1 << 30;

/// Parent to worker: which rows to compute, and the inputs.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskFrame<'a> {
    pub worker: usize,
    pub range: RowRange,
    pub a: Cow<'a, Matrix>,
    pub b: Cow<'a, Matrix>,
}

/// Worker to parent: the computed rows.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFrame {
    pub worker: usize,
    pub range: RowRange,
    pub cells: Vec<Element>,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("truncated frame: expected {expected} bytes, received {received}")]
    Truncated { expected: usize, received: usize },

    #[error("frame length {0} exceeds limit")]
    TooLarge(u64),

    #[error("decode failed: {0}")]
    Decode(#[from] bincode::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}

pub fn write_frame<T: Serialize, W: Write>(writer: &mut W, frame: &T) -> Result<(), FrameError> {
    let payload = bincode::serialize(frame)?;
    writer.write_all(&(payload.len() as u64).to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

pub fn read_frame<T: DeserializeOwned, R: Read>(reader: &mut R) -> Result<T, FrameError> {
    let mut prefix = [0u8; LEN_PREFIX];
    let got = read_full(reader, &mut prefix)?;
    if got < LEN_PREFIX {
        return Err(FrameError::Truncated {
            expected: LEN_PREFIX,
            received: got,
        });
    }

    let len = u64::from_le_bytes(prefix);
    if len > MAX_PAYLOAD {
        return Err(FrameError::TooLarge(len));
    }

    let mut payload = vec![0u8; len as usize];
    let got = read_full(reader, &mut payload)?;
    if got < payload.len() {
        return Err(FrameError::Truncated {
            expected: LEN_PREFIX + payload.len(),
            received: LEN_PREFIX + got,
        });
    }

    Ok(bincode::deserialize(&payload)?)
}

/// Like `read_exact`, but reports how much arrived before EOF.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
