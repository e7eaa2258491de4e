//! TFRecord container framing.
//!
//! Each entry is laid out as
//!
//! ```text
//! u64 length (LE) | u32 masked_crc32c(length) (LE) | data | u32 masked_crc32c(data) (LE)
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

const MASK_DELTA: u32 = 0xa282_ead8;

/// CRC32C with TensorFlow's rotation and offset applied.
pub fn masked_crc32c(data: &[u8]) -> u32 {
    let crc = crc32c::crc32c(data);
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Writes TFRecord entries to any byte sink.
pub struct TfRecordWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> TfRecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Frames and writes one entry.
    pub fn write_record(&mut self, data: &[u8]) -> io::Result<()> {
        let len = (data.len() as u64).to_le_bytes();
        self.inner.write_all(&len)?;
        self.inner.write_all(&masked_crc32c(&len).to_le_bytes())?;
        self.inner.write_all(data)?;
        self.inner.write_all(&masked_crc32c(data).to_le_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Writes every payload to a new TFRecord file at `path`.
///
/// The file is created (or truncated), written and flushed here; it is
/// closed when this returns, on success or failure.
pub fn write_tfrecord_file<I, B>(path: &Path, payloads: I) -> Result<usize, ConvertError>
where
    I: IntoIterator<Item = Result<B, ConvertError>>,
    B: AsRef<[u8]>,
{
    let write_err = |source: io::Error| ConvertError::RecordWrite {
        path: PathBuf::from(path),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = TfRecordWriter::new(BufWriter::new(file));

    for payload in payloads {
        writer.write_record(payload?.as_ref()).map_err(write_err)?;
    }

    let count = writer.written();
    writer.into_inner().map_err(write_err)?;
    Ok(count)
}
