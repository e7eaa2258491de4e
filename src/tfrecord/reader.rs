//! TFRecord reader with CRC verification.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use super::writer::masked_crc32c;
use crate::error::ConvertError;

/// Iterates the entries of a TFRecord stream.
///
/// Yields `Err(RecordCorrupt)` once on a bad CRC or a truncated entry and
/// then stops.
pub struct TfRecordReader<R: Read> {
    inner: R,
    source: PathBuf,
    done: bool,
}

impl<R: Read> TfRecordReader<R> {
    /// `source` only labels errors.
    pub fn new(inner: R, source: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            source: source.into(),
            done: false,
        }
    }

    fn corrupt(&self, message: impl Into<String>) -> ConvertError {
        ConvertError::RecordCorrupt {
            path: self.source.clone(),
            message: message.into(),
        }
    }

    fn read_entry(&mut self) -> Result<Option<Vec<u8>>, ConvertError> {
        let mut len_bytes = [0u8; 8];
        match read_full(&mut self.inner, &mut len_bytes)? {
            0 => return Ok(None),
            8 => {}
            n => return Err(self.corrupt(format!("truncated length header ({n} of 8 bytes)"))),
        }

        let mut crc_bytes = [0u8; 4];
        if read_full(&mut self.inner, &mut crc_bytes)? != 4 {
            return Err(self.corrupt("truncated length checksum"));
        }
        if u32::from_le_bytes(crc_bytes) != masked_crc32c(&len_bytes) {
            return Err(self.corrupt("length checksum mismatch"));
        }

        let len = u64::from_le_bytes(len_bytes);
        let mut data = Vec::new();
        let read = (&mut self.inner).take(len).read_to_end(&mut data)?;
        if read as u64 != len {
            return Err(self.corrupt(format!("truncated payload ({read} of {len} bytes)")));
        }

        if read_full(&mut self.inner, &mut crc_bytes)? != 4 {
            return Err(self.corrupt("truncated payload checksum"));
        }
        if u32::from_le_bytes(crc_bytes) != masked_crc32c(&data) {
            return Err(self.corrupt("payload checksum mismatch"));
        }

        Ok(Some(data))
    }
}

impl<R: Read> Iterator for TfRecordReader<R> {
    type Item = Result<Vec<u8>, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_entry() {
            Ok(Some(data)) => Some(Ok(data)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Reads every entry of the TFRecord file at `path`.
pub fn read_tfrecord_file(path: &Path) -> Result<Vec<Vec<u8>>, ConvertError> {
    let file = File::open(path)?;
    TfRecordReader::new(BufReader::new(file), path).collect()
}

/// Reads every entry from an in-memory TFRecord stream.
///
/// Useful for fuzzing.
pub fn read_tfrecord_slice(bytes: &[u8]) -> Result<Vec<Vec<u8>>, ConvertError> {
    TfRecordReader::new(bytes, "<bytes>").collect()
}

/// Like `read_exact`, but reports how many bytes were available at EOF.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfrecord::TfRecordWriter;

    fn framed(payloads: &[&[u8]]) -> Vec<u8> {
        let mut writer = TfRecordWriter::new(Vec::new());
        for p in payloads {
            writer.write_record(p).unwrap();
        }
        writer.into_inner().unwrap()
    }

    #[test]
    fn test_reads_back_written_entries() {
        let bytes = framed(&[b"first", b"", b"third entry"]);
        let entries = read_tfrecord_slice(&bytes).unwrap();
        assert_eq!(
            entries,
            vec![b"first".to_vec(), Vec::new(), b"third entry".to_vec()]
        );
    }

    #[test]
    fn test_empty_stream_has_no_entries() {
        assert!(read_tfrecord_slice(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_flipped_payload_byte_is_detected() {
        let mut bytes = framed(&[b"payload"]);
        bytes[13] ^= 0x01;
        let err = read_tfrecord_slice(&bytes).unwrap_err();
        assert!(err.to_string().contains("payload checksum mismatch"));
    }

    #[test]
    fn test_truncated_stream_is_detected() {
        let bytes = framed(&[b"payload"]);
        let err = read_tfrecord_slice(&bytes[..bytes.len() - 2]).unwrap_err();
        assert!(matches!(err, ConvertError::RecordCorrupt { .. }));
    }

    #[test]
    fn test_corrupt_length_is_detected() {
        let mut bytes = framed(&[b"payload"]);
        bytes[0] = 0xff;
        let err = read_tfrecord_slice(&bytes).unwrap_err();
        assert!(err.to_string().contains("length checksum mismatch"));
    }
}
