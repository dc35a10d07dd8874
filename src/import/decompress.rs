// Transparent gzip handling for uploaded files.
//
// Uploads are sniffed for the gzip magic bytes instead of trusting the file
// name or content type. Concatenated gzip members are decoded back to back,
// so `cat a.gz b.gz` uploads the same rows as the uncompressed concatenation.

use std::io::{self, Cursor, Read};

use axum::body::Bytes;
use flate2::read::MultiGzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Byte reader over an uploaded file, decompressing gzip on the fly
pub enum UploadReader {
    Plain(Cursor<Bytes>),
    Gzip(MultiGzDecoder<Cursor<Bytes>>),
}

impl UploadReader {
    pub fn new(bytes: Bytes) -> Self {
        if is_gzip(&bytes) {
            tracing::debug!("Upload is gzip compressed ({} bytes)", bytes.len());
            UploadReader::Gzip(MultiGzDecoder::new(Cursor::new(bytes)))
        } else {
            UploadReader::Plain(Cursor::new(bytes))
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, UploadReader::Gzip(_))
    }
}

impl Read for UploadReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            UploadReader::Plain(inner) => inner.read(buf),
            UploadReader::Gzip(inner) => inner.read(buf),
        }
    }
}
