//! Filesystem infrastructure: implements `FileHasher`.

use std::io::{ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::application::ports::FileHasher;
use crate::domain::tools::hex_encode;

/// Production filesystem implementation of `FileHasher`.
pub struct LocalFs;

impl FileHasher for LocalFs {
    fn sha256_file(&self, path: &Path) -> Result<Option<String>> {
        match std::fs::File::open(path) {
            Ok(file) => sha256_reader(file)
                .with_context(|| format!("hashing {}", path.display()))
                .map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("opening {}", path.display())),
        }
    }
}

/// Compute the SHA256 hex digest of a reader.
///
/// Reads in 64 KB chunks to avoid loading large archives into memory.
///
/// # Errors
///
/// Returns an error if the reader fails.
pub fn sha256_reader(mut reader: impl Read) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 65536];
    loop {
        let n = reader.read(&mut buf).context("reading file")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex_encode(&hasher.finalize()))
}
