//! Incremental hashing of byte streams.
//!
//! Bytes are fed in whatever chunks they arrive in and the hex digest is
//! produced once at the end; chunking never changes the result.

use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

const READ_CHUNK: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
}

#[derive(Clone)]
enum Hasher {
    Sha1(Sha1),
    Sha256(Sha256),
}

#[derive(Clone)]
pub struct StreamDigest {
    hasher: Hasher,
}

impl StreamDigest {
    pub fn new(algorithm: Algorithm) -> Self {
        let hasher = match algorithm {
            Algorithm::Sha1 => Hasher::Sha1(Sha1::new()),
            Algorithm::Sha256 => Hasher::Sha256(Sha256::new()),
        };
        Self { hasher }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        match &mut self.hasher {
            Hasher::Sha1(h) => h.update(chunk),
            Hasher::Sha256(h) => h.update(chunk),
        }
    }

    /// Consumes the accumulator and returns the lowercase hex digest.
    pub fn finalize(self) -> String {
        match self.hasher {
            Hasher::Sha1(h) => hex::encode(h.finalize()),
            Hasher::Sha256(h) => hex::encode(h.finalize()),
        }
    }
}

/// Reads `reader` to the end, hashing each chunk as it arrives.
pub async fn digest_reader<R>(algorithm: Algorithm, mut reader: R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut digest = StreamDigest::new(algorithm);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        digest.update(&chunk[..n]);
    }

    Ok(digest.finalize())
}
