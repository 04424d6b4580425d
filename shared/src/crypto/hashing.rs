//! Hex-encoded digests used for content fingerprints

use md5::{Digest, Md5};

/// Hash data using MD5 and return the lowercase hex digest (32 chars)
pub fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}
