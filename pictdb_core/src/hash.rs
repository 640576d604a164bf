//! SHA-256 façade. The rest of the catalog treats the digest as an opaque 32-byte
//! value; equality of digests is treated as equality of content (see dedup.rs).

use sha2::{Digest, Sha256};

pub const SHA_LEN: usize = 32;

/// Computes the SHA-256 digest of `buf`.
pub fn sha256(buf: &[u8]) -> [u8; SHA_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(buf);
    let digest = hasher.finalize();
    let mut out = [0u8; SHA_LEN];
    out.copy_from_slice(&digest);
    out
}

/// Renders a digest as lowercase hex, for human-facing `list` output.
pub fn to_hex(sha: &[u8; SHA_LEN]) -> String {
    hex::encode(sha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        let digest = sha256(b"abc");
        assert_eq!(
            to_hex(&digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn equal_content_equal_digest() {
        assert_eq!(sha256(b"same"), sha256(b"same"));
        assert_ne!(sha256(b"same"), sha256(b"different"));
    }
}
