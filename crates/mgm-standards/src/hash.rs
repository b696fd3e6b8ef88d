#![deny(unsafe_code)]

use sha2::Digest;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// Hex SHA-512 of `salt` followed by `bytes`.
pub fn salted_sha512_hex(salt: &[u8], bytes: &[u8]) -> String {
    let mut hasher = sha2::Sha512::new();
    hasher.update(salt);
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
