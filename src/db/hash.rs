//! Keyed credential hashing.
//!
//! Each hash uses a fresh random key, so hashing the same input twice yields
//! different strings. The stored format is `<hex digest>.<hex key>`.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Hash `data` under a fresh 16-byte random key.
pub fn hash(data: &str) -> String {
    let mut key_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut key_bytes);
    let key = hex::encode(key_bytes);
    format!("{}.{}", digest(data, &key), key)
}

/// Recompute the digest under the stored key and compare.
pub fn verify(data: &str, stored: &str) -> bool {
    let Some((expected, key)) = stored.split_once('.') else {
        return false;
    };
    digest(data, key) == expected
}

fn digest(data: &str, key: &str) -> String {
    let mut mac = HmacSha512::new_from_slice(key.as_bytes()).expect("HMAC: any key size");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
