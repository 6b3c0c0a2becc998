use sha2::{Digest, Sha256};

use serde::{Deserialize, Serialize};

/// Width in bytes of every digest produced by this crate
pub const HASH_LEN: usize = 32;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Hash {
        Hash(bytes)
    }
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        let Hash(bytes) = self;
        bytes
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
    /// Hex representation truncated to `len` characters. A `len` of 0 or
    /// above 64 gives the full digest
    pub fn to_hex(&self, len: u8) -> String {
        let len = match len {
            1..=64 => len as usize,
            _ => 2 * HASH_LEN,
        };
        let mut output = String::with_capacity(2 * HASH_LEN);
        for byte in self.as_bytes() {
            output += format!("{:02x}", byte).as_str();
        }
        output.truncate(len);
        output
    }
}
impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex(0))
    }
}
impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex(0))
    }
}

fn finish(hasher: Sha256) -> Hash {
    let mut bytes = [0u8; HASH_LEN];
    bytes.copy_from_slice(&hasher.finalize());
    Hash(bytes)
}

/// Hash anything that can be viewed as bytes (usually Strings or &str)
pub fn hash_bytes<T: AsRef<[u8]>>(s: T) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(s.as_ref());
    finish(hasher)
}

/// Hash anything that can be streamed (usually files)
pub fn hash_stream<T: std::io::Read>(mut stream: T) -> std::io::Result<Hash> {
    let mut hasher = Sha256::new();
    std::io::copy(&mut stream, &mut hasher)?;
    Ok(finish(hasher))
}

/// Hash the concatenation of the given digests, in iteration order.
///
/// Equivalent to `hash_bytes` over the joined raw bytes, without building the
/// joined buffer
pub fn hash_concat<'a, I: IntoIterator<Item = &'a Hash>>(digests: I) -> Hash {
    let mut hasher = Sha256::new();
    for digest in digests {
        hasher.update(digest.as_bytes());
    }
    finish(hasher)
}

/// Digest of the empty input, which is also the digest of an empty directory
pub fn empty_digest() -> Hash {
    hash_bytes(b"")
}

#[cfg(test)]
mod tests {
    use super::{empty_digest, hash_bytes, hash_concat, hash_stream, Hash, HASH_LEN};

    #[test]
    fn to_bytes() {
        for _ in 0..1000 {
            let bytes: [u8; HASH_LEN] = rand::random();
            assert_eq!(Hash(bytes).to_bytes(), bytes.to_vec());
            assert_eq!(Hash::from_bytes(bytes).as_bytes(), &bytes);
        }
    }

    #[test]
    fn to_hex() {
        for b in 0..=15 {
            let h = Hash([17 * b; HASH_LEN]);
            let s = format!("{b:x}");
            for i in 1..64 {
                assert_eq!(h.to_hex(i), s.repeat(i as usize));
            }
            assert_eq!(h.to_hex(0), s.repeat(64));
            assert_eq!(h.to_hex(65), s.repeat(64));
        }
        for _ in 0..1000 {
            let bytes: [u8; HASH_LEN] = rand::random();
            let mut s = String::new();
            for byte in bytes {
                s += format!("{byte:02x}").as_str();
            }
            assert_eq!(Hash(bytes).to_string(), s);
            assert_eq!(format!("{:?}", Hash(bytes)), s);
        }
    }

    #[test]
    fn known_digests() {
        let tests = [
            (
                "",
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            ),
            (
                "here is some random text",
                "3ace1cf028afc2c9872ec0eb6fd25b6a083264de078e9d8459b7ea90954d52fa",
            ),
            (
                "and also a different text",
                "549f713ae4bbf70c48c4aa6a0c9b55af40ba51dd86ebcd7c77d345cdd5fe5cca",
            ),
        ];
        for (text, hash_val) in tests {
            assert_eq!(hash_bytes(text).to_string(), hash_val);
            assert_eq!(
                hash_stream(std::io::Cursor::new(text)).unwrap().to_string(),
                hash_val
            );
        }
    }

    #[test]
    fn empty_sentinel() {
        assert_eq!(
            empty_digest().to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(hash_concat(std::iter::empty::<&Hash>()), empty_digest());
    }

    #[test]
    fn concat_matches_joined_bytes() {
        let a = hash_bytes("a");
        let b = hash_bytes("b");
        let mut joined = a.to_bytes();
        joined.extend_from_slice(b.as_bytes());

        assert_eq!(hash_concat([&a, &b]), hash_bytes(&joined));
        // order is part of the input
        assert_ne!(hash_concat([&a, &b]), hash_concat([&b, &a]));
    }
}
