use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of raw bytes in a [`BlogId`].
pub const BLOG_ID_LEN: usize = 12;

/// Number of characters in the hex wire form of a [`BlogId`].
pub const BLOG_ID_HEX_LEN: usize = BLOG_ID_LEN * 2;

/// Store-assigned identifier for a blog post.
///
/// Twelve bytes laid out as:
///
/// ```text
/// [4 bytes: seconds since UNIX epoch, big-endian]
/// [5 bytes: random value, fixed for the lifetime of the process]
/// [3 bytes: counter, big-endian, seeded randomly]
/// ```
///
/// On the wire the identifier is always a 24-character hex string. Clients
/// never construct one; they only echo back what the service handed out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlogId([u8; BLOG_ID_LEN]);

impl BlogId {
    /// Generate a fresh identifier.
    ///
    /// Identifiers generated by one process are unique for up to 2^24
    /// generations per second.
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as u32;
        let count = next_counter();

        let mut bytes = [0u8; BLOG_ID_LEN];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        Self(bytes)
    }

    /// Create a `BlogId` from raw bytes.
    pub const fn from_bytes(bytes: [u8; BLOG_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw 12 bytes.
    pub fn as_bytes(&self) -> &[u8; BLOG_ID_LEN] {
        &self.0
    }

    /// Lowercase hex wire form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the wire form. Accepts upper- or lowercase digits.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != BLOG_ID_LEN {
            return Err(TypeError::InvalidLength {
                expected: BLOG_ID_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; BLOG_ID_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

fn process_unique() -> &'static [u8; 5] {
    static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_UNIQUE.get_or_init(rand::random)
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::random::<u32>() & 0x00FF_FFFF))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00FF_FFFF
}

impl fmt::Debug for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlogId({})", self.to_hex())
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for BlogId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; BLOG_ID_LEN]> for BlogId {
    fn from(bytes: [u8; BLOG_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<BlogId> for [u8; BLOG_ID_LEN] {
    fn from(id: BlogId) -> Self {
        id.0
    }
}

// Persisted and wire forms are both the hex string.
impl Serialize for BlogId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
