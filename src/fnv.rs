//! FNV-1a hashing.
//!
//! Placement in the table is a pure function of this hash and the capacity,
//! so the constants and byte order here are fixed: the same key lands in the
//! same slot across runs, platforms and builds.

use core::hash::{BuildHasher, Hasher};

/// 64-bit FNV offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
/// 64-bit FNV prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash `bytes` with 64-bit FNV-1a (xor, then multiply, per byte).
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut h = FnvHasher::new();
    h.write(bytes);
    h.finish()
}

/// Streaming FNV-1a hasher.
///
/// Note that `str`'s `Hash` impl appends a `0xff` terminator after the bytes;
/// the table feeds raw key bytes through `write` instead, so its hashes equal
/// [`fnv1a`] of the key.
#[derive(Debug, Copy, Clone)]
pub struct FnvHasher {
    hash: u64,
}

impl FnvHasher {
    pub const fn new() -> Self {
        Self {
            hash: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash ^= u64::from(b);
            self.hash = self.hash.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Unseeded builder for [`FnvHasher`]; every hasher starts from the offset basis.
#[derive(Debug, Copy, Clone, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    #[inline]
    fn build_hasher(&self) -> FnvHasher {
        FnvHasher::new()
    }
}
