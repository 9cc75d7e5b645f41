//! # Membership filter
//!
//! A space-efficient probabilistic data structure for set membership testing.
//!
//! A filter can tell you with certainty that a key is **not** in the set (no
//! false negatives), but may occasionally report that a key **is** in the
//! set when it isn't (false positives). The false positive rate depends on
//! the number of bits and hash functions used.
//!
//! ## Usage in driftkv
//!
//! Each SSTable owns one filter, pre-seeded with every key ever added to
//! that table's index. During point lookups the persistence manager checks
//! the filter first -- if it says "definitely not present", the SSTable is
//! skipped entirely, avoiding an index lookup and a disk seek.
//!
//! The filter is never persisted to disk: it lives only in memory for as
//! long as its owning SSTable does, and is rebuilt by re-adding every key
//! during startup recovery and during compaction.
//!
//! ## Example
//!
//! ```rust
//! use bloom::Filter;
//!
//! let mut f = Filter::new(1000, 0.01);
//! f.add(b"hello");
//! assert!(f.might_contain(b"hello"));
//! ```

/// A probabilistic set backed by a bit vector with `k` independent hash
/// probes.
///
/// Uses double hashing: `h(i) = h1 + i * h2 mod m`, where `h1` and `h2` are
/// derived from FNV-1a with two different seeds. This keeps the filter's
/// behavior deterministic and portable, unlike a seeded PRNG whose output
/// depends on host standard-library details.
pub struct Filter {
    /// The bit vector storing the filter state.
    bits: Vec<u8>,
    /// Number of bits in the filter (`M`).
    num_bits: u64,
    /// Number of hash functions (`K`).
    num_hashes: u32,
}

impl Filter {
    /// Creates a new filter sized for `expected_items` with the given target
    /// `false_positive_rate`.
    ///
    /// # Panics
    ///
    /// Panics if `expected_items` is 0 or `false_positive_rate` is not in
    /// `(0, 1)`.
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        assert!(expected_items > 0, "expected_items must be > 0");
        assert!(
            false_positive_rate > 0.0 && false_positive_rate < 1.0,
            "false_positive_rate must be in (0, 1)"
        );

        // Optimal number of bits: m = -n * ln(p) / (ln(2)^2)
        let n = expected_items as f64;
        let m = (-n * false_positive_rate.ln() / (std::f64::consts::LN_2.powi(2))).ceil() as u64;
        let m = m.max(8);

        // Optimal number of hashes: k = (m/n) * ln(2)
        let k = ((m as f64 / n) * std::f64::consts::LN_2).ceil() as u32;
        let k = k.max(1);

        Self::with_params(m, k)
    }

    /// Creates a filter from explicit bit-count/hash-count parameters,
    /// bypassing the false-positive-rate sizing formula.
    ///
    /// Used when the caller has an externally configured filter size and
    /// hash count (from [config](../config/index.html)) rather than an
    /// expected item count.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` or `num_hashes` is 0.
    pub fn with_params(num_bits: u64, num_hashes: u32) -> Self {
        assert!(num_bits > 0, "num_bits must be > 0");
        assert!(num_hashes > 0, "num_hashes must be > 0");
        let byte_len = ((num_bits + 7) / 8) as usize;
        Self {
            bits: vec![0u8; byte_len],
            num_bits,
            num_hashes,
        }
    }

    /// Adds a key to the filter.
    ///
    /// After this call, [`might_contain`](Filter::might_contain) for this
    /// key is guaranteed to return `true` for the lifetime of the filter.
    pub fn add(&mut self, key: &[u8]) {
        let (h1, h2) = Self::hash_pair(key);
        for i in 0..self.num_hashes {
            let bit_idx = self.bit_index(h1, h2, i);
            self.set_bit(bit_idx);
        }
    }

    /// Returns `true` if the key **might** be in the set, `false` if it is
    /// **definitely not** in the set.
    ///
    /// No false negatives: this always returns `true` for any key
    /// previously passed to [`add`](Filter::add) on this filter.
    #[must_use]
    pub fn might_contain(&self, key: &[u8]) -> bool {
        let (h1, h2) = Self::hash_pair(key);
        for i in 0..self.num_hashes {
            let bit_idx = self.bit_index(h1, h2, i);
            if !self.get_bit(bit_idx) {
                return false;
            }
        }
        true
    }

    /// Resets the filter to its empty state, as if no key had ever been
    /// added.
    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|b| *b = 0);
    }

    /// Returns the number of bits in the filter.
    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions.
    #[must_use]
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    // ---- Internal helpers ----

    /// Computes two independent 64-bit hashes using FNV-1a with different
    /// seeds.
    fn hash_pair(key: &[u8]) -> (u64, u64) {
        let h1 = fnv1a_64(key, 0xcbf2_9ce4_8422_2325);
        let h2 = fnv1a_64(key, 0x517c_c1b7_2722_0a95);
        (h1, h2)
    }

    /// Double hashing: `h(i) = (h1 + i * h2) mod num_bits`.
    fn bit_index(&self, h1: u64, h2: u64, i: u32) -> u64 {
        h1.wrapping_add((i as u64).wrapping_mul(h2)) % self.num_bits
    }

    fn set_bit(&mut self, idx: u64) {
        let byte_idx = (idx / 8) as usize;
        let bit_offset = (idx % 8) as u8;
        self.bits[byte_idx] |= 1 << bit_offset;
    }

    fn get_bit(&self, idx: u64) -> bool {
        let byte_idx = (idx / 8) as usize;
        let bit_offset = (idx % 8) as u8;
        (self.bits[byte_idx] >> bit_offset) & 1 == 1
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("num_bits", &self.num_bits)
            .field("num_hashes", &self.num_hashes)
            .field("bytes", &self.bits.len())
            .finish()
    }
}

/// FNV-1a 64-bit hash with a configurable starting basis.
fn fnv1a_64(data: &[u8], basis: u64) -> u64 {
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = basis;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests;
