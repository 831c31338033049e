use std::collections::HashSet;

use gramvec_core::{extract, ConfigError, FeatureVector, Gram, GramWidths, Token};

use crate::vectorizer::{Strategy, Vectorizer, VectorizerProfile};
use crate::vocab::count_to_i64;

/// Single-pass vectorizer using the hashing trick.
///
/// Every gram lands in `fnv1a64(gram) % num_buckets`. Distinct grams sharing a
/// bucket add into the same slot; which grams collided is not recorded.
#[derive(Debug, Clone)]
pub struct HashedVectorizer {
    num_buckets: usize,
    widths: GramWidths,
    signed: bool,
}

/// Per-document bucket usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashingStats {
    pub distinct_grams: usize,
    pub occupied_buckets: usize,
}

impl HashingStats {
    /// Distinct grams that had to share a bucket with an earlier one.
    pub fn collisions(&self) -> usize {
        self.distinct_grams - self.occupied_buckets
    }
}

impl HashedVectorizer {
    pub fn new(num_buckets: usize, widths: GramWidths) -> Result<Self, ConfigError> {
        if num_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        Ok(Self {
            num_buckets,
            widths,
            signed: false,
        })
    }

    /// Weight each gram by a hash-derived ±1 so collisions tend to cancel.
    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    pub fn widths(&self) -> &GramWidths {
        &self.widths
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Bucket and sign for `gram`. The sign is always `+1` when signed
    /// hashing is off.
    pub fn bucket_for(&self, gram: &Gram) -> (usize, i64) {
        let h = gram_hash(gram);
        // num_buckets fits in u64 on every supported target, and the
        // remainder is below num_buckets, so it fits back into usize.
        let idx = usize::try_from(h % self.num_buckets as u64).unwrap_or_default();
        let sign = if self.signed && (h & (1 << 63)) != 0 {
            -1
        } else {
            1
        };
        (idx, sign)
    }

    pub fn transform<S: AsRef<str>>(&self, tokens: &[S]) -> FeatureVector {
        self.transform_with_stats(tokens).0
    }

    pub fn transform_with_stats<S: AsRef<str>>(&self, tokens: &[S]) -> (FeatureVector, HashingStats) {
        let counts = extract(tokens, &self.widths);
        let mut out = FeatureVector::zeros(self.num_buckets);
        let mut occupied = HashSet::with_capacity(counts.len());
        for (gram, c) in counts.iter() {
            let (idx, sign) = self.bucket_for(gram);
            out.add(idx, sign * count_to_i64(c));
            occupied.insert(idx);
        }
        let stats = HashingStats {
            distinct_grams: counts.len(),
            occupied_buckets: occupied.len(),
        };
        tracing::trace!(
            buckets = self.num_buckets,
            distinct = stats.distinct_grams,
            collisions = stats.collisions(),
            "hashed document"
        );
        (out, stats)
    }
}

impl Vectorizer for HashedVectorizer {
    fn profile(&self) -> VectorizerProfile {
        VectorizerProfile {
            strategy: Strategy::Hashed,
            widths: self.widths.to_vec(),
            dim: self.num_buckets,
            signed: self.signed,
        }
    }

    fn transform(&self, tokens: &[Token]) -> FeatureVector {
        HashedVectorizer::transform(self, tokens)
    }
}

/// FNV-1a over the width, then each token's bytes followed by `0xFF`.
///
/// `0xFF` never occurs in UTF-8, so `("ab", "c")` and `("a", "bc")` hash
/// different inputs.
pub fn gram_hash(gram: &Gram) -> u64 {
    let mut h = Fnv1a64::new();
    h.write(&(gram.width() as u64).to_le_bytes());
    for t in gram.tokens() {
        h.write(t.as_bytes());
        h.write(&[0xFF]);
    }
    h.finish()
}

struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    fn new() -> Self {
        Self(Self::OFFSET)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(ns: &[usize]) -> GramWidths {
        GramWidths::new(ns.iter().copied()).unwrap()
    }

    const DOC: [&str; 8] = ["this", "is", "some", "text", "about", "text", "this", "is"];

    #[test]
    fn zero_buckets_rejected() {
        assert_eq!(
            HashedVectorizer::new(0, GramWidths::unigrams()).unwrap_err(),
            ConfigError::ZeroBuckets
        );
    }

    #[test]
    fn output_width_is_fixed() {
        for n in [1, 7, 64, 1 << 12] {
            let hv = HashedVectorizer::new(n, widths(&[1, 2])).unwrap();
            assert_eq!(hv.transform(&DOC).len(), n);
            assert_eq!(hv.transform::<&str>(&[]).len(), n);
        }
    }

    #[test]
    fn transform_is_deterministic() {
        let a = HashedVectorizer::new(32, widths(&[1, 2])).unwrap();
        let b = HashedVectorizer::new(32, widths(&[1, 2])).unwrap();
        assert_eq!(a.transform(&DOC), a.transform(&DOC));
        assert_eq!(a.transform(&DOC), b.transform(&DOC));
    }

    #[test]
    fn unsigned_mass_equals_gram_count() {
        let hv = HashedVectorizer::new(16, widths(&[1, 2])).unwrap();
        let v = hv.transform(&DOC);
        assert!(v.as_slice().iter().all(|x| *x >= 0));
        // 8 unigrams + 7 bigrams
        assert_eq!(v.as_slice().iter().sum::<i64>(), 15);
    }

    #[test]
    fn single_bucket_collects_everything() {
        let hv = HashedVectorizer::new(1, widths(&[1])).unwrap();
        let (v, stats) = hv.transform_with_stats(&DOC);
        assert_eq!(v.as_slice(), &[8]);
        assert_eq!(stats.distinct_grams, 5);
        assert_eq!(stats.occupied_buckets, 1);
        assert_eq!(stats.collisions(), 4);
    }

    #[test]
    fn signed_magnitudes_match_unsigned_when_collision_free() {
        let unsigned = HashedVectorizer::new(1 << 16, widths(&[1])).unwrap();
        let signed = unsigned.clone().with_signed(true);
        let (u, stats) = unsigned.transform_with_stats(&DOC);
        let s = signed.transform(&DOC);
        if stats.collisions() == 0 {
            let abs: Vec<i64> = s.as_slice().iter().map(|x| x.abs()).collect();
            assert_eq!(abs.as_slice(), u.as_slice());
        }
        assert_eq!(s, signed.transform(&DOC));
    }

    #[test]
    fn bucket_for_stays_in_range() {
        let hv = HashedVectorizer::new(13, widths(&[1])).unwrap().with_signed(true);
        for i in 0..500 {
            let (idx, sign) = hv.bucket_for(&Gram::from_strs(&[format!("w{i}")]));
            assert!(idx < 13);
            assert!(sign == 1 || sign == -1);
        }
    }

    #[test]
    fn token_boundaries_and_width_are_hashed() {
        let ab_c = gram_hash(&Gram::from_strs(&["ab", "c"]));
        let a_bc = gram_hash(&Gram::from_strs(&["a", "bc"]));
        let abc = gram_hash(&Gram::from_strs(&["abc"]));
        assert_ne!(ab_c, a_bc);
        assert_ne!(ab_c, abc);
    }

    #[test]
    fn fnv1a64_reference_vectors() {
        assert_eq!(Fnv1a64::new().finish(), 0xcbf2_9ce4_8422_2325);
        let mut h = Fnv1a64::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);

        assert_eq!(gram_hash(&Gram::from_strs(&["a"])), 0x519d_8dc8_9e05_3dc0);
        assert_eq!(
            gram_hash(&Gram::from_strs(&["text", "about"])),
            0x99d1_4d39_d5b3_683b
        );
    }

    #[test]
    fn stats_on_a_large_table() {
        let hv = HashedVectorizer::new(1 << 20, widths(&[1])).unwrap();
        let (v, stats) = hv.transform_with_stats(&DOC);
        assert_eq!(v.len(), 1 << 20);
        assert_eq!(stats.distinct_grams, 5);
        assert_eq!(stats.occupied_buckets, v.nnz());
    }

    #[test]
    fn usable_from_many_threads() {
        let hv = std::sync::Arc::new(HashedVectorizer::new(64, widths(&[1, 2])).unwrap());
        let expected = hv.transform(&DOC);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let hv = hv.clone();
                std::thread::spawn(move || hv.transform(&DOC))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }

    #[test]
    fn profile_reports_buckets() {
        let hv = HashedVectorizer::new(128, widths(&[2])).unwrap().with_signed(true);
        let p = Vectorizer::profile(&hv);
        assert_eq!(p.strategy, Strategy::Hashed);
        assert_eq!(p.dim, 128);
        assert!(p.signed);
    }
}
