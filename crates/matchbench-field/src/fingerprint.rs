//! Karp-Rabin fingerprints over byte sequences.
//!
//! The fingerprint of `s[0..n)` with base `r` is `sum s[i] * r^i (mod p)`.
//! For a split `all = prefix ++ suffix` with `|prefix| = k` the following
//! identities hold exactly and are what the streaming engine leans on:
//!
//! ```text
//! fp(all)    = fp(prefix) + fp(suffix) * r^k
//! fp(prefix) = fp(all) - fp(suffix) * r^k
//! fp(suffix) = (fp(all) - fp(prefix)) * r^-k
//! ```
//!
//! Every subtraction goes through [`Field::sub`] and every product is
//! reduced before it is added to anything, so nothing here can overflow as
//! long as `p < 2^32`.

use crate::field::{Field, FieldVal, Fp};

impl Field {
    /// Fingerprint a sequence in one pass.
    ///
    /// Returns the fingerprint and `r^len`, which callers invariably need
    /// next.
    pub fn hash(&self, r: &FieldVal, seq: &[u8]) -> (Fp, FieldVal) {
        self.hash_extend(r, seq, 0, 0, FieldVal::ONE)
    }

    /// Fingerprint `seq` given that `seq[..prefix_len]` already hashed to
    /// `prefix_fp` with `rn = r^prefix_len`.
    ///
    /// Returns the full fingerprint and `r^seq.len()`.
    pub fn hash_extend(
        &self,
        r: &FieldVal,
        seq: &[u8],
        prefix_fp: Fp,
        prefix_len: usize,
        rn: FieldVal,
    ) -> (Fp, FieldVal) {
        let p = self.prime();
        let mut fp = prefix_fp;
        let (mut rn_val, mut rn_inv) = (rn.val, rn.inv);
        for &byte in &seq[prefix_len..] {
            fp = (fp + byte as u64 * rn_val % p) % p;
            rn_val = rn_val * r.val % p;
            rn_inv = rn_inv * r.inv % p;
        }
        (
            fp,
            FieldVal {
                val: rn_val,
                inv: rn_inv,
            },
        )
    }

    /// `fp(suffix)` from the whole-sequence fingerprint and the prefix
    /// fingerprint, where `r_prefix = r^|prefix|`.
    #[inline]
    pub fn suffix_fp(&self, all_fp: Fp, prefix_fp: Fp, r_prefix: &FieldVal) -> Fp {
        self.sub(all_fp, prefix_fp) * r_prefix.inv % self.prime()
    }

    /// `fp(prefix)` from the whole-sequence fingerprint and the suffix
    /// fingerprint, where `r_prefix = r^|prefix|`.
    #[inline]
    pub fn prefix_fp(&self, all_fp: Fp, suffix_fp: Fp, r_prefix: &FieldVal) -> Fp {
        self.sub(all_fp, suffix_fp * r_prefix.val % self.prime())
    }

    /// `fp(prefix ++ suffix)` from the two part fingerprints, where
    /// `r_prefix = r^|prefix|`.
    #[inline]
    pub fn concat_fp(&self, prefix_fp: Fp, suffix_fp: Fp, r_prefix: &FieldVal) -> Fp {
        (prefix_fp + suffix_fp * r_prefix.val % self.prime()) % self.prime()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Field, FieldVal) {
        let field = Field::new((1u64 << 31) - 1);
        let r = field.element(1_000_003);
        (field, r)
    }

    #[test]
    fn hash_returns_r_to_the_len() {
        let (field, r) = setup();
        let (_, rn) = field.hash(&r, b"abcdef");
        let mut expect = FieldVal::ONE;
        for _ in 0..6 {
            expect = field.mul(expect, r);
        }
        assert_eq!(rn, expect);
    }

    #[test]
    fn hash_extend_matches_full_hash() {
        let (field, r) = setup();
        let seq = b"the quick brown fox jumps over the lazy dog";
        let (full, rn_full) = field.hash(&r, seq);
        let (prefix_fp, rn_prefix) = field.hash(&r, &seq[..17]);
        let (extended, rn_ext) = field.hash_extend(&r, seq, prefix_fp, 17, rn_prefix);
        assert_eq!(extended, full);
        assert_eq!(rn_ext, rn_full);
    }

    #[test]
    fn concat_identity() {
        let (field, r) = setup();
        let a: &[u8] = b"hello, ";
        let b: &[u8] = b"world";
        let (fp_a, rn_a) = field.hash(&r, a);
        let (fp_b, _) = field.hash(&r, b);
        let (fp_ab, _) = field.hash(&r, b"hello, world");
        assert_eq!(field.concat_fp(fp_a, fp_b, &rn_a), fp_ab);
    }

    #[test]
    fn prefix_and_suffix_identities() {
        let (field, r) = setup();
        let all = b"streaming dictionary matching";
        for split in [0usize, 1, 9, 20, all.len()] {
            let (fp_all, _) = field.hash(&r, all);
            let (fp_pre, rn_pre) = field.hash(&r, &all[..split]);
            let (fp_suf, _) = field.hash(&r, &all[split..]);
            assert_eq!(field.suffix_fp(fp_all, fp_pre, &rn_pre), fp_suf);
            assert_eq!(field.prefix_fp(fp_all, fp_suf, &rn_pre), fp_pre);
        }
    }

    #[test]
    fn zero_and_high_bytes_hash_distinctly() {
        let (field, r) = setup();
        let (a, _) = field.hash(&r, &[0x00, 0xFF, 0x00]);
        let (b, _) = field.hash(&r, &[0xFF, 0x00, 0xFF]);
        assert_ne!(a, b);
    }

    #[test]
    fn identities_survive_a_tiny_field() {
        // p = 101 forces plenty of wraparound in every operation.
        let field = Field::new(101);
        let r = field.element(37);
        let all: Vec<u8> = (0u8..=255).collect();
        let (fp_all, _) = field.hash(&r, &all);
        let (fp_pre, rn_pre) = field.hash(&r, &all[..100]);
        let (fp_suf, _) = field.hash(&r, &all[100..]);
        assert_eq!(field.concat_fp(fp_pre, fp_suf, &rn_pre), fp_all);
        assert_eq!(field.suffix_fp(fp_all, fp_pre, &rn_pre), fp_suf);
        assert_eq!(field.prefix_fp(fp_all, fp_suf, &rn_pre), fp_pre);
    }
}
