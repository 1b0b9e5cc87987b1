//! Real-time Breslauer-Galil stream matching.
//!
//! A single pattern of length `n` is divided into `log n` stages; stage `k`
//! is the pattern prefix of length `2^k` (the final stage is the whole
//! pattern). A stream position that has not yet been ruled out as the start
//! of a full occurrence is a *viable occurrence* (VO); each VO enters the
//! ladder at the first stage and climbs one rung at a time, each rung
//! verified by comparing a Karp-Rabin fingerprint of the corresponding
//! stream block against the precomputed fingerprint of the pattern prefix.
//!
//! The first stage is special. The engine finds the period of the pattern
//! prefix of length `2^loglogn` and follows it forward through the pattern;
//! the largest power-of-two prefix still inside that periodic run becomes
//! the entry rung. Entry-rung occurrences are detected exactly with two
//! Galil real-time KMP instances, one over the period and one over the
//! leftover after the last whole period, by counting back-to-back period
//! occurrences.
//!
//! Properties of periodicity guarantee that the VOs waiting on any one rung
//! form an arithmetic progression, so a rung is stored as `(first, step,
//! count)` with cached fingerprints and powers of `r`, and only the head of
//! the progression ever needs to be examined. The rungs are visited round
//! robin, one per input byte, in **decreasing** order; if a rung were
//! visited in increasing order, a VO promoted into it earlier in the same
//! byte could be compared against a stale head that had already left its
//! verification window, and a legitimate promotion would read as a
//! fingerprint collision. The two topmost rungs cannot wait for the round
//! robin (a match would be reported late), so they are checked on every
//! byte while they hold a VO.
//!
//! Fingerprint collisions are possible and survivable: they are counted,
//! the affected rung is cleared or the incoming VO discarded, and the
//! stream goes on. With `p` near `2^31` a collision-free run is
//! overwhelmingly likely for streams well below `2^26` bytes.

mod multi;

pub use multi::MultiBg;

use matchbench_field::{Field, FieldVal, Fp};
use matchbench_kmp::{period, KmpRealTime};
use rand::Rng;

/// Patterns no longer than this skip the ladder entirely and run a single
/// real-time KMP.
pub const SHORT_PATTERN_MAX: usize = 8;

/// Default field size: the Mersenne prime `2^31 - 1`.
pub const DEFAULT_PRIME: u64 = (1 << 31) - 1;

fn floor_log2(x: usize) -> usize {
    debug_assert!(x > 0);
    usize::BITS as usize - 1 - x.leading_zeros() as usize
}

fn ceil_log2(x: usize) -> usize {
    debug_assert!(x > 0);
    if x == 1 {
        0
    } else {
        usize::BITS as usize - (x - 1).leading_zeros() as usize
    }
}

/// A stream position with its cached fingerprint context.
///
/// `fp` is the fingerprint of the stream *before* `pos` (exclusive), and
/// `r` is `r^pos`. For the `step` slot of a progression the same three
/// fields describe the gap between consecutive VOs instead: the distance,
/// the fingerprint of the bytes between them, and `r^distance`.
#[derive(Clone, Copy)]
struct PosInfo {
    pos: u64,
    fp: Fp,
    r: FieldVal,
}

impl PosInfo {
    const EMPTY: PosInfo = PosInfo {
        pos: 0,
        fp: 0,
        r: FieldVal { val: 0, inv: 0 },
    };
}

/// The VOs of one rung, stored as an arithmetic progression.
#[derive(Clone, Copy)]
struct VoProgression {
    first: PosInfo,
    step: PosInfo,
    count: u32,
}

impl VoProgression {
    const EMPTY: VoProgression = VoProgression {
        first: PosInfo::EMPTY,
        step: PosInfo::EMPTY,
        count: 0,
    };
}

/// The ladder state for a pattern long enough to need one.
struct Staged {
    n: usize,
    logn: usize,
    first_stage: usize,
    n_stages: usize,

    field: Field,
    r: FieldVal,
    /// `r^(2^first_stage - 1)`; rebases the rolling power of `r` to a VO's
    /// start position when the entry rung is seeded.
    first_stage_r: FieldVal,
    /// Pattern-prefix fingerprints per rung; entry `n_stages` is the whole
    /// pattern.
    fps: Vec<Fp>,
    vos: Vec<VoProgression>,
    /// Ring of the last `logn` cumulative stream fingerprints.
    last_fps: Vec<Fp>,

    kmp_period: KmpRealTime,
    kmp_remaining: Option<KmpRealTime>,
    /// Whole periods inside the entry rung.
    n_kmp_period: u64,
    /// The gap between the two topmost rungs is under `logn`, so the
    /// second-from-top rung must also be checked every byte.
    need_before_last: bool,

    current_pos: u64,
    current_fp: Fp,
    current_r: FieldVal,
    current_stage: usize,
    current_n_kmp_period: u64,
    last_kmp_period_match_pos: u64,
    have_last: bool,
    have_before_last: bool,
    collisions: u64,
}

enum Mode {
    Short(KmpRealTime),
    Staged(Box<Staged>),
}

/// Single-pattern real-time Breslauer-Galil matcher.
pub struct BgMatcher {
    pattern_len: usize,
    mode: Mode,
}

impl BgMatcher {
    /// Build a matcher with a randomly drawn fingerprint base.
    pub fn new(pattern: &[u8], prime: u64, rng: &mut impl Rng) -> Self {
        if pattern.len() <= SHORT_PATTERN_MAX {
            return Self::with_base(pattern, prime, 2);
        }
        Self::with_base(pattern, prime, rng.gen_range(2..prime))
    }

    /// Build a matcher with an explicit fingerprint base `r in [2, p)`.
    /// Tests use this for reproducible collision-free runs.
    pub fn with_base(pattern: &[u8], prime: u64, r: u64) -> Self {
        assert!(!pattern.is_empty(), "empty pattern");
        let n = pattern.len();
        if n <= SHORT_PATTERN_MAX {
            return BgMatcher {
                pattern_len: n,
                mode: Mode::Short(KmpRealTime::new(pattern)),
            };
        }
        assert!((2..prime).contains(&r), "fingerprint base must lie in [2, p)");
        BgMatcher {
            pattern_len: n,
            mode: Mode::Staged(Box::new(Staged::build(pattern, Field::new(prime), r))),
        }
    }

    #[inline]
    pub fn pattern_len(&self) -> usize {
        self.pattern_len
    }

    /// Feed one stream byte; true iff an occurrence of the pattern ends at
    /// this byte (up to fingerprint collisions, which are counted).
    pub fn read_byte(&mut self, byte: u8) -> bool {
        match &mut self.mode {
            Mode::Short(kmp) => kmp.read_byte(byte),
            Mode::Staged(staged) => staged.read_byte(byte),
        }
    }

    /// Rewind to the start-of-stream state, keeping compiled structures.
    pub fn reset(&mut self) {
        match &mut self.mode {
            Mode::Short(kmp) => kmp.reset(),
            Mode::Staged(staged) => staged.reset(),
        }
    }

    /// Fingerprint collisions detected so far.
    pub fn collisions(&self) -> u64 {
        match &self.mode {
            Mode::Short(_) => 0,
            Mode::Staged(staged) => staged.collisions,
        }
    }

    /// Static footprint of the compiled matcher.
    pub fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + match &self.mode {
                Mode::Short(kmp) => kmp.total_mem(),
                Mode::Staged(staged) => staged.total_mem(),
            }
    }
}

impl Staged {
    fn build(pattern: &[u8], field: Field, r_val: u64) -> Staged {
        let n = pattern.len();
        let logn = ceil_log2(n);
        let loglogn = ceil_log2(logn) + 1;

        // Period of the probe prefix, and how far it carries through the
        // pattern. The entry rung is the largest power-of-two prefix still
        // inside the periodic run.
        let probe_len = 1 << loglogn;
        let pp = period(&pattern[..probe_len]);
        let mut stop = probe_len;
        while stop < n && pattern[stop] == pattern[stop % pp] {
            stop += 1;
        }
        let first_stage = if stop == n { logn } else { floor_log2(stop) };
        let n_stages = logn - first_stage;

        let rung_len = |stage: usize| -> usize {
            if first_stage + stage >= logn {
                n
            } else {
                1 << (first_stage + stage)
            }
        };

        let r = field.element(r_val);
        let entry_len = rung_len(0);
        let (fp0, mut rn) = field.hash(&r, &pattern[..entry_len]);
        let first_stage_r = field.div(rn, r);
        let mut fps = Vec::with_capacity(n_stages + 1);
        fps.push(fp0);
        let mut prev_len = entry_len;
        for stage in 1..=n_stages {
            let len = rung_len(stage);
            let (fp, next_rn) = field.hash_extend(&r, &pattern[..len], fps[stage - 1], prev_len, rn);
            fps.push(fp);
            rn = next_rn;
            prev_len = len;
        }

        let kmp_period = KmpRealTime::new(&pattern[..pp]);
        let n_kmp_period = (entry_len / pp) as u64;
        let remaining = entry_len % pp;
        let kmp_remaining = (remaining > 0).then(|| KmpRealTime::new(&pattern[..remaining]));

        Staged {
            n,
            logn,
            first_stage,
            n_stages,
            field,
            r,
            first_stage_r,
            fps,
            vos: vec![VoProgression::EMPTY; n_stages],
            last_fps: vec![0; logn],
            kmp_period,
            kmp_remaining,
            n_kmp_period,
            need_before_last: n_stages > 1 && n - (1 << (logn - 1)) < logn,
            current_pos: 0,
            current_fp: 0,
            current_r: FieldVal::ONE,
            current_stage: 0,
            current_n_kmp_period: 0,
            last_kmp_period_match_pos: 0,
            have_last: false,
            have_before_last: false,
            collisions: 0,
        }
    }

    /// Length of the stream block a VO must have verified to sit on `stage`
    /// (index 0 is the entry rung; index `n_stages` is the whole pattern).
    #[inline]
    fn stage_len(&self, stage: usize) -> usize {
        if self.first_stage + stage >= self.logn {
            self.n
        } else {
            1 << (self.first_stage + stage)
        }
    }

    fn read_byte(&mut self, byte: u8) -> bool {
        if self.n_stages == 0 {
            // The whole pattern sits inside the periodic run of its probe
            // prefix; the first-stage KMP machinery decides everything and
            // no fingerprints are needed.
            let matched = self.check_first_stage(byte);
            self.current_pos += 1;
            return matched;
        }
        self.current_fp = self
            .field
            .concat_fp(self.current_fp, byte as u64, &self.current_r);
        self.last_fps[(self.current_pos % self.logn as u64) as usize] = self.current_fp;

        if self.check_first_stage(byte) {
            self.seed_entry_rung();
        }
        let matched = self.check_last_stages();
        if self.n_stages > 1 {
            // Round robin over every rung except the top one, in decreasing
            // order. The second-from-top rung may get a redundant visit
            // when `need_before_last` is set, which is harmless.
            self.upgrade(self.current_stage);
            self.current_stage = if self.current_stage == 0 {
                self.n_stages - 2
            } else {
                self.current_stage - 1
            };
        }
        self.current_r = self.field.mul(self.current_r, self.r);
        self.current_pos += 1;
        matched
    }

    /// Entry-rung detection: the rung matches at the current byte iff the
    /// period KMP has seen enough back-to-back periods and the remainder
    /// KMP match lands exactly on this byte.
    fn check_first_stage(&mut self, byte: u8) -> bool {
        let period_match = self.kmp_period.read_byte(byte);
        let pp = self.kmp_period.pattern_len() as u64;
        let (remaining_match, remaining_len) = match &mut self.kmp_remaining {
            Some(kmp) => (kmp.read_byte(byte), kmp.pattern_len() as u64),
            None => (true, 0),
        };

        if period_match {
            if self.last_kmp_period_match_pos + pp == self.current_pos {
                self.current_n_kmp_period += 1;
            } else {
                self.current_n_kmp_period = 1;
            }
            self.last_kmp_period_match_pos = self.current_pos;
        } else if self.last_kmp_period_match_pos + pp <= self.current_pos {
            // The position where the next back-to-back period had to end
            // has passed without a match; the chain is broken.
            self.current_n_kmp_period = 0;
        }

        remaining_match
            && self.current_n_kmp_period >= self.n_kmp_period
            && self.last_kmp_period_match_pos + remaining_len == self.current_pos
    }

    /// The entry rung matched ending at the current byte: compute the VO's
    /// start position, rebase the rolling fingerprint context to it, and
    /// offer it to rung 0.
    fn seed_entry_rung(&mut self) {
        let entry_len = self.stage_len(0) as u64;
        let vo_pos = self.current_pos + 1 - entry_len;
        let vo_r = self.field.div(self.current_r, self.first_stage_r);
        let vo_fp = self.field.prefix_fp(self.current_fp, self.fps[0], &vo_r);
        if !self.add_vo(0, vo_pos, vo_fp, vo_r) {
            // Collision at the entry rung: the established progression is
            // older and still sound, so the newcomer is the one to drop.
            self.collisions += 1;
        }
    }

    /// The two topmost rungs cannot wait for the round robin.
    fn check_last_stages(&mut self) -> bool {
        if self.have_before_last {
            self.upgrade(self.n_stages - 2);
        }
        if self.have_last {
            return self.upgrade(self.n_stages - 1);
        }
        false
    }

    /// Process every mature head of `stage`: drop the ones whose
    /// verification window has passed, fingerprint-check the ones inside
    /// it, and promote survivors one rung up. Amortized O(1): every VO is
    /// examined here exactly once in its lifetime on the rung.
    ///
    /// Returns true only for a whole-pattern verification landing exactly
    /// on the current byte.
    fn upgrade(&mut self, stage: usize) -> bool {
        let logn = self.logn as u64;
        let next_len = self.stage_len(stage + 1) as u64;
        let mut matched = false;
        while self.vos[stage].count != 0 {
            let first = self.vos[stage].first;
            let end_pos = first.pos + next_len - 1;
            if self.current_pos < end_pos {
                break;
            }
            if self.current_pos < end_pos + logn {
                let cum = self.last_fps[(end_pos % logn) as usize];
                let block_fp = self.field.suffix_fp(cum, first.fp, &first.r);
                if block_fp == self.fps[stage + 1] {
                    if stage + 1 == self.n_stages {
                        if end_pos == self.current_pos {
                            matched = true;
                        }
                    } else if !self.add_vo(stage + 1, first.pos, first.fp, first.r) {
                        // The target rung's progression can no longer be
                        // trusted; wipe it.
                        self.wipe_stage(stage + 1);
                        self.collisions += 1;
                    }
                }
            }
            self.remove_first_vo(stage);
        }
        matched
    }

    /// Offer a VO to a rung. Returns false on a progression violation,
    /// which under correct fingerprints is impossible and therefore marks
    /// a collision.
    fn add_vo(&mut self, stage: usize, pos: u64, fp: Fp, r: FieldVal) -> bool {
        let field = self.field;
        let n_stages = self.n_stages;
        let need_before_last = self.need_before_last;
        let vo = &mut self.vos[stage];
        match vo.count {
            0 => {
                vo.first = PosInfo { pos, fp, r };
                vo.count = 1;
                if stage + 1 == n_stages {
                    self.have_last = true;
                } else if need_before_last && stage + 2 == n_stages {
                    self.have_before_last = true;
                }
                true
            }
            1 => {
                vo.step.pos = pos - vo.first.pos;
                vo.step.fp = field.suffix_fp(fp, vo.first.fp, &vo.first.r);
                vo.step.r = field.div(r, vo.first.r);
                vo.count = 2;
                true
            }
            _ => {
                if vo.first.pos + vo.count as u64 * vo.step.pos != pos {
                    return false;
                }
                vo.count += 1;
                true
            }
        }
    }

    /// Drop the head of a rung's progression, advancing the cached
    /// fingerprint context to the next VO.
    fn remove_first_vo(&mut self, stage: usize) {
        let field = self.field;
        let vo = &mut self.vos[stage];
        match vo.count {
            0 => {}
            1 => {
                vo.count = 0;
                if stage + 1 == self.n_stages {
                    self.have_last = false;
                } else if stage + 2 == self.n_stages {
                    self.have_before_last = false;
                }
            }
            _ => {
                // The new head's prefix fingerprint extends the old one by
                // the inter-VO gap, scaled by r at the old head's position.
                vo.first.fp = field.concat_fp(vo.first.fp, vo.step.fp, &vo.first.r);
                vo.first.r = field.mul(vo.first.r, vo.step.r);
                vo.first.pos += vo.step.pos;
                vo.count -= 1;
            }
        }
    }

    fn wipe_stage(&mut self, stage: usize) {
        self.vos[stage].count = 0;
        if stage + 1 == self.n_stages {
            self.have_last = false;
        } else if stage + 2 == self.n_stages {
            self.have_before_last = false;
        }
    }

    fn reset(&mut self) {
        self.current_pos = 0;
        self.current_fp = 0;
        self.current_r = FieldVal::ONE;
        self.current_stage = 0;
        self.current_n_kmp_period = 0;
        self.last_kmp_period_match_pos = 0;
        self.have_last = false;
        self.have_before_last = false;
        for vo in &mut self.vos {
            *vo = VoProgression::EMPTY;
        }
        self.kmp_period.reset();
        if let Some(kmp) = &mut self.kmp_remaining {
            kmp.reset();
        }
    }

    fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.fps.capacity() * std::mem::size_of::<Fp>()
            + self.vos.capacity() * std::mem::size_of::<VoProgression>()
            + self.last_fps.capacity() * std::mem::size_of::<Fp>()
            + self.kmp_period.total_mem()
            + self.kmp_remaining.as_ref().map_or(0, |k| k.total_mem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: u64 = 1_000_003;

    fn naive_ends(pattern: &[u8], text: &[u8]) -> Vec<usize> {
        if text.len() < pattern.len() {
            return Vec::new();
        }
        text.windows(pattern.len())
            .enumerate()
            .filter(|(_, w)| *w == pattern)
            .map(|(i, _)| i + pattern.len() - 1)
            .collect()
    }

    fn engine_ends(pattern: &[u8], text: &[u8]) -> Vec<usize> {
        let mut bg = BgMatcher::with_base(pattern, DEFAULT_PRIME, R);
        let ends: Vec<usize> = text
            .iter()
            .enumerate()
            .filter(|(_, &b)| bg.read_byte(b))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(bg.collisions(), 0, "unexpected fingerprint collision");
        ends
    }

    fn check(pattern: &[u8], text: &[u8]) {
        assert_eq!(
            engine_ends(pattern, text),
            naive_ends(pattern, text),
            "pattern {:?} text {:?}",
            String::from_utf8_lossy(pattern),
            String::from_utf8_lossy(text)
        );
    }

    /// A pattern whose probe-prefix period breaks right after the probe,
    /// alternating "ab" for 16 bytes then distinct filler up to `n`. For
    /// 32 < n <= 64 this yields two rungs; for 64 < n <= 128, three.
    fn layered_pattern(n: usize) -> Vec<u8> {
        let mut p = Vec::with_capacity(n);
        for i in 0..16 {
            p.push(if i % 2 == 0 { b'a' } else { b'b' });
        }
        for i in 16..n {
            p.push(b'c' + (i % 20) as u8);
        }
        p
    }

    #[test]
    fn short_pattern_path() {
        check(b"aaaaa", b"aaaaaaa");
        assert_eq!(engine_ends(b"aaaaa", b"aaaaaaa"), vec![4, 5, 6]);
        check(b"abab", b"ababab");
        check(b"a", b"banana");
        check(b"abcdefgh", b"xxabcdefghabcdefgh");
    }

    #[test]
    fn fully_periodic_pattern_uses_kmp_machinery_only() {
        // "ABCDABDABC": the probe period carries to the end of the
        // pattern, so there are no rungs at all.
        let pattern = b"ABCDABDABC";
        let text = b"ABCDABCDABDABCDABDABCDABBABCDABDABCDABDBADFSG";
        assert_eq!(engine_ends(pattern, text), vec![13, 20, 34]);
        check(pattern, text);
    }

    #[test]
    fn single_rung_aperiodic_patterns() {
        // n = 9: the shortest pattern that takes the staged path.
        let p9 = b"abcdefghi";
        check(p9, b"xxabcdefghixx");
        check(p9, b"abcdefghabcdefghi");
        check(p9, b"abcdefgh"); // stream shorter than pattern
        // n = 16 (power of two) and n = 17 (power of two plus one).
        check(b"abcdefghijklmnop", b"zzabcdefghijklmnopzz");
        check(b"abcdefghijklmnopq", b"abcdefghijklmnopabcdefghijklmnopq!");
    }

    #[test]
    fn two_rung_ladder() {
        let pattern = layered_pattern(33);
        let mut text = b"zz".to_vec();
        text.extend_from_slice(&pattern);
        text.extend_from_slice(b"zz");
        check(&pattern, &text);

        // A second occurrence later in the same stream.
        let mut text = pattern.clone();
        text.extend_from_slice(b"noise in the middle");
        text.extend_from_slice(&pattern);
        check(&pattern, &text);
    }

    #[test]
    fn three_rung_ladder() {
        let pattern = layered_pattern(65);
        let mut text = b"prefix junk ".to_vec();
        text.extend_from_slice(&pattern);
        text.extend_from_slice(b" and trailing junk");
        text.extend_from_slice(&pattern);
        check(&pattern, &text);
    }

    #[test]
    fn near_miss_blocks_are_rejected() {
        let pattern = layered_pattern(33);
        // Corrupt the final byte of an otherwise full occurrence.
        let mut text = pattern.clone();
        *text.last_mut().unwrap() ^= 0xFF;
        text.extend_from_slice(&pattern);
        check(&pattern, &text);
    }

    #[test]
    fn highly_periodic_prefix_with_break() {
        // n = 18, seventeen 'A's then 'B': the entry rung has period 1 and
        // seeds on every byte of a long run, exercising the period-count
        // rollback when a run breaks early.
        let pattern = b"AAAAAAAAAAAAAAAAAB";
        let text = b"AAAAAAAAAAAAAAAAABAAAAAABAAAAAAAAAAAAAAAAABAAAAAAA";
        assert_eq!(engine_ends(pattern, text), vec![17, 42]);
        check(pattern, text);
    }

    #[test]
    fn dense_entry_rung_with_deep_ladder() {
        // Period-1 entry rung on a three-rung ladder: a long 'a' run seeds
        // the entry rung on every byte, and the rung must drain without
        // losing the one viable occurrence at the end of the run.
        let mut pattern = vec![b'a'; 20];
        for i in 20..100 {
            pattern.push(b'c' + (i % 20) as u8);
        }
        let mut text = vec![b'a'; 80];
        text.extend_from_slice(&pattern[20..]);
        text.extend_from_slice(b"tail");
        check(&pattern, &text);
    }

    #[test]
    fn binary_patterns_with_zero_and_high_bytes() {
        let mut pattern = vec![0u8, 0xFF, 0x00, 0x7F, 0x80, 1, 2, 3, 4];
        pattern.extend_from_slice(b"suffix");
        let mut text = b"head".to_vec();
        text.extend_from_slice(&pattern);
        text.push(0);
        text.extend_from_slice(&pattern);
        check(&pattern, &text);
    }

    #[test]
    fn overlapping_staged_occurrences() {
        // Pattern with a long border so occurrences overlap heavily.
        let pattern = b"abcabcabcabcx";
        let text = b"abcabcabcabcabcabcxabcabcabcabcxbc";
        check(pattern, text);
    }

    #[test]
    fn stream_boundaries_around_pattern_length() {
        let pattern = b"abcdefghijkl";
        check(pattern, b"abcdefghijk"); // one byte short
        check(pattern, b"abcdefghijkl"); // exact
        check(pattern, b"abcdefghijklm"); // one byte over
    }

    #[test]
    fn reset_restarts_the_stream() {
        let pattern = layered_pattern(33);
        let mut bg = BgMatcher::with_base(&pattern, DEFAULT_PRIME, R);
        // Feed half an occurrence, then reset.
        for &b in &pattern[..20] {
            bg.read_byte(b);
        }
        bg.reset();
        let mut ends = Vec::new();
        for (i, &b) in pattern.iter().enumerate() {
            if bg.read_byte(b) {
                ends.push(i);
            }
        }
        assert_eq!(ends, vec![pattern.len() - 1]);
    }

    #[test]
    fn random_base_still_matches() {
        use rand::{rngs::StdRng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(7);
        let pattern = layered_pattern(40);
        let mut text = b"xyz".to_vec();
        text.extend_from_slice(&pattern);
        let mut bg = BgMatcher::new(&pattern, DEFAULT_PRIME, &mut rng);
        let mut ends = Vec::new();
        for (i, &b) in text.iter().enumerate() {
            if bg.read_byte(b) {
                ends.push(i);
            }
        }
        assert_eq!(ends, vec![text.len() - 1]);
    }

    #[test]
    fn total_mem_scales_with_pattern() {
        let small = BgMatcher::with_base(&layered_pattern(33), DEFAULT_PRIME, R);
        let large = BgMatcher::with_base(&layered_pattern(120), DEFAULT_PRIME, R);
        assert!(small.total_mem() > 0);
        assert!(large.total_mem() > small.total_mem());
    }
}
