//! Real-time Knuth-Morris-Pratt.
//!
//! Classical KMP is only amortized O(1) per character: a single input byte
//! can trigger a long cascade of failure-function steps. This engine applies
//! Galil's fix to make the worst case constant: on every arriving byte it
//! performs **at most two** failure steps, and any bytes that arrive while a
//! failure cascade is still unwinding are parked in a ring buffer of size
//! `m` and consumed two per arrival until the buffer drains. Since the drain
//! rate is twice the arrival rate, the buffer can never hold more than `m`
//! bytes.
//!
//! The failure table doubles as a period oracle: the period of `P[0..m)` is
//! `m - failure[m]`, which is how the Breslauer-Galil engine consumes this
//! crate during construction.

/// Build the failure table for `pattern`.
///
/// `failure[i]` is the length of the longest proper prefix of `pattern[..i]`
/// that is also a suffix of it. The table has `m + 1` entries; `failure[m]`
/// is the offset to resume from after a full match, which is what makes
/// overlapping matches come out naturally.
fn failure_table(pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    let mut failure = vec![0usize; m + 1];
    let mut pos = 2;
    let mut cnd = 0;
    while pos < m + 1 {
        if pattern[pos - 1] == pattern[cnd] {
            cnd += 1;
            failure[pos] = cnd;
            pos += 1;
        } else if cnd > 0 {
            cnd = failure[cnd];
        } else {
            failure[pos] = 0;
            pos += 1;
        }
    }
    failure
}

/// Smallest period of `pattern`: the least `q > 0` with
/// `pattern[i] == pattern[i + q]` for all valid `i`.
pub fn period(pattern: &[u8]) -> usize {
    let failure = failure_table(pattern);
    pattern.len() - failure[pattern.len()]
}

/// A single-pattern real-time streaming matcher.
pub struct KmpRealTime {
    pattern: Vec<u8>,
    failure: Vec<usize>,
    /// Ring buffer of bytes waiting while a failure cascade unwinds.
    buffer: Vec<u8>,
    buf_start: usize,
    buf_end: usize,
    /// Length of the currently matched pattern prefix.
    offset: usize,
    /// A failure cascade is still unwinding on `buffer[buf_start]`.
    loop_fail: bool,
    /// The ring buffer is non-empty.
    have_buffer: bool,
}

impl KmpRealTime {
    pub fn new(pattern: &[u8]) -> Self {
        assert!(!pattern.is_empty(), "empty pattern");
        KmpRealTime {
            failure: failure_table(pattern),
            buffer: vec![0; pattern.len()],
            pattern: pattern.to_vec(),
            buf_start: 0,
            buf_end: 0,
            offset: 0,
            loop_fail: false,
            have_buffer: false,
        }
    }

    #[inline]
    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// Feed one stream byte; true iff the pattern's last byte is this one.
    ///
    /// Three cases, mirroring the cascade state:
    /// - a cascade is unwinding: park the byte, spend this turn's two failure
    ///   steps on the buffer head;
    /// - bytes are parked but no cascade runs: park the byte, replay two
    ///   parked bytes through the core transition;
    /// - otherwise the byte goes straight through the core transition.
    ///
    /// While the engine is catching up it cannot observe a match, and by the
    /// buffer-drain argument it is always caught up again before a true
    /// match position has passed.
    pub fn read_byte(&mut self, byte: u8) -> bool {
        if self.loop_fail {
            self.push_back(byte);
            for _ in 0..2 {
                let head = self.buffer[self.buf_start];
                if self.advance_failure(head) {
                    self.pop_front();
                    self.loop_fail = false;
                    break;
                }
            }
            false
        } else if self.have_buffer {
            self.push_back(byte);
            for _ in 0..2 {
                let parked = self.pop_front();
                if self.step(parked) {
                    // Only possible once the buffer has just drained.
                    return true;
                }
                if self.loop_fail {
                    // The parked byte went back to the buffer head; the
                    // cascade picks it up on the next arrival.
                    break;
                }
            }
            false
        } else {
            self.step(byte)
        }
    }

    /// Rewind to the pre-stream state, keeping the compiled tables.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.buf_start = 0;
        self.buf_end = 0;
        self.loop_fail = false;
        self.have_buffer = false;
    }

    /// Static footprint: the struct plus pattern, ring buffer, and failure
    /// table.
    pub fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.pattern.capacity()
            + self.buffer.capacity()
            + self.failure.capacity() * std::mem::size_of::<usize>()
    }

    /// The core KMP transition on one byte.
    ///
    /// On a mismatch with a non-empty matched prefix, spends at most two
    /// failure steps; if the cascade has not resolved by then, the byte is
    /// pushed back to the buffer front and `loop_fail` is raised.
    fn step(&mut self, byte: u8) -> bool {
        if self.pattern[self.offset] == byte {
            self.offset += 1;
            if self.offset == self.pattern.len() {
                self.offset = self.failure[self.pattern.len()];
                return true;
            }
        } else if self.offset > 0 {
            for _ in 0..2 {
                if self.advance_failure(byte) {
                    return false;
                }
            }
            self.loop_fail = true;
            self.push_front(byte);
        }
        false
    }

    /// One failure-function step for `byte`.
    ///
    /// Returns true when the cascade has resolved: either `byte` matches at
    /// the new offset (offset advanced past it) or the offset reached zero
    /// (byte consumed without a match).
    fn advance_failure(&mut self, byte: u8) -> bool {
        self.offset = self.failure[self.offset];
        if self.pattern[self.offset] == byte {
            self.offset += 1;
            true
        } else {
            self.offset == 0
        }
    }

    fn push_back(&mut self, byte: u8) {
        if self.have_buffer {
            self.buf_end = (self.buf_end + 1) % self.buffer.len();
            self.buffer[self.buf_end] = byte;
        } else {
            self.buf_start = 0;
            self.buf_end = 0;
            self.buffer[0] = byte;
            self.have_buffer = true;
        }
    }

    fn push_front(&mut self, byte: u8) {
        if self.have_buffer {
            self.buf_start = if self.buf_start == 0 {
                self.buffer.len() - 1
            } else {
                self.buf_start - 1
            };
            self.buffer[self.buf_start] = byte;
        } else {
            self.buf_start = 0;
            self.buf_end = 0;
            self.buffer[0] = byte;
            self.have_buffer = true;
        }
    }

    fn pop_front(&mut self) -> u8 {
        let byte = self.buffer[self.buf_start];
        if self.buf_start == self.buf_end {
            self.have_buffer = false;
        }
        self.buf_start = (self.buf_start + 1) % self.buffer.len();
        byte
    }
}
