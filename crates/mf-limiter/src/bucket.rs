/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Token-bucket refill and consume rules
//!
//! This is the reference implementation of the bucket math. The in-memory
//! backend runs it directly; the Lua script shipped to Redis mirrors it
//! statement for statement so every backend agrees on the arithmetic.

use mf_core::config::BucketSettings;

/// TTL for limiter keys in the store, refreshed on every touch
pub const LIMITER_KEY_TTL_SECS: u64 = 2 * 60 * 60;

/// Persisted state of one bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketState {
    /// Remaining tokens; fractional values accumulate between refills
    pub tokens: f64,

    /// Epoch milliseconds of the last refill that added tokens
    pub last_refill_ms: i64,
}

/// Result of one atomic consume attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumeReply {
    pub allowed: bool,

    /// Tokens remaining after the attempt
    pub tokens: f64,

    /// When denied, how long until one token accrues
    pub wait_ms: u64,
}

/// Apply the refill rule to a stored state (or initialize a missing bucket)
pub fn refill(state: Option<BucketState>, settings: &BucketSettings, now_ms: i64) -> BucketState {
    let mut state = match state {
        Some(s) => s,
        None => {
            return BucketState { tokens: settings.capacity as f64, last_refill_ms: now_ms };
        }
    };

    let elapsed = (now_ms - state.last_refill_ms).max(0) as f64;
    let tokens_to_add =
        (elapsed / settings.interval_ms as f64 * settings.refill_rate as f64).floor();

    if tokens_to_add > 0.0 {
        state.tokens = (state.tokens + tokens_to_add).min(settings.capacity as f64);
        state.last_refill_ms = now_ms;
    }

    state
}

/// Refill, then attempt to take one token
///
/// Returns the state to write back along with the decision. A denied attempt
/// still writes back the refilled state so `last_refill` stays accurate.
pub fn consume(
    state: Option<BucketState>,
    settings: &BucketSettings,
    now_ms: i64,
) -> (BucketState, ConsumeReply) {
    let mut state = refill(state, settings, now_ms);

    if state.tokens >= 1.0 {
        state.tokens -= 1.0;
        (state, ConsumeReply { allowed: true, tokens: state.tokens, wait_ms: 0 })
    } else {
        let wait_ms = ((1.0 - state.tokens) / settings.refill_rate as f64
            * settings.interval_ms as f64)
            .ceil() as u64;
        (state, ConsumeReply { allowed: false, tokens: state.tokens, wait_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_second() -> BucketSettings {
        BucketSettings { capacity: 2, refill_rate: 2, interval_ms: 1_000 }
    }

    #[test]
    fn test_missing_bucket_initializes_full() {
        let state = refill(None, &per_second(), 10_000);
        assert_eq!(state.tokens, 2.0);
        assert_eq!(state.last_refill_ms, 10_000);
    }

    #[test]
    fn test_consume_decrements() {
        let (state, reply) = consume(None, &per_second(), 10_000);
        assert!(reply.allowed);
        assert_eq!(state.tokens, 1.0);
    }

    #[test]
    fn test_exhausted_bucket_reports_wait() {
        let settings = per_second();
        let (s1, _) = consume(None, &settings, 10_000);
        let (s2, r2) = consume(Some(s1), &settings, 10_000);
        assert!(r2.allowed);
        let (_, r3) = consume(Some(s2), &settings, 10_000);
        assert!(!r3.allowed);
        // 0 tokens, 2/sec refill: one token in 500 ms.
        assert_eq!(r3.wait_ms, 500);
    }

    #[test]
    fn test_refill_is_floored() {
        let settings = per_second();
        let drained = BucketState { tokens: 0.0, last_refill_ms: 0 };
        // 499 ms at 2 tokens/sec is 0.998 tokens: nothing accrues yet.
        let state = refill(Some(drained), &settings, 499);
        assert_eq!(state.tokens, 0.0);
        assert_eq!(state.last_refill_ms, 0);

        // 500 ms yields exactly one token and advances last_refill.
        let state = refill(Some(drained), &settings, 500);
        assert_eq!(state.tokens, 1.0);
        assert_eq!(state.last_refill_ms, 500);
    }

    #[test]
    fn test_refill_caps_at_capacity() {
        let settings = per_second();
        let drained = BucketState { tokens: 0.0, last_refill_ms: 0 };
        let state = refill(Some(drained), &settings, 60_000);
        assert_eq!(state.tokens, 2.0);
    }

    #[test]
    fn test_full_interval_restores_full_burst() {
        // Capacity spent, then a full interval passes: capacity tokens again.
        let settings = per_second();
        let mut state: Option<BucketState> = None;
        for _ in 0..settings.capacity {
            let (s, reply) = consume(state, &settings, 0);
            assert!(reply.allowed);
            state = Some(s);
        }
        let (_, denied) = consume(state, &settings, 0);
        assert!(!denied.allowed);

        let mut state = Some(refill(state, &settings, settings.interval_ms as i64));
        for _ in 0..settings.capacity {
            let (s, reply) = consume(state, &settings, settings.interval_ms as i64);
            assert!(reply.allowed, "bucket should accept a full burst after the interval");
            state = Some(s);
        }
    }

    #[test]
    fn test_clock_skew_does_not_drain() {
        // A writer with a slightly older clock must not produce negative refill.
        let settings = per_second();
        let state = BucketState { tokens: 1.0, last_refill_ms: 10_000 };
        let refilled = refill(Some(state), &settings, 9_900);
        assert_eq!(refilled.tokens, 1.0);
    }
}
