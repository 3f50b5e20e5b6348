//! Display-only completion estimate for an indeterminate backend job.
//!
//! The backend reports nothing between "not done" and "done", so the bar is
//! synthesized: it climbs quickly at first and then crawls to a hold at 99
//! until the terminal response forces 100.

/// Progress shown on the first status check.
pub const START_PCT: u8 = 10;

/// Below this the estimate climbs +10 per attempt.
pub const FAST_CAP: u8 = 85;

/// Ceiling held until the backend reports done.
pub const HOLD_CAP: u8 = 99;

/// Estimate for a 1-based `attempt` count. Monotone non-decreasing in
/// `attempt` and never above `hold_cap`.
pub fn estimate(attempt: u32, fast_cap: u8, hold_cap: u8) -> u8 {
    let mut pct = START_PCT.min(hold_cap);
    for _ in 1..attempt {
        pct = if pct < fast_cap {
            (pct + 10).min(hold_cap)
        } else {
            (pct + 2).min(hold_cap)
        };
    }
    pct
}
