use chrono::{DateTime, DurationRound, TimeDelta};
use chrono_tz::Tz;

/// Guides are pinned to a fixed zone regardless of where the run executes.
pub const GUIDE_TZ: Tz = chrono_tz::Asia::Kuala_Lumpur;

/// Number of synthetic programme slots per channel.
pub const BLOCK_COUNT: usize = 8;

/// Width of one slot in hours.
pub const BLOCK_HOURS: i64 = 3;

/// One synthetic programme slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBlock {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Generate the fixed window of contiguous three-hour blocks starting at the
/// top of the current hour. Deterministic given `now`.
pub fn generate_blocks(now: DateTime<Tz>) -> Vec<TimeBlock> {
    // Kuala Lumpur has no DST transitions, so flooring to the hour cannot
    // land on a gap; the fallback never fires in practice.
    let anchor = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);

    (0..BLOCK_COUNT as i64)
        .map(|i| {
            let start = anchor + TimeDelta::hours(BLOCK_HOURS * i);
            TimeBlock {
                start,
                end: start + TimeDelta::hours(BLOCK_HOURS),
            }
        })
        .collect()
}
