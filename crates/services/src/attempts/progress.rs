//
// ─── ATTEMPT PROGRESS ──────────────────────────────────────────────────────────
//

/// Answered/remaining counts for an attempt, for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptProgress {
    pub answered: usize,
    pub total: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl AttemptProgress {
    #[must_use]
    pub fn new(answered: usize, total: usize, is_complete: bool) -> Self {
        Self {
            answered,
            total,
            remaining: total.saturating_sub(answered),
            is_complete,
        }
    }

    /// Answered share as a whole percentage; 0 for an empty attempt.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.answered.saturating_mul(100) / self.total;
        u8::try_from(pct).unwrap_or(100)
    }
}

/// Formats a second count as a clock string: `m:ss`, or `h:mm:ss` from
/// one hour up.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
