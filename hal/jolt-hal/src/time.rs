//! Time keeping abstractions

/// Free-running millisecond counter
///
/// The counter wraps after roughly 49 days; callers compare timestamps with
/// [`elapsed_ms`] so wrap-around is handled.
pub trait Clock {
    /// Milliseconds since the clock was started
    fn now_ms(&self) -> u32;
}

/// Milliseconds between two timestamps, tolerant of counter wrap-around
pub fn elapsed_ms(since: u32, now: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_ms() {
        assert_eq!(elapsed_ms(100, 1100), 1000);
        assert_eq!(elapsed_ms(5, 5), 0);
    }

    #[test]
    fn test_elapsed_ms_wraps() {
        assert_eq!(elapsed_ms(u32::MAX - 9, 10), 20);
    }
}
