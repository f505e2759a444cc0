/// Track the progress fraction reported while a publish job is polled.
///
/// The remote side repeats values between polls, so callers only log when
/// the rounded percentage actually moved.
pub struct PollProgress {
    last_percent: Option<u32>,
}

impl PollProgress {
    pub fn new() -> Self {
        Self { last_percent: None }
    }

    /// Record a fractional progress value, returning the rounded percentage
    /// when it differs from the last recorded one.
    pub fn record(&mut self, fraction: f64) -> Option<u32> {
        let percent = to_percent(fraction);
        if self.last_percent == Some(percent) {
            return None;
        }
        self.last_percent = Some(percent);
        Some(percent)
    }

    pub fn last_percent(&self) -> Option<u32> {
        self.last_percent
    }
}

impl Default for PollProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn to_percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_new_percentage_once() {
        let mut progress = PollProgress::new();
        assert_eq!(progress.record(0.4), Some(40));
        assert_eq!(progress.record(0.4), None);
        assert_eq!(progress.record(0.9), Some(90));
        assert_eq!(progress.last_percent(), Some(90));
    }

    #[test]
    fn rounds_to_the_nearest_percent() {
        let mut progress = PollProgress::new();
        assert_eq!(progress.record(0.333), Some(33));
        assert_eq!(progress.record(0.335), Some(34));
    }
}
