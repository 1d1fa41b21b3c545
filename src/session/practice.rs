use std::time::Instant;

use crate::session::input::CharStatus;

/// One run through a generated word stream.
pub struct PracticeState {
    pub target: Vec<char>,
    pub input: Vec<CharStatus>,
    pub cursor: usize,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    /// Time of the previous keystroke, the reference for the next interval.
    pub last_keystroke: Option<Instant>,
}

impl PracticeState {
    pub fn new(text: &str) -> Self {
        Self {
            target: text.chars().collect(),
            input: Vec::new(),
            cursor: 0,
            started_at: None,
            finished_at: None,
            last_keystroke: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.target.len()
    }

    pub fn elapsed_secs_at(&self, now: Instant) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => now.saturating_duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.input
            .iter()
            .filter(|s| matches!(s, CharStatus::Correct))
            .count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.input
            .iter()
            .filter(|s| matches!(s, CharStatus::Incorrect(_)))
            .count()
    }

    pub fn wpm_at(&self, now: Instant) -> f64 {
        let elapsed = self.elapsed_secs_at(now);
        if elapsed < 0.1 {
            return 0.0;
        }
        let chars = self.correct_count() as f64;
        (chars / 5.0) / (elapsed / 60.0)
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.input.len();
        if total == 0 {
            return 100.0;
        }
        (self.correct_count() as f64 / total as f64) * 100.0
    }

    pub fn progress(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.cursor as f64 / self.target.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_practice() {
        let practice = PracticeState::new("hello");
        assert_eq!(practice.target.len(), 5);
        assert_eq!(practice.cursor, 0);
        assert!(!practice.is_complete());
        assert_eq!(practice.progress(), 0.0);
    }

    #[test]
    fn test_progress_follows_cursor() {
        let mut practice = PracticeState::new("abcd");
        practice.cursor = 1;
        assert_eq!(practice.progress(), 0.25);
    }

    #[test]
    fn test_accuracy_starts_at_100() {
        let practice = PracticeState::new("test");
        assert_eq!(practice.accuracy(), 100.0);
    }

    #[test]
    fn test_empty_practice_progress() {
        let practice = PracticeState::new("");
        assert!(practice.is_complete());
        assert_eq!(practice.progress(), 0.0);
    }

    #[test]
    fn test_wpm_from_correct_chars() {
        let mut practice = PracticeState::new("aaaaaaaaaa");
        let t0 = Instant::now();
        practice.started_at = Some(t0);
        practice.input = vec![CharStatus::Correct; 10];
        practice.cursor = 10;
        // 10 chars = 2 words in 6 seconds = 20 WPM
        let wpm = practice.wpm_at(t0 + Duration::from_secs(6));
        assert!((wpm - 20.0).abs() < 1e-9, "{wpm}");
    }

    #[test]
    fn test_wpm_zero_before_start() {
        let practice = PracticeState::new("abc");
        assert_eq!(practice.wpm_at(Instant::now()), 0.0);
    }
}
