use std::time::Instant;

use tracing::trace;

use crate::engine::key_stats::KeyStatRecord;
use crate::session::practice::PracticeState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Correct,
    Incorrect(char),
}

#[derive(Clone, Debug)]
pub struct KeystrokeEvent {
    pub expected: char,
    pub actual: char,
    pub correct: bool,
    /// Time since the previous keystroke of this run, if any.
    pub interval_ms: Option<f64>,
}

/// Apply one typed character. Correct keystrokes that follow another
/// keystroke add their interval to `record` under the typed key.
pub fn process_char(
    practice: &mut PracticeState,
    ch: char,
    now: Instant,
    record: &mut KeyStatRecord,
) -> Option<KeystrokeEvent> {
    if practice.is_complete() {
        return None;
    }

    if practice.started_at.is_none() {
        practice.started_at = Some(now);
    }

    let interval_ms = practice
        .last_keystroke
        .map(|prev| now.saturating_duration_since(prev).as_secs_f64() * 1000.0);
    practice.last_keystroke = Some(now);

    let expected = practice.target[practice.cursor];
    let correct = ch == expected;

    if correct {
        practice.input.push(CharStatus::Correct);
        if let Some(ms) = interval_ms {
            let key = ch.to_string();
            trace!(key = %key, ms, "key sample");
            record.record(&key, ms);
        }
    } else {
        practice.input.push(CharStatus::Incorrect(ch));
    }
    practice.cursor += 1;

    if practice.is_complete() {
        practice.finished_at = Some(now);
    }

    Some(KeystrokeEvent {
        expected,
        actual: ch,
        correct,
        interval_ms,
    })
}

pub fn process_backspace(practice: &mut PracticeState) {
    if practice.cursor > 0 && !practice.is_complete() {
        practice.cursor -= 1;
        practice.input.pop();
    }
}
