/// Converts accumulated inter-key time into a time base comparable with WPM:
/// one word is five keystrokes.
pub const CALIBRATION: f64 = 5.0;

pub const FAST_THRESHOLD: u32 = 100;
pub const SLOW_THRESHOLD: u32 = 60;

/// Speed formula applied to a keystroke count over an elapsed time in ms.
///
/// Implementations must be monotonically non-decreasing in `count` for a
/// fixed `time_ms`.
pub trait SpeedFormula {
    fn speed(&self, count: u64, time_ms: f64) -> u32;
}

/// Keystrokes per minute over `time_ms`, rounded. Fed `total_time * 5`, this
/// yields words per minute.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordsPerMinute;

impl SpeedFormula for WordsPerMinute {
    fn speed(&self, count: u64, time_ms: f64) -> u32 {
        if time_ms <= 0.0 {
            return 0;
        }
        let per_minute = count as f64 * 60_000.0 / time_ms;
        per_minute.round().min(u32::MAX as f64) as u32
    }
}

/// Speed of a single key. No samples (zero time) means zero speed, whatever
/// the count says.
pub fn key_speed(count: u64, total_time: f64, formula: &dyn SpeedFormula) -> u32 {
    if total_time == 0.0 {
        return 0;
    }
    formula.speed(count, total_time * CALIBRATION)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedLabel {
    None,
    Slow,
    Normal,
    Fast,
}

impl SpeedLabel {
    pub fn from_speed(speed: u32) -> Self {
        if speed == 0 {
            SpeedLabel::None
        } else if speed >= FAST_THRESHOLD {
            SpeedLabel::Fast
        } else if speed < SLOW_THRESHOLD {
            SpeedLabel::Slow
        } else {
            SpeedLabel::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeedLabel::None => "",
            SpeedLabel::Slow => "slow",
            SpeedLabel::Normal => "normal",
            SpeedLabel::Fast => "fast",
        }
    }
}
