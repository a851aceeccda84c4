use crate::error::Result;
use crate::onsets::validate_tempo;

/// How long a lane stays blocked after its last note ends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Half a beat at the track tempo
    #[default]
    HalfBeat,
    /// Constant gap in milliseconds, independent of tempo
    Fixed(u64),
    /// No gap; only the no-repeat rule applies
    None,
}

impl GapPolicy {
    /// Accepts `half-beat`, `none` or a number of milliseconds
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "half-beat" | "halfbeat" | "tempo" => Some(GapPolicy::HalfBeat),
            "none" | "off" => Some(GapPolicy::None),
            other => other.parse::<u64>().ok().map(GapPolicy::Fixed),
        }
    }

    /// Resolve the minimum gap in milliseconds for a given tempo.
    ///
    /// The tempo is checked even for policies that ignore it, so a bad
    /// analyzer result never slips through.
    pub fn min_gap_ms(&self, tempo: f64) -> Result<u64> {
        validate_tempo(tempo)?;
        Ok(match self {
            GapPolicy::HalfBeat => half_beat_ms(tempo),
            GapPolicy::Fixed(ms) => *ms,
            GapPolicy::None => 0,
        })
    }
}

/// `round(0.5 * 60000 / bpm)`
fn half_beat_ms(tempo: f64) -> u64 {
    let beat_ms = 60_000.0 / tempo;
    (beat_ms * 0.5).round() as u64
}
