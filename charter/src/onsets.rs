use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Latest onset accepted, in ms (about 49 days). Keeps end-time arithmetic
/// far from `u64` overflow.
pub const MAX_ONSET_MS: u64 = u32::MAX as u64;

/// Output of the external onset/tempo analyzer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OnsetTrack {
    pub tempo: f64,       // estimated BPM
    pub onsets: Vec<f64>, // onset times in seconds, ascending
}

impl OnsetTrack {
    pub fn new(tempo: f64, onsets: Vec<f64>) -> Self {
        OnsetTrack { tempo, onsets }
    }

    /// Load an analyzer result written as `{"tempo": .., "onsets": [..]}`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_tempo(self.tempo)?;
        validate_onsets(&self.onsets)
    }

    /// Track duration up to the last onset, in seconds
    pub fn span(&self) -> f64 {
        match (self.onsets.first(), self.onsets.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

pub fn validate_tempo(tempo: f64) -> Result<()> {
    if !tempo.is_finite() || tempo <= 0.0 {
        return Err(ChartError::InvalidTempo(tempo));
    }
    Ok(())
}

/// Onsets must be finite, non-negative, within `MAX_ONSET_MS` and never decrease.
///
/// Repeated timestamps are accepted; they only shorten the chart.
pub fn validate_onsets(onsets: &[f64]) -> Result<()> {
    let mut previous: Option<f64> = None;

    for (index, &time) in onsets.iter().enumerate() {
        if !time.is_finite() {
            return Err(ChartError::NonFiniteOnset { index });
        }
        if time < 0.0 {
            return Err(ChartError::NegativeOnset { index, time });
        }
        if time * 1000.0 > MAX_ONSET_MS as f64 {
            return Err(ChartError::OnsetOutOfRange { index, time });
        }
        if let Some(prev) = previous {
            if time < prev {
                return Err(ChartError::UnsortedOnsets {
                    index,
                    previous: prev,
                    time,
                });
            }
        }
        previous = Some(time);
    }

    Ok(())
}

/// Seconds to whole milliseconds, truncating toward zero
pub fn to_millis(seconds: f64) -> u64 {
    (seconds * 1000.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_millis_truncates() {
        assert_eq!(to_millis(0.0), 0);
        assert_eq!(to_millis(0.25), 250);
        assert_eq!(to_millis(1.0009), 1000);
        assert_eq!(to_millis(2.5), 2500);
    }

    #[test]
    fn test_validate_rejects_bad_tempo() {
        for tempo in [0.0, -120.0, f64::NAN, f64::INFINITY] {
            let track = OnsetTrack::new(tempo, vec![0.5]);
            assert!(matches!(track.validate(), Err(ChartError::InvalidTempo(_))));
        }
    }

    #[test]
    fn test_validate_rejects_bad_onsets() {
        assert!(matches!(
            validate_onsets(&[0.5, -0.1]),
            Err(ChartError::NegativeOnset { index: 1, .. })
        ));
        assert!(matches!(
            validate_onsets(&[0.5, 1.0, 0.75]),
            Err(ChartError::UnsortedOnsets { index: 2, .. })
        ));
        assert!(matches!(
            validate_onsets(&[f64::NAN]),
            Err(ChartError::NonFiniteOnset { index: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_huge_onsets() {
        assert!(matches!(
            validate_onsets(&[1.0, 2.0e16]),
            Err(ChartError::OnsetOutOfRange { index: 1, .. })
        ));
        // one day of audio is still fine
        assert!(validate_onsets(&[86_400.0]).is_ok());
    }

    #[test]
    fn test_validate_accepts_empty_and_repeated() {
        assert!(validate_onsets(&[]).is_ok());
        assert!(validate_onsets(&[1.0, 1.0, 1.0]).is_ok());
    }

    #[test]
    fn test_parse_analyzer_json() {
        let track: OnsetTrack =
            serde_json::from_str(r#"{"tempo": 98.5, "onsets": [0.25, 0.5, 1.75]}"#).unwrap();
        assert_eq!(track.tempo, 98.5);
        assert_eq!(track.onsets.len(), 3);
        assert!((track.span() - 1.5).abs() < 1e-9);
    }
}
