pub mod error;
pub mod exporter;
pub mod gap;
pub mod lane_assigner;
pub mod onsets;
pub mod verify;

use error::Result;
use exporter::ChartExport;
use gap::GapPolicy;
use lane_assigner::{LaneAssigner, LaneAssignmentStrategy, Synthesis, DEFAULT_LANES, FINAL_NOTE_MS};
use onsets::OnsetTrack;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Main charter configuration
#[derive(Clone, Debug)]
pub struct CharterConfig {
    pub lane_count: u8,
    pub gap_policy: GapPolicy,
    pub strategy: LaneAssignmentStrategy,
    pub seed: Option<u64>,           // If None, seeded from OS entropy
    pub tempo_override: Option<f64>, // If None, the analyzer's tempo is used
    pub final_note_ms: u64,
}

impl Default for CharterConfig {
    fn default() -> Self {
        CharterConfig {
            lane_count: DEFAULT_LANES,
            gap_policy: GapPolicy::HalfBeat,
            strategy: LaneAssignmentStrategy::Constrained,
            seed: None,
            tempo_override: None,
            final_note_ms: FINAL_NOTE_MS,
        }
    }
}

/// Finished chart plus what was dropped on the way
#[derive(Debug, Clone)]
pub struct GeneratedChart {
    pub export: ChartExport,
    pub synthesis: Synthesis,
    pub tempo: f64,
}

/// Turns analyzer output into charts. Each call to `generate` runs its own
/// synthesis pass with its own lane state.
pub struct Charter {
    config: CharterConfig,
}

impl Charter {
    pub fn new(config: CharterConfig) -> Self {
        Charter { config }
    }

    pub fn config(&self) -> &CharterConfig {
        &self.config
    }

    fn assigner(&self) -> LaneAssigner {
        LaneAssigner::new(self.config.strategy, self.config.lane_count)
            .with_gap_policy(self.config.gap_policy)
            .with_final_note_ms(self.config.final_note_ms)
    }

    /// Generate a chart named `name`, using the configured seed if any
    pub fn generate(&self, track: &OnsetTrack, name: &str) -> Result<GeneratedChart> {
        match self.config.seed {
            Some(seed) => self.generate_with_rng(track, name, &mut StdRng::seed_from_u64(seed)),
            None => self.generate_with_rng(track, name, &mut StdRng::from_entropy()),
        }
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        track: &OnsetTrack,
        name: &str,
        rng: &mut R,
    ) -> Result<GeneratedChart> {
        let tempo = self.config.tempo_override.unwrap_or(track.tempo);
        log::info!(
            "Charting '{}': {} onsets over {:.1}s at {:.1} BPM",
            name,
            track.onsets.len(),
            track.span(),
            tempo
        );

        let synthesis = self.assigner().assign_lanes(&track.onsets, tempo, rng)?;
        let export = ChartExport::new(
            name.to_string(),
            self.config.lane_count,
            synthesis.events.clone(),
        );

        Ok(GeneratedChart {
            export,
            synthesis,
            tempo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;

    #[test]
    fn test_charter_config_default() {
        let config = CharterConfig::default();
        assert_eq!(config.lane_count, 4);
        assert_eq!(config.gap_policy, GapPolicy::HalfBeat);
        assert_eq!(config.final_note_ms, 500);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_seeded_charter_is_reproducible() {
        let config = CharterConfig {
            seed: Some(1234),
            ..CharterConfig::default()
        };
        let charter = Charter::new(config);
        let track = OnsetTrack::new(110.0, (0..120).map(|i| 0.25 + i as f64 * 0.125).collect());

        let a = charter.generate(&track, "song").unwrap();
        let b = charter.generate(&track, "song").unwrap();
        assert_eq!(a.export.to_json().unwrap(), b.export.to_json().unwrap());
        assert_eq!(a.synthesis.skipped, b.synthesis.skipped);
    }

    #[test]
    fn test_tempo_override_changes_gap() {
        let config = CharterConfig {
            seed: Some(1),
            tempo_override: Some(60.0),
            ..CharterConfig::default()
        };
        let track = OnsetTrack::new(120.0, vec![1.0, 2.0]);
        let chart = Charter::new(config).generate(&track, "slow").unwrap();

        assert_eq!(chart.tempo, 60.0);
        assert_eq!(chart.synthesis.min_gap_ms, 500);
    }

    #[test]
    fn test_invalid_tempo_produces_no_chart() {
        let track = OnsetTrack::new(0.0, vec![0.5, 1.0]);
        let result = Charter::new(CharterConfig::default()).generate(&track, "broken");
        assert!(matches!(result, Err(ChartError::InvalidTempo(_))));
    }
}
