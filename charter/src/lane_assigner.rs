use crate::error::{ChartError, Result};
use crate::gap::GapPolicy;
use crate::onsets::{to_millis, validate_onsets};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANES: u8 = 4;

/// Duration given to the last note, which has no following onset to bound it
pub const FINAL_NOTE_MS: u64 = 500;

/// One note of the chart. Serialized as `{"time", "lane", "duration"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEvent {
    pub time: u64,     // ms from track start
    pub lane: u8,      // 0-indexed
    pub duration: u64, // ms
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LaneAssignmentStrategy {
    /// Random lane among those that are free and differ from the previous note.
    /// Onsets with no such lane are dropped.
    #[default]
    Constrained,
    /// Uniformly random lane for every onset. No playability guarantees;
    /// kept only to reproduce older charts.
    Unconstrained,
}

impl LaneAssignmentStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "constrained" => Some(LaneAssignmentStrategy::Constrained),
            "unconstrained" | "random" => Some(LaneAssignmentStrategy::Unconstrained),
            _ => None,
        }
    }
}

/// Result of one synthesis pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesis {
    pub events: Vec<ChartEvent>,
    /// Onset times (ms) that found no eligible lane
    pub skipped: Vec<u64>,
    /// Gap that was enforced during the pass
    pub min_gap_ms: u64,
}

impl Synthesis {
    /// Number of notes placed on each lane
    pub fn lane_counts(&self, lane_count: u8) -> Vec<usize> {
        let mut counts = vec![0; lane_count as usize];
        for event in &self.events {
            if let Some(count) = counts.get_mut(event.lane as usize) {
                *count += 1;
            }
        }
        counts
    }
}

/// Per-run bookkeeping: when each lane frees up, and which lane was used last.
#[derive(Clone, Debug)]
pub struct LaneState {
    end_times: Vec<u64>,
    last_lane: Option<u8>,
}

impl LaneState {
    pub fn new(lane_count: u8) -> Self {
        LaneState {
            end_times: vec![0; lane_count as usize],
            last_lane: None,
        }
    }

    /// Lanes that may take a note starting at `time`, in ascending order
    pub fn eligible(&self, time: u64, min_gap: u64) -> Vec<u8> {
        self.end_times
            .iter()
            .enumerate()
            .filter(|&(lane, &end)| {
                Some(lane as u8) != self.last_lane && time >= end.saturating_add(min_gap)
            })
            .map(|(lane, _)| lane as u8)
            .collect()
    }

    pub fn occupy(&mut self, lane: u8, time: u64, duration: u64) {
        self.end_times[lane as usize] = time.saturating_add(duration);
        self.last_lane = Some(lane);
    }
}

#[derive(Clone, Debug)]
pub struct LaneAssigner {
    pub strategy: LaneAssignmentStrategy,
    pub num_lanes: u8,
    pub gap_policy: GapPolicy,
    pub final_note_ms: u64,
}

impl LaneAssigner {
    pub fn new(strategy: LaneAssignmentStrategy, num_lanes: u8) -> Self {
        LaneAssigner {
            strategy,
            num_lanes,
            gap_policy: GapPolicy::HalfBeat,
            final_note_ms: FINAL_NOTE_MS,
        }
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn with_final_note_ms(mut self, final_note_ms: u64) -> Self {
        self.final_note_ms = final_note_ms;
        self
    }

    /// Turn ascending onset times (seconds) into chart events.
    ///
    /// Inputs are checked up front: a bad tempo, a lane count below 2 or an
    /// unsorted/negative onset fails before any note is placed. The random
    /// source is the only thing that varies between runs.
    pub fn assign_lanes<R: Rng + ?Sized>(
        &self,
        onsets: &[f64],
        tempo: f64,
        rng: &mut R,
    ) -> Result<Synthesis> {
        if self.num_lanes < 2 {
            return Err(ChartError::TooFewLanes(self.num_lanes));
        }
        let min_gap = self.gap_policy.min_gap_ms(tempo)?;
        validate_onsets(onsets)?;

        let millis: Vec<u64> = onsets.iter().map(|&t| to_millis(t)).collect();
        let durations = self.durations(&millis);

        let synthesis = match self.strategy {
            LaneAssignmentStrategy::Constrained => {
                self.assign_constrained(&millis, &durations, min_gap, rng)
            }
            LaneAssignmentStrategy::Unconstrained => {
                self.assign_unconstrained(&millis, &durations, rng)
            }
        };

        log::info!(
            "Placed {} of {} onsets on {} lanes (min gap {} ms, {} skipped)",
            synthesis.events.len(),
            onsets.len(),
            self.num_lanes,
            synthesis.min_gap_ms,
            synthesis.skipped.len()
        );

        Ok(synthesis)
    }

    /// Each note lasts until the next onset; the last one gets `final_note_ms`
    fn durations(&self, millis: &[u64]) -> Vec<u64> {
        millis
            .iter()
            .enumerate()
            .map(|(i, &time)| match millis.get(i + 1) {
                Some(&next) => next.saturating_sub(time),
                None => self.final_note_ms,
            })
            .collect()
    }

    fn assign_constrained<R: Rng + ?Sized>(
        &self,
        millis: &[u64],
        durations: &[u64],
        min_gap: u64,
        rng: &mut R,
    ) -> Synthesis {
        let mut state = LaneState::new(self.num_lanes);
        let mut events = Vec::with_capacity(millis.len());
        let mut skipped = Vec::new();

        for (&time, &duration) in millis.iter().zip(durations) {
            let eligible = state.eligible(time, min_gap);

            match eligible.choose(rng) {
                Some(&lane) => {
                    state.occupy(lane, time, duration);
                    log::debug!("{} ms -> lane {} ({} ms)", time, lane, duration);
                    events.push(ChartEvent { time, lane, duration });
                }
                None => {
                    log::warn!("No eligible lane at {} ms, skipping onset", time);
                    skipped.push(time);
                }
            }
        }

        Synthesis {
            events,
            skipped,
            min_gap_ms: min_gap,
        }
    }

    fn assign_unconstrained<R: Rng + ?Sized>(
        &self,
        millis: &[u64],
        durations: &[u64],
        rng: &mut R,
    ) -> Synthesis {
        let events = millis
            .iter()
            .zip(durations)
            .map(|(&time, &duration)| ChartEvent {
                time,
                lane: rng.gen_range(0..self.num_lanes),
                duration,
            })
            .collect();

        Synthesis {
            events,
            skipped: Vec::new(),
            min_gap_ms: 0,
        }
    }
}

/// Constrained synthesis with the half-beat gap
pub fn synthesize<R: Rng + ?Sized>(
    onsets: &[f64],
    tempo: f64,
    lane_count: u8,
    rng: &mut R,
) -> Result<Synthesis> {
    LaneAssigner::new(LaneAssignmentStrategy::Constrained, lane_count)
        .assign_lanes(onsets, tempo, rng)
}
