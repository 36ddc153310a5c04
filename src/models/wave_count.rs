use crate::domain::Wave;

/// The single live candidate labelling of the series.
///
/// Waves of finished cycles are frozen; only the current cycle (from `cycle_start` on) can be
/// discarded by an invalidation.
#[derive(Debug, Clone, Default)]
pub struct WaveCount {
    waves: Vec<Wave>,
    cycle_start: usize,
}

impl WaveCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, wave: Wave) {
        self.waves.push(wave);
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn last(&self) -> Option<&Wave> {
        self.waves.last()
    }

    /// Waves belonging to the cycle currently being labelled.
    pub fn current_cycle(&self) -> &[Wave] {
        &self.waves[self.cycle_start..]
    }

    /// Freezes the current cycle after wave C; the next pushed wave opens a new cycle.
    pub fn seal_cycle(&mut self) {
        self.cycle_start = self.waves.len();
    }

    /// Removes and returns every wave of the current cycle.
    pub fn discard_current_cycle(&mut self) -> Vec<Wave> {
        self.waves.drain(self.cycle_start..).collect()
    }

    pub fn into_waves(self) -> Vec<Wave> {
        self.waves
    }
}
