use crate::cell::{CellRecord, CellStatus};

/// Fixed status cycle applied to every cell, one step at a time.
pub const STATUS_CYCLE: [CellStatus; 4] = [
    CellStatus::Charging,
    CellStatus::Idle,
    CellStatus::Discharging,
    CellStatus::Idle,
];

/// Three full cycles per run.
pub const TOTAL_STEPS: usize = 12;

pub fn status_at(step: usize) -> CellStatus {
    STATUS_CYCLE[step % STATUS_CYCLE.len()]
}

/// Applies one animation step: every record gets the same status. Pure with
/// respect to time; the inter-step delay lives in the outer event loop.
pub fn apply_step(step: usize, records: &mut [CellRecord]) {
    let status = status_at(step);
    for record in records {
        record.status = status;
    }
}

/// One in-progress animation run. Cannot be paused or restarted; it is
/// dropped once `advance` has applied the final step.
#[derive(Debug, Clone)]
pub struct SimRun {
    next_step: usize,
}

impl SimRun {
    pub fn new() -> Self {
        Self { next_step: 0 }
    }

    pub fn is_finished(&self) -> bool {
        self.next_step >= TOTAL_STEPS
    }

    pub fn steps_done(&self) -> usize {
        self.next_step
    }

    /// Applies the next step to the records and returns its index, or `None`
    /// when the run has already completed.
    pub fn advance(&mut self, records: &mut [CellRecord]) -> Option<usize> {
        if self.is_finished() {
            return None;
        }
        let step = self.next_step;
        apply_step(step, records);
        self.next_step += 1;
        Some(step)
    }
}

impl Default for SimRun {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellRecord, Chemistry};
    use crate::config::DashConfig;
    use fastrand::Rng;

    fn records(n: usize) -> Vec<CellRecord> {
        let cfg = DashConfig::default();
        let mut rng = Rng::with_seed(7);
        (1..=n)
            .map(|i| CellRecord::new(i, Chemistry::Lfp, &cfg.thermal, &mut rng))
            .collect()
    }

    #[test]
    fn cycle_repeats_three_times() {
        let mut cells = records(1);
        let mut run = SimRun::new();
        let mut observed = Vec::new();
        while run.advance(&mut cells).is_some() {
            observed.push(cells[0].status);
        }
        let expected: Vec<_> = STATUS_CYCLE.iter().cycle().take(TOTAL_STEPS).copied().collect();
        assert_eq!(observed, expected);
    }

    #[test]
    fn cells_move_in_lockstep() {
        let mut cells = records(5);
        let mut run = SimRun::new();
        while run.advance(&mut cells).is_some() {
            let first = cells[0].status;
            assert!(cells.iter().all(|c| c.status == first));
        }
    }

    #[test]
    fn finished_run_stops_advancing() {
        let mut cells = records(2);
        let mut run = SimRun::new();
        for _ in 0..TOTAL_STEPS {
            assert!(run.advance(&mut cells).is_some());
        }
        assert!(run.is_finished());
        assert_eq!(run.advance(&mut cells), None);
        // Final step of the cycle leaves everything Idle.
        assert!(cells.iter().all(|c| c.status == CellStatus::Idle));
    }

    #[test]
    fn status_only_changes_during_a_run() {
        let mut cells = records(3);
        assert!(cells.iter().all(|c| c.status == CellStatus::Idle));
        let mut run = SimRun::new();
        run.advance(&mut cells);
        assert!(cells.iter().all(|c| c.status == CellStatus::Charging));
    }
}
