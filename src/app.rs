use crate::cell::{build_records, round1, CellRecord, Chemistry};
use crate::config::DashConfig;
use crate::export;
use crate::simulation::SimRun;
use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use fastrand::Rng;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ViewMode {
    Overview,
    Charts,
    Simulation,
}

/// Raw input state for the sidebar. Slot entries persist even when the cell
/// count is lowered, so bumping it back restores previous selections.
pub struct FormState {
    pub cell_count: usize,
    pub selections: Vec<Option<Chemistry>>,
    pub currents: Vec<f64>,
    pub selected_slot: usize,
}

impl FormState {
    fn new(max_cells: usize) -> Self {
        Self {
            cell_count: 1,
            selections: vec![None; max_cells],
            currents: vec![0.0; max_cells],
            selected_slot: 0,
        }
    }
}

pub struct App {
    pub cfg: Arc<DashConfig>,
    pub form: FormState,
    pub records: Vec<CellRecord>,
    pub current_view: ViewMode,
    pub sim: Option<SimRun>,
    /// Index of the most recently applied animation step, kept for display
    /// after the run ends.
    pub last_step_applied: Option<usize>,
    pub last_export: Option<DateTime<Local>>,
    pub status_line: Option<String>,
    rng: Rng,
}

impl App {
    pub fn new(cfg: Arc<DashConfig>) -> Self {
        let rng = match cfg.rng_seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        let form = FormState::new(cfg.input.max_cells);
        Self {
            cfg,
            form,
            records: Vec::new(),
            current_view: ViewMode::Overview,
            sim: None,
            last_step_applied: None,
            last_export: None,
            status_line: None,
            rng,
        }
    }

    /// Rebuilds the record set from scratch. Called whenever the cell count
    /// or a chemistry selection changes; draws fresh temperatures and resets
    /// statuses, but re-applies the per-slot current entries.
    fn rebuild_records(&mut self) {
        let count = self.form.cell_count;
        self.records = build_records(
            &self.form.selections[..count],
            &self.form.currents[..count],
            &self.cfg.thermal,
            &self.cfg.input,
            &mut self.rng,
        );
        self.last_step_applied = None;
    }

    pub fn sim_active(&self) -> bool {
        self.sim.is_some()
    }

    pub fn handle_key_event(&mut self, key_code: KeyCode) {
        // An in-flight animation owns the records; only view switching works
        // until it completes.
        if self.sim_active() {
            match key_code {
                KeyCode::Tab => self.next_view(),
                KeyCode::BackTab => self.previous_view(),
                KeyCode::F(1) => self.current_view = ViewMode::Overview,
                KeyCode::F(2) => self.current_view = ViewMode::Charts,
                KeyCode::F(3) => self.current_view = ViewMode::Simulation,
                _ => {}
            }
            return;
        }
        match key_code {
            KeyCode::Tab => self.next_view(),
            KeyCode::BackTab => self.previous_view(),
            KeyCode::F(1) => self.current_view = ViewMode::Overview,
            KeyCode::F(2) => self.current_view = ViewMode::Charts,
            KeyCode::F(3) => self.current_view = ViewMode::Simulation,
            KeyCode::Up => {
                self.form.selected_slot = self.form.selected_slot.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.form.selected_slot + 1 < self.form.cell_count {
                    self.form.selected_slot += 1;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_cell_count(1),
            KeyCode::Char('-') => self.adjust_cell_count(-1),
            KeyCode::Char('c') => self.cycle_chemistry(),
            KeyCode::Left => self.adjust_current(-1.0),
            KeyCode::Right => self.adjust_current(1.0),
            KeyCode::Char('e') => {
                if self.current_view == ViewMode::Overview {
                    self.export_csv();
                }
            }
            KeyCode::Enter => {
                if self.current_view == ViewMode::Simulation {
                    self.start_simulation();
                }
            }
            _ => {}
        }
    }

    fn adjust_cell_count(&mut self, delta: i64) {
        let count = self.form.cell_count as i64 + delta;
        let count = count.clamp(1, self.cfg.input.max_cells as i64) as usize;
        if count == self.form.cell_count {
            return;
        }
        self.form.cell_count = count;
        self.form.selected_slot = self.form.selected_slot.min(count - 1);
        self.rebuild_records();
    }

    /// Cycles the selected slot through unset -> LFP -> NMC -> unset.
    fn cycle_chemistry(&mut self) {
        let slot = self.form.selected_slot;
        self.form.selections[slot] = match self.form.selections[slot] {
            None => Some(Chemistry::Lfp),
            Some(Chemistry::Lfp) => Some(Chemistry::Nmc),
            Some(Chemistry::Nmc) => None,
        };
        self.rebuild_records();
    }

    /// Adjusts the selected slot's current by one step, in place. This never
    /// rebuilds: only current and capacity change on the existing record.
    fn adjust_current(&mut self, sign: f64) {
        let slot = self.form.selected_slot;
        if self.form.selections[slot].is_none() {
            return;
        }
        let step = self.cfg.input.current_step;
        let amps = round1(self.form.currents[slot] + sign * step)
            .clamp(0.0, self.cfg.input.current_max);
        self.form.currents[slot] = amps;
        let input = &self.cfg.input;
        if let Some(record) = self.records.iter_mut().find(|r| r.slot == slot + 1) {
            record.set_current(amps, input);
        }
    }

    fn export_csv(&mut self) {
        if self.records.is_empty() {
            self.status_line = Some("Nothing to export yet".into());
            return;
        }
        let path = PathBuf::from(export::EXPORT_FILE);
        match export::write_csv(&self.records, &path) {
            Ok(()) => {
                self.last_export = Some(Local::now());
                self.status_line = Some(format!("Exported {}", export::EXPORT_FILE));
            }
            Err(e) => self.status_line = Some(format!("Export failed: {e:#}")),
        }
    }

    /// Starts an animation run and applies its first step immediately. The
    /// outer loop applies the remaining steps on the configured delay.
    fn start_simulation(&mut self) {
        if self.records.is_empty() {
            self.status_line = Some("Select cell types & inputs first to run simulation".into());
            return;
        }
        let mut run = SimRun::new();
        self.last_step_applied = run.advance(&mut self.records);
        self.sim = Some(run);
        self.status_line = None;
    }

    /// Applies the next animation step; called by the event loop once the
    /// inter-step delay has elapsed.
    pub fn advance_simulation(&mut self) {
        let Some(run) = self.sim.as_mut() else {
            return;
        };
        if let Some(step) = run.advance(&mut self.records) {
            self.last_step_applied = Some(step);
        }
        if run.is_finished() {
            self.sim = None;
            self.status_line = Some("Simulation complete".into());
        }
    }

    pub fn next_view(&mut self) {
        self.current_view = match self.current_view {
            ViewMode::Overview => ViewMode::Charts,
            ViewMode::Charts => ViewMode::Simulation,
            ViewMode::Simulation => ViewMode::Overview,
        };
    }

    pub fn previous_view(&mut self) {
        self.current_view = match self.current_view {
            ViewMode::Overview => ViewMode::Simulation,
            ViewMode::Charts => ViewMode::Overview,
            ViewMode::Simulation => ViewMode::Charts,
        };
    }

    pub fn record_for_slot(&self, slot: usize) -> Option<&CellRecord> {
        self.records.iter().find(|r| r.slot == slot + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellStatus;
    use crate::simulation::TOTAL_STEPS;

    fn seeded_app() -> App {
        let cfg = DashConfig {
            rng_seed: Some(1),
            ..Default::default()
        };
        App::new(Arc::new(cfg))
    }

    fn press(app: &mut App, key: KeyCode, times: usize) {
        for _ in 0..times {
            app.handle_key_event(key);
        }
    }

    /// Drives the concrete two-cell scenario: Cell 1 = LFP @ 2.0 A,
    /// Cell 2 = NMC @ 1.5 A.
    fn configure_two_cells(app: &mut App) {
        press(app, KeyCode::Char('+'), 1);
        press(app, KeyCode::Char('c'), 1); // slot 1 -> LFP
        press(app, KeyCode::Right, 20); // 2.0 A
        press(app, KeyCode::Down, 1);
        press(app, KeyCode::Char('c'), 2); // slot 2 -> NMC
        press(app, KeyCode::Right, 15); // 1.5 A
    }

    #[test]
    fn two_cell_scenario_capacities() {
        let mut app = seeded_app();
        configure_two_cells(&mut app);
        assert_eq!(app.records.len(), 2);
        assert_eq!(app.records[0].identity, "Cell 1 (LFP)");
        assert_eq!(app.records[0].current, 2.0);
        assert_eq!(app.records[0].capacity, 6.4);
        assert_eq!(app.records[1].identity, "Cell 2 (NMC)");
        assert_eq!(app.records[1].current, 1.5);
        assert_eq!(app.records[1].capacity, 5.4);
    }

    #[test]
    fn unset_slot_produces_no_record() {
        let mut app = seeded_app();
        press(&mut app, KeyCode::Char('+'), 2); // three slots
        press(&mut app, KeyCode::Down, 1);
        press(&mut app, KeyCode::Char('c'), 1); // only slot 2 configured
        assert_eq!(app.records.len(), 1);
        assert_eq!(app.records[0].identity, "Cell 2 (LFP)");
        assert!(app.record_for_slot(0).is_none());
        assert!(app.record_for_slot(2).is_none());
    }

    #[test]
    fn current_entry_survives_rebuild() {
        let mut app = seeded_app();
        configure_two_cells(&mut app);
        // Cycling slot 2's chemistry rebuilds the record set.
        app.handle_key_event(KeyCode::Char('c')); // NMC -> unset
        assert_eq!(app.records.len(), 1);
        app.handle_key_event(KeyCode::Char('c')); // unset -> LFP
        assert_eq!(app.records.len(), 2);
        // Slot 1's current entry was re-applied with its LFP voltage.
        assert_eq!(app.records[0].current, 2.0);
        assert_eq!(app.records[0].capacity, 6.4);
        // Slot 2 is now LFP: 3.2 * 1.5.
        assert_eq!(app.records[1].capacity, 4.8);
    }

    #[test]
    fn current_clamps_at_surface_bounds() {
        let mut app = seeded_app();
        press(&mut app, KeyCode::Char('c'), 1);
        press(&mut app, KeyCode::Right, 110); // 11 A worth of presses
        assert_eq!(app.records[0].current, 10.0);
        press(&mut app, KeyCode::Left, 110);
        assert_eq!(app.records[0].current, 0.0);
    }

    #[test]
    fn cell_count_is_bounded() {
        let mut app = seeded_app();
        press(&mut app, KeyCode::Char('-'), 3);
        assert_eq!(app.form.cell_count, 1);
        press(&mut app, KeyCode::Char('+'), 20);
        assert_eq!(app.form.cell_count, 8);
    }

    #[test]
    fn simulation_needs_records() {
        let mut app = seeded_app();
        app.current_view = ViewMode::Simulation;
        app.handle_key_event(KeyCode::Enter);
        assert!(!app.sim_active());
        assert!(app.status_line.is_some());
    }

    #[test]
    fn simulation_runs_twelve_steps_and_ends() {
        let mut app = seeded_app();
        configure_two_cells(&mut app);
        app.current_view = ViewMode::Simulation;
        app.handle_key_event(KeyCode::Enter);
        assert!(app.sim_active());
        assert_eq!(app.last_step_applied, Some(0));
        assert!(app.records.iter().all(|r| r.status == CellStatus::Charging));
        for _ in 1..TOTAL_STEPS {
            app.advance_simulation();
        }
        assert!(!app.sim_active());
        assert_eq!(app.last_step_applied, Some(TOTAL_STEPS - 1));
        // Final cycle position leaves every cell Idle.
        assert!(app.records.iter().all(|r| r.status == CellStatus::Idle));
    }

    #[test]
    fn form_edits_ignored_while_running() {
        let mut app = seeded_app();
        configure_two_cells(&mut app);
        app.current_view = ViewMode::Simulation;
        app.handle_key_event(KeyCode::Enter);
        let before = app.records.clone();
        app.handle_key_event(KeyCode::Char('c'));
        app.handle_key_event(KeyCode::Right);
        app.handle_key_event(KeyCode::Char('+'));
        assert_eq!(app.records, before);
        // View switching still works.
        app.handle_key_event(KeyCode::Tab);
        assert_eq!(app.current_view, ViewMode::Overview);
    }

    #[test]
    fn restart_is_ignored_mid_run() {
        let mut app = seeded_app();
        configure_two_cells(&mut app);
        app.current_view = ViewMode::Simulation;
        app.handle_key_event(KeyCode::Enter);
        app.advance_simulation();
        assert_eq!(app.last_step_applied, Some(1));
        app.handle_key_event(KeyCode::Enter);
        // Still on step 1, not reset to 0.
        assert_eq!(app.last_step_applied, Some(1));
    }
}
