use crate::config::{InputConfig, ThermalConfig};
use fastrand::Rng;
use std::fmt;

/// Supported cell chemistries. Voltage figures are the fixed datasheet
/// values; there is no runtime lookup table to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chemistry {
    Lfp,
    Nmc,
}

impl Chemistry {
    pub const ALL: [Chemistry; 2] = [Chemistry::Lfp, Chemistry::Nmc];

    pub fn nominal_voltage(self) -> f64 {
        match self {
            Chemistry::Lfp => 3.2,
            Chemistry::Nmc => 3.6,
        }
    }

    pub fn min_voltage(self) -> f64 {
        match self {
            Chemistry::Lfp => 2.8,
            Chemistry::Nmc => 3.2,
        }
    }

    pub fn max_voltage(self) -> f64 {
        match self {
            Chemistry::Lfp => 3.6,
            Chemistry::Nmc => 4.0,
        }
    }

    /// Lowercase tag used in the CSV `type` column.
    pub fn tag(self) -> &'static str {
        match self {
            Chemistry::Lfp => "lfp",
            Chemistry::Nmc => "nmc",
        }
    }

    /// Uppercase code used in cell identities and the sidebar.
    pub fn code(self) -> &'static str {
        match self {
            Chemistry::Lfp => "LFP",
            Chemistry::Nmc => "NMC",
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStatus {
    #[default]
    Idle,
    Charging,
    Discharging,
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CellStatus::Idle => "Idle",
            CellStatus::Charging => "Charging",
            CellStatus::Discharging => "Discharging",
        })
    }
}

/// One configured cell. The record set is rebuilt from scratch whenever the
/// slot configuration changes; only `current`/`capacity` (current edits) and
/// `status` (animation) mutate in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    /// 1-based slot ordinal, also embedded in `identity`.
    pub slot: usize,
    pub identity: String,
    pub chemistry: Chemistry,
    pub voltage: f64,
    pub min_voltage: f64,
    pub max_voltage: f64,
    pub current: f64,
    pub temperature: f64,
    pub capacity: f64,
    pub status: CellStatus,
}

impl CellRecord {
    pub fn new(slot: usize, chemistry: Chemistry, thermal: &ThermalConfig, rng: &mut Rng) -> Self {
        let span = thermal.temp_max - thermal.temp_min;
        let temperature = round1(thermal.temp_min + rng.f64() * span);
        Self {
            slot,
            identity: format!("Cell {} ({})", slot, chemistry.code()),
            chemistry,
            voltage: chemistry.nominal_voltage(),
            min_voltage: chemistry.min_voltage(),
            max_voltage: chemistry.max_voltage(),
            current: 0.0,
            temperature,
            capacity: 0.0,
            status: CellStatus::Idle,
        }
    }

    /// Sets the current draw and recomputes capacity. Out-of-range values
    /// are clamped here as well, so programmatic callers cannot break the
    /// `capacity == voltage * current` invariant with wild inputs.
    pub fn set_current(&mut self, amps: f64, input: &InputConfig) {
        self.current = amps.clamp(0.0, input.current_max);
        self.capacity = round2(self.voltage * self.current);
    }
}

/// Builds the record set from the slot selections, skipping unset slots and
/// re-applying the per-slot current entries. Temperature is drawn once per
/// record, here.
pub fn build_records(
    selections: &[Option<Chemistry>],
    currents: &[f64],
    thermal: &ThermalConfig,
    input: &InputConfig,
    rng: &mut Rng,
) -> Vec<CellRecord> {
    selections
        .iter()
        .enumerate()
        .filter_map(|(idx, sel)| sel.map(|chem| (idx, chem)))
        .map(|(idx, chem)| {
            let mut record = CellRecord::new(idx + 1, chem, thermal, rng);
            record.set_current(currents.get(idx).copied().unwrap_or(0.0), input);
            record
        })
        .collect()
}

pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
