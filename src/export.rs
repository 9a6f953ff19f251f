use crate::cell::CellRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const EXPORT_FILE: &str = "cell_data.csv";

/// Column order matches the table view; the leading empty header cell is the
/// identity column.
const HEADER: &str = ",type,voltage,current,temp,capacity,min_voltage,max_voltage,status";

/// Serializes the record set as UTF-8 CSV, one row per cell in insertion
/// order.
pub fn to_csv(records: &[CellRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            r.identity,
            r.chemistry.tag(),
            r.voltage,
            r.current,
            r.temperature,
            r.capacity,
            r.min_voltage,
            r.max_voltage,
            r.status,
        ));
    }
    out
}

pub fn write_csv(records: &[CellRecord], path: &Path) -> Result<()> {
    fs::write(path, to_csv(records))
        .with_context(|| format!("Writing export to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{build_records, Chemistry};
    use crate::config::DashConfig;
    use fastrand::Rng;

    fn sample() -> Vec<CellRecord> {
        let cfg = DashConfig::default();
        let mut rng = Rng::with_seed(42);
        let selections = [Some(Chemistry::Lfp), Some(Chemistry::Nmc)];
        let currents = [2.0, 1.5];
        build_records(&selections, &currents, &cfg.thermal, &cfg.input, &mut rng)
    }

    #[test]
    fn header_and_row_count() {
        let records = sample();
        let csv = to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("Cell 1 (LFP),lfp,3.2,2,"));
        assert!(lines[2].starts_with("Cell 2 (NMC),nmc,3.6,1.5,"));
    }

    #[test]
    fn round_trip_preserves_field_values() {
        let records = sample();
        let csv = to_csv(&records);
        for (line, record) in csv.lines().skip(1).zip(&records) {
            let fields: Vec<&str> = line.split(',').collect();
            // Identity carries a comma-free form, so a plain split is safe.
            assert_eq!(fields.len(), 9);
            assert_eq!(fields[0], record.identity);
            assert_eq!(fields[1], record.chemistry.tag());
            assert_eq!(fields[2].parse::<f64>().unwrap(), record.voltage);
            assert_eq!(fields[3].parse::<f64>().unwrap(), record.current);
            assert_eq!(fields[4].parse::<f64>().unwrap(), record.temperature);
            assert_eq!(fields[5].parse::<f64>().unwrap(), record.capacity);
            assert_eq!(fields[6].parse::<f64>().unwrap(), record.min_voltage);
            assert_eq!(fields[7].parse::<f64>().unwrap(), record.max_voltage);
            assert_eq!(fields[8], record.status.to_string());
        }
    }

    #[test]
    fn empty_record_set_exports_header_only() {
        let csv = to_csv(&[]);
        assert_eq!(csv, format!("{HEADER}\n"));
    }

    #[test]
    fn write_creates_utf8_file() {
        let records = sample();
        let dir = std::env::temp_dir();
        let path = dir.join("celldash_export_test.csv");
        write_csv(&records, &path).unwrap();
        let read_back = std::fs::read(&path).unwrap();
        assert_eq!(String::from_utf8(read_back).unwrap(), to_csv(&records));
        let _ = std::fs::remove_file(&path);
    }
}
