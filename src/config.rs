use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{env, fs::File, io::BufReader, path::PathBuf, sync::Arc};

/// Dashboard configuration. Every field has a built-in default so the binary
/// runs without any config file; a `celldash.json` found in one of the
/// standard locations overrides it.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashConfig {
    pub input: InputConfig,
    pub thermal: ThermalConfig,
    pub animation: AnimationConfig,
    /// Fixed seed for the temperature draws; unset means a fresh seed per
    /// session.
    pub rng_seed: Option<u64>,
}

/// Bounds for the input surface. Values outside these cannot be entered; the
/// metrics layer clamps to the same range for programmatic callers.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub max_cells: usize,
    pub current_max: f64,
    pub current_step: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_cells: 8,
            current_max: 10.0,
            current_step: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThermalConfig {
    pub temp_min: f64,
    pub temp_max: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            temp_min: 25.0,
            temp_max: 40.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnimationConfig {
    /// Delay between animation steps.
    pub step_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { step_delay_ms: 5000 }
    }
}

static CONFIG: OnceCell<Arc<DashConfig>> = OnceCell::new();

pub fn config() -> Arc<DashConfig> {
    CONFIG
        .get_or_init(|| Arc::new(load().unwrap_or_default()))
        .clone()
}

fn load() -> Result<DashConfig> {
    let Some(path) = find_config_file("celldash.json") else {
        return Ok(DashConfig::default());
    };
    let file = File::open(&path).with_context(|| format!("Opening {}", path.display()))?;
    let rdr = BufReader::new(file);
    serde_json::from_reader(rdr).with_context(|| format!("Parsing {}", path.display()))
}

/// Finds a config file by searching the standard locations in order.
fn find_config_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // 1. Relative to the current working directory.
    if let Ok(cwd) = env::current_dir() {
        candidates.push(cwd.join("config").join(name));
    }

    // 2. Relative to the crate manifest (handles `cargo run`).
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        candidates.push(PathBuf::from(manifest_dir).join("config").join(name));
    }

    // 3. Relative to the compiled executable, for release builds living in
    //    something like `.../target/release/`.
    if let Ok(mut exe_path) = env::current_exe() {
        for _ in 0..3 {
            if exe_path.pop() {
                candidates.push(exe_path.join("config").join(name));
            }
        }
    }

    // 4. System-wide location for a deployed install.
    candidates.push(PathBuf::from("/etc/celldash").join(name));

    candidates.into_iter().find(|p| p.is_file())
}
