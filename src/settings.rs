//! Persisted player settings and achievements.
//!
//! Settings live under a single key in an [`eframe::Storage`], encoded with
//! eframe's RON helpers. Best times and solved-board hashes are tracked per
//! board size.

use eframe::Storage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;

pub const STORAGE_KEY: &str = "n_queens.settings";

pub const MIN_GRID_SIZE: usize = 8;
pub const MAX_GRID_SIZE: usize = 12;
pub const DEFAULT_GRID_SIZE: usize = 8;

/// Smallest on-screen tile edge, in points.
pub const MIN_TILE_DIMEN: f32 = 36.0;
pub const MIN_SCREEN_WIDTH: f32 = 320.0;

/// Best time recorded for a size nobody has solved yet.
pub const UNSET_BEST_TIME: f64 = 9999.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid_size: usize,
    /// Seconds, keyed by board size.
    pub best_time: BTreeMap<usize, f64>,
    /// Hashes of solved boards, keyed by board size.
    pub solutions_found: BTreeMap<usize, Vec<i32>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            best_time: default_best_times(),
            solutions_found: default_solutions(),
        }
    }
}

fn default_best_times() -> BTreeMap<usize, f64> {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE)
        .map(|size| (size, UNSET_BEST_TIME))
        .collect()
}

fn default_solutions() -> BTreeMap<usize, Vec<i32>> {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE)
        .map(|size| (size, Vec::new()))
        .collect()
}

impl Settings {
    /// Reads settings from `storage`.
    ///
    /// Returns `None` when nothing usable is stored, so the caller can fall
    /// back to defaults and write them on the next save.
    pub fn load(storage: Option<&dyn Storage>) -> Option<Self> {
        let storage = storage?;
        let raw = storage.get_string(STORAGE_KEY)?;
        let settings: Option<Self> = eframe::get_value(storage, STORAGE_KEY);
        if settings.is_none() {
            log::warn!("discarding unreadable settings ({} bytes)", raw.len());
        }
        settings
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        eframe::set_value(storage, STORAGE_KEY, self);
        storage.flush();
        log::debug!("settings saved for grid size {}", self.grid_size);
    }

    pub fn best_time(&self) -> f64 {
        self.best_time
            .get(&self.grid_size)
            .copied()
            .unwrap_or(UNSET_BEST_TIME)
    }

    pub fn set_best_time(&mut self, secs: f64) {
        self.best_time.insert(self.grid_size, secs);
    }

    pub fn solutions(&self) -> &[i32] {
        self.solutions_found
            .get(&self.grid_size)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Stores a solved-board hash for the current size. Returns `false` if it
    /// was already known.
    pub fn record_solution(&mut self, hash: i32) -> bool {
        let solutions = self.solutions_found.entry(self.grid_size).or_default();
        if solutions.contains(&hash) {
            return false;
        }
        solutions.push(hash);
        true
    }

    pub fn clear_achievements(&mut self) {
        self.best_time = default_best_times();
        self.solutions_found = default_solutions();
    }

    /// Falls back to the default size if the current one is unsupported or
    /// disabled. Returns `true` if the size changed.
    pub fn ensure_enabled(&mut self, disabled: &[usize]) -> bool {
        if !is_supported_size(self.grid_size) || disabled.contains(&self.grid_size) {
            log::debug!(
                "grid size {} does not fit on screen, using {}",
                self.grid_size,
                DEFAULT_GRID_SIZE
            );
            self.grid_size = DEFAULT_GRID_SIZE;
            return true;
        }
        false
    }

    pub fn write_achievements_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["Grid Size", "Best Time", "Solutions Found"])?;
        for size in MIN_GRID_SIZE..=MAX_GRID_SIZE {
            let best = match self.best_time.get(&size) {
                Some(&secs) if secs < UNSET_BEST_TIME => format!("{secs:.2}"),
                _ => String::new(),
            };
            let found = self.solutions_found.get(&size).map_or(0, Vec::len);
            wtr.write_record([size.to_string(), best, found.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

pub fn is_supported_size(size: usize) -> bool {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size)
}

/// Board sizes too large to fit a `width × height` screen.
pub fn disabled_grid_sizes(width: f32, height: f32) -> Vec<usize> {
    let width_increases = ((width - MIN_SCREEN_WIDTH) / MIN_TILE_DIMEN).floor();
    let height_increases =
        (((height - MIN_SCREEN_WIDTH) - height * 0.25) / MIN_TILE_DIMEN).floor();
    let max_increase = width_increases.min(height_increases).max(0.0) as usize;

    (MIN_GRID_SIZE..=MAX_GRID_SIZE)
        .filter(|&size| size > DEFAULT_GRID_SIZE + max_increase)
        .collect()
}
