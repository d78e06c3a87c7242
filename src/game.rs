//! Game session: turns tile clicks into queen placements and keeps score.

use crate::grid::{Grid, GridError, TileState};
use crate::hash::tiles_hash_code;
use crate::settings::{is_supported_size, Settings};
use crate::timer::GameTimer;
use eframe::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct GameOverReport {
    pub won: bool,
    pub time_taken: f64,
    pub unique_solution: bool,
    pub new_best_time: bool,
    /// Distinct solutions recorded for this board size.
    pub solutions_found: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The tile is not empty or the game is already over.
    Blocked,
    Placed {
        attacked: Vec<(usize, usize)>,
        game_over: Option<GameOverReport>,
    },
}

pub struct Game {
    settings: Settings,
    settings_dirty: bool,
    grid: Grid,
    timer: GameTimer,
    queens_placed: usize,
    report: Option<GameOverReport>,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let grid = Grid::new(settings.grid_size);
        let mut game = Self {
            settings,
            settings_dirty: false,
            grid,
            timer: GameTimer::new(),
            queens_placed: 0,
            report: None,
        };
        game.reset();
        game
    }

    /// Loads settings from `storage`, falling back to defaults (which are
    /// then written on the next save), and drops a size that no longer fits
    /// the screen.
    pub fn from_storage(storage: Option<&dyn Storage>, disabled_sizes: &[usize]) -> Self {
        let (mut settings, dirty) = match Settings::load(storage) {
            Some(settings) => (settings, false),
            None => (Settings::default(), true),
        };
        let resized = settings.ensure_enabled(disabled_sizes);
        let mut game = Self::new(settings);
        game.settings_dirty = dirty || resized;
        game
    }

    pub fn reset(&mut self) {
        self.grid = Grid::new(self.settings.grid_size);
        self.timer = GameTimer::new();
        self.queens_placed = 0;
        self.report = None;
        log::debug!("new {0}x{0} game", self.settings.grid_size);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn queens_placed(&self) -> usize {
        self.queens_placed
    }

    pub fn game_over(&self) -> Option<&GameOverReport> {
        self.report.as_ref()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.timer.elapsed_secs()
    }

    pub fn click_tile(&mut self, row: usize, col: usize) -> Result<ClickOutcome, GridError> {
        let Some(state) = self.grid.tile(row, col) else {
            return Err(GridError::InvalidCoordinate {
                row,
                col,
                size: self.grid.size(),
            });
        };
        if self.report.is_some() || state != TileState::Empty {
            return Ok(ClickOutcome::Blocked);
        }

        let attacked = self.grid.place_queen(row, col)?;
        self.queens_placed += 1;
        log::debug!(
            "queen {} placed at ({row}, {col}), {} tiles attacked",
            self.queens_placed,
            attacked.len()
        );

        // The clock starts once the first queen is on the board.
        if !self.timer.is_started() {
            self.timer.start();
        }

        let game_over = if self.grid.is_filled() {
            Some(self.finish())
        } else {
            None
        };

        Ok(ClickOutcome::Placed {
            attacked,
            game_over,
        })
    }

    fn finish(&mut self) -> GameOverReport {
        self.timer.stop();
        let time_taken = self.timer.elapsed_secs();

        let mut report = GameOverReport {
            won: false,
            time_taken,
            unique_solution: false,
            new_best_time: false,
            solutions_found: self.settings.solutions().len(),
        };

        if self.queens_placed == self.settings.grid_size && self.grid.is_solved() {
            let hash = tiles_hash_code(&self.grid.flat_tiles());
            report.won = true;
            report.unique_solution = self.settings.record_solution(hash);
            if time_taken < self.settings.best_time() {
                report.new_best_time = true;
                self.settings.set_best_time(time_taken);
            }
            report.solutions_found = self.settings.solutions().len();
            if report.unique_solution || report.new_best_time {
                self.settings_dirty = true;
            }
            log::info!(
                "solved {0}x{0} in {time_taken:.2}s (unique: {1}, best: {2})",
                self.settings.grid_size,
                report.unique_solution,
                report.new_best_time
            );
        } else {
            log::info!(
                "board filled with {} of {} queens",
                self.queens_placed,
                self.settings.grid_size
            );
        }

        self.report = Some(report.clone());
        report
    }

    /// Applies the options dialog. Returns `true` if the game was reset.
    ///
    /// Unsupported sizes are ignored.
    pub fn apply_options(&mut self, grid_size: usize, clear_achievements: bool) -> bool {
        let mut reset_needed = false;

        if grid_size != self.settings.grid_size && is_supported_size(grid_size) {
            self.settings.grid_size = grid_size;
            reset_needed = true;
        }
        if clear_achievements {
            self.settings.clear_achievements();
            reset_needed = true;
        }

        if reset_needed {
            self.settings_dirty = true;
            self.reset();
        }
        reset_needed
    }

    /// Drops back to the default size if the current one is disabled,
    /// starting a new game. Returns `true` if the game was reset.
    pub fn ensure_enabled(&mut self, disabled_sizes: &[usize]) -> bool {
        if !self.settings.ensure_enabled(disabled_sizes) {
            return false;
        }
        self.settings_dirty = true;
        self.reset();
        true
    }

    pub fn has_unsaved_settings(&self) -> bool {
        self.settings_dirty
    }

    pub fn save_if_dirty(&mut self, storage: &mut dyn Storage) {
        if self.settings_dirty {
            self.settings.save(storage);
            self.settings_dirty = false;
        }
    }
}
