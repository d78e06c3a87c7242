use eframe::egui;
use n_queens::settings::{
    disabled_grid_sizes, DEFAULT_GRID_SIZE, MAX_GRID_SIZE, MIN_GRID_SIZE, UNSET_BEST_TIME,
};
use n_queens::{ClickOutcome, Game, TileState};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

const ACHIEVEMENTS_FILE: &str = "n_queens_achievements.csv";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 750.0]),
        ..Default::default()
    };
    eframe::run_native(
        "n Queens",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(NQueensApp::new(cc)))
        }),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    // Redirect `log` messages to the browser console.
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .and_then(|win| win.document())
            .expect("Could not find document");
        let canvas = document
            .get_element_by_id("the_canvas_id")
            .expect("Could not find canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("Element is not a canvas");

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| {
                    cc.egui_ctx.set_visuals(egui::Visuals::dark());
                    // Recommended for web: avoid infinite resize loops
                    cc.egui_ctx.set_pixels_per_point(1.0);
                    Ok(Box::new(NQueensApp::new(cc)))
                }),
            )
            .await
            .expect("failed to start eframe");
    });
}

#[derive(Clone, PartialEq)]
struct Theme {
    name: &'static str,
    background: egui::Color32,
    panel_background: egui::Color32,
    text_color: egui::Color32,
    accent_color: egui::Color32,
    board_light: egui::Color32,
    board_dark: egui::Color32,
    queen_color: egui::Color32,
    dot_color: egui::Color32,
}

impl Theme {
    fn presets() -> Vec<Self> {
        vec![
            Self {
                name: "Slate",
                background: egui::Color32::from_rgb(15, 23, 42),
                panel_background: egui::Color32::from_rgb(30, 41, 59),
                text_color: egui::Color32::from_rgb(226, 232, 240),
                accent_color: egui::Color32::from_rgb(99, 102, 241),
                board_light: egui::Color32::from_rgb(241, 245, 249),
                board_dark: egui::Color32::from_rgb(100, 116, 139),
                queen_color: egui::Color32::from_rgb(67, 56, 202),
                dot_color: egui::Color32::from_rgba_unmultiplied(239, 68, 68, 170),
            },
            Self {
                name: "Walnut",
                background: egui::Color32::from_rgb(45, 25, 10),
                panel_background: egui::Color32::from_rgb(70, 40, 20),
                text_color: egui::Color32::from_rgb(245, 230, 200),
                accent_color: egui::Color32::from_rgb(180, 100, 40),
                board_light: egui::Color32::from_rgb(210, 180, 140),
                board_dark: egui::Color32::from_rgb(139, 69, 19),
                queen_color: egui::Color32::from_rgb(250, 240, 215),
                dot_color: egui::Color32::from_rgba_unmultiplied(30, 15, 5, 150),
            },
            Self {
                name: "Arcade",
                background: egui::Color32::from_rgb(10, 10, 20),
                panel_background: egui::Color32::from_rgb(20, 20, 40),
                text_color: egui::Color32::from_rgb(0, 255, 255),
                accent_color: egui::Color32::from_rgb(255, 0, 255),
                board_light: egui::Color32::from_rgb(30, 30, 60),
                board_dark: egui::Color32::from_rgb(15, 15, 30),
                queen_color: egui::Color32::from_rgb(57, 255, 20),
                dot_color: egui::Color32::from_rgba_unmultiplied(255, 60, 200, 140),
            },
            Self {
                name: "Newsprint",
                background: egui::Color32::from_rgb(240, 240, 230),
                panel_background: egui::Color32::from_rgb(220, 220, 210),
                text_color: egui::Color32::from_rgb(50, 50, 50),
                accent_color: egui::Color32::from_rgb(200, 50, 50),
                board_light: egui::Color32::from_rgb(255, 255, 250),
                board_dark: egui::Color32::from_rgb(200, 200, 190),
                queen_color: egui::Color32::from_rgb(30, 64, 120),
                dot_color: egui::Color32::from_rgba_unmultiplied(120, 120, 110, 160),
            },
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::presets()[0].clone()
    }
}

struct Particle {
    pos: egui::Pos2,
    vel: egui::Vec2,
    color: egui::Color32,
    life: f32, // 1.0 down to 0.0
    size: f32,
}

struct NQueensApp {
    game: Game,
    theme: Theme,
    particles: Vec<Particle>,
    disabled_sizes: Vec<usize>,
    size_checked: bool,

    // Options panel, applied together.
    selected_size: usize,
    clear_achievements: bool,

    show_help: bool,
    show_game_over: bool,
}

impl NQueensApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // The real screen size is only known once the first frame runs.
        let game = Game::from_storage(cc.storage, &[]);
        let selected_size = game.settings().grid_size;
        Self {
            game,
            theme: Theme::default(),
            particles: Vec::new(),
            disabled_sizes: Vec::new(),
            size_checked: false,
            selected_size,
            clear_achievements: false,
            show_help: false,
            show_game_over: false,
        }
    }

    fn spawn_particles(&mut self, pos: egui::Pos2, color: egui::Color32) {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..30 {
            let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed: f32 = rng.gen_range(100.0..500.0);
            self.particles.push(Particle {
                pos,
                vel: egui::vec2(angle.cos() * speed, angle.sin() * speed - 200.0),
                color,
                life: 1.0,
                size: rng.gen_range(3.0..7.0),
            });
        }
    }

    fn new_game(&mut self) {
        self.game.reset();
        self.show_game_over = false;
    }

    fn apply_options(&mut self) {
        if self
            .game
            .apply_options(self.selected_size, self.clear_achievements)
        {
            self.show_game_over = false;
        }
        self.clear_achievements = false;
    }

    fn best_time_text(&self) -> String {
        let best = self.game.settings().best_time();
        if best >= UNSET_BEST_TIME {
            "--".to_owned()
        } else {
            format!("{best:.2}s")
        }
    }

    fn export_achievements(&self) {
        let mut buf = Vec::new();
        if let Err(err) = self.game.settings().write_achievements_csv(&mut buf) {
            log::error!("failed to build achievements csv: {err}");
            return;
        }

        #[cfg(target_arch = "wasm32")]
        if let Err(err) = web_csv_export(&String::from_utf8_lossy(&buf), ACHIEVEMENTS_FILE) {
            log::error!("failed to download achievements: {err:?}");
        }
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(ACHIEVEMENTS_FILE)
            .save_file()
        {
            match std::fs::write(&path, &buf) {
                Ok(()) => log::info!("achievements exported to {}", path.display()),
                Err(err) => log::error!("failed to write {}: {err}", path.display()),
            }
        }
    }

    fn stats_ui(&self, ui: &mut egui::Ui) {
        let size = self.game.grid().size();
        egui::Grid::new("stats").num_columns(2).show(ui, |ui| {
            ui.label("Queens placed:");
            ui.label(
                egui::RichText::new(format!("{} / {}", self.game.queens_placed(), size))
                    .strong()
                    .color(self.theme.accent_color),
            );
            ui.end_row();

            ui.label("Time:");
            ui.label(format!("{:.1}s", self.game.elapsed_secs()));
            ui.end_row();

            ui.label("Best time:");
            ui.label(self.best_time_text());
            ui.end_row();

            ui.label("Solutions found:");
            ui.label(self.game.settings().solutions().len().to_string());
            ui.end_row();
        });
    }

    fn options_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Board size:");
            for size in MIN_GRID_SIZE..=MAX_GRID_SIZE {
                let enabled = !self.disabled_sizes.contains(&size);
                ui.add_enabled_ui(enabled, |ui| {
                    ui.selectable_value(&mut self.selected_size, size, size.to_string())
                        .on_disabled_hover_text("Too large for this screen");
                });
            }
        });
        ui.checkbox(&mut self.clear_achievements, "Clear achievements");
        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                self.apply_options();
            }
            if ui.button("New Game").clicked() {
                self.new_game();
            }
        });
    }

    fn theme_ui(&mut self, ui: &mut egui::Ui) {
        egui::ComboBox::from_id_salt("theme_picker")
            .selected_text(self.theme.name)
            .show_ui(ui, |ui| {
                for preset in Theme::presets() {
                    ui.selectable_value(&mut self.theme, preset.clone(), preset.name);
                }
            });
    }

    /// Draws the board. Returns the tile the player clicked, if any.
    fn board_ui(&self, ui: &mut egui::Ui, margin: f32) -> Option<(usize, usize)> {
        let n = self.game.grid().size();
        let available_rect = ui.available_rect_before_wrap();
        let size = (available_rect.height() - margin)
            .min(available_rect.width() - margin)
            .max(0.0);
        let board_rect =
            egui::Rect::from_center_size(available_rect.center(), egui::vec2(size, size));
        let response = ui.allocate_rect(board_rect, egui::Sense::click());

        let painter = ui.painter();
        painter.rect_filled(
            board_rect.expand(5.0),
            5.0,
            self.theme.text_color.linear_multiply(0.2),
        );

        let cell_size = size / n as f32;
        for (row, tiles) in self.game.grid().tiles().iter().enumerate() {
            for (col, &state) in tiles.iter().enumerate() {
                let cell_rect = egui::Rect::from_min_size(
                    board_rect.min + egui::vec2(col as f32 * cell_size, row as f32 * cell_size),
                    egui::vec2(cell_size, cell_size),
                );
                let color = if (row + col) % 2 == 0 {
                    self.theme.board_light
                } else {
                    self.theme.board_dark
                };
                painter.rect_filled(cell_rect, 0.0, color);

                match state {
                    TileState::Empty => {}
                    TileState::Dotted => {
                        painter.circle_filled(
                            cell_rect.center(),
                            cell_size * 0.1,
                            self.theme.dot_color,
                        );
                    }
                    TileState::Queen => {
                        painter.text(
                            cell_rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "♛",
                            egui::FontId::proportional(cell_size * 0.7),
                            self.theme.queen_color,
                        );
                    }
                }
            }
        }

        for p in &self.particles {
            painter.circle_filled(p.pos, p.size, p.color.linear_multiply(p.life));
        }

        if !response.clicked() || cell_size <= 0.0 {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        let offset = pos - board_rect.min;
        let row = (offset.y / cell_size).floor();
        let col = (offset.x / cell_size).floor();
        if row < 0.0 || col < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < n && col < n).then_some((row, col))
    }

    fn game_over_window(&mut self, ctx: &egui::Context) {
        let Some(report) = self.game.game_over().cloned() else {
            return;
        };
        let mut play_again = false;
        egui::Window::new(if report.won { "Success!" } else { "Try Again" })
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                if report.won {
                    if report.new_best_time {
                        ui.label(format!("New best time: {:.2}s!", report.time_taken));
                    } else {
                        ui.label(format!("You finished in {:.2}s.", report.time_taken));
                    }
                    if report.unique_solution {
                        ui.label(format!(
                            "That's a new solution! You have found {} so far.",
                            report.solutions_found
                        ));
                    } else {
                        ui.label(format!(
                            "You have found that one before. Solutions found: {}.",
                            report.solutions_found
                        ));
                    }
                } else {
                    ui.label("No empty tiles left. Keep trying, every board has a solution!");
                }
                ui.add_space(10.0);
                if ui.button("Play Again").clicked() {
                    play_again = true;
                }
            });
        if play_again {
            self.new_game();
        }
    }

    fn help_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("How to Play")
            .open(&mut self.show_help)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Place {0} queens on the {0}x{0} board so that none can attack another.",
                    self.game.grid().size()
                ));
                ui.label("Every tile a queen attacks is dotted and cannot be used.");
                ui.label("The game ends when no empty tiles remain.");
            });
    }
}

impl eframe::App for NQueensApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // --- Animation Update ---
        let dt = ctx.input(|i| i.stable_dt);
        self.particles.retain_mut(|p| {
            p.pos += p.vel * dt;
            p.vel.y += 800.0 * dt; // Gravity
            p.life -= dt * 1.5;
            p.life > 0.0
        });
        let clock_running = self.game.queens_placed() > 0 && self.game.game_over().is_none();
        if !self.particles.is_empty() || clock_running {
            ctx.request_repaint();
        }

        let screen_rect = ctx.screen_rect();
        self.disabled_sizes = disabled_grid_sizes(screen_rect.width(), screen_rect.height());
        if !self.size_checked {
            self.size_checked = true;
            if self.game.ensure_enabled(&self.disabled_sizes) {
                self.selected_size = self.game.settings().grid_size;
            }
        }
        if self.disabled_sizes.contains(&self.selected_size) {
            self.selected_size = DEFAULT_GRID_SIZE;
        }

        let panel_frame = egui::Frame::none()
            .fill(self.theme.panel_background)
            .inner_margin(12.0)
            .rounding(10.0)
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(20)));

        let is_mobile = screen_rect.width() < 700.0;

        if is_mobile {
            egui::TopBottomPanel::top("mobile_top")
                .frame(panel_frame.inner_margin(egui::Margin::symmetric(10.0, 5.0)))
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new("♛ n Queens")
                                .strong()
                                .color(self.theme.accent_color),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("?").clicked() {
                                self.show_help = true;
                            }
                            ui.label(format!(
                                "{} / {}  {:.1}s",
                                self.game.queens_placed(),
                                self.game.grid().size(),
                                self.game.elapsed_secs()
                            ));
                        });
                    });
                });

            egui::TopBottomPanel::bottom("mobile_bottom")
                .frame(panel_frame.inner_margin(egui::Margin::symmetric(15.0, 10.0)))
                .show(ctx, |ui| {
                    self.options_ui(ui);
                    ui.horizontal(|ui| {
                        ui.label(format!("Best: {}", self.best_time_text()));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Export").clicked() {
                                self.export_achievements();
                            }
                            if ui.button("Theme").clicked() {
                                let presets = Theme::presets();
                                if let Some(idx) =
                                    presets.iter().position(|t| t.name == self.theme.name)
                                {
                                    self.theme = presets[(idx + 1) % presets.len()].clone();
                                }
                            }
                        });
                    });
                });
        } else {
            egui::SidePanel::right("controls")
                .frame(panel_frame)
                .min_width(320.0)
                .resizable(true)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(8.0);
                            ui.label(
                                egui::RichText::new("♛ n Queens")
                                    .size(24.0)
                                    .strong()
                                    .color(self.theme.text_color),
                            );
                        });
                        ui.add_space(20.0);
                        self.stats_ui(ui);

                        ui.add_space(15.0);
                        ui.label(
                            egui::RichText::new("Options")
                                .strong()
                                .color(self.theme.text_color),
                        );
                        ui.separator();
                        self.options_ui(ui);

                        ui.add_space(10.0);
                        ui.label("Theme:");
                        self.theme_ui(ui);

                        ui.add_space(20.0);
                        ui.horizontal(|ui| {
                            if ui.button("Export Achievements").clicked() {
                                self.export_achievements();
                            }
                            if ui.button("Help").clicked() {
                                self.show_help = true;
                            }
                        });
                    });
                });
        }

        let margin = if is_mobile { 10.0 } else { 60.0 };
        let clicked = egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.background))
            .show(ctx, |ui| self.board_ui(ui, margin))
            .inner;

        if let Some((row, col)) = clicked {
            match self.game.click_tile(row, col) {
                Ok(ClickOutcome::Placed {
                    game_over: Some(report),
                    ..
                }) => {
                    self.show_game_over = true;
                    if report.won {
                        let center = ctx.screen_rect().center();
                        self.spawn_particles(center, self.theme.accent_color);
                    }
                }
                Ok(_) => {}
                Err(err) => log::warn!("ignoring click: {err}"),
            }
        }

        if self.show_game_over {
            self.game_over_window(ctx);
        }
        self.help_window(ctx);

        if self.game.has_unsaved_settings() {
            if let Some(storage) = frame.storage_mut() {
                self.game.save_if_dirty(storage);
            }
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.game.save_if_dirty(storage);
    }
}

#[cfg(target_arch = "wasm32")]
fn web_csv_export(csv_content: &str, file_name: &str) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::JsValue;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let parts = js_sys::Array::of1(&JsValue::from_str(csv_content));
    let blob = web_sys::Blob::new_with_str_sequence_and_options(
        &parts,
        web_sys::BlobPropertyBag::new().type_("text/csv"),
    )?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let a = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    a.set_href(&url);
    a.set_download(file_name);
    a.click();
    web_sys::Url::revoke_object_url(&url)
}
