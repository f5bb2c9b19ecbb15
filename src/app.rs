use egui::{Color32, Sense, TextureHandle, TextureOptions, Vec2};
use futures::executor::block_on;
use log::error;

use crate::board::{BoardOptions, DrawingBoard, Tool};
use crate::error::BoardError;
use crate::input::{ElementGeometry, InputEvent, PointerInput};
use crate::surface::{Mode, SoftwareSurface, Surface as _};

const BOARD_WIDTH: u32 = 800;
const BOARD_HEIGHT: u32 = 600;

/// The subset of app state worth restoring between runs.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct BoardSettings {
    line_size: f32,
    line_color: [u8; 4],
    bucket_tool: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        let defaults = BoardOptions::default();
        Self {
            line_size: defaults.line_size,
            line_color: defaults.line_color.to_array(),
            bucket_tool: false,
        }
    }
}

/// Demo shell hosting a [`DrawingBoard`] on a software surface.
///
/// Each frame translates egui pointer interaction into board input events,
/// runs one board tick, and blits the surface into an egui texture. The
/// repaint request at the end of `update` is what keeps the board's
/// cooperative draw loop alive.
pub struct BoardApp {
    board: DrawingBoard<SoftwareSurface>,
    settings: BoardSettings,
    texture: Option<TextureHandle>,
}

impl BoardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, BoardError> {
        let settings: BoardSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let surface = SoftwareSurface::new(BOARD_WIDTH, BOARD_HEIGHT);
        let mut board = DrawingBoard::new(surface, BoardOptions::default())?;
        board.set_line_size(settings.line_size);
        board.set_line_color(Color32::from_rgba_premultiplied(
            settings.line_color[0],
            settings.line_color[1],
            settings.line_color[2],
            settings.line_color[3],
        ));
        if settings.bucket_tool {
            board.set_tool(Tool::Bucket);
        }

        Ok(Self {
            board,
            settings,
            texture: None,
        })
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Drawing Board");

        let mut size = self.board.line_size();
        if ui
            .add(egui::Slider::new(&mut size, 1.0..=40.0).text("line size"))
            .changed()
        {
            self.board.set_line_size(size);
            self.settings.line_size = self.board.line_size();
        }

        let mut color = self.board.line_color();
        if ui.color_edit_button_srgba(&mut color).changed() {
            self.board.set_line_color(color);
            self.settings.line_color = color.to_array();
        }

        ui.separator();

        let mut bucket = self.board.tool() == Tool::Bucket;
        if ui.checkbox(&mut bucket, "bucket fill").changed() {
            self.board
                .set_tool(if bucket { Tool::Bucket } else { Tool::Pen });
            self.settings.bucket_tool = bucket;
        }

        let mode_label = match self.board.mode() {
            Mode::Draw => "mode: draw",
            Mode::Erase => "mode: erase",
        };
        if ui.button(mode_label).clicked() {
            self.board.toggle_mode();
        }

        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.board.can_undo(), egui::Button::new("undo"))
                .clicked()
            {
                report(block_on(self.board.undo()));
            }
            if ui
                .add_enabled(self.board.can_redo(), egui::Button::new("redo"))
                .clicked()
            {
                report(block_on(self.board.redo()));
            }
        });

        if ui.button("clear").clicked() {
            report(self.board.clear());
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (width, height) = self.board.surface().size();
        let desired = Vec2::new(width as f32, height as f32);
        let (rect, response) = ui.allocate_exact_size(desired, Sense::drag());

        // live geometry, re-derived every frame
        let geometry = ElementGeometry {
            origin: rect.min,
            css_size: rect.size(),
            scroll: Vec2::ZERO,
            pixel_size: desired,
        };

        if let Some(pos) = response.interact_pointer_pos() {
            let input = PointerInput::mouse(pos);
            if response.drag_started() {
                report(self.board.handle_input(&InputEvent::PointerDown(input), &geometry));
            } else if response.dragged() {
                report(self.board.handle_input(&InputEvent::PointerMove(input), &geometry));
            }
        }
        if response.drag_stopped() {
            report(self.board.handle_input(&InputEvent::PointerUp, &geometry));
        }

        // one cooperative frame of the draw loop
        self.board.tick();

        let pixels = self.board.surface().pixels();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [pixels.width as usize, pixels.height as usize],
            &pixels.data,
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("board", image, TextureOptions::NEAREST));
            }
        }

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }
}

fn report(result: Result<(), BoardError>) {
    if let Err(err) = result {
        error!("board operation failed: {err}");
    }
}

impl eframe::App for BoardApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            self.controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas(ui, ctx);
        });

        // re-schedule the next tick
        ctx.request_repaint();
    }
}
