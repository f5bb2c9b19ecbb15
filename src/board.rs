use egui::{Color32, Pos2};
use image::RgbaImage;
use log::{debug, info};

use crate::error::BoardError;
use crate::event::{BoardEvent, EventBus};
use crate::fill::FloodFill;
use crate::history::History;
use crate::input::{map_input_coords, mid_point, ElementGeometry, InputEvent, PointerInput};
use crate::snapshot::{decode_data_url, Snapshot, ToDataUrlOptions};
use crate::surface::{Brush, Mode, Surface};

/// Which gesture pointer-down starts: a freehand stroke or a region fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pen,
    Bucket,
}

/// Construction options, with the stock board defaults.
#[derive(Debug, Clone)]
pub struct BoardOptions {
    pub line_color: Color32,
    pub line_size: f32,
    pub board_color: Color32,
    pub history_depth: usize,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            line_color: Color32::from_gray(0xaa),
            line_size: 5.0,
            board_color: Color32::WHITE,
            history_depth: 10,
        }
    }
}

/// Per-stroke coordinate state, owned by the board and mutated only by the
/// pointer state machine and the frame tick.
#[derive(Debug, Clone, Copy)]
struct StrokeSession {
    old: Pos2,
    old_mid: Pos2,
    current: Pos2,
    is_drawing: bool,
}

impl Default for StrokeSession {
    fn default() -> Self {
        Self {
            old: Pos2::ZERO,
            old_mid: Pos2::ZERO,
            current: Pos2::ZERO,
            is_drawing: false,
        }
    }
}

/// Freehand drawing board over a raster [`Surface`].
///
/// Pointer input goes through [`handle_input`](Self::handle_input); the host
/// drives [`tick`](Self::tick) once per display frame, which renders at most
/// one smoothed segment per tick. Mutating operations record snapshots into
/// a bounded, deduplicated history and announce themselves on the event bus.
pub struct DrawingBoard<S: Surface> {
    surface: S,
    bus: EventBus,
    history: History<Snapshot>,
    flood: FloodFill,
    session: StrokeSession,
    line_color: Color32,
    line_size: f32,
    board_color: Color32,
    mode: Mode,
    tool: Tool,
    alive: bool,
}

impl<S: Surface> DrawingBoard<S> {
    /// Take ownership of `surface`, paint it with the board color, and seed
    /// the history with that initial state.
    pub fn new(mut surface: S, options: BoardOptions) -> Result<Self, BoardError> {
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidSurface);
        }

        surface.fill_rect(options.board_color);
        let initial = Snapshot::encode(&surface.read_pixels(), &ToDataUrlOptions::default())?;

        info!("drawing board created: {width}x{height}, history depth {}", options.history_depth);
        Ok(Self {
            surface,
            bus: EventBus::new(),
            history: History::new(initial, options.history_depth),
            flood: FloodFill::new(),
            session: StrokeSession::default(),
            line_color: options.line_color,
            line_size: options.line_size.max(1.0),
            board_color: options.board_color,
            mode: Mode::Draw,
            tool: Tool::default(),
            alive: true,
        })
    }

    /// The event bus consumers subscribe on.
    pub fn observer(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Set the stroke width in pixels. Fractions are truncated and anything
    /// below one pixel becomes one pixel; no other validation.
    pub fn set_line_size(&mut self, px: f32) {
        self.line_size = px.trunc().max(1.0);
    }

    /// Set the stroke color. Last write wins.
    pub fn set_line_color(&mut self, color: Color32) {
        self.line_color = color;
    }

    pub fn line_size(&self) -> f32 {
        self.line_size
    }

    pub fn line_color(&self) -> Color32 {
        self.line_color
    }

    /// Replace the whole surface with a solid color and record a snapshot.
    pub fn fill(&mut self, color: Color32) -> Result<(), BoardError> {
        if !self.alive {
            return Ok(());
        }
        self.surface.fill_rect(color);
        self.save_history()
    }

    /// Reset to the background color and record a snapshot.
    pub fn clear(&mut self) -> Result<(), BoardError> {
        self.fill(self.board_color)
    }

    /// Flip between drawing and erasing. Erasing strokes with the board
    /// color, which subtracts the stroke from the visible content.
    pub fn toggle_mode(&mut self) {
        if !self.alive {
            return;
        }
        self.mode = self.mode.toggled();
        debug!("mode toggled to {:?}", self.mode);
        self.bus.trigger(&BoardEvent::ToggleMode(self.mode));
    }

    /// Serialize the current raster to a data URL.
    pub fn to_data_url(&self, options: &ToDataUrlOptions) -> Result<Snapshot, BoardError> {
        Snapshot::encode(&self.surface.read_pixels(), options)
    }

    /// Composite an already-decoded image onto the surface and record a
    /// snapshot. With `is_overlay` the current content stays underneath.
    pub fn fill_image_by_buffer(
        &mut self,
        image: &RgbaImage,
        is_overlay: bool,
    ) -> Result<(), BoardError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(BoardError::NotDrawable);
        }
        if !self.alive {
            return Ok(());
        }
        self.surface.draw_image(image, is_overlay);
        self.save_history()
    }

    /// Decode a base64 data URL and composite it onto the surface. Malformed
    /// URLs and undecodable payloads reject the returned future.
    pub async fn fill_image_by_data_url(
        &mut self,
        src: &str,
        is_overlay: bool,
    ) -> Result<(), BoardError> {
        let image = decode_data_url(src)?;
        self.fill_image_by_buffer(&image, is_overlay)
    }

    /// Step the history back and recomposite the surface from the resulting
    /// snapshot. A no-op at the boundary.
    pub async fn undo(&mut self) -> Result<(), BoardError> {
        if !self.alive || !self.history.undo() {
            return Ok(());
        }
        self.restore_present()
    }

    /// Step the history forward; symmetric to [`undo`](Self::undo).
    pub async fn redo(&mut self) -> Result<(), BoardError> {
        if !self.alive || !self.history.redo() {
            return Ok(());
        }
        self.restore_present()
    }

    /// Irreversible teardown: announces `Dispose`, then silences the board.
    /// No further events fire and all operations become inert.
    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        info!("drawing board destroyed");
        self.alive = false;
        self.session.is_drawing = false;
        self.history.clear();
        self.bus.trigger(&BoardEvent::Dispose);
        self.bus.remove_all_listeners();
    }

    /// Feed one pointer event through the state machine.
    ///
    /// `geometry` must be the element's live geometry at event time; it is
    /// never cached across calls.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        geometry: &ElementGeometry,
    ) -> Result<(), BoardError> {
        if !self.alive {
            return Ok(());
        }
        match event {
            InputEvent::PointerDown(input) => self.on_pointer_down(input, geometry),
            InputEvent::PointerMove(input) => {
                self.session.current = map_input_coords(input, geometry);
                Ok(())
            }
            InputEvent::PointerUp => {
                if self.session.is_drawing {
                    self.finish_stroke()?;
                }
                Ok(())
            }
            InputEvent::PointerCancel => {
                // a cancel outside a stroke has nothing to flush
                if self.session.is_drawing {
                    self.finish_stroke()?;
                }
                Ok(())
            }
        }
    }

    /// One cooperative frame of the draw loop.
    ///
    /// Renders the pending smoothed segment when drawing and the coordinate
    /// moved since the previous tick; otherwise does nothing. The host is
    /// responsible for calling this again next frame.
    pub fn tick(&mut self) {
        if !self.alive || !self.session.is_drawing {
            return;
        }
        let (old, current) = (self.session.old, self.session.current);
        if old == current {
            // redundant frame, no stroke and no event
            return;
        }

        let current_mid = mid_point(old, current);
        let brush = Brush {
            size: self.line_size,
            color: self.effective_color(),
        };
        // quadratic through the previous midpoint, with the previous
        // coordinate as control point
        self.surface
            .stroke_segment(current_mid, old, self.session.old_mid, &brush);

        self.session.old = current;
        self.session.old_mid = current_mid;
        self.bus.trigger(&BoardEvent::Draw(current));
    }

    /// Flood-fill the connected region under `seed` with the current line
    /// color. Seeds outside the canvas are rejected here, before the engine
    /// runs. Records a snapshot when anything changed.
    pub fn flood_fill_at(&mut self, seed: Pos2) -> Result<(), BoardError> {
        if !self.alive {
            return Ok(());
        }
        let (width, height) = self.surface.size();
        let (x, y) = (seed.x.floor(), seed.y.floor());
        if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
            debug!("flood fill seed ({x}, {y}) outside canvas, ignored");
            return Ok(());
        }

        let color = self.effective_color();
        let mut pixels = self.surface.read_pixels();
        let changed = self.flood.fill(&mut pixels, (x as u32, y as u32), color);
        if changed {
            // single atomic write-back
            self.surface.write_pixels(&pixels);
            self.save_history()?;
        }
        Ok(())
    }

    fn on_pointer_down(
        &mut self,
        input: &PointerInput,
        geometry: &ElementGeometry,
    ) -> Result<(), BoardError> {
        let coords = map_input_coords(input, geometry);
        match self.tool {
            Tool::Bucket => self.flood_fill_at(coords),
            Tool::Pen => {
                self.session.is_drawing = true;
                self.session.current = coords;
                self.session.old = coords;
                self.session.old_mid = mid_point(coords, coords);
                self.bus.trigger(&BoardEvent::DrawBegin(coords));
                Ok(())
            }
        }
    }

    /// Stroke-end: `DrawEnd`, then the history save, synchronously, so the
    /// history never observes a half-drawn stroke.
    fn finish_stroke(&mut self) -> Result<(), BoardError> {
        self.bus.trigger(&BoardEvent::DrawEnd(self.session.current));
        self.save_history()?;
        self.session.is_drawing = false;
        Ok(())
    }

    fn effective_color(&self) -> Color32 {
        match self.mode {
            Mode::Draw => self.line_color,
            Mode::Erase => self.board_color,
        }
    }

    /// Post-image save: snapshot the surface as it is now. Deduplicated by
    /// the history; the `Save` event fires only for a genuinely new state.
    fn save_history(&mut self) -> Result<(), BoardError> {
        let snapshot = self.to_data_url(&ToDataUrlOptions::default())?;
        if self.history.save(snapshot.clone()) {
            self.bus.trigger(&BoardEvent::Save(snapshot));
        }
        Ok(())
    }

    fn restore_present(&mut self) -> Result<(), BoardError> {
        let image = self.history.value().decode()?;
        self.surface.draw_image(&image, false);
        Ok(())
    }
}
