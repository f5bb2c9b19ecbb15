#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod board;
pub mod error;
pub mod event;
pub mod fill;
pub mod history;
pub mod input;
pub mod snapshot;
pub mod surface;

pub use app::BoardApp;
pub use board::{BoardOptions, DrawingBoard, Tool};
pub use error::BoardError;
pub use event::{BoardEvent, EventBus, EventHandler, EventKind, HandlerId};
pub use fill::FloodFill;
pub use history::History;
pub use input::{map_input_coords, mid_point, ElementGeometry, InputEvent, PointerInput};
pub use snapshot::{is_data_url, Snapshot, ToDataUrlOptions};
pub use surface::{Brush, Mode, PixelBuffer, SoftwareSurface, Surface};
