use egui::Pos2;

use crate::snapshot::Snapshot;
use crate::surface::Mode;

/// Events the board broadcasts over its [`EventBus`](super::EventBus).
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// A stroke gesture started, at the given canvas-space coordinate.
    DrawBegin(Pos2),
    /// A smoothed segment was rendered during a stroke.
    Draw(Pos2),
    /// The stroke gesture ended.
    DrawEnd(Pos2),
    /// A new snapshot was recorded in the history.
    Save(Snapshot),
    /// The draw/erase mode flipped.
    ToggleMode(Mode),
    /// The board was torn down; no further events will fire.
    Dispose,
}

impl BoardEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DrawBegin(_) => EventKind::DrawBegin,
            Self::Draw(_) => EventKind::Draw,
            Self::DrawEnd(_) => EventKind::DrawEnd,
            Self::Save(_) => EventKind::Save,
            Self::ToggleMode(_) => EventKind::ToggleMode,
            Self::Dispose => EventKind::Dispose,
        }
    }
}

/// Payload-free discriminant of [`BoardEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DrawBegin,
    Draw,
    DrawEnd,
    Save,
    ToggleMode,
    Dispose,
}
