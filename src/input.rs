use egui::{Pos2, Vec2};

/// Raw pointer payload in page coordinates, before mapping to canvas space.
///
/// For touch input only the first contact point is considered; additional
/// touches are carried but ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerInput {
    pub page: Pos2,
    pub touches: Vec<Pos2>,
}

impl PointerInput {
    /// A mouse-style event with a single page position.
    pub fn mouse(page: Pos2) -> Self {
        Self {
            page,
            touches: Vec::new(),
        }
    }

    /// A touch event; the first contact wins.
    pub fn touch(touches: Vec<Pos2>) -> Self {
        Self {
            page: touches.first().copied().unwrap_or(Pos2::ZERO),
            touches,
        }
    }

    fn page_point(&self) -> Pos2 {
        self.touches.first().copied().unwrap_or(self.page)
    }
}

/// The input-event kinds the board reacts to, dispatched with one `match`
/// rather than comparing host event-type strings.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp,
    PointerCancel,
}

/// Live geometry of the host element, re-read for every event so that
/// resizing, reflow, and CSS scaling are always accounted for.
#[derive(Debug, Clone, Copy)]
pub struct ElementGeometry {
    /// Top-left of the element's bounding rectangle, in viewport coordinates.
    pub origin: Pos2,
    /// Rendered (CSS) size of the element.
    pub css_size: Vec2,
    /// Current document scroll offset. The bounding rectangle is
    /// viewport-relative, so page coordinates need this added back.
    pub scroll: Vec2,
    /// Intrinsic pixel size of the backing store.
    pub pixel_size: Vec2,
}

impl ElementGeometry {
    /// Geometry for an unscrolled, unscaled element, as the demo app has.
    pub fn unscrolled(origin: Pos2, pixel_size: Vec2) -> Self {
        Self {
            origin,
            css_size: pixel_size,
            scroll: Vec2::ZERO,
            pixel_size,
        }
    }
}

/// Map a raw pointer event to canvas-space coordinates.
///
/// The result is not clamped; callers must tolerate coordinates outside the
/// canvas bounds.
pub fn map_input_coords(input: &PointerInput, geometry: &ElementGeometry) -> Pos2 {
    let page = input.page_point();

    let left = geometry.origin.x + geometry.scroll.x;
    let top = geometry.origin.y + geometry.scroll.y;

    // CSS scaling is independent per axis
    let scale_x = geometry.pixel_size.x / geometry.css_size.x;
    let scale_y = geometry.pixel_size.y / geometry.css_size.y;

    Pos2::new((page.x - left) * scale_x, (page.y - top) * scale_y)
}

/// Integer-truncating midpoint of two canvas coordinates, used for the
/// quadratic smoothing anchor.
pub fn mid_point(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new(
        ((a.x as i32 + b.x as i32) >> 1) as f32,
        ((a.y as i32 + b.y as i32) >> 1) as f32,
    )
}
