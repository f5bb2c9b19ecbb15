use egui::Color32;
use log::debug;

use crate::surface::PixelBuffer;

/// Scanline flood fill over a raw RGBA buffer.
///
/// The engine keeps an explicit seed stack (reused across fills) instead of
/// recursing: a fill can touch every pixel of the surface, and a stack frame
/// per pixel would overflow long before the arena does. Colors are compared
/// on RGB only; the written pixels are always fully opaque.
#[derive(Debug, Default)]
pub struct FloodFill {
    seeds: Vec<(u32, u32)>,
    busy: bool,
}

impl FloodFill {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the connected region around `seed` that matches the seed's color
    /// with `fill_color`, mutating `pixels` in place.
    ///
    /// Returns `true` if any pixel changed. Filling a region with its own
    /// color is a no-op, as is a call that overlaps a fill already in
    /// progress on this engine. The caller must reject out-of-bounds seeds
    /// before invoking.
    pub fn fill(&mut self, pixels: &mut PixelBuffer, seed: (u32, u32), fill_color: Color32) -> bool {
        if self.busy {
            debug!("flood fill ignored: engine busy");
            return false;
        }
        let (width, height) = (pixels.width, pixels.height);
        debug_assert!(
            seed.0 < width && seed.1 < height,
            "flood fill seed out of bounds"
        );

        let target = pixels.rgb_at(seed.0, seed.1);
        let replacement = [fill_color.r(), fill_color.g(), fill_color.b()];
        if target == replacement {
            return false;
        }

        self.busy = true;
        self.seeds.clear();
        self.seeds.push(seed);

        while let Some((x, start_y)) = self.seeds.pop() {
            // climb to the topmost matching pixel of this column
            let mut y = start_y;
            while y > 0 && pixels.rgb_at(x, y - 1) == target {
                y -= 1;
            }

            // walk down the span, coloring and queueing side neighbors; the
            // reach flags push each contiguous neighbor run only once
            let mut reach_left = false;
            let mut reach_right = false;
            while y < height && pixels.rgb_at(x, y) == target {
                pixels.set_rgba(x, y, [replacement[0], replacement[1], replacement[2], 255]);

                if x > 0 {
                    if pixels.rgb_at(x - 1, y) == target {
                        if !reach_left {
                            self.seeds.push((x - 1, y));
                            reach_left = true;
                        }
                    } else {
                        reach_left = false;
                    }
                }
                if x + 1 < width {
                    if pixels.rgb_at(x + 1, y) == target {
                        if !reach_right {
                            self.seeds.push((x + 1, y));
                            reach_right = true;
                        }
                    } else {
                        reach_right = false;
                    }
                }
                y += 1;
            }
        }

        self.busy = false;
        true
    }
}
