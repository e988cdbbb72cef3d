//! Static scene backdrop with a derived occlusion depth per cell

use crate::display::{Frame, Position, Rgb, BLACK};

/// Depth of cells the backdrop leaves empty. Nothing is ever hidden there.
pub const FAR_DEPTH: u8 = 11;
/// Depth of every painted cell of the Christmas tree
pub const TREE_DEPTH: u8 = 7;

const R: Rgb = Rgb(255, 0, 0); // Red
const G: Rgb = Rgb(0, 255, 0); // Green
const B: Rgb = Rgb(0, 0, 255); // Blue
const O: Rgb = BLACK; // Dark
const N: Rgb = Rgb(139, 69, 19); // Brown
const Y: Rgb = Rgb(255, 255, 0); // Yellow

#[rustfmt::skip]
pub const TREE: Frame = [
    O, O, O, O, O, O, O, O,
    O, O, Y, O, O, O, O, O,
    O, O, G, O, O, O, O, O,
    O, G, Y, G, O, O, O, O,
    O, Y, R, G, O, O, O, O,
    Y, G, G, Y, G, O, O, O,
    B, O, N, O, R, O, O, O,
    O, O, N, O, O, O, O, O,
];

/// An entity at `entity_depth` shows over a cell of `background_depth`
/// only when it is strictly nearer. Ties go to the backdrop.
#[inline]
pub fn is_visible(entity_depth: u8, background_depth: u8) -> bool {
    entity_depth < background_depth
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pixels: Frame,
    depth: u8,
}

impl Background {
    /// Any non-black cell of `pixels` sits at `depth`
    pub fn new(pixels: Frame, depth: u8) -> Self {
        Self { pixels, depth }
    }

    pub fn christmas_tree() -> Self {
        Self::new(TREE, TREE_DEPTH)
    }

    pub fn pixels(&self) -> &Frame {
        &self.pixels
    }

    pub fn depth_at(&self, pos: Position) -> u8 {
        if self.pixels[pos.index()].is_black() {
            FAR_DEPTH
        } else {
            self.depth
        }
    }

    /// Colour to restore when a moving entity leaves `pos`
    pub fn pixel_at(&self, pos: Position) -> Rgb {
        self.pixels[pos.index()]
    }
}
