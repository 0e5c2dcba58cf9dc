/// The abstract 2D drawing surface the core renders against.
///
/// Mirrors the small subset of a canvas context the game actually uses:
/// a save/restore transform stack, translate/rotate, global alpha,
/// sprite blits and filled or stroked primitives.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BULLET_COLOR: Rgb = Rgb(0xFF, 0xFF, 0xFF);
pub const PARTICLE_COLOR: Rgb = Rgb(0xFF, 0x6B, 0x35);
pub const SHIELD_COLOR: Rgb = Rgb(0x4C, 0xAF, 0x50);

/// Images the host is expected to have loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Enemy,
}

pub trait DrawSurface {
    fn clear(&mut self);
    /// Push the current transform and alpha.
    fn save(&mut self);
    /// Pop back to the last `save`.
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn set_alpha(&mut self, alpha: f64);
    fn draw_image(&mut self, sprite: Sprite, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgb);
    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, line_width: f64, color: Rgb);
}
