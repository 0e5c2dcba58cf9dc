/// Axis-aligned bounding boxes and the overlap test shared by every
/// collision pass.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anything that occupies a box on the canvas.
pub trait Hitbox {
    fn hitbox(&self) -> Rect;
}

impl Hitbox for Rect {
    fn hitbox(&self) -> Rect {
        *self
    }
}

/// Strict AABB overlap: boxes that only touch along an edge do not collide.
pub fn is_colliding(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    let a = a.hitbox();
    let b = b.hitbox();
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}
