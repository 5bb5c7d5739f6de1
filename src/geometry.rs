//! 2D helpers for sketches: points, an affine transform and a
//! push/pop matrix stack in the style of `pushMatrix`/`popMatrix`.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Affine transform stored as the top two rows of a 3x3 matrix:
/// `[a c e]`
/// `[b d f]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Post-multiply by a translation (applied before the current transform).
    pub fn translate(&self, tx: f32, ty: f32) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..*self
        }
    }

    /// Post-multiply by a rotation of `angle` radians.
    pub fn rotate(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..*self
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatrixStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the last pushed transform. Popping an empty stack leaves
    /// the current transform untouched.
    pub fn pop(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.current = t;
        } else {
            tracing::warn!("pop() called without a matching push()");
        }
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.current = self.current.translate(tx, ty);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.current = self.current.rotate(angle);
    }

    pub fn apply(&self, p: Point) -> Point {
        self.current.apply(p)
    }
}

/// End point of a segment of `length` starting at `(x, y)` and pointing at `angle`.
pub fn segment_end(x: f32, y: f32, angle: f32, length: f32) -> Point {
    Point::new(x + angle.cos() * length, y + angle.sin() * length)
}

/// Drags `joint` towards `target` so that it ends up exactly `length`
/// behind it. Returns the new joint position and the angle from the joint
/// to the target.
pub fn drag(joint: Point, target: Point, length: f32) -> (Point, f32) {
    let angle = (target.y - joint.y).atan2(target.x - joint.x);
    let moved = Point::new(
        target.x - angle.cos() * length,
        target.y - angle.sin() * length,
    );
    (moved, angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn translate_then_rotate_maps_unit_x() {
        let t = Transform::identity().translate(10.0, 20.0).rotate(FRAC_PI_2);
        let p = t.apply(Point::new(5.0, 0.0));
        assert!(approx(p, Point::new(10.0, 25.0)), "got {p:?}");
    }

    #[test]
    fn pop_restores_previous_transform() {
        let mut stack = MatrixStack::new();
        stack.push();
        stack.translate(3.0, 4.0);
        assert!(approx(stack.apply(Point::default()), Point::new(3.0, 4.0)));
        stack.pop();
        assert!(approx(stack.apply(Point::default()), Point::default()));
        stack.pop();
        assert!(approx(stack.apply(Point::default()), Point::default()));
    }

    #[test]
    fn pop_on_empty_stack_is_noop() {
        let mut stack = MatrixStack::new();
        stack.translate(1.0, 1.0);
        stack.pop();
        assert!(approx(stack.apply(Point::default()), Point::new(1.0, 1.0)));
    }

    #[test]
    fn segment_end_horizontal() {
        let end = segment_end(1.0, 2.0, 0.0, 18.0);
        assert!(approx(end, Point::new(19.0, 2.0)));
    }

    #[test]
    fn drag_places_joint_behind_target() {
        let (joint, angle) = drag(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 18.0);
        assert!(approx(joint, Point::new(82.0, 0.0)));
        assert_eq!(angle, 0.0);
    }
}
