// File: crates/netchart-core/src/path.rs
// Summary: Renderer-agnostic polyline used for stroke, fill, and estimate outlines.

use crate::types::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verb {
    MoveTo(Point),
    LineTo(Point),
}

impl Verb {
    pub const fn point(&self) -> Point {
        match *self {
            Verb::MoveTo(p) | Verb::LineTo(p) => p,
        }
    }
}

/// Axis-aligned bounds in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
}

/// Ordered sequence of move/line verbs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    verbs: Vec<Verb>,
}

impl Path {
    pub fn new() -> Self {
        Self { verbs: Vec::new() }
    }

    pub fn move_to(&mut self, p: impl Into<Point>) {
        self.verbs.push(Verb::MoveTo(p.into()));
    }

    /// Line from the current point. On an empty path the line starts at `p`.
    pub fn line_to(&mut self, p: impl Into<Point>) {
        let p = p.into();
        if self.verbs.is_empty() {
            self.verbs.push(Verb::MoveTo(p));
        } else {
            self.verbs.push(Verb::LineTo(p));
        }
    }

    pub fn reset(&mut self) {
        self.verbs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.verbs.iter().map(Verb::point)
    }

    pub fn first(&self) -> Option<Point> {
        self.verbs.first().map(Verb::point)
    }

    pub fn last(&self) -> Option<Point> {
        self.verbs.last().map(Verb::point)
    }

    /// Tight bounds over every point, `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut pts = self.points();
        let p0 = pts.next()?;
        let init = Bounds { left: p0.x, top: p0.y, right: p0.x, bottom: p0.y };
        Some(pts.fold(init, |b, p| Bounds {
            left: b.left.min(p.x),
            top: b.top.min(p.y),
            right: b.right.max(p.x),
            bottom: b.bottom.max(p.y),
        }))
    }
}
