use crate::foundation::core::{BezPath, Point};
use crate::foundation::math::distance;

/// Decimated freehand point list.
#[derive(Clone, Debug, PartialEq)]
pub struct LassoTrail {
    points: Vec<Point>,
    min_spacing: f64,
}

impl LassoTrail {
    pub fn new(start: Point, min_spacing: f64) -> Self {
        Self {
            points: vec![start],
            min_spacing,
        }
    }

    /// Append `p` if it lies strictly farther than the minimum spacing from the last point.
    pub fn push(&mut self, p: Point) -> bool {
        match self.points.last() {
            Some(&last) if distance(last, p) <= self.min_spacing => false,
            _ => {
                self.points.push(p);
                true
            }
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Smoothed outline through `points`.
///
/// Interior points act as quadratic control points ending at the midpoint of the
/// following segment. A closed path ends with a straight edge to the last point.
pub fn lasso_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some((&first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(first);

    let n = points.len();
    for i in 1..n {
        let p = points[i];
        if i + 1 < n {
            let next = points[i + 1];
            path.quad_to(p, p.midpoint(next));
        } else {
            path.line_to(p);
        }
    }
    if closed && !rest.is_empty() {
        path.close_path();
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/editor/lasso.rs"]
mod tests;
