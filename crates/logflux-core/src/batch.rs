//! Batch assembly — the unit handed to a sink in a single write.

use crate::types::Point;

/// A non-empty, ordered group of points written as one request.
///
/// The only constructors are [`Batch::single`] and [`assemble`], so an empty
/// batch cannot reach a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    points: Vec<Point>,
}

impl Batch {
    pub fn single(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the batch holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// Collect the built (non-dropped) points, keeping their input order.
///
/// Returns `None` when nothing survived, meaning there is nothing to send.
pub fn assemble<I>(points: I) -> Option<Batch>
where
    I: IntoIterator<Item = Option<Point>>,
{
    let points: Vec<Point> = points.into_iter().flatten().collect();
    (!points.is_empty()).then_some(Batch { points })
}
