//! Hover detection

use iced::Point;

/// A row as drawn in the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlottedPoint {
    /// Index into the table rows
    pub row: usize,
    pub position: Point,
}

/// First point in draw order within `radius` of the cursor
pub fn hit_test(points: &[PlottedPoint], cursor: Point, radius: f32) -> Option<&PlottedPoint> {
    let radius_sq = radius * radius;
    points.iter().find(|p| {
        let dx = p.position.x - cursor.x;
        let dy = p.position.y - cursor.y;
        dx * dx + dy * dy <= radius_sq
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(row: usize, x: f32, y: f32) -> PlottedPoint {
        PlottedPoint {
            row,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let points = [point(0, 100.0, 100.0), point(1, 5.0, 5.0), point(2, 0.0, 0.0)];
        let hit = hit_test(&points, Point::new(1.0, 1.0), 20.0).unwrap();
        assert_eq!(hit.row, 1);
    }

    #[test]
    fn test_radius_is_inclusive() {
        let points = [point(3, 20.0, 0.0)];
        assert_eq!(hit_test(&points, Point::ORIGIN, 20.0).map(|p| p.row), Some(3));
        assert!(hit_test(&points, Point::ORIGIN, 19.9).is_none());
    }

    #[test]
    fn test_no_points() {
        assert!(hit_test(&[], Point::ORIGIN, 20.0).is_none());
    }
}
