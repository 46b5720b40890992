//! Named floor locations used to snap fingerprint matches and label fixes.

use serde::{Deserialize, Serialize};

use crate::domain::geometry::Point2;

/// A labelled point on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAnchor {
    pub label: String,
    pub position: Point2,
}

impl RoomAnchor {
    pub fn new(label: impl Into<String>, position: Point2) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

/// Lookup table over configured [`RoomAnchor`]s.
#[derive(Debug, Clone, Default)]
pub struct RoomDirectory {
    rooms: Vec<RoomAnchor>,
}

impl RoomDirectory {
    pub fn new(rooms: Vec<RoomAnchor>) -> Self {
        Self { rooms }
    }

    /// Configured position of `label`.
    pub fn position_of(&self, label: &str) -> Option<Point2> {
        self.rooms
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.position)
    }

    /// Label of the room closest to `point`. Ties go to the earlier entry.
    pub fn nearest(&self, point: &Point2) -> Option<&str> {
        self.rooms
            .iter()
            .map(|r| (r, r.position.distance_to(point)))
            .fold(None, |best: Option<(&RoomAnchor, f64)>, (r, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((r, d)),
            })
            .map(|(r, _)| r.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomAnchor> {
        self.rooms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> RoomDirectory {
        RoomDirectory::new(vec![
            RoomAnchor::new("7412", Point2::new(2.0, 4.5)),
            RoomAnchor::new("7409", Point2::new(35.0, 4.5)),
            RoomAnchor::new("lobby", Point2::new(67.0, 16.5)),
        ])
    }

    #[test]
    fn nearest_room_by_distance() {
        let rooms = directory();
        assert_eq!(rooms.nearest(&Point2::new(30.0, 3.5)), Some("7409"));
        assert_eq!(rooms.nearest(&Point2::new(60.0, 20.0)), Some("lobby"));
    }

    #[test]
    fn lookup_by_label() {
        let rooms = directory();
        assert_eq!(rooms.position_of("7412"), Some(Point2::new(2.0, 4.5)));
        assert_eq!(rooms.position_of("kitchen"), None);
    }

    #[test]
    fn empty_directory_has_no_nearest() {
        assert_eq!(RoomDirectory::default().nearest(&Point2::new(0.0, 0.0)), None);
    }
}
