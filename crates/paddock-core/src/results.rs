//! Turning a finishing order into a points map.

use crate::points::PointsMap;

/// Award points from a finishing order, winner first.
///
/// The driver at position `i` receives `schedule[i]`. Drivers classified
/// beyond the end of the schedule are recorded with zero points. A name
/// listed twice keeps its first, best, position.
#[must_use]
pub fn award<S: AsRef<str>>(order: &[S], schedule: &[u32]) -> PointsMap {
    let mut points = PointsMap::new();
    for (position, name) in order.iter().enumerate() {
        let name = name.as_ref().trim();
        if name.is_empty() || points.contains(name) {
            continue;
        }
        points.insert(name, schedule.get(position).copied().unwrap_or(0));
    }
    points
}
