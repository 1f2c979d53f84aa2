//! Flattening of nested timeline responses into per-point records.

use crate::types::{SearchVolumePoint, TimelineResponse};

/// Flatten `lines[].points[]` into one record per point.
///
/// Records keep upstream order: all points of the first line, then the
/// second, and so on. Lines without points contribute nothing.
pub fn flatten_timelines(response: TimelineResponse) -> Vec<SearchVolumePoint> {
    let total: usize = response.lines.iter().map(|line| line.points.len()).sum();
    let mut records = Vec::with_capacity(total);

    for line in response.lines {
        for point in line.points {
            records.push(SearchVolumePoint {
                term: line.term.clone(),
                date: point.date,
                value: point.value,
            });
        }
    }

    records
}
