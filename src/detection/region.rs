use crate::config::GroupingConfig;
use crate::geometry::BoundingBox;

/// Whether a group of boxes is packed tightly enough to be one region
///
/// The ratio of summed member areas to the area of the group's enclosing box
/// must reach `threshold`. A single box is always cohesive; an empty group or
/// one whose enclosing box has zero area never is.
pub fn is_cohesive(group: &[BoundingBox], threshold: f32) -> bool {
    if group.len() == 1 {
        return true;
    }
    let enclosing = match BoundingBox::enclosing(group) {
        Some(b) if b.area() > 0 => b,
        _ => return false,
    };
    let members: u64 = group.iter().map(BoundingBox::area).sum();
    members as f64 / enclosing.area() as f64 >= threshold as f64
}

/// Pick the largest coherent subset of `candidates`, sorted top to bottom
///
/// If every candidate together is cohesive they are returned as-is. Otherwise
/// every box in turn seeds a group and each later box joins if the group stays
/// cohesive. Only the seed leaves the pool, so later seeds may regroup boxes
/// already taken. The group with the most boxes wins; ties go to the earlier one.
pub fn select_region(candidates: &[BoundingBox], config: &GroupingConfig) -> Vec<BoundingBox> {
    let threshold = config.cohesion_threshold;
    let mut sorted = candidates.to_vec();
    sorted.sort_by_key(|b| b.y);

    if sorted.is_empty() || is_cohesive(&sorted, threshold) {
        return sorted;
    }

    let mut best: Vec<BoundingBox> = Vec::new();

    for (i, seed) in sorted.iter().enumerate() {
        let mut group = vec![*seed];
        for candidate in &sorted[i + 1..] {
            group.push(*candidate);
            if !is_cohesive(&group, threshold) {
                group.pop();
            }
        }

        if group.len() > best.len() {
            best = group;
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        groups = sorted.len(),
        selected = best.len(),
        "grouped candidates into regions"
    );

    best.sort_by_key(|b| b.y);
    best
}
