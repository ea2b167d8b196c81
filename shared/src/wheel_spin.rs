use rand::Rng;

use crate::config::SessionConfig;
use crate::wheel_config::{normalize_weight, Segment};

/// Picks the winning index for a draw in `[0, 1)`.
///
/// Walks the segments subtracting each weight from `draw * total`; the first
/// segment that brings the remainder to zero or below wins, so a draw landing
/// exactly on a cumulative boundary belongs to the segment ending there.
/// Returns `None` only for an empty slice.
pub fn select_winner(segments: &[Segment], random_draw: f64) -> Option<usize> {
    if segments.is_empty() {
        return None;
    }

    let draw = if random_draw.is_finite() {
        random_draw.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let total: f64 = segments.iter().map(|s| normalize_weight(s.weight)).sum();
    let mut target = draw * total;

    for (index, segment) in segments.iter().enumerate() {
        target -= normalize_weight(segment.weight);
        if target <= 0.0 {
            return Some(index);
        }
    }

    // Only reachable through rounding.
    Some(segments.len() - 1)
}

/// Where the wheel should end up after a spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPlan {
    pub winner_index: usize,
    pub segment_size: f64,
    pub full_revolutions: u32,
    pub jitter: f64,
    pub spin_degrees: f64,
    pub target_rotation: f64,
}

pub fn segment_size(segment_count: usize) -> f64 {
    360.0 / segment_count.max(1) as f64
}

/// Angle of the winning wedge's center in the wheel's own frame.
pub fn wedge_center(winner_index: usize, segment_count: usize) -> f64 {
    let size = segment_size(segment_count);
    winner_index as f64 * size + size / 2.0
}

/// Deterministic planner: revolutions and jitter are supplied by the caller.
///
/// The pointer sits at 0°. Rotating the wheel clockwise by `360 - center`
/// brings the wedge center under it; the alignment is taken relative to the
/// wheel's current resting angle so consecutive spins keep landing correctly.
pub fn plan_rotation_exact(
    winner_index: usize,
    segment_count: usize,
    current_rotation: f64,
    full_revolutions: u32,
    jitter: f64,
) -> RotationPlan {
    let size = segment_size(segment_count);
    let jitter = jitter.clamp(-size * 0.45, size * 0.45);
    let center = wedge_center(winner_index, segment_count);

    let resting = current_rotation.rem_euclid(360.0);
    let mut alignment = (360.0 - center - resting).rem_euclid(360.0);
    // Keep the minimum-spin floor intact when the jitter pulls backwards.
    if alignment <= jitter.abs() {
        alignment += 360.0;
    }

    let spin_degrees = 360.0 * full_revolutions as f64 + alignment;
    RotationPlan {
        winner_index,
        segment_size: size,
        full_revolutions,
        jitter,
        spin_degrees,
        target_rotation: current_rotation + spin_degrees + jitter,
    }
}

/// Plans a spin with random revolution count and jitter drawn from `rng`.
pub fn plan_rotation<R: Rng + ?Sized>(
    winner_index: usize,
    segment_count: usize,
    current_rotation: f64,
    config: &SessionConfig,
    rng: &mut R,
) -> RotationPlan {
    let size = segment_size(segment_count);
    let full_revolutions = rng.gen_range(config.revolutions.clone());
    let bound = size * config.jitter_fraction;
    let jitter = if bound > 0.0 { rng.gen_range(-bound..=bound) } else { 0.0 };
    plan_rotation_exact(winner_index, segment_count, current_rotation, full_revolutions, jitter)
}

/// Maps a final rotation back to the wedge under the pointer.
pub fn wedge_at_pointer(rotation: f64, segment_count: usize) -> usize {
    let size = segment_size(segment_count);
    let wheel_angle = (360.0 - rotation.rem_euclid(360.0)).rem_euclid(360.0);
    ((wheel_angle / size).floor() as usize).min(segment_count.max(1) - 1)
}
