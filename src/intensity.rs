/// Score → difficulty scaling.
///
/// The last milestone reached, by position in `milestones`, sets the
/// multiplier to `1 + (index + 1) * step`; the result is capped at `max`.
/// Pure and idempotent, so it is safe to recompute every tick.
pub fn compute_intensity(score: u32, milestones: &[u32], step: f64, max: f64) -> f64 {
    let reached = milestones.iter().rposition(|&m| score >= m).map_or(0, |i| i + 1);
    let raw = 1.0 + reached as f64 * step;
    raw.min(max)
}

/// Spawn probability per millisecond at the given intensity.
pub fn spawn_rate_for(base_rate: f64, intensity: f64) -> f64 {
    base_rate * intensity
}

#[cfg(test)]
mod tests {
    use super::*;

    const MILESTONES: [u32; 6] = [1000, 2500, 5000, 10000, 20000, 50000];

    #[test]
    fn below_first_milestone_is_base() {
        assert_eq!(compute_intensity(999, &MILESTONES, 0.1, 1.5), 1.0);
    }

    #[test]
    fn milestone_is_inclusive() {
        let at = compute_intensity(1000, &MILESTONES, 0.1, 1.5);
        assert!((at - 1.1).abs() < 1e-9);
    }

    #[test]
    fn cap_applies_past_fifth_milestone() {
        assert_eq!(compute_intensity(50_000, &MILESTONES, 0.1, 1.5), 1.5);
        let steep = compute_intensity(u32::MAX, &MILESTONES, 0.3, 3.0);
        assert!((steep - 2.8).abs() < 1e-9);
    }

    #[test]
    fn unsorted_milestones_use_last_one_reached() {
        let at = compute_intensity(1500, &[2500, 1000], 0.1, 1.5);
        assert!((at - 1.2).abs() < 1e-9);
        assert_eq!(compute_intensity(500, &[2500, 1000], 0.1, 1.5), 1.0);
    }
}
