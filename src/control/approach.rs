//! Rate limiter: move a tracked value toward its target by bounded steps.

/// Step `current` toward `actual`.
///
/// Rising moves are capped at `max_delta_pos`, falling moves at
/// `max_delta_neg`. When the remaining gap fits within the cap the
/// result snaps exactly onto `actual`, so the filter never overshoots.
///
/// ```
/// use statfx::control::approach;
/// assert!((approach(0.40, 1.0, 0.10, 0.05) - 0.45).abs() < 1e-6);
/// assert_eq!(approach(0.98, 1.0, 0.10, 0.05), 1.0);
/// ```
#[must_use]
#[inline]
pub fn approach(current: f32, actual: f32, max_delta_neg: f32, max_delta_pos: f32) -> f32 {
    if current < actual {
        if actual - current > max_delta_pos {
            current + max_delta_pos
        } else {
            actual
        }
    } else if current - actual > max_delta_neg {
        current - max_delta_neg
    } else {
        actual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps_to_converge(mut current: f32, actual: f32, neg: f32, pos: f32) -> usize {
        let mut steps = 0;
        while current != actual {
            let next = approach(current, actual, neg, pos);
            if actual > current {
                assert!(next <= actual, "overshot upward: {next} > {actual}");
            } else {
                assert!(next >= actual, "overshot downward: {next} < {actual}");
            }
            current = next;
            steps += 1;
            assert!(steps < 10_000, "did not converge");
        }
        steps
    }

    #[test]
    fn test_rising_step_uses_positive_cap() {
        let next = approach(0.40, 1.0, 0.10, 0.05);
        assert!((next - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_falling_step_uses_negative_cap() {
        let next = approach(0.90, 0.0, 0.10, 0.05);
        assert!((next - 0.80).abs() < 1e-6);
    }

    #[test]
    fn test_snaps_within_cap() {
        assert_eq!(approach(0.96, 1.0, 0.10, 0.05), 1.0);
        assert_eq!(approach(0.52, 0.5, 0.05, 0.10), 0.5);
        assert_eq!(approach(0.5, 0.5, 0.05, 0.05), 0.5);
    }

    #[test]
    fn test_rising_sequence() {
        let mut current = 0.40_f32;
        let mut trace = Vec::new();
        while current != 1.0 {
            current = approach(current, 1.0, 0.10, 0.05);
            trace.push(current);
        }
        assert!((trace[0] - 0.45).abs() < 1e-6);
        assert!((trace[1] - 0.50).abs() < 1e-6);
        assert_eq!(*trace.last().unwrap(), 1.0);
        // 0.60 of gap at 0.05 per step, give or take one for float rounding
        assert!((12..=13).contains(&trace.len()), "took {} steps", trace.len());
    }

    #[test]
    fn test_step_count_is_ceil_of_gap_over_step() {
        assert_eq!(steps_to_converge(0.0, 1.0, 0.5, 0.25), 4);
        assert_eq!(steps_to_converge(1.0, 0.0, 0.25, 0.5), 4);
        assert_eq!(steps_to_converge(0.125, 1.0, 0.5, 0.25), 4);
        assert_eq!(steps_to_converge(1.0, 0.5, 0.125, 0.5), 4);
        assert_eq!(steps_to_converge(0.75, 0.0, 0.5, 0.5), 2);
    }

    #[test]
    fn test_deterministic() {
        let targets = [0.3_f32, 0.9, 0.1, 0.1, 0.75, 0.2];
        let run = || {
            let mut current = 0.5_f32;
            targets
                .iter()
                .map(|&actual| {
                    current = approach(current, actual, 0.07, 0.03);
                    current
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
