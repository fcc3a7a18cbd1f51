//! Scroll animation easing curves.

/// Maps animation progress in `0..=1` to scroll progress in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOutQuart,
}

impl Easing {
    /// Resolve a curve by its config name. Unknown names fall back to the default.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Self::Linear,
            "easeInOutQuart" => Self::EaseInOutQuart,
            other => {
                log::warn!("Unknown scroll easing {other:?}, using easeInOutQuart");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    #[test]
    fn curves_start_and_end_at_bounds() {
        for easing in [Easing::Linear, Easing::EaseInOutQuart] {
            assert!(easing.apply(0.0).abs() < 1e-12);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
            assert!((easing.apply(2.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn quart_is_symmetric_around_midpoint() {
        let curve = Easing::EaseInOutQuart;
        assert!((curve.apply(0.5) - 0.5).abs() < 1e-12);
        let early = curve.apply(0.25);
        let late = curve.apply(0.75);
        assert!((early + late - 1.0).abs() < 1e-12);
        assert!(early < 0.25);
    }

    #[test]
    fn names_resolve_with_fallback() {
        assert_eq!(Easing::from_name("linear"), Easing::Linear);
        assert_eq!(Easing::from_name("easeInOutQuart"), Easing::EaseInOutQuart);
        assert_eq!(Easing::from_name("bounce"), Easing::EaseInOutQuart);
    }
}
