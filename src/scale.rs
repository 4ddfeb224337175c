//! Display scale factors and the process-wide supported set
//!
//! The supported set is configured once during startup (the bundle builder
//! does this) and queried from anywhere afterwards. It is kept sorted by
//! multiplier with no duplicates, and never contains [`ScaleFactor::None`].

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Display density tier a pack or lookup is tagged with
///
/// Variants are declared in ascending multiplier order, so the derived
/// ordering agrees with [`ScaleFactor::scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScaleFactor {
    /// Unspecified scale
    #[serde(rename = "none")]
    None,
    #[serde(rename = "100p")]
    P100,
    #[serde(rename = "125p")]
    P125,
    #[serde(rename = "133p")]
    P133,
    #[serde(rename = "140p")]
    P140,
    #[serde(rename = "150p")]
    P150,
    #[serde(rename = "180p")]
    P180,
    #[serde(rename = "200p")]
    P200,
    #[serde(rename = "250p")]
    P250,
    #[serde(rename = "300p")]
    P300,
}

impl ScaleFactor {
    /// Every tier, including the unspecified sentinel
    pub const ALL: [ScaleFactor; 10] = [
        ScaleFactor::None,
        ScaleFactor::P100,
        ScaleFactor::P125,
        ScaleFactor::P133,
        ScaleFactor::P140,
        ScaleFactor::P150,
        ScaleFactor::P180,
        ScaleFactor::P200,
        ScaleFactor::P250,
        ScaleFactor::P300,
    ];

    /// Numeric multiplier for this tier (`None` counts as 1x)
    pub fn scale(self) -> f32 {
        match self {
            ScaleFactor::None | ScaleFactor::P100 => 1.0,
            ScaleFactor::P125 => 1.25,
            ScaleFactor::P133 => 1.33,
            ScaleFactor::P140 => 1.4,
            ScaleFactor::P150 => 1.5,
            ScaleFactor::P180 => 1.8,
            ScaleFactor::P200 => 2.0,
            ScaleFactor::P250 => 2.5,
            ScaleFactor::P300 => 3.0,
        }
    }

    /// Percentage label, `None` for the unspecified sentinel
    pub fn percent(self) -> Option<u16> {
        match self {
            ScaleFactor::None => None,
            ScaleFactor::P100 => Some(100),
            ScaleFactor::P125 => Some(125),
            ScaleFactor::P133 => Some(133),
            ScaleFactor::P140 => Some(140),
            ScaleFactor::P150 => Some(150),
            ScaleFactor::P180 => Some(180),
            ScaleFactor::P200 => Some(200),
            ScaleFactor::P250 => Some(250),
            ScaleFactor::P300 => Some(300),
        }
    }

    /// True for every tier except the unspecified sentinel
    pub fn is_specified(self) -> bool {
        self != ScaleFactor::None
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(p) => write!(f, "{}%", p),
            None => write!(f, "none"),
        }
    }
}

impl FromStr for ScaleFactor {
    type Err = String;

    /// Accepts `none`, `100`, `100p` and `100%` style labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "none" {
            return Ok(ScaleFactor::None);
        }
        let digits = s.trim_end_matches(&['p', '%'][..]);
        let percent: u16 = digits
            .parse()
            .map_err(|_| format!("Invalid scale factor '{}'", s))?;
        ScaleFactor::ALL
            .into_iter()
            .find(|sf| sf.percent() == Some(percent))
            .ok_or_else(|| format!("Unknown scale factor '{}'", s))
    }
}

static SUPPORTED_SCALE_FACTORS: RwLock<Option<Vec<ScaleFactor>>> = parking_lot::const_rwlock(None);

fn normalize(scale_factors: &[ScaleFactor]) -> Vec<ScaleFactor> {
    let mut sorted: Vec<ScaleFactor> = scale_factors
        .iter()
        .copied()
        .filter(|sf| sf.is_specified())
        .collect();
    sorted.sort_by(|a, b| a.scale().total_cmp(&b.scale()));
    sorted.dedup();
    sorted
}

/// Replace the supported set
///
/// The list is sorted ascending by multiplier and deduplicated; the
/// unspecified sentinel is dropped. Intended for single-threaded startup.
pub fn set_supported_scale_factors(scale_factors: &[ScaleFactor]) {
    let sorted = normalize(scale_factors);
    debug!("Supported scale factors: {:?}", sorted);
    *SUPPORTED_SCALE_FACTORS.write() = Some(sorted);
}

/// Current supported set, ascending by multiplier
///
/// # Panics
///
/// Panics if [`set_supported_scale_factors`] has never been called.
pub fn supported_scale_factors() -> Vec<ScaleFactor> {
    match SUPPORTED_SCALE_FACTORS.read().as_ref() {
        Some(factors) => factors.clone(),
        None => panic!("supported scale factors queried before they were set"),
    }
}

/// True once a supported set has been installed
pub fn has_supported_scale_factors() -> bool {
    SUPPORTED_SCALE_FACTORS.read().is_some()
}

/// Supported scale factor whose multiplier is closest to `scale`
///
/// Exact ties go to the smaller multiplier. Falls back to 100% when the
/// supported set is empty.
///
/// # Panics
///
/// Panics if [`set_supported_scale_factors`] has never been called.
pub fn supported_scale_factor(scale: f32) -> ScaleFactor {
    let guard = SUPPORTED_SCALE_FACTORS.read();
    let Some(factors) = guard.as_ref() else {
        panic!("supported scale factors queried before they were set");
    };

    let mut closest = ScaleFactor::P100;
    let mut smallest_diff = f32::MAX;
    for &scale_factor in factors {
        let diff = (scale_factor.scale() - scale).abs();
        if diff < smallest_diff {
            closest = scale_factor;
            smallest_diff = diff;
        }
    }
    closest
}

/// Exact membership test on multipliers
///
/// An unset registry supports nothing.
pub fn is_supported_scale(scale: f32) -> bool {
    SUPPORTED_SCALE_FACTORS
        .read()
        .as_ref()
        .is_some_and(|factors| factors.iter().any(|sf| sf.scale() == scale))
}

/// True if `scale_factor` itself is in the supported set
pub fn is_scale_factor_supported(scale_factor: ScaleFactor) -> bool {
    SUPPORTED_SCALE_FACTORS
        .read()
        .as_ref()
        .is_some_and(|factors| factors.contains(&scale_factor))
}

/// Installs a supported set for its lifetime and restores the previous one on drop
///
/// Meant for tests that need a particular set without leaking it into
/// other tests.
#[must_use = "the previous set is restored as soon as the guard is dropped"]
pub struct ScopedSupportedScaleFactors {
    previous: Option<Vec<ScaleFactor>>,
}

impl ScopedSupportedScaleFactors {
    pub fn new(scale_factors: &[ScaleFactor]) -> Self {
        let sorted = normalize(scale_factors);
        let previous = SUPPORTED_SCALE_FACTORS.write().replace(sorted);
        ScopedSupportedScaleFactors { previous }
    }
}

impl Drop for ScopedSupportedScaleFactors {
    fn drop(&mut self) {
        *SUPPORTED_SCALE_FACTORS.write() = self.previous.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::serial;

    #[test]
    fn test_set_sorts_and_dedups() {
        let _serial = serial();
        let _scoped = ScopedSupportedScaleFactors::new(&[
            ScaleFactor::P300,
            ScaleFactor::P100,
            ScaleFactor::P200,
            ScaleFactor::P100,
        ]);

        assert_eq!(
            supported_scale_factors(),
            vec![ScaleFactor::P100, ScaleFactor::P200, ScaleFactor::P300]
        );
    }

    #[test]
    fn test_unspecified_is_never_supported() {
        let _serial = serial();
        let _scoped = ScopedSupportedScaleFactors::new(&[ScaleFactor::None, ScaleFactor::P200]);

        assert_eq!(supported_scale_factors(), vec![ScaleFactor::P200]);
        assert_eq!(supported_scale_factor(1.0), ScaleFactor::P200);
        assert!(!is_scale_factor_supported(ScaleFactor::None));
    }

    #[test]
    fn test_closest_match() {
        let _serial = serial();
        let _scoped = ScopedSupportedScaleFactors::new(&[ScaleFactor::P100, ScaleFactor::P200]);

        assert_eq!(supported_scale_factor(0.5), ScaleFactor::P100);
        assert_eq!(supported_scale_factor(1.2), ScaleFactor::P100);
        assert_eq!(supported_scale_factor(1.8), ScaleFactor::P200);
        assert_eq!(supported_scale_factor(4.0), ScaleFactor::P200);
    }

    #[test]
    fn test_exact_tie_prefers_smaller() {
        let _serial = serial();
        let _scoped = ScopedSupportedScaleFactors::new(&[ScaleFactor::P200, ScaleFactor::P100]);

        assert_eq!(supported_scale_factor(1.5), ScaleFactor::P100);
    }

    #[test]
    fn test_empty_set_falls_back_to_100p() {
        let _serial = serial();
        let _scoped = ScopedSupportedScaleFactors::new(&[]);

        assert_eq!(supported_scale_factor(2.0), ScaleFactor::P100);
        assert!(!is_supported_scale(1.0));
    }

    #[test]
    fn test_is_supported_scale_is_exact() {
        let _serial = serial();
        let _scoped = ScopedSupportedScaleFactors::new(&[ScaleFactor::P100, ScaleFactor::P150]);

        assert!(is_supported_scale(1.0));
        assert!(is_supported_scale(1.5));
        assert!(!is_supported_scale(1.49));
        assert!(!is_supported_scale(2.0));
    }

    #[test]
    fn test_scoped_restores_previous() {
        let _serial = serial();
        let _outer = ScopedSupportedScaleFactors::new(&[ScaleFactor::P100]);
        {
            let _inner = ScopedSupportedScaleFactors::new(&[ScaleFactor::P300]);
            assert_eq!(supported_scale_factors(), vec![ScaleFactor::P300]);
        }
        assert_eq!(supported_scale_factors(), vec![ScaleFactor::P100]);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("200p".parse::<ScaleFactor>(), Ok(ScaleFactor::P200));
        assert_eq!("125%".parse::<ScaleFactor>(), Ok(ScaleFactor::P125));
        assert_eq!("300".parse::<ScaleFactor>(), Ok(ScaleFactor::P300));
        assert_eq!("None".parse::<ScaleFactor>(), Ok(ScaleFactor::None));
        assert!("175p".parse::<ScaleFactor>().is_err());
        assert!("big".parse::<ScaleFactor>().is_err());

        assert_eq!(ScaleFactor::P133.to_string(), "133%");
        assert_eq!(ScaleFactor::None.to_string(), "none");
    }

    #[test]
    fn test_ordering_follows_multiplier() {
        for pair in ScaleFactor::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].scale() <= pair[1].scale());
        }
    }
}
