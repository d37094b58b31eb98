//! Verdict classification for IC marking detections
//!
//! A detection's match score (fraction in [0,1] produced by the external
//! reference-matching engine) is mapped to one of three verdicts by a pair
//! of configured thresholds. Classification happens exactly once, when the
//! detection is recorded; changing thresholds later never re-labels stored
//! detections.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verdict assigned to a detection
///
/// The three bands partition [0,1] with no gaps or overlaps as long as the
/// genuine threshold is at or above the suspicious threshold:
/// - Genuine: score >= genuine threshold
/// - Suspicious: suspicious threshold <= score < genuine threshold
/// - Counterfeit: score < suspicious threshold
///
/// Each band is closed on its lower bound and open at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Genuine,
    Suspicious,
    Counterfeit,
}

impl Verdict {
    /// All verdict labels, in severity order
    pub const ALL: [Verdict; 3] = [Verdict::Genuine, Verdict::Suspicious, Verdict::Counterfeit];

    /// Canonical label stored in the database and shown in the UI
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Genuine => "Genuine",
            Verdict::Suspicious => "Suspicious",
            Verdict::Counterfeit => "Counterfeit",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Genuine" => Ok(Verdict::Genuine),
            "Suspicious" => Ok(Verdict::Suspicious),
            "Counterfeit" => Ok(Verdict::Counterfeit),
            other => Err(Error::InvalidInput(format!("Unknown verdict: {}", other))),
        }
    }
}

/// Classification thresholds on the match score
///
/// Intended ordering: suspicious < genuine. `validate` enforces it along
/// with the [0,1] range; an inverted pair would silently empty or invert
/// the suspicious band, so writes are rejected at the settings boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub genuine: f64,
    pub suspicious: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            genuine: 0.85,
            suspicious: 0.6,
        }
    }
}

impl Thresholds {
    /// Validate range and ordering
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("genuine", self.genuine), ("suspicious", self.suspicious)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "{} threshold must be a fraction in [0,1], got {}",
                    name, value
                )));
            }
        }
        if self.suspicious >= self.genuine {
            return Err(Error::InvalidInput(format!(
                "suspicious threshold ({}) must be below genuine threshold ({})",
                self.suspicious, self.genuine
            )));
        }
        Ok(())
    }

    /// Classify a match score against these thresholds
    ///
    /// Pure computation, no side effects. Total for any score; boundary
    /// scores resolve to the upper band (score == genuine is Genuine,
    /// score == suspicious is Suspicious).
    pub fn classify(&self, score: f64) -> Verdict {
        if score >= self.genuine {
            Verdict::Genuine
        } else if score >= self.suspicious {
            Verdict::Suspicious
        } else {
            Verdict::Counterfeit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_reference_scores() {
        let t = Thresholds {
            genuine: 0.85,
            suspicious: 0.6,
        };
        assert_eq!(t.classify(0.85), Verdict::Genuine);
        assert_eq!(t.classify(0.70), Verdict::Suspicious);
        assert_eq!(t.classify(0.59), Verdict::Counterfeit);
    }

    #[test]
    fn test_classify_band_boundaries() {
        let t = Thresholds {
            genuine: 0.85,
            suspicious: 0.6,
        };
        // Lower bound of each band is closed
        assert_eq!(t.classify(0.6), Verdict::Suspicious);
        assert_eq!(t.classify(1.0), Verdict::Genuine);
        assert_eq!(t.classify(0.0), Verdict::Counterfeit);
        // Just below a boundary falls into the band beneath it
        assert_eq!(t.classify(0.8499999), Verdict::Suspicious);
        assert_eq!(t.classify(0.5999999), Verdict::Counterfeit);
    }

    #[test]
    fn test_classify_partitions_unit_interval() {
        // Every score in [0,1] lands in exactly one band
        let t = Thresholds {
            genuine: 0.85,
            suspicious: 0.6,
        };
        for i in 0..=1000 {
            let score = i as f64 / 1000.0;
            let verdict = t.classify(score);
            let expected = if score >= 0.85 {
                Verdict::Genuine
            } else if score >= 0.6 {
                Verdict::Suspicious
            } else {
                Verdict::Counterfeit
            };
            assert_eq!(verdict, expected, "score {}", score);
        }
    }

    #[test]
    fn test_validate_accepts_ordered_thresholds() {
        assert!(Thresholds::default().validate().is_ok());
        assert!(Thresholds {
            genuine: 1.0,
            suspicious: 0.0
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_or_equal_thresholds() {
        assert!(Thresholds {
            genuine: 0.5,
            suspicious: 0.8
        }
        .validate()
        .is_err());
        // Equal thresholds empty the suspicious band
        assert!(Thresholds {
            genuine: 0.7,
            suspicious: 0.7
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(Thresholds {
            genuine: 1.2,
            suspicious: 0.6
        }
        .validate()
        .is_err());
        assert!(Thresholds {
            genuine: 0.85,
            suspicious: -0.1
        }
        .validate()
        .is_err());
        assert!(Thresholds {
            genuine: f64::NAN,
            suspicious: 0.6
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_verdict_label_roundtrip() {
        for verdict in Verdict::ALL {
            assert_eq!(verdict.as_str().parse::<Verdict>().unwrap(), verdict);
        }
        assert!("genuine".parse::<Verdict>().is_err());
        assert!("".parse::<Verdict>().is_err());
    }
}
