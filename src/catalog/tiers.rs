use serde::Deserialize;

use crate::domain::model::TierBand;
use crate::utils::error::{Result, ScopingError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierTable {
    pub tiers: Vec<TierBand>,
}

impl TierTable {
    pub fn bands(&self) -> &[TierBand] {
        &self.tiers
    }

    /// Pick the band holding `weightage`.
    ///
    /// The first band starts at its minimum; every later band starts just above
    /// the previous band's maximum, so display ranges like 61-100 / 101-150
    /// leave no uncovered fractional weightage. The last band is open-ended.
    /// A weightage below the first band falls back to the highest tier.
    pub fn classify(&self, weightage: f64) -> &TierBand {
        let last = self.tiers.len().saturating_sub(1);
        let matched = self.tiers.iter().enumerate().find(|(i, band)| {
            let above_floor = if *i == 0 {
                weightage >= band.min_weightage
            } else {
                weightage > self.tiers[i - 1].max_weightage
            };
            above_floor && (weightage <= band.max_weightage || *i == last)
        });

        match matched {
            Some((_, band)) => band,
            None => {
                tracing::warn!(
                    "⚠️ Weightage {} matched no tier band, using the highest tier",
                    weightage
                );
                &self.tiers[last]
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.tiers.first() else {
            return Err(ScopingError::catalog("tiers", "no tier bands defined"));
        };
        if first.min_weightage != 0.0 {
            return Err(ScopingError::catalog(
                "tiers",
                format!("first band '{}' must start at 0", first.name),
            ));
        }

        for pair in self.tiers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.id <= prev.id {
                return Err(ScopingError::catalog(
                    "tiers",
                    format!("tier ids must increase ('{}' after '{}')", next.name, prev.name),
                ));
            }
            if next.max_weightage <= prev.max_weightage {
                return Err(ScopingError::catalog(
                    "tiers",
                    format!("band '{}' must end above '{}'", next.name, prev.name),
                ));
            }
            // display ranges may touch or overlap but never skip a whole unit
            if next.min_weightage > prev.max_weightage + 1.0 {
                return Err(ScopingError::catalog(
                    "tiers",
                    format!(
                        "gap between '{}' (max {}) and '{}' (min {})",
                        prev.name, prev.max_weightage, next.name, next.min_weightage
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(id: u8, min: f64, max: f64) -> TierBand {
        TierBand {
            id,
            name: format!("Tier {}", id),
            min_weightage: min,
            max_weightage: max,
        }
    }

    fn table() -> TierTable {
        TierTable {
            tiers: vec![
                band(1, 0.0, 61.0),
                band(2, 61.0, 100.0),
                band(3, 101.0, 150.0),
                band(4, 151.0, 200.0),
                band(5, 201.0, 999.0),
            ],
        }
    }

    #[test]
    fn test_band_boundaries() {
        let t = table();
        assert_eq!(t.classify(0.0).id, 1);
        assert_eq!(t.classify(61.0).id, 1);
        assert_eq!(t.classify(61.5).id, 2);
        assert_eq!(t.classify(100.0).id, 2);
        assert_eq!(t.classify(100.5).id, 3);
        assert_eq!(t.classify(129.0).id, 3);
        assert_eq!(t.classify(150.5).id, 4);
        assert_eq!(t.classify(200.0).id, 4);
        assert_eq!(t.classify(200.25).id, 5);
        assert_eq!(t.classify(5000.0).id, 5);
    }

    #[test]
    fn test_negative_weightage_falls_back_to_highest_tier() {
        assert_eq!(table().classify(-1.0).id, 5);
    }

    #[test]
    fn test_builtin_shape_validates() {
        assert!(table().validate().is_ok());
    }

    #[test]
    fn test_gap_is_rejected() {
        let t = TierTable {
            tiers: vec![band(1, 0.0, 61.0), band(2, 70.0, 100.0)],
        };
        let err = t.validate().unwrap_err();
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn test_must_start_at_zero() {
        let t = TierTable {
            tiers: vec![band(1, 1.0, 61.0)],
        };
        assert!(t.validate().is_err());
        assert!(TierTable { tiers: vec![] }.validate().is_err());
    }

    #[test]
    fn test_non_increasing_max_rejected() {
        let t = TierTable {
            tiers: vec![band(1, 0.0, 61.0), band(2, 61.0, 61.0)],
        };
        assert!(t.validate().is_err());
    }
}
