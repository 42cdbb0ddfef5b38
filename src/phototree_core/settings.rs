use crate::phototree_core::criterion::{Criterion, parse_criteria};
use crate::phototree_core::error::{PhototreeError, Result};
use std::path::{Path, PathBuf};

/// Validated sort request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSettings {
    pub criteria: Vec<Criterion>,
    pub output: PathBuf,
    /// Maximum distance in kilometres between a photo and its city.
    pub distance_km: Option<u32>,
}

impl SortSettings {
    /// Check the raw sort arguments. Nothing is read or built until this
    /// succeeds.
    pub fn new<S: AsRef<str>>(
        criteria_tokens: &[S],
        output: Option<PathBuf>,
        distance_km: Option<u32>,
    ) -> Result<Self> {
        let output = output.ok_or(PhototreeError::MissingOutputPath)?;
        let criteria = parse_criteria(criteria_tokens)?;

        if criteria.contains(&Criterion::City) && distance_km.is_none() {
            return Err(PhototreeError::MissingDistanceParameter);
        }

        Ok(Self {
            criteria,
            output,
            distance_km,
        })
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn uses_location(&self) -> bool {
        self.criteria
            .iter()
            .any(|c| matches!(c, Criterion::Country | Criterion::City))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_settings() {
        let s = SortSettings::new(&["Ymc"], Some(PathBuf::from("out")), Some(5)).unwrap();
        assert_eq!(s.criteria, vec![Criterion::Year, Criterion::Month, Criterion::City]);
        assert_eq!(s.output(), Path::new("out"));
        assert!(s.uses_location());
    }

    #[test]
    fn test_missing_output() {
        assert!(matches!(
            SortSettings::new(&["Y"], None, None),
            Err(PhototreeError::MissingOutputPath)
        ));
    }

    #[test]
    fn test_invalid_criterion() {
        assert!(matches!(
            SortSettings::new(&["Yz"], Some(PathBuf::from("out")), None),
            Err(PhototreeError::InvalidCriterion(_))
        ));
    }

    #[test]
    fn test_city_requires_distance() {
        assert!(matches!(
            SortSettings::new(&["C", "c"], Some(PathBuf::from("out")), None),
            Err(PhototreeError::MissingDistanceParameter)
        ));
        let s = SortSettings::new(&["C"], Some(PathBuf::from("out")), None).unwrap();
        assert!(s.uses_location());
    }

    #[test]
    fn test_date_only() {
        let s = SortSettings::new(&["Y", "m", "d"], Some(PathBuf::from("out")), None).unwrap();
        assert!(!s.uses_location());
    }
}
