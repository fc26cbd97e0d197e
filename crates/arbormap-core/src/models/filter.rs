use serde::{Deserialize, Serialize};

/// Which end of the diameter range a control edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiameterBound {
    Min,
    Max,
}

/// Outcome of interpreting a raw text input for a range bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundInput {
    /// Empty input: the bound becomes unbounded
    Clear,
    /// A numeric bound
    Value(f64),
    /// Not a number: the input is ignored
    Invalid,
}

impl BoundInput {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return BoundInput::Clear;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if !value.is_nan() => BoundInput::Value(value),
            _ => BoundInput::Invalid,
        }
    }
}

/// Current filter state
///
/// `diameter_min <= diameter_max` is deliberately not enforced; an inverted
/// range filters everything out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub filter_by_pois: bool,
}

impl FilterParameters {
    pub fn bound(&self, bound: DiameterBound) -> Option<f64> {
        match bound {
            DiameterBound::Min => self.diameter_min,
            DiameterBound::Max => self.diameter_max,
        }
    }

    pub fn set_bound(&mut self, bound: DiameterBound, value: Option<f64>) {
        match bound {
            DiameterBound::Min => self.diameter_min = value,
            DiameterBound::Max => self.diameter_max = value,
        }
    }

    /// Whether a diameter passes both range bounds
    pub fn diameter_in_range(&self, diameter: f64) -> bool {
        self.diameter_min.map_or(true, |min| diameter >= min)
            && self.diameter_max.map_or(true, |max| diameter <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_bound_input() {
        assert_eq!(BoundInput::parse(""), BoundInput::Clear);
        assert_eq!(BoundInput::parse("   "), BoundInput::Clear);
        assert_eq!(BoundInput::parse("12.5"), BoundInput::Value(12.5));
        assert_eq!(BoundInput::parse(" 7 "), BoundInput::Value(7.0));
        assert_eq!(BoundInput::parse("abc"), BoundInput::Invalid);
        assert_eq!(BoundInput::parse("NaN"), BoundInput::Invalid);
    }

    #[test]
    fn test_unbounded_accepts_everything() {
        let params = FilterParameters::default();
        assert!(params.diameter_in_range(0.0));
        assert!(params.diameter_in_range(f64::MAX));
    }

    #[test]
    fn test_inclusive_bounds() {
        let params = FilterParameters {
            diameter_min: Some(10.0),
            diameter_max: Some(30.0),
            filter_by_pois: false,
        };
        assert!(params.diameter_in_range(10.0));
        assert!(params.diameter_in_range(30.0));
        assert!(!params.diameter_in_range(9.99));
        assert!(!params.diameter_in_range(30.01));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let params = FilterParameters {
            diameter_min: Some(30.0),
            diameter_max: Some(10.0),
            filter_by_pois: false,
        };
        assert!(!params.diameter_in_range(20.0));
        assert!(!params.diameter_in_range(10.0));
        assert!(!params.diameter_in_range(30.0));
    }

    #[test]
    fn test_nan_diameter_never_in_bounded_range() {
        let mut params = FilterParameters::default();
        params.set_bound(DiameterBound::Min, Some(0.0));
        assert!(!params.diameter_in_range(f64::NAN));
    }

    proptest! {
        #[test]
        fn prop_finite_input_parses_to_value(value in -1.0e6f64..1.0e6) {
            prop_assert_eq!(BoundInput::parse(&value.to_string()), BoundInput::Value(value));
        }

        #[test]
        fn prop_tightening_min_never_admits_more(
            diameter in 0.0f64..100.0,
            min in 0.0f64..50.0,
            step in 0.0f64..50.0,
        ) {
            let loose = FilterParameters { diameter_min: Some(min), ..Default::default() };
            let tight = FilterParameters { diameter_min: Some(min + step), ..Default::default() };
            prop_assert!(!tight.diameter_in_range(diameter) || loose.diameter_in_range(diameter));
        }
    }
}
