//! Tests for moment fitting round trips across distribution families

use super::assert_close;
use crate::model::{
    ConfidenceShape, Credibility, DistributionSpec, FitOutcome, MomentTarget, distribution_mean,
    distribution_stdev, range_to_confidence_model,
};

fn families() -> Vec<DistributionSpec> {
    vec![
        range_to_confidence_model((1.0, 5.0), Credibility::Ninety, None, Some(ConfidenceShape::Lognormal)),
        DistributionSpec::Gamma {
            shape: 3.0,
            scale: 5.0,
            clip: None,
        },
        DistributionSpec::Uniform {
            range: (0.0, 1.0),
            clip: None,
        },
    ]
}

#[test]
fn test_lognormal_round_trip_over_grid() {
    for mean in [0.5, 3.0, 40.0, 2_500.0] {
        for cv in [0.1, 0.5, 1.0, 3.0] {
            let stdev = mean * cv;
            let mut spec = range_to_confidence_model(
                (1.0, 2.0),
                Credibility::Fifty,
                None,
                Some(ConfidenceShape::Lognormal),
            );
            assert_eq!(
                spec.fit_to_moments(&MomentTarget::new(mean, stdev)),
                FitOutcome::Updated
            );
            let context = format!("mean {mean} stdev {stdev}");
            assert_close(distribution_mean(&spec).unwrap(), mean, 1e-9, &context);
            assert_close(distribution_stdev(&spec).unwrap(), stdev, 1e-9, &context);
        }
    }
}

#[test]
fn test_rounded_families_land_near_target() {
    let target = MomentTarget::new(12.0, 4.0);
    for mut spec in families() {
        assert_eq!(spec.fit_to_moments(&target), FitOutcome::Updated);
        // three significant figures keep both moments within half a percent
        assert_close(distribution_mean(&spec).unwrap(), 12.0, 5e-3, "mean");
        assert_close(distribution_stdev(&spec).unwrap(), 4.0, 5e-3, "stdev");
    }
}

#[test]
fn test_normal_fit_round_trips_at_ninety_percent() {
    let mut spec = range_to_confidence_model((-1.0, 1.0), Credibility::Eighty, None, None);
    spec.fit_to_moments(&MomentTarget::new(-20.0, 6.0).significant_figures(6));
    assert_close(distribution_mean(&spec).unwrap(), -20.0, 1e-6, "mean");
    assert_close(distribution_stdev(&spec).unwrap(), 6.0, 1e-6, "stdev");
}

#[test]
fn test_fit_then_render() {
    let mut spec = DistributionSpec::Gamma {
        shape: 1.0,
        scale: 1.0,
        clip: Some((Some(0.0), None)),
    };
    spec.fit_to_moments(&MomentTarget::new(10.0, 5.0));
    assert_eq!(spec.to_squiggle().unwrap(), "truncateLeft(gamma(4, 2.5), 0)");
}
