//! 설계 검토기, 맨홀 간격, 합리식 시나리오 테스트.
use approx::assert_abs_diff_eq;
use drainage_engineering_toolbox::config::Config;
use drainage_engineering_toolbox::drainage::{
    check_stormwater, compute_inverts, estimate_peak_runoff, evaluate_chain, evaluate_design,
    validate_spacing, Catchment, DesignInput, DesignWarning, DrainageError, InvertInput,
    NetworkNode, RoughnessMaterial, Severity, StormwaterInput,
};
use proptest::prelude::*;

fn reach() -> DesignInput {
    DesignInput {
        design_flow: 0.03,
        diameter: 0.3,
        slope: 0.01,
        material: RoughnessMaterial::Concrete,
        length: 60.0,
        upstream_gl: 100.0,
        downstream_gl: 99.4,
    }
}

#[test]
fn spacing_within_limit_is_valid() {
    let res = validate_spacing(&[0.0, 50.0], 90.0);
    assert!(res.valid);
    assert!(res.warnings.is_empty());
}

#[test]
fn spacing_excess_cites_the_pair() {
    let res = validate_spacing(&[0.0, 95.0], 90.0);
    assert!(!res.valid);
    assert_eq!(
        res.warnings,
        vec![DesignWarning::ExcessSpacing {
            from_chainage: 0.0,
            to_chainage: 95.0,
            spacing: 95.0,
            max_spacing: 90.0,
        }]
    );
    let text = res.warnings[0].to_string();
    assert!(text.contains("0.00–95.00"), "{text}");
}

#[test]
fn rational_method_scenario() {
    let q = estimate_peak_runoff(2.0, 0.65, 80.0).unwrap();
    assert_abs_diff_eq!(q, 0.65 * 80.0 * 2.0 / 360.0, epsilon = 1e-15);
    assert_abs_diff_eq!(q, 0.2889, epsilon = 1e-4);
}

#[test]
fn rational_method_rejects_bad_inputs() {
    assert_eq!(
        estimate_peak_runoff(-1.0, 0.5, 50.0),
        Err(DrainageError::InvalidCatchmentArea(-1.0))
    );
    assert_eq!(
        estimate_peak_runoff(1.0, 1.5, 50.0),
        Err(DrainageError::InvalidRunoffCoefficient(1.5))
    );
    assert_eq!(
        estimate_peak_runoff(1.0, 0.5, -5.0),
        Err(DrainageError::InvalidRainfallIntensity(-5.0))
    );
}

#[test]
fn backfall_reach_is_critical_but_completes() {
    let mut input = reach();
    input.slope = -0.002;
    let res = evaluate_design(&input, &Config::default()).expect("advisory result");
    assert!(res.has_critical());
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::Backfall { .. }) && w.severity() == Severity::Critical));
    assert_eq!(res.capacity.velocity, 0.0);
    assert!(!res.velocity_compliant);
    assert_eq!(res.utilization_ratio, f64::INFINITY);
    assert_abs_diff_eq!(
        res.inverts.downstream_invert,
        res.inverts.upstream_invert + 0.002 * 60.0,
        epsilon = 1e-9
    );
    assert_eq!(res.hgl.len(), 2);
}

#[test]
fn overloaded_reach_reports_capacity_and_surcharge() {
    let mut input = reach();
    input.design_flow = 0.2;
    input.diameter = 0.15;
    input.slope = 0.002;
    let mut config = Config::default();
    config.hydraulics.head_loss_coefficient = 2.0;
    let res = evaluate_design(&input, &config).unwrap();
    assert!(res.utilization_ratio > 1.0);
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::CapacityExceeded { .. })));
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::VelocityBelowSelfCleansing { .. })));
    assert!(res.any_surcharge());
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::Surcharge { chainage, .. } if *chainage == 0.0)));
}

#[test]
fn long_reach_fails_spacing_and_flags_nonstandard_diameter() {
    let mut input = reach();
    input.length = 120.0;
    input.diameter = 0.25;
    input.downstream_gl = 98.8;
    let res = evaluate_design(&input, &Config::default()).unwrap();
    assert!(!res.spacing_valid);
    let kinds: Vec<_> = res.warnings.iter().map(|w| w.severity()).collect();
    assert!(kinds.contains(&Severity::Advisory));
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::ExcessSpacing { spacing, .. } if *spacing == 120.0)));
}

#[test]
fn warnings_keep_component_order_and_duplicates() {
    // 토피 부족(관저고) → 유속(만관) → 간격 순서를 유지한다.
    let mut input = reach();
    input.slope = 0.0001;
    input.downstream_gl = 99.0;
    input.length = 100.0;
    let res = evaluate_design(&input, &Config::default()).unwrap();
    let pos = |pred: fn(&DesignWarning) -> bool| res.warnings.iter().position(pred).unwrap();
    let cover = pos(|w| matches!(w, DesignWarning::DownstreamCoverShortfall { .. }));
    let velocity = pos(|w| matches!(w, DesignWarning::VelocityBelowSelfCleansing { .. }));
    let spacing = pos(|w| matches!(w, DesignWarning::ExcessSpacing { .. }));
    assert!(cover < velocity && velocity < spacing);
}

#[test]
fn custom_thresholds_change_verdicts() {
    let mut config = Config::default();
    config.thresholds.max_velocity = 1.0;
    let res = evaluate_design(&reach(), &config).unwrap();
    assert!(!res.velocity_compliant);
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::VelocityAboveScourLimit { .. })));
}

#[test]
fn chain_evaluation_checks_each_segment() {
    let nodes = [
        NetworkNode::new(0.0, 101.0, 0.3),
        NetworkNode::new(80.0, 100.2, 0.3),
        NetworkNode::new(180.0, 100.3, 0.3),
    ];
    let res = evaluate_chain(&nodes, 0.03, RoughnessMaterial::Pvc, &Config::default()).unwrap();
    assert_eq!(res.profile.points.len(), 3);
    assert!(!res.spacing_valid);
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::Backfall { slope } if *slope < 0.0)));
    assert_abs_diff_eq!(res.manning_n, 0.009);
}

#[test]
fn rising_chain_segment_matches_single_reach_verdict() {
    // 하류 관저고가 0.6 m 높은 역경사 구간
    let nodes = [
        NetworkNode::new(0.0, 98.0, 0.3),
        NetworkNode::new(60.0, 98.6, 0.3),
    ];
    let res = evaluate_chain(&nodes, 0.03, RoughnessMaterial::Concrete, &Config::default()).unwrap();
    assert!(res.warnings.iter().any(|w| matches!(w, DesignWarning::Backfall { .. })));
    assert!(res.warnings.iter().any(|w| matches!(
        w,
        DesignWarning::VelocityBelowSelfCleansing { velocity, .. } if *velocity == 0.0
    )));
    assert!(res.warnings.iter().any(|w| matches!(
        w,
        DesignWarning::CapacityExceeded { utilization, .. } if utilization.is_infinite()
    )));

    let single = evaluate_design(
        &DesignInput {
            slope: -0.01,
            ..reach()
        },
        &Config::default(),
    )
    .unwrap();
    assert_eq!(single.capacity.velocity, 0.0);
    assert!(single.utilization_ratio.is_infinite());
}

#[test]
fn invalid_spacing_limit_is_rejected() {
    let nodes = [
        NetworkNode::new(0.0, 101.0, 0.3),
        NetworkNode::new(50.0, 100.5, 0.3),
    ];
    let mut config = Config::default();
    config.thresholds.max_spacing = f64::NAN;
    assert_eq!(
        evaluate_chain(&nodes, 0.03, RoughnessMaterial::Concrete, &config),
        Err(DrainageError::NonFiniteInput("max_spacing"))
    );
    config.thresholds.max_spacing = 0.0;
    assert_eq!(
        evaluate_design(&reach(), &config),
        Err(DrainageError::InvalidMaxSpacing(0.0))
    );
}

#[test]
fn stormwater_check_compares_runoff_with_capacity() {
    let input = StormwaterInput {
        catchment: Catchment {
            area_ha: 2.0,
            runoff_coefficient: 0.65,
            rainfall_intensity_mm_per_hr: 80.0,
        },
        diameter: 0.6,
        slope: 0.01,
        material: RoughnessMaterial::Concrete,
    };
    let res = check_stormwater(&input, &Config::default()).unwrap();
    assert_abs_diff_eq!(res.peak_runoff, 0.2889, epsilon = 1e-4);
    assert!(res.adequate, "capacity {}", res.capacity.capacity);
    assert!(res.warnings.is_empty());

    let small = StormwaterInput {
        diameter: 0.225,
        ..input
    };
    let res = check_stormwater(&small, &Config::default()).unwrap();
    assert!(!res.adequate);
    assert!(res.utilization_ratio > 1.0);
}

#[test]
fn large_catchment_gets_advisory_only() {
    let input = StormwaterInput {
        catchment: Catchment {
            area_ha: 120.0,
            runoff_coefficient: 0.3,
            rainfall_intensity_mm_per_hr: 10.0,
        },
        diameter: 0.9,
        slope: 0.01,
        material: RoughnessMaterial::Concrete,
    };
    let res = check_stormwater(&input, &Config::default()).unwrap();
    assert!(res
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::RationalMethodCeiling { .. })
            && w.severity() == Severity::Advisory));
}

proptest! {
    #[test]
    fn invert_identity_holds(
        gl in 50.0f64..150.0,
        d in 0.15f64..0.9,
        slope in -0.05f64..0.05,
        length in 1.0f64..200.0,
        min_cover in 0.0f64..2.0,
    ) {
        let res = compute_inverts(InvertInput {
            upstream_gl: gl,
            downstream_gl: gl - 0.5,
            diameter: d,
            slope,
            length,
            min_cover,
        }).unwrap();
        prop_assert_eq!(res.downstream_invert, res.upstream_invert - slope * length);
        prop_assert_eq!(res.upstream_invert, gl - min_cover - d);
    }

    #[test]
    fn non_positive_slope_is_always_critical(slope in -0.1f64..=0.0) {
        let input = DesignInput { slope, ..reach() };
        let res = evaluate_design(&input, &Config::default()).unwrap();
        let has_backfall = res.warnings.iter().any(|w| matches!(w, DesignWarning::Backfall { .. }));
        prop_assert!(has_backfall);
        prop_assert!(res.has_critical());
    }

    #[test]
    fn bad_designs_never_error(
        q in 0.0f64..2.0,
        d in 0.05f64..1.5,
        slope in -0.1f64..0.2,
        length in 0.5f64..400.0,
        up in 90.0f64..110.0,
        down in 85.0f64..110.0,
        m in 0usize..3,
    ) {
        let input = DesignInput {
            design_flow: q,
            diameter: d,
            slope,
            material: RoughnessMaterial::ALL[m],
            length,
            upstream_gl: up,
            downstream_gl: down,
        };
        let res = evaluate_design(&input, &Config::default());
        prop_assert!(res.is_ok(), "{:?}", res);
        let res = res.unwrap();
        prop_assert_eq!(res.hgl.len(), 2);
    }
}
