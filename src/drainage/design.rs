//! 단일 관로 구간 설계 검토와 우수관 통수능 검토.
//!
//! 하위 계산기(관저고, Manning, HGL, 맨홀 간격)를 차례로 호출하고 모든 경고를 발생 순서대로
//! 하나의 목록에 모은다. 같은 원인의 경고라도 다른 계산기에서 나오면 각각 남긴다.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    compute_inverts, ensure_finite, is_standard_diameter, propagate_profile, solve_full,
    utilization_ratio, validate_spacing, CapacityResult, Catchment, DesignWarning, DrainageError,
    HglPoint, HglProfile, InvertInput, InvertResult, NetworkNode, RoughnessMaterial, SegmentLoss,
};
use crate::config::{Config, QualityThresholds};

/// 관로 구간 설계 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignInput {
    /// 설계 유량 [m³/s]
    pub design_flow: f64,
    /// 내경 [m]
    pub diameter: f64,
    /// 경사 [m/m]
    pub slope: f64,
    pub material: RoughnessMaterial,
    /// 연장 [m]
    pub length: f64,
    /// 상류 지반고 [m]
    pub upstream_gl: f64,
    /// 하류 지반고 [m]
    pub downstream_gl: f64,
}

/// 설계 검토 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    pub material: RoughnessMaterial,
    pub manning_n: f64,
    pub inverts: InvertResult,
    /// 만관 통수능
    pub capacity: CapacityResult,
    /// 설계 유량 / 만관 통수능
    pub utilization_ratio: f64,
    pub velocity_compliant: bool,
    pub hgl: Vec<HglPoint>,
    pub segments: Vec<SegmentLoss>,
    pub spacing_valid: bool,
    pub warnings: Vec<DesignWarning>,
}

impl DesignResult {
    pub fn has_critical(&self) -> bool {
        self.warnings.iter().any(DesignWarning::is_critical)
    }

    pub fn any_surcharge(&self) -> bool {
        self.hgl.iter().any(|p| p.surcharge)
    }
}

/// 외부에서 구성한 다구간 간선 검토 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    pub material: RoughnessMaterial,
    pub manning_n: f64,
    pub profile: HglProfile,
    pub spacing_valid: bool,
    pub warnings: Vec<DesignWarning>,
}

/// 한 관로 구간을 검토한다.
///
/// 역경사 구간은 중력 흐름이 없으므로 경사 0으로 통수능을 구해 유속·통수능 0으로 보고한다.
pub fn evaluate_design(input: &DesignInput, config: &Config) -> Result<DesignResult, DrainageError> {
    validate_design_flow(input.design_flow)?;
    let thresholds = &config.thresholds;
    let manning_n = config.roughness.manning_n(input.material)?;

    let inverts = compute_inverts(InvertInput {
        upstream_gl: input.upstream_gl,
        downstream_gl: input.downstream_gl,
        diameter: input.diameter,
        slope: input.slope,
        length: input.length,
        min_cover: thresholds.min_cover,
    })?;
    let mut warnings = inverts.warnings.clone();

    if !is_standard_diameter(input.diameter) {
        warnings.push(DesignWarning::NonStandardDiameter {
            diameter: input.diameter,
        });
    }

    let gravity_slope = if input.slope > 0.0 { input.slope } else { 0.0 };
    let capacity = solve_full(input.diameter, gravity_slope, manning_n)?;
    let utilization = utilization_ratio(input.design_flow, capacity.capacity);
    let velocity_compliant = thresholds.velocity_compliant(capacity.velocity);
    push_flow_warnings(
        &mut warnings,
        input.design_flow,
        &capacity,
        utilization,
        thresholds,
    );

    let chain = [
        NetworkNode::new(0.0, inverts.upstream_invert, input.diameter),
        NetworkNode::new(input.length, inverts.downstream_invert, input.diameter),
    ];
    let (profile, spacing_valid) =
        review_chain(&chain, input.design_flow, manning_n, config, &mut warnings)?;

    info!(
        material = %input.material,
        diameter = input.diameter,
        slope = input.slope,
        capacity = capacity.capacity,
        utilization,
        warnings = warnings.len(),
        "design evaluated"
    );

    Ok(DesignResult {
        material: input.material,
        manning_n,
        inverts,
        capacity,
        utilization_ratio: utilization,
        velocity_compliant,
        hgl: profile.points,
        segments: profile.segments,
        spacing_valid,
        warnings,
    })
}

/// 외부에서 구성한 간선(측점 오름차순, 마지막 절점 = 방류구)을 검토한다.
///
/// 구간마다 만관 유속 범위와 통수능을 검사하고, HGL과 맨홀 간격 경고를 더한다.
pub fn evaluate_chain(
    nodes: &[NetworkNode],
    design_flow: f64,
    material: RoughnessMaterial,
    config: &Config,
) -> Result<ChainResult, DrainageError> {
    validate_design_flow(design_flow)?;
    let manning_n = config.roughness.manning_n(material)?;
    let thresholds = &config.thresholds;

    let mut warnings = Vec::new();
    let (profile, spacing_valid) =
        review_chain(nodes, design_flow, manning_n, config, &mut warnings)?;

    // 구간 경고는 HGL·간격 경고 뒤에 상류부터 붙인다.
    // 역경사 구간은 단일 구간 검토와 같이 경사 0으로 통수능을 구한다.
    for (pair, segment) in nodes.windows(2).zip(&profile.segments) {
        let upstream = &pair[0];
        let backfall = pair[1].invert >= upstream.invert;
        if backfall {
            warnings.push(DesignWarning::Backfall {
                slope: (upstream.invert - pair[1].invert) / segment.length,
            });
        }
        let gravity_slope = if backfall { 0.0 } else { segment.slope };
        let capacity = solve_full(upstream.diameter, gravity_slope, manning_n)?;
        let utilization = utilization_ratio(design_flow, capacity.capacity);
        push_flow_warnings(&mut warnings, design_flow, &capacity, utilization, thresholds);
    }

    debug!(nodes = nodes.len(), warnings = warnings.len(), "chain evaluated");
    Ok(ChainResult {
        material,
        manning_n,
        profile,
        spacing_valid,
        warnings,
    })
}

fn review_chain(
    nodes: &[NetworkNode],
    design_flow: f64,
    manning_n: f64,
    config: &Config,
    warnings: &mut Vec<DesignWarning>,
) -> Result<(HglProfile, bool), DrainageError> {
    let max_spacing = ensure_finite(config.thresholds.max_spacing, "max_spacing")?;
    if max_spacing <= 0.0 {
        return Err(DrainageError::InvalidMaxSpacing(max_spacing));
    }
    let profile = propagate_profile(nodes, design_flow, manning_n, &config.hgl_settings())?;
    warnings.extend(profile.surcharged().map(|p| DesignWarning::Surcharge {
        chainage: p.chainage,
        hgl: p.hgl,
        pipe_obvert: p.pipe_obvert,
    }));

    let chainages: Vec<f64> = nodes.iter().map(|n| n.chainage).collect();
    let spacing = validate_spacing(&chainages, max_spacing);
    warnings.extend(spacing.warnings);
    Ok((profile, spacing.valid))
}

fn push_flow_warnings(
    warnings: &mut Vec<DesignWarning>,
    design_flow: f64,
    capacity: &CapacityResult,
    utilization: f64,
    thresholds: &QualityThresholds,
) {
    if utilization > 1.0 {
        warnings.push(DesignWarning::CapacityExceeded {
            design_flow,
            capacity: capacity.capacity,
            utilization,
        });
    }
    if capacity.velocity < thresholds.min_velocity {
        warnings.push(DesignWarning::VelocityBelowSelfCleansing {
            velocity: capacity.velocity,
            min_velocity: thresholds.min_velocity,
        });
    } else if capacity.velocity > thresholds.max_velocity {
        warnings.push(DesignWarning::VelocityAboveScourLimit {
            velocity: capacity.velocity,
            max_velocity: thresholds.max_velocity,
        });
    }
}

fn validate_design_flow(design_flow: f64) -> Result<(), DrainageError> {
    ensure_finite(design_flow, "design_flow")?;
    if design_flow < 0.0 {
        return Err(DrainageError::InvalidDesignFlow(design_flow));
    }
    Ok(())
}

/// 우수관 통수능 검토 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StormwaterInput {
    pub catchment: Catchment,
    /// 내경 [m]
    pub diameter: f64,
    /// 경사 [m/m]
    pub slope: f64,
    pub material: RoughnessMaterial,
}

/// 우수관 통수능 검토 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormwaterResult {
    /// 첨두 유출량 [m³/s]
    pub peak_runoff: f64,
    pub capacity: CapacityResult,
    pub utilization_ratio: f64,
    /// 유출량 ≤ 통수능
    pub adequate: bool,
    pub warnings: Vec<DesignWarning>,
}

/// 합리식 유출량을 같은 관 조건의 만관 통수능과 비교한다.
pub fn check_stormwater(
    input: &StormwaterInput,
    config: &Config,
) -> Result<StormwaterResult, DrainageError> {
    let peak_runoff = input.catchment.peak_runoff()?;
    let manning_n = config.roughness.manning_n(input.material)?;
    ensure_finite(input.slope, "slope")?;

    let mut warnings = Vec::new();
    let ceiling_ha = config.hydraulics.rational_method_ceiling_ha;
    if input.catchment.area_ha > ceiling_ha {
        warnings.push(DesignWarning::RationalMethodCeiling {
            area_ha: input.catchment.area_ha,
            ceiling_ha,
        });
    }
    if input.slope <= 0.0 {
        warnings.push(DesignWarning::Backfall { slope: input.slope });
    }

    let gravity_slope = if input.slope > 0.0 { input.slope } else { 0.0 };
    let capacity = solve_full(input.diameter, gravity_slope, manning_n)?;
    let utilization = utilization_ratio(peak_runoff, capacity.capacity);
    let adequate = utilization <= 1.0;
    if !adequate {
        warnings.push(DesignWarning::CapacityExceeded {
            design_flow: peak_runoff,
            capacity: capacity.capacity,
            utilization,
        });
    }

    debug!(peak_runoff, capacity = capacity.capacity, utilization, "stormwater check");
    Ok(StormwaterResult {
        peak_runoff,
        capacity,
        utilization_ratio: utilization,
        adequate,
        warnings,
    })
}
