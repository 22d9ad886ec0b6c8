//! 동수경사선(HGL) 역추적.
//!
//! 방류구(마지막 절점)에서 시작해 상류 방향으로 한 번 훑으며, 구간마다 Manning 만관 유속으로
//! 마찰 손실수두 `k·(L/D)·v²/2g`를 더해 나간다. 결과 순서는 입력과 같은 측점 오름차순이다.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{ensure_finite, solve_full, DrainageError};
use crate::config::GRAVITY;

/// 등가 길이 마찰손실 계수 기본값.
pub const DEFAULT_HEAD_LOSS_COEFFICIENT: f64 = 0.02;

/// 관로 절점(맨홀).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    /// 측점 [m]
    pub chainage: f64,
    /// 관저고 [m]
    pub invert: f64,
    /// 내경 [m]
    pub diameter: f64,
}

impl NetworkNode {
    pub fn new(chainage: f64, invert: f64, diameter: f64) -> Self {
        Self {
            chainage,
            invert,
            diameter,
        }
    }

    /// 관정고 = 관저고 + 관경
    pub fn obvert(&self) -> f64 {
        self.invert + self.diameter
    }
}

/// 절점별 HGL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HglPoint {
    pub chainage: f64,
    pub hgl: f64,
    pub pipe_obvert: f64,
    /// hgl > pipe_obvert
    pub surcharge: bool,
}

/// 구간 손실 내역. 상류→하류 순서.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentLoss {
    pub upstream_chainage: f64,
    pub downstream_chainage: f64,
    /// 구간 연장 (측점 차의 절대값) [m]
    pub length: f64,
    /// 관저고 차로 구한 경사의 크기
    pub slope: f64,
    /// 만관 유속 [m/s]
    pub velocity: f64,
    /// 속도수두 v²/2g [m]
    pub velocity_head: f64,
    /// 마찰 손실수두 (항상 0 이상) [m]
    pub head_loss: f64,
    /// 설계 유량 / 구간 만관 통수능
    pub utilization: f64,
}

/// HGL 계산 결과 전체.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HglProfile {
    pub points: Vec<HglPoint>,
    pub segments: Vec<SegmentLoss>,
}

impl HglProfile {
    pub fn surcharged(&self) -> impl Iterator<Item = &HglPoint> {
        self.points.iter().filter(|p| p.surcharge)
    }
}

/// 방류구 경계조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutfallCondition {
    /// 자유 방류, 반관 수심으로 가정 (관저고 + 0.5·D)
    #[default]
    HalfDepth,
    /// 외수위 등으로 고정된 수위 [m]
    FixedLevel { level: f64 },
}

impl OutfallCondition {
    pub fn seed_level(&self, outfall: &NetworkNode) -> f64 {
        match *self {
            OutfallCondition::HalfDepth => outfall.invert + 0.5 * outfall.diameter,
            OutfallCondition::FixedLevel { level } => level,
        }
    }
}

/// HGL 계산 설정.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HglSettings {
    pub outfall: OutfallCondition,
    pub head_loss_coefficient: f64,
    pub gravity: f64,
}

impl Default for HglSettings {
    fn default() -> Self {
        Self {
            outfall: OutfallCondition::HalfDepth,
            head_loss_coefficient: DEFAULT_HEAD_LOSS_COEFFICIENT,
            gravity: GRAVITY,
        }
    }
}

/// 기본 설정(반관 방류구)으로 HGL을 계산한다.
pub fn propagate(
    nodes: &[NetworkNode],
    design_flow: f64,
    roughness_n: f64,
) -> Result<Vec<HglPoint>, DrainageError> {
    propagate_profile(nodes, design_flow, roughness_n, &HglSettings::default())
        .map(|profile| profile.points)
}

/// 방류구부터 상류로 HGL을 전파하고 구간 손실 내역까지 반환한다.
pub fn propagate_profile(
    nodes: &[NetworkNode],
    design_flow: f64,
    roughness_n: f64,
    settings: &HglSettings,
) -> Result<HglProfile, DrainageError> {
    validate_nodes(nodes)?;
    ensure_finite(design_flow, "design_flow")?;
    if design_flow < 0.0 {
        return Err(DrainageError::InvalidDesignFlow(design_flow));
    }
    if let OutfallCondition::FixedLevel { level } = settings.outfall {
        ensure_finite(level, "outfall_level")?;
    }

    let Some(outfall) = nodes.last() else {
        return Err(DrainageError::EmptyNetwork);
    };
    let mut current_hgl = settings.outfall.seed_level(outfall);
    debug!(
        nodes = nodes.len(),
        outfall_chainage = outfall.chainage,
        seed_hgl = current_hgl,
        "hgl propagation start"
    );

    let mut points = Vec::with_capacity(nodes.len());
    let mut segments = Vec::with_capacity(nodes.len().saturating_sub(1));
    for i in (0..nodes.len()).rev() {
        let node = &nodes[i];
        if i + 1 < nodes.len() {
            let segment = segment_loss(node, &nodes[i + 1], design_flow, roughness_n, settings)?;
            current_hgl += segment.head_loss;
            segments.push(segment);
        }
        let pipe_obvert = node.obvert();
        let point = HglPoint {
            chainage: node.chainage,
            hgl: current_hgl,
            pipe_obvert,
            surcharge: current_hgl > pipe_obvert,
        };
        trace!(chainage = point.chainage, hgl = point.hgl, surcharge = point.surcharge, "hgl node");
        points.push(point);
    }
    points.reverse();
    segments.reverse();

    Ok(HglProfile { points, segments })
}

/// 상류 절점의 관경으로 구간 손실을 계산한다.
fn segment_loss(
    upstream: &NetworkNode,
    downstream: &NetworkNode,
    design_flow: f64,
    roughness_n: f64,
    settings: &HglSettings,
) -> Result<SegmentLoss, DrainageError> {
    let length = (downstream.chainage - upstream.chainage).abs();
    let slope = (upstream.invert - downstream.invert).abs() / length;
    let flow = solve_full(upstream.diameter, slope, roughness_n)?;
    let velocity_head = flow.velocity * flow.velocity / (2.0 * settings.gravity);
    let head_loss =
        (settings.head_loss_coefficient * (length / upstream.diameter) * velocity_head).max(0.0);
    let utilization = utilization_ratio(design_flow, flow.capacity);
    debug!(
        from = upstream.chainage,
        to = downstream.chainage,
        slope,
        velocity = flow.velocity,
        head_loss,
        "segment loss"
    );
    Ok(SegmentLoss {
        upstream_chainage: upstream.chainage,
        downstream_chainage: downstream.chainage,
        length,
        slope,
        velocity: flow.velocity,
        velocity_head,
        head_loss,
        utilization,
    })
}

/// 설계 유량 / 통수능. 통수능이 0이면 유량이 있을 때 무한대로 본다.
pub fn utilization_ratio(design_flow: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        design_flow / capacity
    } else if design_flow > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// 절점 목록의 유효성을 검사한다. 측점은 엄격히 증가해야 한다.
pub fn validate_nodes(nodes: &[NetworkNode]) -> Result<(), DrainageError> {
    if nodes.is_empty() {
        return Err(DrainageError::EmptyNetwork);
    }
    for (index, node) in nodes.iter().enumerate() {
        ensure_finite(node.chainage, "chainage")?;
        ensure_finite(node.invert, "invert")?;
        ensure_finite(node.diameter, "diameter")?;
        if node.diameter <= 0.0 {
            return Err(DrainageError::InvalidDiameter(node.diameter));
        }
        if index > 0 {
            let previous = nodes[index - 1].chainage;
            if node.chainage <= previous {
                return Err(DrainageError::NonIncreasingChainage {
                    index,
                    previous,
                    current: node.chainage,
                });
            }
        }
    }
    Ok(())
}
