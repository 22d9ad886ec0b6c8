use std::fmt;

use serde::{Deserialize, Serialize};

/// 경고 심각도. 표시 방식은 호출자가 결정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// 모델 가정·참고 사항
    Advisory,
    /// 설계 기준 위반
    Warning,
    /// 중력 배수가 성립하지 않는 치명적 결함
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Advisory => f.write_str("참고"),
            Severity::Warning => f.write_str("경고"),
            Severity::Critical => f.write_str("치명"),
        }
    }
}

/// 설계 검토 경고. 오류가 아니며 계산은 항상 끝까지 수행된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DesignWarning {
    /// 상류 토피 부족
    UpstreamCoverShortfall { cover: f64, min_cover: f64 },
    /// 하류 토피 부족
    DownstreamCoverShortfall { cover: f64, min_cover: f64 },
    /// 역경사 또는 평탄 경사
    Backfall { slope: f64 },
    /// 동수경사선이 관정보다 높음
    Surcharge {
        chainage: f64,
        hgl: f64,
        pipe_obvert: f64,
    },
    /// 맨홀 간격 초과
    ExcessSpacing {
        from_chainage: f64,
        to_chainage: f64,
        spacing: f64,
        max_spacing: f64,
    },
    /// 설계 유량이 통수능 초과
    CapacityExceeded {
        design_flow: f64,
        capacity: f64,
        utilization: f64,
    },
    /// 자정 유속 미달
    VelocityBelowSelfCleansing { velocity: f64, min_velocity: f64 },
    /// 세굴 방지 유속 초과
    VelocityAboveScourLimit { velocity: f64, max_velocity: f64 },
    /// 표준 관경이 아님
    NonStandardDiameter { diameter: f64 },
    /// 합리식 적용 면적 상한 초과
    RationalMethodCeiling { area_ha: f64, ceiling_ha: f64 },
}

impl DesignWarning {
    pub fn severity(&self) -> Severity {
        match self {
            DesignWarning::Backfall { .. } => Severity::Critical,
            DesignWarning::NonStandardDiameter { .. }
            | DesignWarning::RationalMethodCeiling { .. } => Severity::Advisory,
            _ => Severity::Warning,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity() == Severity::Critical
    }
}

impl fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.severity())?;
        match self {
            DesignWarning::UpstreamCoverShortfall { cover, min_cover } => write!(
                f,
                "상류 토피 {cover:.3} m < 최소 토피 {min_cover:.2} m"
            ),
            DesignWarning::DownstreamCoverShortfall { cover, min_cover } => write!(
                f,
                "하류 토피 {cover:.3} m < 최소 토피 {min_cover:.2} m"
            ),
            DesignWarning::Backfall { slope } => write!(
                f,
                "역경사(경사 {slope:.5}). 중력 배수가 불가능합니다."
            ),
            DesignWarning::Surcharge {
                chainage,
                hgl,
                pipe_obvert,
            } => write!(
                f,
                "측점 {chainage:.2} m에서 HGL {hgl:.3} m > 관정 {pipe_obvert:.3} m (압력류)"
            ),
            DesignWarning::ExcessSpacing {
                from_chainage,
                to_chainage,
                spacing,
                max_spacing,
            } => write!(
                f,
                "맨홀 간격 {from_chainage:.2}–{to_chainage:.2} m: {spacing:.2} m > 최대 {max_spacing:.2} m ({:.2} m 초과)",
                spacing - max_spacing
            ),
            DesignWarning::CapacityExceeded {
                design_flow,
                capacity,
                utilization,
            } => write!(
                f,
                "설계 유량 {design_flow:.4} m³/s > 통수능 {capacity:.4} m³/s (이용률 {:.1}%)",
                utilization * 100.0
            ),
            DesignWarning::VelocityBelowSelfCleansing {
                velocity,
                min_velocity,
            } => write!(
                f,
                "유속 {velocity:.2} m/s < 자정 유속 {min_velocity:.2} m/s. 퇴적 위험."
            ),
            DesignWarning::VelocityAboveScourLimit {
                velocity,
                max_velocity,
            } => write!(
                f,
                "유속 {velocity:.2} m/s > 최대 유속 {max_velocity:.2} m/s. 세굴 위험."
            ),
            DesignWarning::NonStandardDiameter { diameter } => {
                write!(f, "비표준 관경 {diameter:.3} m")
            }
            DesignWarning::RationalMethodCeiling { area_ha, ceiling_ha } => write!(
                f,
                "유역 면적 {area_ha:.1} ha > 합리식 적용 한계 {ceiling_ha:.0} ha. 결과는 참고용."
            ),
        }
    }
}
