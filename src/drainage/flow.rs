use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_finite, DrainageError};

/// 이 값 이상이면 만관으로 본다. 1.0과의 부동소수 비교를 피하기 위한 허용치.
pub const FULL_BORE_THRESHOLD: f64 = 0.99;

/// 원형 관의 단면 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConduitGeometry {
    /// 내경 [m]
    pub diameter: f64,
    /// 수심/관경 비 (0 < r ≤ 1, 1.0 = 만관)
    pub fill_ratio: f64,
}

impl ConduitGeometry {
    pub fn full(diameter: f64) -> Self {
        Self {
            diameter,
            fill_ratio: 1.0,
        }
    }

    pub fn partial(diameter: f64, fill_ratio: f64) -> Self {
        Self {
            diameter,
            fill_ratio,
        }
    }

    fn validate(&self) -> Result<(), DrainageError> {
        ensure_finite(self.diameter, "diameter")?;
        ensure_finite(self.fill_ratio, "fill_ratio")?;
        if self.diameter <= 0.0 {
            return Err(DrainageError::InvalidDiameter(self.diameter));
        }
        if self.fill_ratio <= 0.0 || self.fill_ratio > 1.0 {
            return Err(DrainageError::InvalidFillRatio(self.fill_ratio));
        }
        Ok(())
    }

    pub fn is_full_bore(&self) -> bool {
        self.fill_ratio >= FULL_BORE_THRESHOLD
    }
}

/// 유수 단면 특성.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// 유수 단면적 [m²]
    pub area: f64,
    /// 윤변 [m] (자유수면 제외)
    pub wetted_perimeter: f64,
    /// 동수반경 [m]
    pub hydraulic_radius: f64,
}

/// 유량 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityResult {
    /// 통수능 [m³/s]
    pub capacity: f64,
    /// 평균 유속 [m/s]
    pub velocity: f64,
    /// 유수 단면적 [m²]
    pub area: f64,
    /// 동수반경 [m]
    pub hydraulic_radius: f64,
}

/// 원형 관의 유수 단면 특성을 계산한다.
///
/// 만관(r ≥ 0.99): A = πr², P = 2πr.
/// 부분 충만: θ = 2·acos(1 − 2·fill), A = (r²/2)(θ − sin θ), P = r·θ.
pub fn section_properties(geometry: ConduitGeometry) -> Result<SectionProperties, DrainageError> {
    geometry.validate()?;
    let r = geometry.diameter / 2.0;
    let (area, wetted_perimeter) = if geometry.is_full_bore() {
        (PI * r * r, 2.0 * PI * r)
    } else {
        let theta = 2.0 * (1.0 - 2.0 * geometry.fill_ratio).acos();
        (r * r / 2.0 * (theta - theta.sin()), r * theta)
    };
    // 극소 충만율에서 θ가 0으로 반올림되면 A = P = 0이다. 이때 R = 0으로 둔다.
    let hydraulic_radius = if wetted_perimeter > 0.0 {
        area / wetted_perimeter
    } else {
        0.0
    };
    Ok(SectionProperties {
        area,
        wetted_perimeter,
        hydraulic_radius,
    })
}

/// Manning 공식(SI)으로 유속과 통수능을 계산한다.
///
/// V = (1/n)·R^(2/3)·S^(1/2), Q = A·V
///
/// 경사의 부호는 검사하지 않는다. 역경사는 호출자가 사전에 걸러야 하며,
/// 경사 0은 유속 0을 돌려준다.
pub fn solve_geometry(
    geometry: ConduitGeometry,
    slope: f64,
    roughness_n: f64,
) -> Result<CapacityResult, DrainageError> {
    ensure_finite(slope, "slope")?;
    ensure_finite(roughness_n, "roughness_n")?;
    if roughness_n <= 0.0 {
        return Err(DrainageError::InvalidRoughness(roughness_n));
    }
    let section = section_properties(geometry)?;
    let velocity = (1.0 / roughness_n) * section.hydraulic_radius.powf(2.0 / 3.0) * slope.sqrt();
    let capacity = section.area * velocity;
    debug!(
        diameter = geometry.diameter,
        fill_ratio = geometry.fill_ratio,
        full_bore = geometry.is_full_bore(),
        slope,
        velocity,
        capacity,
        "manning solve"
    );
    Ok(CapacityResult {
        capacity,
        velocity,
        area: section.area,
        hydraulic_radius: section.hydraulic_radius,
    })
}

/// `solve_geometry`의 축약형.
pub fn solve(
    diameter: f64,
    slope: f64,
    roughness_n: f64,
    fill_ratio: f64,
) -> Result<CapacityResult, DrainageError> {
    solve_geometry(ConduitGeometry::partial(diameter, fill_ratio), slope, roughness_n)
}

/// 만관 통수능.
pub fn solve_full(
    diameter: f64,
    slope: f64,
    roughness_n: f64,
) -> Result<CapacityResult, DrainageError> {
    solve_geometry(ConduitGeometry::full(diameter), slope, roughness_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn half_full_has_same_radius_as_full() {
        // 반관일 때 동수반경은 만관과 같다 (D/4).
        let full = section_properties(ConduitGeometry::full(0.3)).unwrap();
        let half = section_properties(ConduitGeometry::partial(0.3, 0.5)).unwrap();
        assert_relative_eq!(full.hydraulic_radius, 0.075, epsilon = 1e-12);
        assert_relative_eq!(half.hydraulic_radius, 0.075, epsilon = 1e-12);
        assert_relative_eq!(half.area, full.area / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert_eq!(
            solve(0.0, 0.01, 0.013, 1.0),
            Err(DrainageError::InvalidDiameter(0.0))
        );
        assert_eq!(
            solve(0.3, 0.01, 0.013, 0.0),
            Err(DrainageError::InvalidFillRatio(0.0))
        );
        assert_eq!(
            solve(0.3, 0.01, 0.013, 1.2),
            Err(DrainageError::InvalidFillRatio(1.2))
        );
        assert_eq!(
            solve(0.3, 0.01, -0.013, 1.0),
            Err(DrainageError::InvalidRoughness(-0.013))
        );
        assert!(solve(f64::NAN, 0.01, 0.013, 1.0).is_err());
    }

    #[test]
    fn vanishing_fill_gives_zero_flow() {
        let res = solve(0.3, 0.01, 0.013, 1e-17).unwrap();
        assert_eq!(res.area, 0.0);
        assert_eq!(res.hydraulic_radius, 0.0);
        assert_eq!(res.velocity, 0.0);
        assert_eq!(res.capacity, 0.0);
    }

    #[test]
    fn zero_slope_gives_zero_velocity() {
        let res = solve_full(0.3, 0.0, 0.013).unwrap();
        assert_eq!(res.velocity, 0.0);
        assert_eq!(res.capacity, 0.0);
        assert!(res.area > 0.0);
    }
}
