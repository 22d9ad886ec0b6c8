use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_finite, DesignWarning, DrainageError};

/// 토피 비교 시 부동소수 반올림 허용치 [m]
const COVER_TOLERANCE: f64 = 1e-9;

/// 관저고/토피 계산 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvertInput {
    /// 상류 지반고 [m]
    pub upstream_gl: f64,
    /// 하류 지반고 [m]
    pub downstream_gl: f64,
    /// 내경 [m]
    pub diameter: f64,
    /// 경사 [m/m], 흐름 방향으로 내려가면 양수
    pub slope: f64,
    /// 연장 [m]
    pub length: f64,
    /// 최소 토피 [m]
    pub min_cover: f64,
}

/// 관저고/토피 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertResult {
    pub upstream_invert: f64,
    pub downstream_invert: f64,
    pub upstream_cover: f64,
    pub downstream_cover: f64,
    pub warnings: Vec<DesignWarning>,
}

/// 관저고와 토피를 계산한다.
///
/// 상류 맨홀에서 최소 토피를 확보하도록 관저고를 정하고, 하류 관저고는 경사×연장만큼 낮춘다.
/// 토피 부족과 역경사는 경고로만 보고하며 입력을 보정하지 않는다.
pub fn compute_inverts(input: InvertInput) -> Result<InvertResult, DrainageError> {
    ensure_finite(input.upstream_gl, "upstream_gl")?;
    ensure_finite(input.downstream_gl, "downstream_gl")?;
    ensure_finite(input.diameter, "diameter")?;
    ensure_finite(input.slope, "slope")?;
    ensure_finite(input.length, "length")?;
    ensure_finite(input.min_cover, "min_cover")?;
    if input.diameter <= 0.0 {
        return Err(DrainageError::InvalidDiameter(input.diameter));
    }
    if input.length <= 0.0 {
        return Err(DrainageError::InvalidLength(input.length));
    }

    let upstream_invert = input.upstream_gl - input.min_cover - input.diameter;
    let downstream_invert = upstream_invert - input.slope * input.length;
    let upstream_cover = cover_depth(input.upstream_gl, upstream_invert, input.diameter);
    let downstream_cover = cover_depth(input.downstream_gl, downstream_invert, input.diameter);

    let mut warnings = Vec::new();
    if upstream_cover + COVER_TOLERANCE < input.min_cover {
        warnings.push(DesignWarning::UpstreamCoverShortfall {
            cover: upstream_cover,
            min_cover: input.min_cover,
        });
    }
    if downstream_cover + COVER_TOLERANCE < input.min_cover {
        warnings.push(DesignWarning::DownstreamCoverShortfall {
            cover: downstream_cover,
            min_cover: input.min_cover,
        });
    }
    if input.slope <= 0.0 {
        warnings.push(DesignWarning::Backfall { slope: input.slope });
    }

    debug!(
        upstream_invert,
        downstream_invert,
        upstream_cover,
        downstream_cover,
        warnings = warnings.len(),
        "inverts computed"
    );

    Ok(InvertResult {
        upstream_invert,
        downstream_invert,
        upstream_cover,
        downstream_cover,
        warnings,
    })
}

/// 토피 = 지반고 − 관저고 − 관경 (관정까지의 깊이)
pub fn cover_depth(ground_level: f64, invert: f64, diameter: f64) -> f64 {
    ground_level - invert - diameter
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn input(slope: f64) -> InvertInput {
        InvertInput {
            upstream_gl: 100.0,
            downstream_gl: 99.5,
            diameter: 0.3,
            slope,
            length: 50.0,
            min_cover: 0.9,
        }
    }

    #[test]
    fn upstream_cover_equals_min_cover() {
        let res = compute_inverts(input(0.01)).unwrap();
        assert_abs_diff_eq!(res.upstream_invert, 98.8, epsilon = 1e-9);
        assert_abs_diff_eq!(res.downstream_invert, 98.3, epsilon = 1e-9);
        assert_abs_diff_eq!(res.upstream_cover, 0.9, epsilon = 1e-9);
        assert_abs_diff_eq!(res.downstream_cover, 0.9, epsilon = 1e-9);
        assert!(res.warnings.is_empty(), "{:?}", res.warnings);
    }

    #[test]
    fn shallow_downstream_is_reported() {
        let mut inp = input(0.001);
        inp.downstream_gl = 99.0;
        let res = compute_inverts(inp).unwrap();
        assert!(matches!(
            res.warnings.as_slice(),
            [DesignWarning::DownstreamCoverShortfall { .. }]
        ));
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut inp = input(0.01);
        inp.length = 0.0;
        assert_eq!(compute_inverts(inp), Err(DrainageError::InvalidLength(0.0)));
    }
}
