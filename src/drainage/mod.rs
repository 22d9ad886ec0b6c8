//! 중력식 배수관 수리 해석 모듈 모음.
//!
//! Manning 유량식, 관저고/토피 산정, 맨홀 간격 검토, 합리식 유출량,
//! 동수경사선(HGL) 역추적과 이를 묶는 설계 검토기로 구성한다.
//! 모든 계산은 입력을 변경하지 않는 순수 함수이며, 설계 위반은 오류가 아니라
//! [`DesignWarning`] 목록으로 반환한다.

pub mod design;
pub mod flow;
pub mod hgl;
pub mod inverts;
pub mod material;
pub mod runoff;
pub mod sizing;
pub mod spacing;
pub mod warning;

pub use design::*;
pub use flow::*;
pub use hgl::*;
pub use inverts::*;
pub use material::*;
pub use runoff::*;
pub use sizing::*;
pub use spacing::*;
pub use warning::*;

use thiserror::Error;

/// 호출자 입력 결함을 나타내는 오류. 발생 즉시 계산을 중단한다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrainageError {
    #[error("관경은 0보다 커야 합니다: {0}")]
    InvalidDiameter(f64),
    #[error("충만율은 0 초과 1 이하이어야 합니다: {0}")]
    InvalidFillRatio(f64),
    #[error("조도계수 n은 0보다 커야 합니다: {0}")]
    InvalidRoughness(f64),
    #[error("연장은 0보다 커야 합니다: {0}")]
    InvalidLength(f64),
    #[error("설계 유량은 0 이상이어야 합니다: {0}")]
    InvalidDesignFlow(f64),
    #[error("유한한 값이 아닙니다: {0}")]
    NonFiniteInput(&'static str),
    #[error("유역 면적은 0 이상이어야 합니다: {0} ha")]
    InvalidCatchmentArea(f64),
    #[error("유출계수는 0~1 범위여야 합니다: {0}")]
    InvalidRunoffCoefficient(f64),
    #[error("강우강도는 0 이상이어야 합니다: {0} mm/hr")]
    InvalidRainfallIntensity(f64),
    #[error("알 수 없는 관 재질: {0}")]
    UnknownMaterial(String),
    #[error("맨홀 최대 간격은 0보다 커야 합니다: {0} m")]
    InvalidMaxSpacing(f64),
    #[error("관로 절점이 비어 있습니다.")]
    EmptyNetwork,
    #[error("측점은 상류에서 하류로 증가해야 합니다: #{index} ({previous} → {current})")]
    NonIncreasingChainage {
        index: usize,
        previous: f64,
        current: f64,
    },
}

/// 유한한 값인지 확인한다.
pub(crate) fn ensure_finite(value: f64, name: &'static str) -> Result<f64, DrainageError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DrainageError::NonFiniteInput(name))
    }
}
