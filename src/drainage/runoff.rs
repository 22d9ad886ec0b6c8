//! 합리식(Rational Method) 첨두 유출량 계산.
//!
//! Q = C·I·A / 360 (A: ha, I: mm/hr, Q: m³/s)
//!
//! 합리식은 약 80 ha 이하의 소유역에 적용하는 것이 일반적이다. 이 한계는 계산에서
//! 강제하지 않으며, 우수관 검토 결과에 참고 경고로만 남긴다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_finite, DrainageError};

/// 단위 환산 상수 (ha·mm/hr → m³/s)
pub const RATIONAL_METHOD_DIVISOR: f64 = 360.0;

/// 유역 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Catchment {
    /// 유역 면적 [ha]
    pub area_ha: f64,
    /// 유출계수 C (0~1)
    pub runoff_coefficient: f64,
    /// 강우강도 [mm/hr]
    pub rainfall_intensity_mm_per_hr: f64,
}

impl Catchment {
    pub fn peak_runoff(&self) -> Result<f64, DrainageError> {
        estimate_peak_runoff(
            self.area_ha,
            self.runoff_coefficient,
            self.rainfall_intensity_mm_per_hr,
        )
    }
}

/// 첨두 유출량 [m³/s]을 계산한다.
pub fn estimate_peak_runoff(
    area_ha: f64,
    runoff_coefficient: f64,
    rainfall_intensity_mm_per_hr: f64,
) -> Result<f64, DrainageError> {
    ensure_finite(area_ha, "area_ha")?;
    ensure_finite(runoff_coefficient, "runoff_coefficient")?;
    ensure_finite(rainfall_intensity_mm_per_hr, "rainfall_intensity")?;
    if area_ha < 0.0 {
        return Err(DrainageError::InvalidCatchmentArea(area_ha));
    }
    if !(0.0..=1.0).contains(&runoff_coefficient) {
        return Err(DrainageError::InvalidRunoffCoefficient(runoff_coefficient));
    }
    if rainfall_intensity_mm_per_hr < 0.0 {
        return Err(DrainageError::InvalidRainfallIntensity(
            rainfall_intensity_mm_per_hr,
        ));
    }
    let q = runoff_coefficient * rainfall_intensity_mm_per_hr * area_ha / RATIONAL_METHOD_DIVISOR;
    debug!(area_ha, runoff_coefficient, rainfall_intensity_mm_per_hr, q, "rational method");
    Ok(q)
}
