use serde::{Deserialize, Serialize};

/// 유역 면적 단위. 내부 기준은 헥타르이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    Hectare,
    SquareMeter,
    SquareKilometer,
    Acre,
}

impl AreaUnit {
    /// 1 단위당 ha
    fn hectares(self) -> f64 {
        match self {
            AreaUnit::Hectare => 1.0,
            AreaUnit::SquareMeter => 1.0e-4,
            AreaUnit::SquareKilometer => 100.0,
            AreaUnit::Acre => 0.404_685_642_24,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AreaUnit::Hectare => "ha",
            AreaUnit::SquareMeter => "m2",
            AreaUnit::SquareKilometer => "km2",
            AreaUnit::Acre => "acre",
        }
    }
}

/// 면적을 변환한다.
pub fn convert_area(value: f64, from: AreaUnit, to: AreaUnit) -> f64 {
    value * from.hectares() / to.hectares()
}
