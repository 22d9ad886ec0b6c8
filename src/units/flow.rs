use serde::{Deserialize, Serialize};

/// 유량 단위. 내부 기준은 m³/s이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowUnit {
    CubicMeterPerSecond,
    LiterPerSecond,
    CubicMeterPerHour,
    CubicMeterPerDay,
}

impl FlowUnit {
    /// 1 단위당 m³/s
    fn cubic_meters_per_second(self) -> f64 {
        match self {
            FlowUnit::CubicMeterPerSecond => 1.0,
            FlowUnit::LiterPerSecond => 0.001,
            FlowUnit::CubicMeterPerHour => 1.0 / 3600.0,
            FlowUnit::CubicMeterPerDay => 1.0 / 86_400.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            FlowUnit::CubicMeterPerSecond => "m3/s",
            FlowUnit::LiterPerSecond => "l/s",
            FlowUnit::CubicMeterPerHour => "m3/h",
            FlowUnit::CubicMeterPerDay => "m3/d",
        }
    }
}

/// 유량을 변환한다.
pub fn convert_flow(value: f64, from: FlowUnit, to: FlowUnit) -> f64 {
    value * from.cubic_meters_per_second() / to.cubic_meters_per_second()
}
