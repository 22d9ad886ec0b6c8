use thiserror::Error;

use crate::quantity::QuantityKind;
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시는 `mm`, `l/s`, `m3/h`, `ha`, `m2` 등을 사용할 수 있다.
pub fn convert(
    kind: QuantityKind,
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
) -> Result<f64, ConversionError> {
    match kind {
        QuantityKind::Length => Ok(convert_length(
            value,
            parse_length_unit(from_unit_str)?,
            parse_length_unit(to_unit_str)?,
        )),
        QuantityKind::Flow => Ok(convert_flow(
            value,
            parse_flow_unit(from_unit_str)?,
            parse_flow_unit(to_unit_str)?,
        )),
        QuantityKind::Area => Ok(convert_area(
            value,
            parse_area_unit(from_unit_str)?,
            parse_area_unit(to_unit_str)?,
        )),
    }
}

/// 입력값을 엔진 내부 기준 단위로 환산한다.
pub fn to_base(kind: QuantityKind, value: f64, unit_str: &str) -> Result<f64, ConversionError> {
    convert(kind, value, unit_str, kind.base_unit())
}

/// 단위 문자열을 표준 표기로 바꾼다. 예: `L/S` → `l/s`.
pub fn unit_symbol(kind: QuantityKind, unit_str: &str) -> Result<&'static str, ConversionError> {
    match kind {
        QuantityKind::Length => Ok(parse_length_unit(unit_str)?.symbol()),
        QuantityKind::Flow => Ok(parse_flow_unit(unit_str)?.symbol()),
        QuantityKind::Area => Ok(parse_area_unit(unit_str)?.symbol()),
    }
}

pub fn parse_length_unit(s: &str) -> Result<LengthUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m" | "meter" | "metre" => Ok(LengthUnit::Meter),
        "mm" | "millimeter" | "millimetre" => Ok(LengthUnit::Millimeter),
        "cm" => Ok(LengthUnit::Centimeter),
        "ft" | "foot" | "feet" => Ok(LengthUnit::Foot),
        "in" | "inch" => Ok(LengthUnit::Inch),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_flow_unit(s: &str) -> Result<FlowUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m3/s" | "m^3/s" | "cms" | "cumecs" => Ok(FlowUnit::CubicMeterPerSecond),
        "l/s" | "lps" => Ok(FlowUnit::LiterPerSecond),
        "m3/h" | "m^3/h" | "cmh" => Ok(FlowUnit::CubicMeterPerHour),
        "m3/d" | "m^3/d" | "cmd" => Ok(FlowUnit::CubicMeterPerDay),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_area_unit(s: &str) -> Result<AreaUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "ha" | "hectare" => Ok(AreaUnit::Hectare),
        "m2" | "m^2" | "sqm" => Ok(AreaUnit::SquareMeter),
        "km2" | "km^2" => Ok(AreaUnit::SquareKilometer),
        "acre" | "ac" => Ok(AreaUnit::Acre),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}
