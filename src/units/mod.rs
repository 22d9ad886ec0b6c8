//! 배수 설계 입력에 쓰는 단위 정의 및 변환 모듈 모음.
//! 엔진 내부 기준은 m, m³/s, ha이다.

pub mod area;
pub mod flow;
pub mod length;

pub use area::{convert_area, AreaUnit};
pub use flow::{convert_flow, FlowUnit};
pub use length::{convert_length, LengthUnit};
