/// 단위 변환 대상 물리량.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QuantityKind {
    /// 관경·연장·지반고
    Length,
    /// 설계 유량
    Flow,
    /// 유역 면적
    Area,
}

impl QuantityKind {
    /// 엔진 내부 기준 단위
    pub fn base_unit(self) -> &'static str {
        match self {
            QuantityKind::Length => "m",
            QuantityKind::Flow => "m3/s",
            QuantityKind::Area => "ha",
        }
    }
}
