use serde::{Deserialize, Serialize};

use super::DesignWarning;

/// 맨홀 간격 검토 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingResult {
    pub valid: bool,
    pub warnings: Vec<DesignWarning>,
}

/// 연속된 구조물 측점 간격이 최대 간격을 넘는지 검사한다. 항상 결과를 돌려준다.
pub fn validate_spacing(chainages: &[f64], max_spacing: f64) -> SpacingResult {
    let warnings: Vec<DesignWarning> = chainages
        .windows(2)
        .filter_map(|pair| {
            let spacing = pair[1] - pair[0];
            (spacing > max_spacing).then_some(DesignWarning::ExcessSpacing {
                from_chainage: pair[0],
                to_chainage: pair[1],
                spacing,
                max_spacing,
            })
        })
        .collect();
    SpacingResult {
        valid: warnings.is_empty(),
        warnings,
    }
}
