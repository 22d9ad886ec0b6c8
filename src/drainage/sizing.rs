use tracing::debug;

use super::{ensure_finite, section_properties, solve_full, ConduitGeometry, DrainageError};

/// 표준 관경 [m]
pub const STANDARD_DIAMETERS_M: [f64; 7] = [0.15, 0.225, 0.3, 0.375, 0.45, 0.6, 0.9];

const DIAMETER_TOLERANCE: f64 = 1e-6;

/// 표준 관경 목록에 있는지 확인한다.
pub fn is_standard_diameter(diameter: f64) -> bool {
    STANDARD_DIAMETERS_M
        .iter()
        .any(|d| (d - diameter).abs() <= DIAMETER_TOLERANCE)
}

/// 설계 유량을 만관으로 흘릴 수 있는 가장 작은 표준 관경을 고른다.
///
/// 표준 관경 중 어느 것도 부족하면 `None`을 돌려준다.
pub fn select_standard_diameter(
    design_flow: f64,
    slope: f64,
    roughness_n: f64,
) -> Result<Option<f64>, DrainageError> {
    ensure_finite(design_flow, "design_flow")?;
    ensure_finite(slope, "slope")?;
    if design_flow < 0.0 {
        return Err(DrainageError::InvalidDesignFlow(design_flow));
    }
    for &diameter in STANDARD_DIAMETERS_M.iter() {
        let res = solve_full(diameter, slope, roughness_n)?;
        if res.capacity >= design_flow {
            debug!(design_flow, slope, diameter, capacity = res.capacity, "standard diameter selected");
            return Ok(Some(diameter));
        }
    }
    Ok(None)
}

/// 만관 유속이 `target_velocity`가 되는 최소 경사. S = (v·n / R^(2/3))²
pub fn minimum_slope_for_velocity(
    diameter: f64,
    roughness_n: f64,
    target_velocity: f64,
) -> Result<f64, DrainageError> {
    ensure_finite(roughness_n, "roughness_n")?;
    ensure_finite(target_velocity, "target_velocity")?;
    if roughness_n <= 0.0 {
        return Err(DrainageError::InvalidRoughness(roughness_n));
    }
    let section = section_properties(ConduitGeometry::full(diameter))?;
    let root = target_velocity.max(0.0) * roughness_n / section.hydraulic_radius.powf(2.0 / 3.0);
    Ok(root * root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn standard_set_membership() {
        assert!(is_standard_diameter(0.225));
        assert!(is_standard_diameter(0.3 + 1e-9));
        assert!(!is_standard_diameter(0.25));
    }

    #[test]
    fn selected_diameter_is_smallest_sufficient() {
        let d = select_standard_diameter(0.05, 0.01, 0.013).unwrap().unwrap();
        let cap = solve_full(d, 0.01, 0.013).unwrap().capacity;
        assert!(cap >= 0.05);
        let idx = STANDARD_DIAMETERS_M.iter().position(|&x| x == d).unwrap();
        if idx > 0 {
            let smaller = solve_full(STANDARD_DIAMETERS_M[idx - 1], 0.01, 0.013).unwrap();
            assert!(smaller.capacity < 0.05);
        }
    }

    #[test]
    fn oversized_flow_has_no_standard_pipe() {
        assert_eq!(select_standard_diameter(50.0, 0.001, 0.013).unwrap(), None);
    }

    #[test]
    fn minimum_slope_inverts_manning() {
        let s = minimum_slope_for_velocity(0.3, 0.013, 0.6).unwrap();
        let v = solve_full(0.3, s, 0.013).unwrap().velocity;
        assert_relative_eq!(v, 0.6, max_relative = 1e-9);
    }
}
