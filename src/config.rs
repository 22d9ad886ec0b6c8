use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::drainage::{
    HglSettings, OutfallCondition, RoughnessTable, DEFAULT_HEAD_LOSS_COEFFICIENT,
};

/// 중력가속도 [m/s²]
pub const GRAVITY: f64 = 9.81;

/// 기본 설정 파일 이름.
pub const DEFAULT_CONFIG_FILE: &str = "drainage.toml";

/// 설계 검토 기준값. 지자체 기준에 맞춰 설정 파일에서 재정의한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// 중력가속도 [m/s²]
    pub gravity: f64,
    /// 자정 작용 최소 유속 [m/s]
    pub min_velocity: f64,
    /// 세굴 방지 최대 유속 [m/s]
    pub max_velocity: f64,
    /// 최소 토피 [m]
    pub min_cover: f64,
    /// 맨홀 최대 간격 [m]
    pub max_spacing: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            min_velocity: 0.6,
            max_velocity: 3.0,
            min_cover: 0.9,
            max_spacing: 90.0,
        }
    }
}

impl QualityThresholds {
    /// 유속이 자정 유속 이상, 최대 유속 이하인지 판정한다.
    pub fn velocity_compliant(&self, velocity: f64) -> bool {
        self.min_velocity <= velocity && velocity <= self.max_velocity
    }
}

/// 수리 계산 모델 설정.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydraulicSettings {
    /// 방류구 경계조건
    pub outfall: OutfallCondition,
    /// 마찰손실 계수 k (손실 = k·(L/D)·v²/2g)
    pub head_loss_coefficient: f64,
    /// 합리식 적용 면적 상한 [ha]. 참고 경고용.
    pub rational_method_ceiling_ha: f64,
}

impl Default for HydraulicSettings {
    fn default() -> Self {
        Self {
            outfall: OutfallCondition::HalfDepth,
            head_loss_coefficient: DEFAULT_HEAD_LOSS_COEFFICIENT,
            rational_method_ceiling_ha: 80.0,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: QualityThresholds,
    pub roughness: RoughnessTable,
    pub hydraulics: HydraulicSettings,
}

impl Config {
    /// HGL 계산에 넘길 설정을 만든다.
    pub fn hgl_settings(&self) -> HglSettings {
        HglSettings {
            outfall: self.hydraulics.outfall,
            head_loss_coefficient: self.hydraulics.head_loss_coefficient,
            gravity: self.thresholds.gravity,
        }
    }

    /// 기준값의 일관성을 검사한다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let positive = [
            ("thresholds.gravity", t.gravity),
            ("thresholds.min_velocity", t.min_velocity),
            ("thresholds.max_velocity", t.max_velocity),
            ("thresholds.max_spacing", t.max_spacing),
            ("roughness.concrete", self.roughness.concrete),
            ("roughness.pvc", self.roughness.pvc),
            ("roughness.vitrified_clay", self.roughness.vitrified_clay),
            (
                "hydraulics.rational_method_ceiling_ha",
                self.hydraulics.rational_method_ceiling_ha,
            ),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold(format!(
                    "{name}은(는) 0보다 커야 합니다: {value}"
                )));
            }
        }
        if !t.min_cover.is_finite() || t.min_cover < 0.0 {
            return Err(ConfigError::InvalidThreshold(format!(
                "thresholds.min_cover은(는) 0 이상이어야 합니다: {}",
                t.min_cover
            )));
        }
        if t.min_velocity >= t.max_velocity {
            return Err(ConfigError::InvalidThreshold(format!(
                "min_velocity({})는 max_velocity({})보다 작아야 합니다",
                t.min_velocity, t.max_velocity
            )));
        }
        let k = self.hydraulics.head_loss_coefficient;
        if !k.is_finite() || k < 0.0 {
            return Err(ConfigError::InvalidThreshold(format!(
                "hydraulics.head_loss_coefficient은(는) 0 이상이어야 합니다: {k}"
            )));
        }
        if let OutfallCondition::FixedLevel { level } = self.hydraulics.outfall {
            if !level.is_finite() {
                return Err(ConfigError::InvalidThreshold(
                    "hydraulics.outfall.level이 유한한 값이 아닙니다".into(),
                ));
            }
        }
        Ok(())
    }

    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("설정값 오류: {0}")]
    InvalidThreshold(String),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg = parse_config(&content)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        tracing::info!(path = %path.display(), "default config written");
        Ok(cfg)
    }
}

/// TOML 문자열에서 설정을 읽고 검증한다. 빠진 항목은 기본값을 쓴다.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let cfg: Config = toml::from_str(content)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(parse_config(&text).unwrap(), cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = parse_config(
            r#"
[thresholds]
min_cover = 1.2

[hydraulics.outfall]
type = "fixed_level"
level = 12.5
"#,
        )
        .unwrap();
        assert_eq!(cfg.thresholds.min_cover, 1.2);
        assert_eq!(cfg.thresholds.max_spacing, 90.0);
        assert_eq!(cfg.roughness, RoughnessTable::default());
        assert_eq!(
            cfg.hydraulics.outfall,
            OutfallCondition::FixedLevel { level: 12.5 }
        );
        assert_eq!(
            cfg.hydraulics.head_loss_coefficient,
            DEFAULT_HEAD_LOSS_COEFFICIENT
        );
    }

    #[test]
    fn inverted_velocity_band_is_rejected() {
        let mut cfg = Config::default();
        cfg.thresholds.min_velocity = 3.5;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidThreshold(_))));
    }
}
