//! 관 재질별 Manning 조도계수 테이블.
//! 값은 일반적인 설계 기준의 대표값이며 지자체 기준에 따라 `RoughnessTable`로 재정의할 수 있다.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DrainageError;

/// 관 재질.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoughnessMaterial {
    Concrete,
    #[serde(rename = "PVC")]
    Pvc,
    VitrifiedClay,
}

#[derive(Debug)]
pub struct MaterialData {
    pub material: RoughnessMaterial,
    pub code: &'static str,
    pub name: &'static str,
    /// 보고서에 함께 표시하는 설명
    pub notes: &'static str,
    /// 기본 Manning n
    pub manning_n: f64,
}

impl RoughnessMaterial {
    pub const ALL: [RoughnessMaterial; 3] = [
        RoughnessMaterial::Concrete,
        RoughnessMaterial::Pvc,
        RoughnessMaterial::VitrifiedClay,
    ];

    /// 내장 테이블의 재질 정보를 반환한다.
    pub fn data(self) -> &'static MaterialData {
        match self {
            RoughnessMaterial::Concrete => &MATERIALS[0],
            RoughnessMaterial::Pvc => &MATERIALS[1],
            RoughnessMaterial::VitrifiedClay => &MATERIALS[2],
        }
    }

    /// 내장 기본 조도계수.
    pub fn default_n(self) -> f64 {
        self.data().manning_n
    }
}

impl fmt::Display for RoughnessMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data().name)
    }
}

impl FromStr for RoughnessMaterial {
    type Err = DrainageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_material(s)
            .map(|m| m.material)
            .ok_or_else(|| DrainageError::UnknownMaterial(s.to_string()))
    }
}

/// 코드, 이름 또는 별칭으로 재질을 찾는다.
/// 대소문자를 구분하지 않으며 `-`, `_`, 공백은 같은 구분자로 본다.
pub fn find_material(code: &str) -> Option<&'static MaterialData> {
    let key = normalize_key(code);
    MATERIALS.iter().find(|m| {
        normalize_key(m.code) == key
            || normalize_key(m.name) == key
            || aliases(m.material).iter().any(|a| normalize_key(a) == key)
    })
}

fn normalize_key(s: &str) -> String {
    s.trim()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

fn aliases(material: RoughnessMaterial) -> &'static [&'static str] {
    match material {
        RoughnessMaterial::Concrete => &["rc", "rcp", "concrete"],
        RoughnessMaterial::Pvc => &["upvc", "pvc-u"],
        RoughnessMaterial::VitrifiedClay => &["vc", "clay", "vcp"],
    }
}

const MATERIALS: &[MaterialData] = &[
    MaterialData {
        material: RoughnessMaterial::Concrete,
        code: "CONC",
        name: "Concrete",
        notes: "원심력 철근콘크리트관; 참고용 대표값",
        manning_n: 0.013,
    },
    MaterialData {
        material: RoughnessMaterial::Pvc,
        code: "PVC",
        name: "PVC",
        notes: "경질 폴리염화비닐관",
        manning_n: 0.009,
    },
    MaterialData {
        material: RoughnessMaterial::VitrifiedClay,
        code: "VCP",
        name: "Vitrified Clay",
        notes: "도관(유약 처리 점토관)",
        manning_n: 0.014,
    },
];

/// 재질별 조도계수 설정. 설정 파일에서 재정의 가능하다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoughnessTable {
    pub concrete: f64,
    pub pvc: f64,
    pub vitrified_clay: f64,
}

impl Default for RoughnessTable {
    fn default() -> Self {
        Self {
            concrete: RoughnessMaterial::Concrete.default_n(),
            pvc: RoughnessMaterial::Pvc.default_n(),
            vitrified_clay: RoughnessMaterial::VitrifiedClay.default_n(),
        }
    }
}

impl RoughnessTable {
    /// 재질의 조도계수를 반환한다. 0 이하 또는 비유한 값은 오류로 처리한다.
    pub fn manning_n(&self, material: RoughnessMaterial) -> Result<f64, DrainageError> {
        let n = match material {
            RoughnessMaterial::Concrete => self.concrete,
            RoughnessMaterial::Pvc => self.pvc,
            RoughnessMaterial::VitrifiedClay => self.vitrified_clay,
        };
        if !n.is_finite() || n <= 0.0 {
            return Err(DrainageError::InvalidRoughness(n));
        }
        Ok(n)
    }
}
