use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::drainage::{
    ChainResult, DesignResult, DesignWarning, NetworkNode, RoughnessMaterial, StormwaterResult,
};
use crate::quantity::QuantityKind;

/// 명령행 인자.
#[derive(Debug, Parser)]
#[command(
    name = "drainage_engineering_toolbox",
    version,
    about = "중력식 배수관 수리 계산기 (Manning, 관저고/토피, HGL, 합리식)"
)]
pub struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// 출력 형식
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// 로그 상세도 (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
}

/// 메뉴에 해당하는 하위 명령.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 관로 구간 설계 검토
    Design(DesignArgs),
    /// 합리식 첨두 유출량
    Runoff(RunoffArgs),
    /// 우수관 통수능 검토 (유출량 대 만관 통수능)
    Stormwater(StormwaterArgs),
    /// TOML로 정의한 다구간 간선 HGL 검토
    Chain(ChainArgs),
    /// 표준 관경 선정과 자정 최소 경사
    Size(SizeArgs),
    /// 단위 변환
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
pub struct PipeArgs {
    /// 내경
    #[arg(long)]
    pub diameter: f64,
    /// 내경 단위 (m, mm, ...)
    #[arg(long, default_value = "m")]
    pub diameter_unit: String,
    /// 경사 [m/m]
    #[arg(long, allow_hyphen_values = true)]
    pub slope: f64,
    /// 관 재질 (concrete, pvc, vitrified-clay 등)
    #[arg(long, default_value = "concrete")]
    pub material: String,
}

#[derive(Debug, Args)]
pub struct DesignArgs {
    /// 설계 유량
    #[arg(long)]
    pub flow: f64,
    /// 유량 단위 (m3/s, l/s, m3/h)
    #[arg(long, default_value = "m3/s")]
    pub flow_unit: String,
    #[command(flatten)]
    pub pipe: PipeArgs,
    /// 연장 [m]
    #[arg(long)]
    pub length: f64,
    /// 상류 지반고 [m]
    #[arg(long, allow_hyphen_values = true)]
    pub upstream_gl: f64,
    /// 하류 지반고 [m]
    #[arg(long, allow_hyphen_values = true)]
    pub downstream_gl: f64,
}

#[derive(Debug, Args)]
pub struct RunoffArgs {
    /// 유역 면적
    #[arg(long)]
    pub area: f64,
    /// 면적 단위 (ha, m2, km2, acre)
    #[arg(long, default_value = "ha")]
    pub area_unit: String,
    /// 유출계수 C (0~1)
    #[arg(long)]
    pub coefficient: f64,
    /// 강우강도 [mm/hr]
    #[arg(long)]
    pub intensity: f64,
}

#[derive(Debug, Args)]
pub struct StormwaterArgs {
    #[command(flatten)]
    pub runoff: RunoffArgs,
    #[command(flatten)]
    pub pipe: PipeArgs,
}

#[derive(Debug, Args)]
pub struct ChainArgs {
    /// 간선 정의 파일 (design_flow, material, [[nodes]])
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct SizeArgs {
    /// 설계 유량
    #[arg(long)]
    pub flow: f64,
    #[arg(long, default_value = "m3/s")]
    pub flow_unit: String,
    /// 경사 [m/m]
    #[arg(long)]
    pub slope: f64,
    #[arg(long, default_value = "concrete")]
    pub material: String,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    #[arg(value_enum)]
    pub kind: QuantityKind,
    #[arg(allow_hyphen_values = true)]
    pub value: f64,
    pub from: String,
    pub to: String,
}

/// 간선 정의 파일 형식.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainFile {
    /// 설계 유량 [m³/s]
    pub design_flow: f64,
    pub material: String,
    pub nodes: Vec<NetworkNode>,
}

/// 유출량 출력용.
#[derive(Debug, Clone, Serialize)]
pub struct RunoffReport {
    pub area_ha: f64,
    pub runoff_coefficient: f64,
    pub rainfall_intensity_mm_per_hr: f64,
    pub peak_runoff_m3_s: f64,
}

/// 관경 선정 출력용.
#[derive(Debug, Clone, Serialize)]
pub struct SizeReport {
    pub design_flow_m3_s: f64,
    pub slope: f64,
    pub manning_n: f64,
    pub selected_diameter_m: Option<f64>,
    /// 선정 관경에서 자정 유속을 내는 최소 경사
    pub min_self_cleansing_slope: Option<f64>,
}

pub fn render_design(res: &DesignResult) -> String {
    let mut out = String::new();
    out.push_str("\n=== 관로 구간 설계 검토 ===\n");
    out.push_str(&render_material(res.material, res.manning_n));
    out.push_str(&format!(
        "관저고: 상류 {:.3} m / 하류 {:.3} m\n",
        res.inverts.upstream_invert, res.inverts.downstream_invert
    ));
    out.push_str(&format!(
        "토피: 상류 {:.3} m / 하류 {:.3} m\n",
        res.inverts.upstream_cover, res.inverts.downstream_cover
    ));
    out.push_str(&format!(
        "만관 통수능: {:.4} m³/s, 유속 {:.2} m/s, 단면적 {:.4} m², R {:.4} m\n",
        res.capacity.capacity, res.capacity.velocity, res.capacity.area, res.capacity.hydraulic_radius
    ));
    out.push_str(&format!(
        "이용률: {:.1}%  유속 기준: {}\n",
        res.utilization_ratio * 100.0,
        if res.velocity_compliant { "적합" } else { "부적합" }
    ));
    out.push_str(&render_hgl_table(&res.hgl));
    out.push_str(&format!(
        "맨홀 간격: {}\n",
        if res.spacing_valid { "적합" } else { "부적합" }
    ));
    out.push_str(&render_warnings(&res.warnings));
    out
}

pub fn render_chain(res: &ChainResult) -> String {
    let mut out = String::new();
    out.push_str("\n=== 간선 HGL 검토 ===\n");
    out.push_str(&render_material(res.material, res.manning_n));
    out.push_str(&render_hgl_table(&res.profile.points));
    out.push_str("구간      연장[m]   경사      유속[m/s]  손실[m]   이용률\n");
    for s in &res.profile.segments {
        out.push_str(&format!(
            "{:>7.2}→{:<7.2} {:>8.2} {:>9.5} {:>9.2} {:>8.4} {:>7.1}%\n",
            s.upstream_chainage,
            s.downstream_chainage,
            s.length,
            s.slope,
            s.velocity,
            s.head_loss,
            s.utilization * 100.0
        ));
    }
    out.push_str(&format!(
        "맨홀 간격: {}\n",
        if res.spacing_valid { "적합" } else { "부적합" }
    ));
    out.push_str(&render_warnings(&res.warnings));
    out
}

pub fn render_stormwater(res: &StormwaterResult) -> String {
    let mut out = String::new();
    out.push_str("\n=== 우수관 통수능 검토 ===\n");
    out.push_str(&format!("첨두 유출량: {:.4} m³/s\n", res.peak_runoff));
    out.push_str(&format!(
        "만관 통수능: {:.4} m³/s (유속 {:.2} m/s)\n",
        res.capacity.capacity, res.capacity.velocity
    ));
    out.push_str(&format!(
        "이용률: {:.1}% → {}\n",
        res.utilization_ratio * 100.0,
        if res.adequate { "통수능 충분" } else { "통수능 부족" }
    ));
    out.push_str(&render_warnings(&res.warnings));
    out
}

pub fn render_runoff(report: &RunoffReport) -> String {
    format!(
        "합리식 Q = C·I·A/360 = {:.2}×{:.1}×{:.3}/360 = {:.4} m³/s\n",
        report.runoff_coefficient,
        report.rainfall_intensity_mm_per_hr,
        report.area_ha,
        report.peak_runoff_m3_s
    )
}

pub fn render_size(report: &SizeReport) -> String {
    match (report.selected_diameter_m, report.min_self_cleansing_slope) {
        (Some(d), Some(s)) => format!(
            "추천 표준 관경: {:.0} mm (n={:.4})\n자정 유속 최소 경사: {:.5} m/m (1:{:.0})\n",
            d * 1000.0,
            report.manning_n,
            s,
            1.0 / s
        ),
        _ => format!(
            "경사 {:.5}에서 {:.4} m³/s를 흘릴 수 있는 표준 관경이 없습니다.\n",
            report.slope, report.design_flow_m3_s
        ),
    }
}

fn render_material(material: RoughnessMaterial, manning_n: f64) -> String {
    let data = material.data();
    format!("재질: {} ({}), 조도계수 n: {manning_n:.4}\n", data.name, data.notes)
}

fn render_hgl_table(points: &[crate::drainage::HglPoint]) -> String {
    let mut out = String::from("측점[m]     HGL[m]    관정[m]   압력류\n");
    for p in points {
        out.push_str(&format!(
            "{:>8.2} {:>10.3} {:>10.3}   {}\n",
            p.chainage,
            p.hgl,
            p.pipe_obvert,
            if p.surcharge { "예" } else { "-" }
        ));
    }
    out
}

fn render_warnings(warnings: &[DesignWarning]) -> String {
    if warnings.is_empty() {
        return "경고 없음\n".to_string();
    }
    let mut out = format!("경고 {}건:\n", warnings.len());
    for (i, w) in warnings.iter().enumerate() {
        out.push_str(&format!("  {}. {w}\n", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_design_command_with_units() {
        let cli = Cli::try_parse_from([
            "drainage_engineering_toolbox",
            "design",
            "--flow",
            "30",
            "--flow-unit",
            "l/s",
            "--diameter",
            "300",
            "--diameter-unit",
            "mm",
            "--slope",
            "0.01",
            "--length",
            "60",
            "--upstream-gl",
            "100",
            "--downstream-gl",
            "99.4",
        ])
        .unwrap();
        match cli.command {
            Command::Design(args) => {
                assert_eq!(args.flow_unit, "l/s");
                assert_eq!(args.pipe.diameter, 300.0);
                assert_eq!(args.pipe.material, "concrete");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn chain_file_parses_nodes_in_order() {
        let file: ChainFile = toml::from_str(
            r#"
design_flow = 0.05
material = "pvc"

[[nodes]]
chainage = 0.0
invert = 98.5
diameter = 0.3

[[nodes]]
chainage = 45.0
invert = 98.0
diameter = 0.3
"#,
        )
        .unwrap();
        assert_eq!(file.nodes.len(), 2);
        assert_eq!(file.nodes[1].chainage, 45.0);
    }

    #[test]
    fn material_line_shows_notes() {
        let line = render_material(RoughnessMaterial::VitrifiedClay, 0.014);
        assert!(line.contains("Vitrified Clay"), "{line}");
        assert!(line.contains("도관"), "{line}");
        assert!(line.contains("0.0140"), "{line}");
    }
}
