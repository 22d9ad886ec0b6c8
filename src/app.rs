use std::fs;

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::conversion::{self, ConversionError};
use crate::drainage::{
    self, Catchment, DesignInput, DrainageError, RoughnessMaterial, StormwaterInput,
};
use crate::quantity::QuantityKind;
use crate::ui_cli::{
    self, ChainArgs, ChainFile, Cli, Command, ConvertArgs, DesignArgs, OutputFormat, PipeArgs,
    RunoffArgs, RunoffReport, SizeArgs, SizeReport, StormwaterArgs,
};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] ConversionError),
    #[error("배수 계산 오류: {0}")]
    Drainage(#[from] DrainageError),
    #[error("간선 파일 파싱 오류: {0}")]
    ChainFile(#[from] toml::de::Error),
    #[error("결과 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 하위 명령을 실행하고 결과를 표준 출력에 쓴다.
pub fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let output = match &cli.command {
        Command::Design(args) => run_design(args, config, cli.format)?,
        Command::Runoff(args) => run_runoff(args, cli.format)?,
        Command::Stormwater(args) => run_stormwater(args, config, cli.format)?,
        Command::Chain(args) => run_chain(args, config, cli.format)?,
        Command::Size(args) => run_size(args, config, cli.format)?,
        Command::Convert(args) => run_convert(args)?,
    };
    print!("{output}");
    Ok(())
}

fn run_design(args: &DesignArgs, config: &Config, format: OutputFormat) -> Result<String, AppError> {
    let input = DesignInput {
        design_flow: conversion::to_base(QuantityKind::Flow, args.flow, &args.flow_unit)?,
        diameter: pipe_diameter(&args.pipe)?,
        slope: args.pipe.slope,
        material: args.pipe.material.parse()?,
        length: args.length,
        upstream_gl: args.upstream_gl,
        downstream_gl: args.downstream_gl,
    };
    debug!(?input, "design input");
    let result = drainage::evaluate_design(&input, config)?;
    render(format, &result, ui_cli::render_design)
}

fn run_runoff(args: &RunoffArgs, format: OutputFormat) -> Result<String, AppError> {
    let catchment = catchment(args)?;
    let report = RunoffReport {
        area_ha: catchment.area_ha,
        runoff_coefficient: catchment.runoff_coefficient,
        rainfall_intensity_mm_per_hr: catchment.rainfall_intensity_mm_per_hr,
        peak_runoff_m3_s: catchment.peak_runoff()?,
    };
    render(format, &report, ui_cli::render_runoff)
}

fn run_stormwater(
    args: &StormwaterArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<String, AppError> {
    let input = StormwaterInput {
        catchment: catchment(&args.runoff)?,
        diameter: pipe_diameter(&args.pipe)?,
        slope: args.pipe.slope,
        material: args.pipe.material.parse()?,
    };
    let result = drainage::check_stormwater(&input, config)?;
    render(format, &result, ui_cli::render_stormwater)
}

fn run_chain(args: &ChainArgs, config: &Config, format: OutputFormat) -> Result<String, AppError> {
    let content = fs::read_to_string(&args.file)?;
    let file: ChainFile = toml::from_str(&content)?;
    let material: RoughnessMaterial = file.material.parse()?;
    let result = drainage::evaluate_chain(&file.nodes, file.design_flow, material, config)?;
    render(format, &result, ui_cli::render_chain)
}

fn run_size(args: &SizeArgs, config: &Config, format: OutputFormat) -> Result<String, AppError> {
    let design_flow = conversion::to_base(QuantityKind::Flow, args.flow, &args.flow_unit)?;
    let material: RoughnessMaterial = args.material.parse()?;
    let manning_n = config.roughness.manning_n(material)?;
    let selected = drainage::select_standard_diameter(design_flow, args.slope, manning_n)?;
    let min_slope = match selected {
        Some(d) => Some(drainage::minimum_slope_for_velocity(
            d,
            manning_n,
            config.thresholds.min_velocity,
        )?),
        None => None,
    };
    let report = SizeReport {
        design_flow_m3_s: design_flow,
        slope: args.slope,
        manning_n,
        selected_diameter_m: selected,
        min_self_cleansing_slope: min_slope,
    };
    render(format, &report, ui_cli::render_size)
}

fn run_convert(args: &ConvertArgs) -> Result<String, AppError> {
    let result = conversion::convert(args.kind, args.value, &args.from, &args.to)?;
    let from = conversion::unit_symbol(args.kind, &args.from)?;
    let to = conversion::unit_symbol(args.kind, &args.to)?;
    Ok(format!("변환 결과: {} {from} = {result} {to}\n", args.value))
}

fn pipe_diameter(pipe: &PipeArgs) -> Result<f64, AppError> {
    Ok(conversion::to_base(
        QuantityKind::Length,
        pipe.diameter,
        &pipe.diameter_unit,
    )?)
}

fn catchment(args: &RunoffArgs) -> Result<Catchment, AppError> {
    Ok(Catchment {
        area_ha: conversion::to_base(QuantityKind::Area, args.area, &args.area_unit)?,
        runoff_coefficient: args.coefficient,
        rainfall_intensity_mm_per_hr: args.intensity,
    })
}

fn render<T: serde::Serialize>(
    format: OutputFormat,
    value: &T,
    text: fn(&T) -> String,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Toml => Ok(toml::to_string_pretty(value)?),
    }
}
