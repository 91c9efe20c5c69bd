use aeromatch::raster::io::load_raster;
use aeromatch::{MatchConfig, MatchMode, Matcher, RankedMatches, SearchParams};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "AeroMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for pipeline diagnostics.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Individual,
    HolisticFull,
    HolisticSimple,
}

impl From<ModeConfig> for MatchMode {
    fn from(value: ModeConfig) -> Self {
        match value {
            ModeConfig::Individual => MatchMode::Individual,
            ModeConfig::HolisticFull => MatchMode::HolisticFull,
            ModeConfig::HolisticSimple => MatchMode::HolisticSimple,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchConfigJson {
    min_scale: f32,
    max_scale: f32,
    scale_steps: usize,
    angle_step_deg: f32,
    translation_range: i32,
    translation_step: i32,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            min_scale: params.min_scale,
            max_scale: params.max_scale,
            scale_steps: params.scale_steps,
            angle_step_deg: params.angle_step_deg,
            translation_range: params.translation_range,
            translation_step: params.translation_step,
        }
    }
}

impl From<SearchConfigJson> for SearchParams {
    fn from(value: SearchConfigJson) -> Self {
        Self {
            min_scale: value.min_scale,
            max_scale: value.max_scale,
            scale_steps: value.scale_steps,
            angle_step_deg: value.angle_step_deg,
            translation_range: value.translation_range,
            translation_step: value.translation_step,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReferenceConfig {
    path: String,
    lat: Option<f64>,
    lon: Option<f64>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    query_path: String,
    references: Vec<ReferenceConfig>,
    output_path: Option<String>,
    mode: ModeConfig,
    threshold: f32,
    pattern_size: usize,
    min_score: f32,
    parallel: bool,
    search: SearchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = MatchConfig::default();
        Self {
            query_path: String::new(),
            references: Vec::new(),
            output_path: None,
            mode: ModeConfig::HolisticSimple,
            threshold: defaults.extractor.threshold,
            pattern_size: defaults.pattern_size,
            min_score: defaults.min_score,
            parallel: defaults.parallel,
            search: SearchConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    index: usize,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    score: f32,
    iou: f32,
    scale: f32,
    angle_deg: f32,
    tx: i32,
    ty: i32,
    featureless: bool,
    confident: bool,
}

#[derive(Debug, Serialize)]
struct Output {
    best_index: usize,
    best_score: f32,
    query_featureless: bool,
    matches: Vec<MatchRecord>,
}

fn to_output(ranked: RankedMatches, references: &[ReferenceConfig]) -> Output {
    let matches = ranked
        .per_reference
        .into_iter()
        .map(|outcome| {
            let reference = &references[outcome.index];
            MatchRecord {
                index: outcome.index,
                path: reference.path.clone(),
                lat: reference.lat,
                lon: reference.lon,
                description: reference.description.clone(),
                score: outcome.score,
                iou: outcome.iou,
                scale: outcome.transform.scale,
                angle_deg: outcome.transform.angle_deg,
                tx: outcome.transform.tx,
                ty: outcome.transform.ty,
                featureless: outcome.featureless,
                confident: outcome.confident,
            }
        })
        .collect();
    Output {
        best_index: ranked.best_index,
        best_score: ranked.best_score,
        query_featureless: ranked.query_featureless,
        matches,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("aeromatch=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.query_path.is_empty() {
        return Err("query_path must be set in the config".into());
    }
    if config.references.is_empty() {
        return Err("at least one reference must be listed in the config".into());
    }

    let match_config = MatchConfig {
        mode: config.mode.into(),
        extractor: aeromatch::ExtractorConfig {
            threshold: config.threshold,
            ..Default::default()
        },
        pattern_size: config.pattern_size,
        min_score: config.min_score,
        parallel: config.parallel,
        search: config.search.into(),
        ..MatchConfig::default()
    };
    let matcher = Matcher::new(match_config)?;

    let query = load_raster(&config.query_path)?;
    let mut tiles = Vec::with_capacity(config.references.len());
    for reference in &config.references {
        tiles.push(load_raster(&reference.path)?);
    }

    let ranked = matcher.match_rasters(&query, &tiles)?;
    let output = to_output(ranked, &config.references);
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
