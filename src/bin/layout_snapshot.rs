use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use timeline_layout::api::{FrameInput, LayoutConfig, TimelineEngine};
use timeline_layout::core::{Category, DateWindow, Event};
use timeline_layout::persistence::TimelineViewState;
use timeline_layout::render::NullRenderer;

const USAGE: &str = "usage: layout_snapshot --input <fixture.json> [--output <path>]";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFixture {
    events: Vec<Event>,
    #[serde(default)]
    categories: Vec<Category>,
    today: NaiveDate,
    #[serde(default)]
    window: Option<DateWindow>,
    /// Raw view state; validated the same way persisted state is.
    #[serde(default)]
    view: Option<serde_json::Value>,
    #[serde(default)]
    layout: Option<LayoutConfig>,
}

fn main() {
    let _ = timeline_layout::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;
    let fixture: LayoutFixture =
        serde_json::from_str(&raw).map_err(|err| format!("invalid fixture json: {err}"))?;

    let view = fixture
        .view
        .map(|value| TimelineViewState::from_json_or_default(&value.to_string()))
        .unwrap_or_default();
    let mut input = FrameInput::new(&fixture.events, &fixture.categories, fixture.today)
        .with_fitted_window()
        .with_view(view);
    if let Some(window) = fixture.window {
        input = input.with_window(window);
    }

    let engine = TimelineEngine::new(NullRenderer::default(), fixture.layout.unwrap_or_default())
        .map_err(|err| format!("invalid layout config: {err}"))?;
    let json = engine
        .frame_json_contract_v1_pretty(&input)
        .map_err(|err| err.to_string())?;

    match args.output {
        Some(path) => fs::write(&path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        input: input.ok_or_else(|| USAGE.to_owned())?,
        output,
    })
}
