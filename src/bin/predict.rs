//! One-shot prediction from the command line.
//!
//! # Usage
//!
//! ```bash
//! predict glucose=148 bmi=33.6 ... [--model <path>]
//! echo '{"pregnancies":6,...}' | predict [--model <path>]
//! ```
//!
//! Prints one JSON object on stdout. Exit codes: 0 success, 2 invalid input,
//! 3 model unavailable, 1 anything else.

use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;

use glucosense::adapters::logistic::JsonModelStore;
use glucosense::config::{AppConfig, LogMode};
use glucosense::domain::{DiabetesLabel, PatientReading, RiskBand};
use glucosense::ports::ModelStore;
use glucosense::{logging, InferenceAdapter, InferenceError};

const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_MODEL_UNAVAILABLE: u8 = 3;

#[derive(Debug, Serialize)]
struct PredictionOutput {
    label: DiabetesLabel,
    risk_probability: f64,
    risk_band: RiskBand,
}

#[derive(Debug, Default)]
struct Args {
    help: bool,
    model: Option<PathBuf>,
    fields: Vec<(String, String)>,
}

fn usage() -> String {
    "Usage: predict [field=value ...] [--model <path>]\n\
     With no fields, one JSON reading is read from stdin."
        .to_string()
}

fn parse_args<I>(args: I) -> Result<Args, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => {
                let v = args.next().ok_or_else(usage)?;
                parsed.model = Some(PathBuf::from(v));
            }
            "-h" | "--help" => {
                parsed.help = true;
                return Ok(parsed);
            }
            _ => {
                let (name, value) = arg
                    .split_once('=')
                    .ok_or_else(|| format!("Expected field=value, got '{arg}'\n{}", usage()))?;
                parsed.fields.push((name.to_string(), value.to_string()));
            }
        }
    }

    Ok(parsed)
}

fn read_stdin_reading() -> anyhow::Result<PatientReading> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    serde_json::from_str(&input).context("Invalid reading JSON")
}

fn main() -> ExitCode {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };
    if args.help {
        println!("{}", usage());
        return ExitCode::SUCCESS;
    }

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    // Stdout carries the JSON result.
    config.log.mode = LogMode::Stderr;
    if let Some(model) = args.model.clone() {
        config.model_path = model;
    }

    let _guard = match logging::init(&config.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store = match &config.model_sha256 {
        Some(digest) => JsonModelStore::new().with_expected_sha256(digest.as_str()),
        None => JsonModelStore::new(),
    };
    let adapter = InferenceAdapter::from_load(store.load(&config.model_path));

    // Reported ahead of any input problem, and before stdin is consumed.
    if let Some(reason) = adapter.unavailable_reason() {
        eprintln!("Error: {}", InferenceError::ModelUnavailable(reason.to_string()));
        return ExitCode::from(EXIT_MODEL_UNAVAILABLE);
    }

    let outcome = if args.fields.is_empty() {
        read_stdin_reading()
            .map_err(|e| InferenceError::InvalidInput(format!("{e:#}")))
            .and_then(|reading| adapter.infer(&reading))
    } else {
        adapter.infer_fields(
            args.fields
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    };

    match outcome {
        Ok(result) => {
            let output = PredictionOutput {
                label: result.label,
                risk_probability: result.risk_probability,
                risk_band: result.risk_band(),
            };
            match serde_json::to_string(&output) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e @ InferenceError::InvalidInput(_)) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_INVALID_INPUT)
        }
        Err(e @ InferenceError::ModelUnavailable(_)) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_MODEL_UNAVAILABLE)
        }
    }
}
