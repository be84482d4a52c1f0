//! Mix a set of stored recordings into one file.
//!
//! ```text
//! reprise-mix request.json --store ./store
//! ```
//!
//! The request names the recordings, their offsets and the mix options. The
//! mix is written to `<store>/mixes/<id>.<ext>` and a JSON summary is printed.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reprise::prelude::*;
use reprise::{select_recordings, SegmentNote};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reprise-mix", version, about = "Mix stored recordings into one file")]
struct Args {
    /// JSON mix request
    request: PathBuf,

    /// Root directory of the object store
    #[arg(long)]
    store: PathBuf,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MixRequest {
    recordings: Vec<FragmentSpec>,
    #[serde(default)]
    options: MixOptions,
    /// Keep one randomly chosen recording per segment
    #[serde(default)]
    one_per_segment: bool,
    seed: Option<u64>,
    /// Replace missing recordings with synthesized segment audio
    #[serde(default)]
    fill_missing: bool,
    /// Notes per segment id, used when `fill_missing` is set
    #[serde(default)]
    segments: HashMap<String, Vec<SegmentNote>>,
}

fn run(args: Args) -> reprise::Result<serde_json::Value> {
    let request: MixRequest = serde_json::from_slice(&std::fs::read(&args.request)?)?;

    let recordings = if request.one_per_segment {
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        select_recordings(&request.recordings, &mut rng)
    } else {
        request.recordings
    };

    let policy = if request.fill_missing {
        FragmentPolicy::fill_missing(SynthFallback::new(request.segments))
    } else {
        FragmentPolicy::Strict
    };

    let store = FsStore::new(&args.store);
    let engine = MixEngine::builder()
        .settings(EngineSettings::from_env()?)
        .source(store.clone())
        .fragment_policy(policy)
        .build()?;

    let outcome = engine.mix_and_store(&recordings, &request.options, &store)?;
    let result = outcome.result();

    Ok(serde_json::json!({
        "id": outcome.id(),
        "key": outcome.key(),
        "existing": outcome.is_existing(),
        "durationSeconds": result.map(|r| r.duration_seconds),
        "isPartial": result.map(|r| r.is_partial),
    }))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "mix failed");
            eprintln!("reprise-mix: {}", e);
            ExitCode::FAILURE
        }
    }
}
