//! Register two landmark lists from a job file and write an ITK affine transform.
//!
//! # Usage
//!
//! ```bash
//! register_landmarks job.yaml [affine.txt]
//! ```
//!
//! The job file (YAML or JSON, chosen by extension):
//!
//! ```yaml
//! moving: [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
//! fixed: [[5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [5.0, 1.0, 0.0]]
//! dof: Tx_Ty_Tz_Rx_Ry_Sz
//! output: affine.txt        # optional
//! diagnostics: sse.json     # optional
//! powell:                   # optional, any subset
//!   max_iter: 100000
//!   f_tol: 1.0e-8
//! ```

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::DVec3;
use serde::Deserialize;

use common::FileFormat;
use landmarks::{write_transform_file, PowellConfig, RegistrationConfig, Registrator};

const DEFAULT_OUTPUT: &str = "affine.txt";

#[derive(Debug, Deserialize)]
struct Job {
    moving: Vec<[f64; 3]>,
    fixed: Vec<[f64; 3]>,
    dof: String,
    #[serde(default)]
    output: Option<PathBuf>,
    #[serde(default)]
    diagnostics: Option<PathBuf>,
    #[serde(default)]
    powell: Option<PowellConfig>,
}

impl Job {
    fn load(path: &str) -> anyhow::Result<Self> {
        let format = FileFormat::from_file_name(path)
            .with_context(|| format!("Cannot tell job file format from '{}'", path))?;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file '{}'", path))?;
        common::deserialize(&text, format)
            .with_context(|| format!("Failed to parse job file '{}'", path))
    }

    fn moving_points(&self) -> Vec<DVec3> {
        self.moving.iter().copied().map(DVec3::from_array).collect()
    }

    fn fixed_points(&self) -> Vec<DVec3> {
        self.fixed.iter().copied().map(DVec3::from_array).collect()
    }

    fn config(&self) -> RegistrationConfig {
        RegistrationConfig {
            powell: self.powell.clone().unwrap_or_default(),
            ..RegistrationConfig::default()
        }
    }
}

fn run(job_path: &str, output_override: Option<&str>) -> anyhow::Result<()> {
    let job = Job::load(job_path)?;
    let moving = job.moving_points();
    let fixed = job.fixed_points();

    tracing::info!("Labels src: {:?}", job.moving);
    tracing::info!("Labels dest: {:?}", job.fixed);

    let config = job.config();
    config
        .check()
        .with_context(|| format!("Invalid powell settings in job file '{}'", job_path))?;
    let registrator = Registrator::new(config);
    let result = registrator
        .register(&moving, &fixed, &job.dof)
        .context("Registration failed")?;

    let transform = &result.transform;
    tracing::info!("Rotation matrix: {:?}", transform.rotation.as_array());
    tracing::info!("Scaling matrix: {:?}", transform.scaling.as_array());
    tracing::info!("Translation: {}", transform.translation);
    tracing::info!("Centroid: {}", transform.centroid);
    if result.diagnostics.budget_exceeded {
        tracing::warn!("Optimizer budget exhausted; the transform is the best point found");
    }

    let output = output_override
        .map(PathBuf::from)
        .or(job.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    write_transform_file(&output, transform)
        .with_context(|| format!("Failed to write transform to '{}'", output.display()))?;

    if let Some(path) = &job.diagnostics {
        write_diagnostics(path, &result.diagnostics)?;
    }

    println!(
        "SSE {:.6e} (RMS {:.6}) after {} iterations -> {}",
        result.diagnostics.sse,
        result.diagnostics.rms_error,
        result.diagnostics.iterations,
        output.display()
    );
    Ok(())
}

fn write_diagnostics(path: &Path, diagnostics: &landmarks::Diagnostics) -> anyhow::Result<()> {
    let text = common::serialize(diagnostics, FileFormat::Json)
        .context("Failed to serialize diagnostics")?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write diagnostics to '{}'", path.display()))?;
    tracing::info!("Wrote diagnostics {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <job.yaml|job.json> [output_transform.txt]", args[0]);
        std::process::exit(1);
    }

    common::log_setup::setup_logging("info", "register_landmarks")?;

    run(&args[1], args.get(2).map(String::as_str))
}
