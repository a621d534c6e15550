//! Re-encode a model artifact between the JSON and binary formats.
//!
//! The format of each side is chosen from its file extension, with the same
//! rule the server's loader uses.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use model_server::loader::{read_artifact, write_artifact, ArtifactFormat};

#[derive(Parser)]
#[command(about = "Convert a model artifact between JSON and binary encodings")]
struct Args {
    /// Artifact to read
    input: PathBuf,

    /// Artifact to write
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    serving_core::init_tracing("model_convert");
    let args = Args::parse();

    let artifact = read_artifact(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    artifact
        .validate()
        .with_context(|| format!("{} is not a usable model", args.input.display()))?;

    write_artifact(&args.output, &artifact)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(
        kind = artifact.kind(),
        from = ?ArtifactFormat::from_path(&args.input),
        to = ?ArtifactFormat::from_path(&args.output),
        output = %args.output.display(),
        "Converted model artifact"
    );
    Ok(())
}
