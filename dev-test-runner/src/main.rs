//! Conformance pass over the built-in sample codecs.
//!
//! For every sample: derive its schema, check the structural rules, encode each
//! host value and validate it against both the derived schema and the schema
//! read back from its own wire document.
use anyhow::{Context, Result, bail};
use colored::Colorize;

use codec_schema::{catalog, check, derive_schema, wire};

fn run_sample(sample: &catalog::Sample) -> Result<()> {
    let schema = derive_schema(&sample.codec).context("derivation failed")?;
    if let Some(violation) = schema.well_formedness_violations().first() {
        bail!("derived schema is not well formed: {violation}");
    }
    let document = wire::to_document(&schema);
    let reparsed = wire::from_document(&document).context("wire document does not parse back")?;
    for host in &sample.hosts {
        let encoded = sample.codec.encode(host).with_context(|| format!("cannot encode {host}"))?;
        check(&encoded, &schema).with_context(|| format!("derived schema rejects {encoded}"))?;
        check(&encoded, &reparsed).with_context(|| format!("reparsed schema rejects {encoded}"))?;
    }
    Ok(())
}

fn main() {
    let samples = catalog::catalog();
    let mut failed = 0usize;
    for sample in &samples {
        match run_sample(sample) {
            Ok(()) => eprintln!("{} {}", "✅".green(), sample.name),
            Err(error) => {
                failed += 1;
                eprintln!("{} {}: {error:#}", "❌".red(), sample.name);
            }
        }
    }
    eprintln!("—— {} samples, {} failed ——", samples.len(), failed);
    if failed > 0 {
        std::process::exit(1);
    }
}
