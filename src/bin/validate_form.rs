//! Validates a form payload against one of the onboarding schemas.
//!
//! Usage: `validate_form <contrato|endereco|pessoa> [FILE]`
//!
//! Reads the JSON object from FILE (or stdin) and prints the parsed object,
//! or the field errors with exit code 1.

use anyhow::Context;
use rust_contratos_core::form_schemas::{schema_by_name, FORM_NAMES};
use rust_contratos_core::obs::init_tracing;
use serde_json::json;
use std::io::Read;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let usage = format!("Usage: validate_form <{}> [FILE]", FORM_NAMES.join("|"));

    let form = args.next().ok_or_else(|| anyhow::anyhow!(usage.clone()))?;
    let schema = schema_by_name(&form)
        .ok_or_else(|| anyhow::anyhow!("Unknown form '{}'. {}", form, usage))?;

    let raw = match args.next() {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let input: serde_json::Value =
        serde_json::from_str(&raw).context("Input is not valid JSON")?;

    match schema.validate(&input) {
        Ok(parsed) => {
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        Err(errors) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "errors": errors }))?
            );
            std::process::exit(1);
        }
    }
}
