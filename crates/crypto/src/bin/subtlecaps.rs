//! SubtleCaps CLI Tool
//!
//! Command-line interface for asking whether a WebCrypto operation is
//! supported for an algorithm, and for printing the family/operation matrix.
//!
//! Exit status: 0 when the query is supported, 2 when it is not, 1 on a
//! usage or configuration error.

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::process;
use subtlecaps_core::{logging, Config};
use subtlecaps_crypto::capability::{families, operations_of};
use subtlecaps_crypto::{AlgorithmInput, CapabilityResolver, SecondaryArg, Unsupported};
use tracing::debug;

const EXIT_UNSUPPORTED: i32 = 2;

/// JSON output for query command
#[derive(Debug, Serialize)]
struct QueryOutput<'a> {
    operation: &'a str,
    algorithm: Value,
    supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<Unsupported>,
}

/// JSON output for matrix command
#[derive(Debug, Serialize)]
struct MatrixRow {
    family: &'static str,
    operations: Vec<&'static str>,
}

#[derive(Debug, Default)]
struct QueryArgs {
    operation: String,
    algorithm: String,
    secondary: SecondaryArg,
    explain: bool,
    json: bool,
}

/// Quoted names and objects are JSON; anything else is a bare algorithm name.
fn parse_algorithm(raw: &str) -> AlgorithmInput {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::String(_) | Value::Object(_))) => AlgorithmInput::Json(value),
        _ => AlgorithmInput::Name(raw.to_string()),
    }
}

fn algorithm_json(input: &AlgorithmInput) -> Value {
    match input {
        AlgorithmInput::Name(name) => Value::String(name.clone()),
        AlgorithmInput::Json(value) => value.clone(),
        AlgorithmInput::Descriptor(desc) => Value::String(desc.family.name().to_string()),
    }
}

/// `null` means no length. Numbers the library would reject (negative,
/// fractional, too wide) are passed on as malformed so the query answers
/// `false`; only non-numbers are usage errors.
fn parse_length(raw: &str) -> Result<SecondaryArg> {
    if raw == "null" {
        return Ok(SecondaryArg::None);
    }
    if let Ok(bits) = raw.parse::<u32>() {
        return Ok(SecondaryArg::Length(bits));
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(SecondaryArg::Malformed),
        _ => bail!("Invalid --length value: {}", raw),
    }
}

fn cmd_query(resolver: &CapabilityResolver, args: QueryArgs) -> Result<bool> {
    let algorithm = parse_algorithm(&args.algorithm);
    let outcome = resolver.explain(&args.operation, &algorithm, &args.secondary);
    let supported = outcome.is_ok();

    debug!(operation = %args.operation, supported, "query evaluated");

    if args.json {
        let output = QueryOutput {
            operation: &args.operation,
            algorithm: algorithm_json(&algorithm),
            supported,
            reason: if args.explain { outcome.err() } else { None },
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match outcome {
            Ok(()) => println!("supported"),
            Err(reason) if args.explain => println!("unsupported: {}", reason),
            Err(_) => println!("unsupported"),
        }
    }

    Ok(supported)
}

fn cmd_matrix(json: bool) -> Result<()> {
    let rows: Vec<MatrixRow> = families()
        .map(|family| MatrixRow {
            family: family.name(),
            operations: operations_of(family).iter().map(|op| op.name()).collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!("{:<18} {}", row.family, row.operations.join(", "));
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(Config::default_config()),
    }
}

fn parse_query(args: &[String]) -> Result<(QueryArgs, Option<PathBuf>)> {
    let mut positional = Vec::new();
    let mut query = QueryArgs::default();
    let mut config = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--length" | "-l" => {
                i += 1;
                let raw = args.get(i).ok_or_else(|| anyhow!("Missing value for --length"))?;
                query.secondary = parse_length(raw)?;
            }
            "--target" | "-t" => {
                i += 1;
                let raw = args.get(i).ok_or_else(|| anyhow!("Missing value for --target"))?;
                query.secondary = SecondaryArg::target(parse_algorithm(raw));
            }
            "--config" | "-c" => {
                i += 1;
                let raw = args.get(i).ok_or_else(|| anyhow!("Missing value for --config"))?;
                config = Some(PathBuf::from(raw));
            }
            "--explain" | "-e" => query.explain = true,
            "--json" => query.json = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            value => positional.push(value.to_string()),
        }
        i += 1;
    }

    match <[String; 2]>::try_from(positional) {
        Ok([operation, algorithm]) => {
            query.operation = operation;
            query.algorithm = algorithm;
            Ok((query, config))
        }
        Err(_) => bail!("query takes exactly <operation> <algorithm>"),
    }
}

fn run(command: &str, args: &[String]) -> Result<bool> {
    match command {
        "query" => {
            let (query, config_path) = parse_query(args)?;
            let config = load_config(config_path)?;
            // A subscriber installed elsewhere is not an error for the CLI
            let _ = logging::init_with(&config.logging);

            let resolver = CapabilityResolver::new(config.resolver);
            cmd_query(&resolver, query)
        }
        "matrix" => {
            cmd_matrix(args.iter().any(|a| a == "--json"))?;
            Ok(true)
        }
        other => bail!("Unknown command: {}", other),
    }
}

fn print_usage() {
    println!("SubtleCaps - WebCrypto capability queries");
    println!();
    println!("USAGE:");
    println!("    subtlecaps query <operation> <algorithm> [--length <n> | --target <algorithm>]");
    println!("                     [--explain] [--json] [--config <file>]");
    println!("    subtlecaps matrix [--json]");
    println!();
    println!("COMMANDS:");
    println!("    query     Check one operation/algorithm pair");
    println!("    matrix    List the operations each algorithm family may appear under");
    println!();
    println!("EXAMPLES:");
    println!("    subtlecaps query sign Ed25519");
    println!("    subtlecaps query deriveBits '{{\"name\":\"HKDF\",\"hash\":\"SHA-256\",\"salt\":[],\"info\":[]}}' --length 256");
    println!("    subtlecaps query deriveKey '{{\"name\":\"HKDF\",\"hash\":\"SHA-256\",\"salt\":[],\"info\":[]}}' --target '{{\"name\":\"AES-GCM\",\"length\":256}}' --explain");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some((command, rest)) = args.split_first() else {
        eprintln!("Error: Usage: subtlecaps <command> [options]");
        println!();
        print_usage();
        process::exit(1);
    };

    if command == "--help" || command == "-h" || command == "help" {
        print_usage();
        return;
    }

    match run(command, rest) {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_UNSUPPORTED),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            println!();
            print_usage();
            process::exit(1);
        }
    }
}
