use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use remote_memory::config::{load_config, validate_config, ConfigLoader};
use remote_memory::{Address, ElementWidth, ProcessId, RemoteMemory};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: remote-memory <pid> <address> <length> [data-size] [--json] [--config <path>]";

#[derive(Debug)]
struct Args {
    pid: ProcessId,
    address: Address,
    length: usize,
    width: ElementWidth,
    json: bool,
    config: Option<PathBuf>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut positional = Vec::new();
        let mut json = false;
        let mut config = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    config = Some(PathBuf::from(path));
                }
                "-h" | "--help" => bail!(USAGE),
                _ => positional.push(arg),
            }
        }

        if !(3..=4).contains(&positional.len()) {
            bail!(USAGE);
        }

        let pid = positional[0]
            .parse::<ProcessId>()
            .with_context(|| format!("invalid pid: {}", positional[0]))?;
        let address = Address::from_str(&positional[1])?;
        let length = positional[2]
            .parse::<usize>()
            .with_context(|| format!("invalid length: {}", positional[2]))?;
        let width = match positional.get(3) {
            Some(size) => {
                let size = size
                    .parse::<u32>()
                    .with_context(|| format!("invalid data size: {size}"))?;
                ElementWidth::try_from(size)?
            }
            None => ElementWidth::default(),
        };

        Ok(Args {
            pid,
            address,
            length,
            width,
            json,
            config,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => ConfigLoader::new(path)
            .load()
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => load_config()?,
    };
    validate_config(&config)?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "parsed arguments");
    info!(
        "remote-memory v{} on {}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    let memory = RemoteMemory::from_config(&config);

    if args.width == ElementWidth::B8 {
        let bytes = memory.read_memory(args.pid, args.address, args.length)?;
        if args.json {
            let output = json!({
                "pid": args.pid,
                "address": args.address.to_string(),
                "length": args.length,
                "data_size": u32::from(args.width),
                "values": bytes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_hex_dump(args.address, &bytes);
        }
    } else {
        let values =
            memory.read_memory_with_data_size(args.pid, args.address, args.length, args.width)?;
        if args.json {
            let output = json!({
                "pid": args.pid,
                "address": args.address.to_string(),
                "length": args.length,
                "data_size": u32::from(args.width),
                "values": values,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            let digits = args.width.bytes() * 2;
            for (index, value) in values.iter().enumerate() {
                let offset = (index * args.width.bytes()) as u64;
                println!(
                    "{:016X}: {:0digits$X}",
                    args.address.as_u64().wrapping_add(offset),
                    value,
                    digits = digits
                );
            }
        }
    }

    Ok(())
}

/// Prints 16 bytes per line, prefixed with their address
fn print_hex_dump(base: Address, bytes: &[u8]) {
    for (line, chunk) in bytes.chunks(16).enumerate() {
        let offset = (line * 16) as u64;
        println!(
            "{:016X}: {}",
            base.as_u64().wrapping_add(offset),
            hex::encode_upper(chunk)
        );
    }
}
