//! Decode or encode CIP path segments from the command line.
//!
//! Usage:
//!   decode_epath [--padded] [--kind=path|port|data] HEX...
//!   decode_epath [--padded] --encode "Class:4 Instance:1"
//!
//! Hex arguments are joined, so `20 04 24 01` and `20042401` are the same input.
//! With `--kind=path` (default) the input is decoded as a chain of application paths,
//! each inheriting from the one before, and any trailing bytes are reported.
//!
//! Set `RUST_LOG=cip_epath=trace` to see boundary and inheritance decisions.

use anyhow::{bail, Context};
use cip_epath::{parse_app_path, EpathFormat, PathCodec, PortSegmentGroup, SimpleDataSegment};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Path,
    Port,
    Data,
}

fn parse_kind(arg: &str) -> anyhow::Result<Kind> {
    match arg {
        "path" => Ok(Kind::Path),
        "port" => Ok(Kind::Port),
        "data" => Ok(Kind::Data),
        other => bail!("unknown kind {:?} (expected path, port or data)", other),
    }
}

fn print_trailing(input: &[u8], consumed: usize) {
    if consumed < input.len() {
        println!("  rest {:>3}..{:<3} {}", consumed, input.len(), hex::encode(&input[consumed..]));
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let padded = if let Some(pos) = args.iter().position(|a| a == "--padded") {
        args.remove(pos);
        true
    } else {
        false
    };
    let kind = match args.iter().position(|a| a.starts_with("--kind=")) {
        Some(pos) => {
            let arg = args.remove(pos);
            parse_kind(arg.trim_start_matches("--kind="))?
        }
        None => Kind::Path,
    };
    let encode = args.iter().position(|a| a == "--encode").map(|pos| {
        args.remove(pos);
        args.join(" ")
    });

    let codec = PathCodec::new(if padded { EpathFormat::Padded } else { EpathFormat::Packed });

    if let Some(text) = encode {
        let path = parse_app_path(&text)?;
        println!("{}", hex::encode(codec.app_path_to_bytes(&path)));
        return Ok(());
    }

    if args.is_empty() {
        bail!("usage: decode_epath [--padded] [--kind=path|port|data] HEX... | --encode TEXT");
    }
    let joined: String = args.concat().split_whitespace().collect();
    let input = hex::decode(&joined).with_context(|| format!("invalid hex {:?}", joined))?;

    match kind {
        Kind::Path => {
            let chain = codec.decode_chain(&input)?;
            for c in &chain {
                println!("  path {:>3}..{:<3} {}", c.range.start, c.range.end, c.path);
            }
            print_trailing(&input, chain.last().map(|c| c.range.end).unwrap_or(0));
        }
        Kind::Port => {
            let (group, consumed) = PortSegmentGroup::decode(&input)?;
            println!("  port {:>3}..{:<3} {}", 0, consumed, group);
            print_trailing(&input, consumed);
        }
        Kind::Data => {
            let (seg, consumed) = SimpleDataSegment::decode(&input)?;
            println!("  data {:>3}..{:<3} {}", 0, consumed, seg);
            print_trailing(&input, consumed);
        }
    }
    Ok(())
}
