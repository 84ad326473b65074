//! Literal subcommand - decode a Python literal into JSON

use std::io::Read;

use alexfetch_core::decode_literal;
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct LiteralArgs {
    /// Literal text, or "-" to read stdin
    pub text: String,

    /// Print the Python repr of the decoded value instead of JSON
    #[arg(long)]
    pub repr: bool,
}

pub fn run(args: LiteralArgs) -> Result<()> {
    let text = if args.text == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read literal from stdin")?;
        buf
    } else {
        args.text
    };

    match decode_literal(&text) {
        Some(value) if args.repr => println!("{value}"),
        Some(value) => println!("{}", serde_json::to_string(&value.to_json())?),
        None => {
            log::warn!("Not a valid literal, printing null");
            println!("null");
        }
    }
    Ok(())
}
