//! Compute evenly spaced ring tokens.

use std::io::Write;

use anyhow::Result;
use cassandra_core::token::compute_tokens;
use structopt::StructOpt;

/// Compute evenly spaced ring tokens.
#[derive(StructOpt)]
#[structopt(name = "tokens")]
pub struct Tokens {
    /// The number of tokens to compute.
    #[structopt(short = "n", long)]
    count: usize,
}

impl Tokens {
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        for token in compute_tokens(self.count)? {
            writeln!(out, "{}", token)?;
        }
        Ok(())
    }
}
