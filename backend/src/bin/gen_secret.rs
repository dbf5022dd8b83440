//! Credential provisioning tool.
//!
//! Prints one random secret suitable for `JWT_SECRET` and similar keys.
//!
//! Usage:
//!   gen-secret [--bytes 64] [--format hex|base64] [--env-name JWT_SECRET]

use clap::Parser;
use lms_backend::secret::{MIN_SECRET_BYTES, SecretFormat, generate_secret};

#[derive(Parser, Debug)]
#[command(name = "gen-secret")]
#[command(about = "Generate a random secret from the OS random number generator")]
struct Args {
    /// Number of random bytes
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u16).range(MIN_SECRET_BYTES as i64..))]
    bytes: u16,

    /// Output encoding: hex or base64
    #[arg(long, default_value_t = SecretFormat::Hex)]
    format: SecretFormat,

    /// Print as NAME=<secret> for pasting into a .env file
    #[arg(long)]
    env_name: Option<String>,
}

fn main() {
    let args = Args::parse();
    let secret = generate_secret(usize::from(args.bytes), args.format);

    match args.env_name {
        Some(name) => println!("{}={}", name, secret),
        None => println!("{}", secret),
    }
}
