//! Development token issuer.
//!
//! Signs a bearer token with the server's `JWT_SECRET` so the API can be
//! exercised without an identity provider. The lifetime defaults to
//! `JWT_EXPIRATION`.
//!
//! Usage:
//!   issue-token --sub 42 --role instructor [--expires-in 600]

use clap::Parser;
use lms_backend::config::Config;
use lms_backend::utils::jwt::{Role, sign_jwt};

#[derive(Parser, Debug)]
#[command(name = "issue-token")]
#[command(about = "Sign a bearer token for local testing")]
struct Args {
    /// Subject (user id) to put in the token
    #[arg(long)]
    sub: String,

    /// Role: student, instructor or admin
    #[arg(long, default_value_t = Role::Student)]
    role: Role,

    /// Lifetime in seconds (defaults to JWT_EXPIRATION)
    #[arg(long)]
    expires_in: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::from_env()?;

    let lifetime = args.expires_in.unwrap_or(config.jwt_expiration);
    let token = sign_jwt(&args.sub, args.role, &config.jwt_secret, lifetime)?;
    println!("{}", token);
    Ok(())
}
