//! PRId command-line tool.
//!
//! Prints exactly one `0x`-prefixed hex line to stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Identifier for the direction 42 -> 478
//! prid derive --secret-key 0xc943... --public-key 0xd0d4... --from-id 42 --to-id 478
//!
//! # Keep the secret key out of the process arguments
//! PRID_SECRET_KEY=0xc943... prid context-secret --public-key 0xd0d4... --to-id 478
//!
//! # Identifier from a cached context secret
//! prid from-shared --context-secret 0x37cb... --from-id 42 --to-id 478
//! ```

use std::io::Write;

use clap::{Parser, Subcommand};
use prid_crypto::{
    CTX_CONNECTION, Context, ContextSecret, PridError, context_shared_secret, parse_id,
    prid_derive, prid_from_shared,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

/// Pairwise reproducible identifier tool
#[derive(Parser)]
#[command(name = "prid")]
#[command(about = "Derive pairwise reproducible identifiers from X25519 keys")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

// No Debug derives below: these structs hold secret key strings.
#[derive(Subcommand)]
enum Command {
    /// Derive the PRId for the direction from-id -> to-id
    Derive {
        #[command(flatten)]
        keys: KeyArgs,

        /// Id of the deriving direction's sender
        #[arg(long, value_parser = parse_id)]
        from_id: u64,

        /// Id of the deriving direction's receiver
        #[arg(long, value_parser = parse_id)]
        to_id: u64,

        /// Eight-byte context label
        #[arg(long, default_value_t = CTX_CONNECTION)]
        context: Context,
    },

    /// Derive the context shared secret toward to-id
    ContextSecret {
        #[command(flatten)]
        keys: KeyArgs,

        /// Id the secret is derived toward
        #[arg(long, value_parser = parse_id)]
        to_id: u64,

        /// Eight-byte context label
        #[arg(long, default_value_t = CTX_CONNECTION)]
        context: Context,
    },

    /// Derive a PRId from a previously derived context secret
    FromShared {
        /// Context shared secret as hex, optionally 0x-prefixed
        #[arg(long, env = "PRID_CONTEXT_SECRET", hide_env_values = true)]
        context_secret: String,

        /// Id of the deriving direction's sender
        #[arg(long, value_parser = parse_id)]
        from_id: u64,

        /// Id the context secret was derived toward
        #[arg(long, value_parser = parse_id)]
        to_id: u64,
    },
}

#[derive(clap::Args)]
struct KeyArgs {
    /// Own X25519 secret key as hex, optionally 0x-prefixed
    #[arg(long, env = "PRID_SECRET_KEY", hide_env_values = true)]
    secret_key: String,

    /// Peer X25519 public key as hex, optionally 0x-prefixed
    #[arg(long)]
    public_key: String,
}

/// Run one command and return the line to print.
fn run(command: Command) -> Result<Zeroizing<String>, PridError> {
    match command {
        Command::Derive { keys, from_id, to_id, context } => {
            let KeyArgs { secret_key, public_key } = keys;
            let secret_key = Zeroizing::new(secret_key);

            tracing::debug!(from_id, to_id, %context, "deriving PRId");
            let prid = prid_derive(secret_key.as_str(), public_key.as_str(), from_id, to_id, &context)?;

            Ok(Zeroizing::new(prid.to_string()))
        },
        Command::ContextSecret { keys, to_id, context } => {
            let KeyArgs { secret_key, public_key } = keys;
            let secret_key = Zeroizing::new(secret_key);

            tracing::debug!(to_id, %context, "deriving context secret");
            let secret =
                context_shared_secret(secret_key.as_str(), public_key.as_str(), to_id, &context)?;

            Ok(Zeroizing::new(secret.to_hex()))
        },
        Command::FromShared { context_secret, from_id, to_id } => {
            let context_secret = Zeroizing::new(context_secret);

            tracing::debug!(from_id, to_id, "deriving PRId from context secret");
            let secret = ContextSecret::from_hex(&context_secret)?;
            let prid = prid_from_shared(&secret, from_id, to_id)?;

            Ok(Zeroizing::new(prid.to_string()))
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let output = run(args.command).inspect_err(|e| tracing::error!(error = %e, "derivation failed"))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.as_str())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_SECRET: &str = "0xc9432ed5c0c5c24e8a4ff190619893918b4d1265a67d123895023fa7324b43e0";
    const BOB_PUBLIC: &str = "0xd0d4eb21db1df63369c147e63b2573816dd4b3fe513e95bf87f7ed1835407e62";

    fn run_args(args: &[&str]) -> Result<String, PridError> {
        let args = Args::try_parse_from(args).unwrap();
        run(args.command).map(|output| output.as_str().to_owned())
    }

    #[test]
    fn derive_command() {
        let output = run_args(&[
            "prid",
            "derive",
            "--secret-key",
            ALICE_SECRET,
            "--public-key",
            BOB_PUBLIC,
            "--from-id",
            "42",
            "--to-id",
            "478",
        ]);
        assert_eq!(output.unwrap(), "0xace4d2995b1a829c");
    }

    #[test]
    fn context_secret_command() {
        let output = run_args(&[
            "prid",
            "context-secret",
            "--secret-key",
            ALICE_SECRET,
            "--public-key",
            BOB_PUBLIC,
            "--to-id",
            "42",
            "--context",
            "PRIdCtx0",
        ]);
        assert_eq!(
            output.unwrap(),
            "0x32c45c49fcfe12f9db60e74fa66416c5a05832c298814d82032a6783a4b1fca0"
        );
    }

    #[test]
    fn from_shared_command() {
        let output = run_args(&[
            "prid",
            "from-shared",
            "--context-secret",
            "0x32c45c49fcfe12f9db60e74fa66416c5a05832c298814d82032a6783a4b1fca0",
            "--from-id",
            "478",
            "--to-id",
            "42",
        ]);
        assert_eq!(output.unwrap(), "0x1a53b02a26503600");
    }

    #[test]
    fn context_defaults_to_connection() {
        let args = Args::try_parse_from([
            "prid",
            "derive",
            "--secret-key",
            ALICE_SECRET,
            "--public-key",
            BOB_PUBLIC,
            "--from-id",
            "1",
            "--to-id",
            "2",
        ])
        .unwrap();

        let Command::Derive { context, .. } = args.command else {
            panic!("expected derive command");
        };
        assert_eq!(context, CTX_CONNECTION);
    }

    #[test]
    fn wrong_context_length_is_a_parse_error() {
        let result = Args::try_parse_from([
            "prid",
            "derive",
            "--secret-key",
            ALICE_SECRET,
            "--public-key",
            BOB_PUBLIC,
            "--from-id",
            "1",
            "--to-id",
            "2",
            "--context",
            "short",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn oversized_id_is_a_parse_error() {
        let result = Args::try_parse_from([
            "prid",
            "from-shared",
            "--context-secret",
            "0x00",
            "--from-id",
            "18446744073709551616",
            "--to-id",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn subkey_bound_is_enforced_at_run_time() {
        let output = run_args(&[
            "prid",
            "derive",
            "--secret-key",
            ALICE_SECRET,
            "--public-key",
            BOB_PUBLIC,
            "--from-id",
            "1",
            "--to-id",
            "9007199254740992",
        ]);
        assert!(matches!(output, Err(PridError::IdOutOfRange { .. })));
    }

    #[test]
    fn short_context_secret_is_rejected() {
        let output = run_args(&[
            "prid",
            "from-shared",
            "--context-secret",
            "0x00",
            "--from-id",
            "1",
            "--to-id",
            "2",
        ]);
        assert_eq!(output, Err(PridError::InvalidKeyLength { expected: 32, actual: 1 }));
    }
}
