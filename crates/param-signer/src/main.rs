use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use param_signer::keys::read_pem_file;
use param_signer::{
    Ed25519Signer, HmacSigner, ParameterMap, RequestSigner, RsaSigner, encode_parameters,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, ValueEnum)]
enum SigningAlgorithm {
    Hmac,
    Ed25519,
    Rsa,
}

#[derive(Parser)]
#[clap(name = "param-signer", about = "Sign and verify API request parameters")]
struct Args {
    #[clap(long, env = "SIGNER_ALGORITHM", default_value = "hmac")]
    algorithm: SigningAlgorithm,
    #[clap(long, env = "SIGNER_API_KEY", default_value = "")]
    api_key: String,
    #[clap(long, env = "SIGNER_API_SECRET", hide_env_values = true)]
    secret: Option<String>,
    #[clap(long, env = "SIGNER_PUBLIC_KEY")]
    public_key: Option<PathBuf>,
    #[clap(long, env = "SIGNER_PRIVATE_KEY")]
    private_key: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parameters with a `signature` field added.
    Sign {
        /// JSON object of parameters; read from stdin when omitted.
        #[clap(long)]
        params: Option<String>,
    },
    /// Check the `signature` field. Exits with 1 when it does not match.
    Verify {
        #[clap(long)]
        params: Option<String>,
    },
    /// Print the canonical string that would be signed.
    Encode {
        #[clap(long)]
        params: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match &args.command {
        Command::Sign { params } => {
            let signer = build_signer(&args)?;
            let signed = signer.sign_parameters(&read_params(params.as_deref())?)?;
            println!("{}", serde_json::to_string(&signed)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { params } => {
            let signer = build_signer(&args)?;
            if signer.validate_signature_params(&read_params(params.as_deref())?) {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Encode { params } => {
            println!("{}", encode_parameters(&read_params(params.as_deref())?)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_signer(args: &Args) -> Result<Box<dyn RequestSigner>> {
    let signer: Box<dyn RequestSigner> = match args.algorithm {
        SigningAlgorithm::Hmac => {
            let secret = args
                .secret
                .as_deref()
                .context("--secret (or SIGNER_API_SECRET) is required for HMAC signing")?;
            Box::new(HmacSigner::new(&args.api_key, secret))
        }
        SigningAlgorithm::Ed25519 => {
            let (public_pem, private_pem) = read_key_pair(args)?;
            Box::new(
                Ed25519Signer::from_pem(&args.api_key, &public_pem, &private_pem)
                    .context("loading Ed25519 key pair")?,
            )
        }
        SigningAlgorithm::Rsa => {
            let (public_pem, private_pem) = read_key_pair(args)?;
            Box::new(
                RsaSigner::from_pem(&args.api_key, &public_pem, &private_pem)
                    .context("loading RSA key pair")?,
            )
        }
    };
    Ok(signer)
}

fn read_key_pair(args: &Args) -> Result<(String, String)> {
    let public_path = args
        .public_key
        .as_ref()
        .context("--public-key (or SIGNER_PUBLIC_KEY) is required")?;
    let private_path = args
        .private_key
        .as_ref()
        .context("--private-key (or SIGNER_PRIVATE_KEY) is required")?;
    Ok((read_pem_file(public_path)?, read_pem_file(private_path)?))
}

fn read_params(inline: Option<&str>) -> Result<ParameterMap> {
    let raw = match inline {
        Some(raw) => raw.to_owned(),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading parameters from stdin")?;
            raw
        }
    };
    parse_params(&raw)
}

fn parse_params(raw: &str) -> Result<ParameterMap> {
    match serde_json::from_str::<serde_json::Value>(raw).context("parsing parameters as JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object of parameters, got {other}"),
    }
}
