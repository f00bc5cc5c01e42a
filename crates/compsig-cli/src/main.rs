//! compsig CLI - normalise, digest, sign and verify component descriptors.

use clap::{Parser, Subcommand};

mod commands;
mod descriptor_io;
mod output;

use commands::{add_digests, canonicalize, digest, sign, verify};

#[derive(Parser)]
#[command(name = "compsig")]
#[command(about = "Component descriptor normalisation, signing and verification CLI")]
struct Cli {
    /// Enable debug logging (overridden by COMPSIG_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical bytes of a descriptor
    Canonicalize {
        /// Descriptor JSON file (or stdin if not provided)
        descriptor: Option<String>,
    },
    /// Print the digest of a normalised descriptor
    Digest {
        /// Descriptor JSON file (or stdin if not provided)
        descriptor: Option<String>,
        /// Hash algorithm
        #[arg(long, default_value = "sha256")]
        hash: String,
    },
    /// Fill in and check element digests from a digest map
    AddDigests {
        /// Descriptor JSON file
        descriptor: String,
        /// JSON file mapping element names to digests
        #[arg(long)]
        digests: String,
        /// Write the updated descriptor here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
    /// Sign a descriptor with an RSA private key
    Sign {
        /// Descriptor JSON file
        descriptor: String,
        /// PEM encoded RSA private key (PKCS#1 or PKCS#8)
        #[arg(long)]
        private_key: String,
        /// Signature name
        #[arg(long)]
        name: String,
        /// Hash algorithm
        #[arg(long, default_value = "sha256")]
        hash: String,
        /// Signature value encoding
        #[arg(long, value_enum, default_value_t = sign::MediaType::Hex)]
        media_type: sign::MediaType,
        /// Write the signed descriptor here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
    /// Verify a named signature with an RSA public key
    Verify {
        /// Descriptor JSON file
        descriptor: String,
        /// PEM encoded RSA public key (SPKI or PKCS#1)
        #[arg(long)]
        public_key: String,
        /// Signature name
        #[arg(long)]
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("COMPSIG_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Canonicalize { descriptor } => canonicalize::run(descriptor),
        Commands::Digest { descriptor, hash } => digest::run(descriptor, hash),
        Commands::AddDigests {
            descriptor,
            digests,
            out,
        } => add_digests::run(descriptor, digests, out),
        Commands::Sign {
            descriptor,
            private_key,
            name,
            hash,
            media_type,
            out,
        } => sign::run(descriptor, private_key, name, hash, media_type, out),
        Commands::Verify {
            descriptor,
            public_key,
            name,
            json,
        } => verify::run(descriptor, public_key, name, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
