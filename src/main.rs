use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use certaide::authority::{self, CertificateAuthority};
use certaide::config::CertConfig;
use certaide::fs;
use certaide::local::list_local_identities;

#[derive(Parser)]
#[command(name = "certaide", about = "Private root CA and leaf certificate issuer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new self-signed root CA
    Root {
        /// Where to write the root certificate
        #[arg(long, default_value = "root.pem")]
        cert: PathBuf,

        /// Where to write the root private key (PKCS#8)
        #[arg(long, default_value = "root.key")]
        key: PathBuf,
    },

    /// Issue a server certificate signed by an existing root
    Leaf {
        /// Root certificate (PEM or DER)
        #[arg(long, default_value = "root.pem")]
        ca_cert: PathBuf,

        /// Root private key (PKCS#8 or PKCS#1, PEM or DER)
        #[arg(long, default_value = "root.key")]
        ca_key: PathBuf,

        /// Where to write the server certificate
        #[arg(long, default_value = "server.pem")]
        cert: PathBuf,

        /// Where to write the server private key
        #[arg(long, default_value = "server.key")]
        key: PathBuf,

        /// IPs, DNS names, emails or URIs. Defaults to this machine's addresses.
        hosts: Vec<String>,
    },

    /// Print the validity, subject, SANs and serial of a certificate
    Inspect {
        /// Certificate file (PEM or DER)
        path: PathBuf,

        /// Also check the signature against this CA certificate
        #[arg(long)]
        ca: Option<PathBuf>,
    },
}

fn main() {
    // Initialize tracing (controlled by RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CertConfig::default();

    let result = match cli.command {
        Commands::Root { cert, key } => run_root(&config, &cert, &key),
        Commands::Leaf {
            ca_cert,
            ca_key,
            cert,
            key,
            hosts,
        } => run_leaf(&config, &ca_cert, &ca_key, &cert, &key, hosts),
        Commands::Inspect { path, ca } => run_inspect(&path, ca.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run_root(config: &CertConfig, cert: &Path, key: &Path) -> Result<()> {
    let ca = CertificateAuthority::generate_root(config)?;
    fs::write_pem(cert, &ca.certificate_pem()?)?;
    fs::write_secret_file(key, ca.private_key_pem()?.as_bytes())?;
    println!("Root certificate: {}", cert.display());
    println!("Root key:         {}", key.display());
    Ok(())
}

fn run_leaf(
    config: &CertConfig,
    ca_cert: &Path,
    ca_key: &Path,
    cert: &Path,
    key: &Path,
    hosts: Vec<String>,
) -> Result<()> {
    let hosts = if hosts.is_empty() {
        let local = list_local_identities();
        if local.is_empty() {
            bail!("no hosts given and no local addresses found");
        }
        local
    } else {
        hosts
    };

    let ca = CertificateAuthority::load(&fs::read_file(ca_cert)?, &fs::read_file(ca_key)?)
        .with_context(|| format!("loading CA from {}", ca_cert.display()))?;
    let leaf = ca.issue_leaf(&hosts, config)?;

    fs::write_pem(cert, &leaf.certificate_pem)?;
    fs::write_secret_file(key, leaf.private_key_pem.as_bytes())?;

    let details = authority::inspect(leaf.certificate_pem.as_bytes())?;
    println!("Certificate: {}", cert.display());
    println!("Key:         {}", key.display());
    println!("Hosts:       {}", hosts.join(", "));
    println!("Expires:     {}", details.not_after);
    Ok(())
}

fn run_inspect(path: &Path, ca: Option<&Path>) -> Result<()> {
    let certificate = fs::read_certificate(path)?;
    let details = certificate.details()?;

    println!("Subject:    CN={}", details.subject.common_name);
    println!("Issuer:     CN={}", details.issuer.common_name);
    println!("Serial:     {}", details.serial_hex());
    println!("Not before: {}", details.not_before);
    println!("Not after:  {}", details.not_after);
    println!("CA:         {}", details.is_ca);
    for san in &details.san {
        println!("SAN:        {san}");
    }

    if let Some(ca) = ca {
        certificate.verify_issued_by(&fs::read_certificate(ca)?)?;
        println!("Signature:  verified against {}", ca.display());
    }
    Ok(())
}
