use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use hashnest::crypto::{ALGORITHM_ID, ARGON2_VERSION};
use hashnest::{HashConfig, HashParams, Hasher, KdfParams, decode};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB (default: 65536)
    #[arg(long = "argon-mem", global = true, env = "HASHNEST_ARGON_MEM")]
    memory_kib: Option<u32>,

    /// Argon2 time cost / iterations (default: 3)
    #[arg(long = "argon-time", global = true, env = "HASHNEST_ARGON_TIME")]
    iterations: Option<u32>,

    /// Argon2 parallelism, 1-255 (default: 1)
    #[arg(long = "argon-parallelism", global = true, env = "HASHNEST_ARGON_PARALLELISM")]
    parallelism: Option<u8>,

    /// Salt length in bytes (default: 16)
    #[arg(long, global = true, env = "HASHNEST_SALT_LEN")]
    salt_len: Option<usize>,

    /// Derived key length in bytes (default: 32)
    #[arg(long, global = true, env = "HASHNEST_KEY_LEN")]
    key_len: Option<usize>,

    /// Largest memory cost in KiB a stored hash may demand (default: 1048576)
    #[arg(long = "max-memory", global = true, env = "HASHNEST_MAX_MEMORY")]
    max_memory_kib: Option<u32>,
}

impl Argon2Args {
    fn apply(&self, base: HashConfig) -> Result<HashConfig> {
        let kdf = base.kdf();

        let kdf = KdfParams::new(
            self.memory_kib.unwrap_or(kdf.memory_kib()),
            self.iterations.unwrap_or(kdf.iterations()),
            self.parallelism.unwrap_or(kdf.parallelism()),
        )?;

        let max_memory_kib = self
            .max_memory_kib
            .unwrap_or(base.max_memory_kib().max(kdf.memory_kib()));

        HashConfig::new(
            kdf,
            self.salt_len.unwrap_or(base.salt_len()),
            self.key_len.unwrap_or(base.key_len()),
        )?
        .with_max_memory_kib(max_memory_kib)
    }
}

#[derive(Debug, Parser)]
#[command(name = "hashnest")]
#[command(version, about = "Argon2id password hashing with self-describing hash strings.")]
struct Cli {
    /// Path to a JSON hashing configuration file
    #[arg(long, global = true, value_name = "PATH", env = "HASHNEST_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    argon2: Argon2Args,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the encoded hash
    Hash,

    /// Checks a password against an encoded hash
    #[command(arg_required_else_help = true)]
    Verify { encoded: String },

    /// Shows the parameters stored in an encoded hash
    #[command(arg_required_else_help = true)]
    Inspect {
        encoded: String,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Shows the effective hashing configuration
    Config {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set up logging")
}

fn resolve_config(args: &Cli) -> Result<HashConfig> {
    let base = match &args.config {
        Some(path) => HashConfig::from_json_file(path)?,
        None => HashConfig::default(),
    };
    args.argon2.apply(base)
}

fn print_params(params: &HashParams) {
    println!("algorithm:   {ALGORITHM_ID}");
    println!("version:     {ARGON2_VERSION}");
    println!("memory_kib:  {}", params.memory_kib());
    println!("iterations:  {}", params.iterations());
    println!("parallelism: {}", params.parallelism());
    println!("salt_len:    {}", params.salt_len());
    println!("key_len:     {}", params.key_len());
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_logging(args.verbose)?;

    match &args.command {
        Commands::Hash => {
            let config = resolve_config(&args)?;
            let password = auth::read_new_password()?;
            let encoded = Hasher::new(config).hash(password.as_bytes())?;
            println!("{encoded}");
        }
        Commands::Verify { encoded } => {
            // only the memory limit applies; stored hashes carry their own parameters
            let hasher = Hasher::new(resolve_config(&args)?);
            let password = auth::read_password()?;
            match hasher.verify(password.as_bytes(), encoded) {
                Ok(true) => println!("password verified"),
                // the specific failure was already logged
                Ok(false) | Err(_) => bail!("authentication failed"),
            }
        }
        Commands::Inspect { encoded, json } => {
            let decoded = decode(encoded)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(decoded.params())?);
            } else {
                print_params(decoded.params());
            }
        }
        Commands::Config { json } => {
            let config = resolve_config(&args)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                let kdf = config.kdf();
                println!("memory_kib:  {}", kdf.memory_kib());
                println!("iterations:  {}", kdf.iterations());
                println!("parallelism: {}", kdf.parallelism());
                println!("salt_len:    {}", config.salt_len());
                println!("key_len:     {}", config.key_len());
                println!("max_memory:  {}", config.max_memory_kib());
            }
        }
    }

    Ok(())
}
