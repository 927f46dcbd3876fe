//! Lodestar wallet command line.

mod commands;

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use lodestar_crypto::CipherScheme;
use lodestar_utils::{init_logging, LogFormat};
use lodestar_wallet_core::{ConfigError, VaultFactory, WalletConfig};

#[derive(Parser)]
#[command(name = "lodestar", about = "Lodestar wallet: keys, mnemonics and the encrypted vault")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "LODESTAR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding vault files.
    #[arg(long, env = "LODESTAR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Vault cipher: "legacy-cbc" or "aes-gcm".
    #[arg(long, env = "LODESTAR_CIPHER")]
    cipher: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LODESTAR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "LODESTAR_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Mnemonic utilities.
    Mnemonic {
        #[command(subcommand)]
        action: MnemonicAction,
    },
    /// Derive an account from a mnemonic (read from stdin when not in the environment).
    Derive {
        /// Account index n in m/44'/148'/n'.
        #[arg(long, default_value_t = 0)]
        account: u32,
        #[arg(long, env = "LODESTAR_MNEMONIC", hide_env_values = true)]
        mnemonic: Option<String>,
        #[arg(long, env = "LODESTAR_PASSPHRASE", hide_env_values = true, default_value = "")]
        passphrase: String,
        /// Also print the S… secret seed.
        #[arg(long)]
        show_secret: bool,
    },
    /// Raw encrypted vault access.
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
    /// Accounts recorded in the wallet vault.
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(clap::Subcommand)]
enum MnemonicAction {
    /// Generate a new mnemonic.
    New {
        /// 12 or 24 words (defaults to the configured strength).
        #[arg(long)]
        words: Option<usize>,
    },
}

#[derive(clap::Args)]
struct PinArg {
    #[arg(long, env = "LODESTAR_PIN", hide_env_values = true)]
    pin: Option<String>,
}

#[derive(clap::Subcommand)]
enum VaultAction {
    /// Encrypt stdin (or VALUE) into the vault at LOCATION.
    Put {
        #[arg(long)]
        location: String,
        #[command(flatten)]
        pin: PinArg,
        value: Option<String>,
    },
    /// Decrypt and print the vault at LOCATION.
    Get {
        #[arg(long)]
        location: String,
        #[command(flatten)]
        pin: PinArg,
    },
}

#[derive(clap::Subcommand)]
enum AccountAction {
    /// Derive an account and record it in the wallet vault.
    Add {
        #[arg(long, default_value = "")]
        label: String,
        /// Account index; defaults to the lowest unused one.
        #[arg(long)]
        index: Option<u32>,
        #[command(flatten)]
        pin: PinArg,
        #[arg(long, env = "LODESTAR_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
        #[arg(long, env = "LODESTAR_PASSPHRASE", hide_env_values = true, default_value = "")]
        passphrase: String,
    },
    /// List recorded accounts.
    List {
        #[command(flatten)]
        pin: PinArg,
    },
}

/// File config (if any) with CLI and env overrides applied. A config file
/// that cannot be loaded is reported and replaced by defaults.
fn load_config(cli: &Cli) -> anyhow::Result<(WalletConfig, Option<ConfigError>)> {
    let (mut config, load_error) = match cli.config {
        Some(ref path) => match WalletConfig::from_toml_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (WalletConfig::default(), Some(e)),
        },
        None => (WalletConfig::default(), None),
    };

    if let Some(ref dir) = cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(ref cipher) = cli.cipher {
        config.cipher = match cipher.as_str() {
            "legacy-cbc" => CipherScheme::LegacyCbc,
            "aes-gcm" => CipherScheme::AesGcm,
            other => anyhow::bail!("unknown cipher {other:?}, expected legacy-cbc or aes-gcm"),
        };
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.log_format = format.clone();
    }
    Ok((config, load_error))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, load_error) = load_config(&cli)?;
    init_logging(LogFormat::parse(&config.log_format), &config.log_level);
    match (&cli.config, load_error) {
        (Some(path), None) => tracing::info!("Loaded config from {}", path.display()),
        (_, Some(e)) => tracing::warn!("{e}, using defaults"),
        (None, None) => {}
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Mnemonic { action } => match action {
            MnemonicAction::New { words } => {
                let strength = commands::strength_from_words(words, &config)?;
                commands::mnemonic_new(strength, &mut out)?;
            }
        },
        Command::Derive {
            account,
            mnemonic,
            passphrase,
            show_secret,
        } => {
            let phrase = commands::secret_or_line(mnemonic, "mnemonic", &mut input)?;
            commands::derive(&config, &phrase, &passphrase, account, show_secret, &mut out)?;
        }
        Command::Vault { action } => {
            let factory = VaultFactory::new(&config, commands::open_store(&config));
            match action {
                VaultAction::Put {
                    location,
                    pin,
                    value,
                } => {
                    let pin = commands::secret_or_line(pin.pin, "PIN", &mut input)?;
                    let data = match value {
                        Some(value) => value.into_bytes(),
                        None => {
                            let mut buf = Vec::new();
                            input.read_to_end(&mut buf)?;
                            buf
                        }
                    };
                    commands::vault_put(&factory, &config, &location, &pin, &data)?;
                }
                VaultAction::Get { location, pin } => {
                    let pin = commands::secret_or_line(pin.pin, "PIN", &mut input)?;
                    commands::vault_get(&factory, &config, &location, &pin, &mut out)?;
                }
            }
        }
        Command::Account { action } => {
            let factory = VaultFactory::new(&config, commands::open_store(&config));
            match action {
                AccountAction::Add {
                    label,
                    index,
                    pin,
                    mnemonic,
                    passphrase,
                } => {
                    let pin = commands::secret_or_line(pin.pin, "PIN", &mut input)?;
                    commands::account_add(
                        &factory,
                        &config,
                        &pin,
                        &mnemonic,
                        &passphrase,
                        index,
                        &label,
                        &mut out,
                    )?;
                }
                AccountAction::List { pin } => {
                    let pin = commands::secret_or_line(pin.pin, "PIN", &mut input)?;
                    commands::account_list(&factory, &config, &pin, &mut out)?;
                }
            }
        }
    }

    Ok(())
}
