//! Command handlers. Output goes to the supplied writer so tests can capture it.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use lodestar_crypto::{
    encode_public_key, encode_secret_seed, generate_mnemonic, mnemonic_to_seed, MnemonicStrength,
    OsEntropy,
};
use lodestar_store::{FileStore, KeyValueStore, MemoryStore};
use lodestar_wallet_core::{Vault, VaultFactory, WalletConfig, WalletMetadata};
use zeroize::Zeroizing;

/// File-backed store under `data_dir`, or an in-memory one if the directory
/// cannot be used. Nothing written to the fallback outlives the process.
pub fn open_store(config: &WalletConfig) -> Arc<dyn KeyValueStore> {
    match FileStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                data_dir = %config.data_dir.display(),
                "cannot use data directory ({e}), falling back to in-memory storage"
            );
            Arc::new(MemoryStore::new())
        }
    }
}

/// Use `value` if given, otherwise read one line from `input`.
pub fn secret_or_line(
    value: Option<String>,
    what: &str,
    input: &mut dyn BufRead,
) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = value {
        return Ok(Zeroizing::new(value));
    }
    let mut line = Zeroizing::new(String::new());
    input
        .read_line(&mut line)
        .with_context(|| format!("failed to read {what} from stdin"))?;
    let trimmed = Zeroizing::new(line.trim().to_string());
    if trimmed.is_empty() {
        bail!("no {what} given");
    }
    Ok(trimmed)
}

pub fn strength_from_words(
    words: Option<usize>,
    config: &WalletConfig,
) -> anyhow::Result<MnemonicStrength> {
    match words {
        None => Ok(config.mnemonic_strength),
        Some(12) => Ok(MnemonicStrength::Words12),
        Some(24) => Ok(MnemonicStrength::Words24),
        Some(n) => bail!("unsupported mnemonic length {n}, expected 12 or 24"),
    }
}

pub fn mnemonic_new(strength: MnemonicStrength, out: &mut dyn Write) -> anyhow::Result<()> {
    let phrase = generate_mnemonic(strength, &OsEntropy)?;
    writeln!(out, "{}", phrase.as_str())?;
    Ok(())
}

pub fn derive(
    config: &WalletConfig,
    phrase: &str,
    passphrase: &str,
    account: u32,
    show_secret: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let seed = mnemonic_to_seed(phrase, passphrase)?;
    let deriver = config.key_deriver();
    let keypair = deriver.account_keypair(seed.as_bytes(), account)?;

    writeln!(out, "path:       {}", deriver.account_path(account)?)?;
    writeln!(out, "account_id: {}", encode_public_key(&keypair.public))?;
    if show_secret {
        writeln!(out, "secret:     {}", encode_secret_seed(&keypair.private).as_str())?;
    }
    Ok(())
}

fn open_vault(
    factory: &VaultFactory,
    config: &WalletConfig,
    location: &str,
    pin: &str,
) -> anyhow::Result<Vault> {
    factory
        .open(location, pin, config.auto_lock())
        .with_context(|| format!("cannot open vault at {location:?}"))
}

pub fn vault_put(
    factory: &VaultFactory,
    config: &WalletConfig,
    location: &str,
    pin: &str,
    data: &[u8],
) -> anyhow::Result<()> {
    let vault = open_vault(factory, config, location, pin)?;
    vault.set_data(data)?;
    tracing::info!(location, bytes = data.len(), "stored vault payload");
    Ok(())
}

pub fn vault_get(
    factory: &VaultFactory,
    config: &WalletConfig,
    location: &str,
    pin: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let vault = open_vault(factory, config, location, pin)?;
    match vault.get_data()? {
        Some(data) => {
            let data = Zeroizing::new(data);
            out.write_all(&data)?;
            writeln!(out)?;
        }
        None => tracing::info!(location, "vault is empty"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn account_add(
    factory: &VaultFactory,
    config: &WalletConfig,
    pin: &str,
    phrase: &str,
    passphrase: &str,
    index: Option<u32>,
    label: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let vault = open_vault(factory, config, &config.vault_location, pin)?;
    let mut meta = WalletMetadata::load(&vault)?;
    let index = index.unwrap_or_else(|| meta.next_index());

    let seed = mnemonic_to_seed(phrase, passphrase)?;
    let keypair = config.key_deriver().account_keypair(seed.as_bytes(), index)?;
    let entry = meta.upsert_account(index, label, &keypair.public).clone();
    meta.save(&vault)?;

    writeln!(out, "{}\t{}\t{}", entry.index, entry.account_id, entry.label)?;
    Ok(())
}

pub fn account_list(
    factory: &VaultFactory,
    config: &WalletConfig,
    pin: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let vault = open_vault(factory, config, &config.vault_location, pin)?;
    let meta = WalletMetadata::load(&vault)?;
    for entry in &meta.accounts {
        writeln!(out, "{}\t{}\t{}", entry.index, entry.account_id, entry.label)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestar_crypto::CipherScheme;
    use lodestar_wallet_core::VaultError;

    const SEP5_MNEMONIC: &str =
        "illness spike retreat truth genius clock brain pass fit cave bargain toe";

    fn memory_factory(config: &WalletConfig) -> VaultFactory {
        VaultFactory::new(config, Arc::new(MemoryStore::new()))
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn derive_prints_sep5_account() {
        let mut out = Vec::new();
        derive(&WalletConfig::default(), SEP5_MNEMONIC, "", 0, true, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("m/44'/148'/0'"));
        assert!(text.contains("GDRXE2BQUC3AZNPVFSCEZ76NJ3WWL25FYFK6RGZGIEKWE4SOOHSUJUJ6"));
        assert!(text.contains("SBGWSG6BTNCKCOB3DIFBGCVMUPQFYPA2G4O34RMTB343OYPXU5DJDVMN"));
    }

    #[test]
    fn derive_hides_secret_by_default() {
        let mut out = Vec::new();
        derive(&WalletConfig::default(), SEP5_MNEMONIC, "", 0, false, &mut out).unwrap();
        assert!(!output(out).contains("SBGWSG6B"));
    }

    #[test]
    fn derive_rejects_bad_mnemonic() {
        let mut out = Vec::new();
        let result = derive(&WalletConfig::default(), "not a mnemonic", "", 0, false, &mut out);
        assert!(result.is_err());
    }

    #[test]
    fn new_mnemonic_has_configured_length() {
        let mut out = Vec::new();
        mnemonic_new(MnemonicStrength::Words12, &mut out).unwrap();
        assert_eq!(output(out).split_whitespace().count(), 12);
    }

    #[test]
    fn word_count_flag() {
        let config = WalletConfig::default();
        assert_eq!(strength_from_words(None, &config).unwrap(), MnemonicStrength::Words24);
        assert_eq!(strength_from_words(Some(12), &config).unwrap(), MnemonicStrength::Words12);
        assert!(strength_from_words(Some(15), &config).is_err());
    }

    #[test]
    fn vault_put_then_get() {
        // Authenticated cipher so the wrong PIN below fails deterministically.
        let config = WalletConfig {
            cipher: CipherScheme::AesGcm,
            ..WalletConfig::default()
        };
        let factory = memory_factory(&config);
        vault_put(&factory, &config, "notes", "1234", b"remember the milk").unwrap();

        let mut out = Vec::new();
        vault_get(&factory, &config, "notes", "1234", &mut out).unwrap();
        assert_eq!(output(out), "remember the milk\n");

        let mut out = Vec::new();
        let err = vault_get(&factory, &config, "notes", "9999", &mut out).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VaultError>(),
            Some(VaultError::PossiblyWrongPin)
        ));
    }

    #[test]
    fn longest_configured_auto_lock_still_opens() {
        let config = WalletConfig {
            auto_lock_secs: u64::MAX,
            ..WalletConfig::default()
        };
        let factory = memory_factory(&config);
        vault_put(&factory, &config, "notes", "1234", b"kept").unwrap();

        let mut out = Vec::new();
        vault_get(&factory, &config, "notes", "1234", &mut out).unwrap();
        assert_eq!(output(out), "kept\n");
    }

    #[test]
    fn accounts_are_recorded_in_vault() {
        let config = WalletConfig::default();
        let factory = memory_factory(&config);
        let mut out = Vec::new();
        account_add(&factory, &config, "1234", SEP5_MNEMONIC, "", None, "main", &mut out).unwrap();
        account_add(&factory, &config, "1234", SEP5_MNEMONIC, "", None, "spare", &mut out).unwrap();

        let mut out = Vec::new();
        account_list(&factory, &config, "1234", &mut out).unwrap();
        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "0\tGDRXE2BQUC3AZNPVFSCEZ76NJ3WWL25FYFK6RGZGIEKWE4SOOHSUJUJ6\tmain"
        );
        assert_eq!(
            lines[1],
            "1\tGBAW5XGWORWVFE2XTJYDTLDHXTY2Q2MO73HYCGB3XMFMQ562Q2W2GJQX\tspare"
        );
    }

    #[test]
    fn secret_falls_back_to_stdin() {
        let mut input: &[u8] = b"  4321  \n";
        assert_eq!(secret_or_line(None, "PIN", &mut input).unwrap().as_str(), "4321");
        let mut input: &[u8] = b"ignored\n";
        assert_eq!(
            secret_or_line(Some("1234".into()), "PIN", &mut input).unwrap().as_str(),
            "1234"
        );
        let mut input: &[u8] = b"\n";
        assert!(secret_or_line(None, "PIN", &mut input).is_err());
    }

    #[test]
    fn unusable_data_dir_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let config = WalletConfig {
            data_dir: blocker.join("nested"),
            ..WalletConfig::default()
        };
        let store = open_store(&config);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
