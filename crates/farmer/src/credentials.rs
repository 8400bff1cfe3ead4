//! Wallet credentials from the process environment.
//!
//! Keys are read from `PRIVATE_KEY_1`, `PRIVATE_KEY_2`, ... until the first
//! missing index. `PRIVATE_KEY` is only consulted when no numbered key is set.

use {
    crate::traits::CredentialSource,
    alloy::signers::local::{LocalSignerError, PrivateKeySigner},
};

pub const NUMBERED_PREFIX: &str = "PRIVATE_KEY_";
pub const SINGLE_KEY: &str = "PRIVATE_KEY";

#[derive(Debug, thiserror::Error)]
#[error("{variable} does not contain a valid private key")]
pub struct CredentialError {
    pub variable: String,
    #[source]
    source: LocalSignerError,
}

/// Collects `(variable, key)` pairs in processing order.
pub fn private_keys(lookup: impl Fn(&str) -> Option<String>) -> Vec<(String, String)> {
    let present = |variable: &str| lookup(variable).filter(|key| !key.trim().is_empty());

    let mut keys = Vec::new();
    for index in 1.. {
        let variable = format!("{NUMBERED_PREFIX}{index}");
        let Some(key) = present(&variable) else {
            break;
        };
        keys.push((variable, key));
    }
    if keys.is_empty() {
        if let Some(key) = present(SINGLE_KEY) {
            keys.push((SINGLE_KEY.to_string(), key));
        }
    }
    keys
}

pub fn parse_signer(variable: &str, key: &str) -> Result<PrivateKeySigner, CredentialError> {
    key.trim()
        .parse()
        .map_err(|source| CredentialError {
            variable: variable.to_string(),
            source,
        })
}

/// Reads the credentials from the environment on every pass so keys can be
/// rotated without a restart.
#[derive(Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn load(&self) -> Vec<PrivateKeySigner> {
        private_keys(|variable| std::env::var(variable).ok())
            .into_iter()
            .filter_map(|(variable, key)| match parse_signer(&variable, &key) {
                Ok(signer) => Some(signer),
                Err(err) => {
                    tracing::error!(%err, "skipping credential");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::collections::HashMap};

    // Well known anvil development keys.
    const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_1: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |variable| vars.get(variable).cloned()
    }

    fn variables(keys: Vec<(String, String)>) -> Vec<String> {
        keys.into_iter().map(|(variable, _)| variable).collect()
    }

    #[test]
    fn numbered_keys_in_order_until_gap() {
        let keys = private_keys(env(&[
            ("PRIVATE_KEY_2", "b"),
            ("PRIVATE_KEY_1", "a"),
            ("PRIVATE_KEY_4", "d"),
            ("PRIVATE_KEY", "single"),
        ]));
        assert_eq!(
            keys,
            vec![
                ("PRIVATE_KEY_1".to_string(), "a".to_string()),
                ("PRIVATE_KEY_2".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn single_key_is_fallback() {
        let keys = private_keys(env(&[("PRIVATE_KEY", "single"), ("PRIVATE_KEY_2", "b")]));
        assert_eq!(variables(keys), ["PRIVATE_KEY"]);
    }

    #[test]
    fn empty_values_count_as_missing() {
        assert!(private_keys(env(&[("PRIVATE_KEY_1", " "), ("PRIVATE_KEY", "")])).is_empty());
        assert!(private_keys(env(&[])).is_empty());
    }

    #[test]
    fn parses_keys_with_and_without_prefix() {
        let first = parse_signer("PRIVATE_KEY_1", KEY_0).unwrap();
        assert_eq!(
            first.address(),
            alloy::primitives::address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        let second = parse_signer("PRIVATE_KEY_2", &format!(" {KEY_1}\n")).unwrap();
        assert_eq!(
            second.address(),
            alloy::primitives::address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn invalid_key_names_variable() {
        let err = parse_signer("PRIVATE_KEY_3", "not a key").unwrap_err();
        assert_eq!(err.variable, "PRIVATE_KEY_3");
        assert_eq!(
            err.to_string(),
            "PRIVATE_KEY_3 does not contain a valid private key"
        );
    }
}
