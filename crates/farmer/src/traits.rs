//! Trait definitions for external system boundaries.
//!
//! These traits abstract blockchain, faucet and reporting interactions so the
//! wallet runner and batch driver can be unit tested with mocks.

use {
    crate::{faucet::FaucetError, runner::RunReport},
    alloy::{
        primitives::{Address, Bytes, TxHash, U256},
        signers::local::PrivateKeySigner,
    },
    anyhow::Result,
    url::Url,
};

/// Read-only chain queries on behalf of one wallet.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChainRead: Send + Sync {
    /// Address of the wallet all queries are made for.
    fn address(&self) -> Address;

    /// Native currency balance of the wallet in wei.
    async fn native_balance(&self) -> Result<U256>;

    async fn decimals(&self, token: Address) -> Result<u8>;

    /// Raw token balance of the wallet.
    async fn balance_of(&self, token: Address) -> Result<U256>;

    /// Not every token implements `symbol()`, callers should expect errors.
    async fn symbol(&self, token: Address) -> Result<String>;

    /// Amount the wallet allows `spender` to move on its behalf.
    async fn allowance(&self, token: Address, spender: Address) -> Result<U256>;
}

/// Transaction submission on behalf of one wallet.
///
/// Both methods only return once the transaction was mined. A reverted
/// transaction is an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChainWrite: Send + Sync {
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;

    /// Sends `data` as call data to `to` without decoding any return value.
    async fn call(&self, to: Address, data: Bytes) -> Result<TxHash>;
}

/// Testnet faucet that credits tokens to an address.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Faucet: Send + Sync {
    async fn claim(&self, url: &Url, address: Address) -> Result<(), FaucetError>;
}

/// Outbound notification channel for successful stakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Reporter: Send + Sync {
    async fn report(&self, message: &str) -> Result<()>;
}

/// Source of the wallets processed in one batch pass.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialSource: Send + Sync {
    /// Ordered list of wallets. Re-read on every pass.
    fn load(&self) -> Vec<PrivateKeySigner>;
}

/// Runs the full per-wallet sequence for one credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AccountRunner: Send + Sync {
    async fn run(&self, signer: PrivateKeySigner) -> RunReport;
}
