use {
    crate::{
        chain::Chain,
        config::{Config, Selector},
        report::format_staking_report,
        traits::{AccountRunner, ChainRead, ChainWrite, Faucet, Reporter},
    },
    alloy::{
        primitives::{
            Address,
            Bytes,
            TxHash,
            U256,
            utils::{format_ether, format_units},
        },
        signers::local::PrivateKeySigner,
        sol_types::SolValue,
    },
    anyhow::{Context, Result},
    std::sync::Arc,
    tracing::Instrument,
    url::Url,
};

/// Shown for tokens that don't implement `symbol()`.
pub const FALLBACK_SYMBOL: &str = "TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub raw: U256,
    pub decimals: u8,
    pub formatted: String,
    pub symbol: String,
}

/// Why a swap or stake did not submit anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    UnknownToken,
    /// No router or no method selector configured for the token.
    NoRoute,
    NoStakeContract,
    ZeroBalance,
}

/// Result of a single swap or stake. Errors are captured here instead of
/// being propagated so one failing token never stops the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed {
        tx_hash: TxHash,
        amount: String,
        symbol: String,
    },
    Skipped(Skip),
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub address: Address,
    /// Faucet name and whether the claim succeeded.
    pub claims: Vec<(String, bool)>,
    pub swaps: Vec<(String, Outcome)>,
    pub stakes: Vec<(String, Outcome)>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.swaps
            .iter()
            .chain(&self.stakes)
            .filter(|(_, outcome)| outcome.is_success())
            .count()
    }
}

/// Call data for routers and staking contracts: the selector followed by the
/// amount as a single `uint256` argument.
pub fn call_data(selector: Selector, amount: U256) -> Bytes {
    [selector.as_slice(), &amount.abi_encode()].concat().into()
}

/// Runs the campaign for a single wallet. Every step is awaited before the
/// next one starts.
pub struct WalletRunner {
    config: Arc<Config>,
    chain_read: Arc<dyn ChainRead>,
    chain_write: Arc<dyn ChainWrite>,
    faucet: Arc<dyn Faucet>,
    reporter: Arc<dyn Reporter>,
}

impl WalletRunner {
    pub fn new(
        config: Arc<Config>,
        chain_read: Arc<dyn ChainRead>,
        chain_write: Arc<dyn ChainWrite>,
        faucet: Arc<dyn Faucet>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config,
            chain_read,
            chain_write,
            faucet,
            reporter,
        }
    }

    /// status → claim faucets → swaps → stakes → status
    pub async fn run(&self) -> RunReport {
        let address = self.chain_read.address();
        tracing::info!(%address, "running wallet");

        self.status().await;
        let claims = self.claim_faucets().await;

        let mut swaps = Vec::new();
        for token in &self.config.swap_order {
            if !self.config.routers.contains_key(token) {
                tracing::debug!(%token, "no router configured, not swapping");
                continue;
            }
            swaps.push((token.clone(), self.swap(token).await));
        }

        let mut stakes = Vec::new();
        for name in self.config.stake_contracts.keys() {
            let token_override = self.config.stake_token_overrides.get(name).copied();
            stakes.push((name.clone(), self.stake(name, token_override).await));
        }

        self.status().await;

        let report = RunReport {
            address,
            claims,
            swaps,
            stakes,
        };
        tracing::info!(%address, completed = report.completed(), "finished wallet");
        report
    }

    /// Reads the wallet's balance of `token`. The symbol is best effort.
    pub async fn token_balance(&self, token: Address) -> Result<TokenBalance> {
        let decimals = self.chain_read.decimals(token).await?;
        let raw = self.chain_read.balance_of(token).await?;
        let symbol = match self.chain_read.symbol(token).await {
            Ok(symbol) => symbol,
            Err(err) => {
                tracing::debug!(?err, %token, "no symbol");
                FALLBACK_SYMBOL.to_string()
            }
        };
        let formatted = format_units(raw, decimals).context("format token amount")?;
        Ok(TokenBalance {
            raw,
            decimals,
            formatted,
            symbol,
        })
    }

    /// Logs the native balance and the balance of every configured token.
    pub async fn status(&self) {
        let address = self.chain_read.address();
        match self.chain_read.native_balance().await {
            Ok(balance) => tracing::info!(%address, eth = %format_ether(balance), "wallet status"),
            Err(err) => tracing::warn!(?err, %address, "failed to read native balance"),
        }
        for (name, token) in &self.config.tokens {
            match self.token_balance(*token).await {
                Ok(balance) => tracing::info!("{} ({name}): {}", balance.symbol, balance.formatted),
                Err(err) => tracing::warn!(?err, token = %name, "failed to read token balance"),
            }
        }
    }

    /// Claims every faucet once, pausing after each attempt whether it
    /// succeeded or not.
    pub async fn claim_faucets(&self) -> Vec<(String, bool)> {
        let address = self.chain_read.address();
        let mut claims = Vec::with_capacity(self.config.faucets.len());
        for faucet in &self.config.faucets {
            let claimed = self.claim(&faucet.name, &faucet.url, address).await;
            claims.push((faucet.name.clone(), claimed));
            tokio::time::sleep(self.config.step_delay).await;
        }
        claims
    }

    async fn claim(&self, name: &str, url: &Url, address: Address) -> bool {
        match self.faucet.claim(url, address).await {
            Ok(()) => {
                tracing::info!(faucet = name, "claimed");
                true
            }
            Err(err) => {
                tracing::warn!(faucet = name, %err, "claim failed");
                false
            }
        }
    }

    pub async fn swap(&self, token: &str) -> Outcome {
        let Some(token_address) = self.config.tokens.get(token).copied() else {
            tracing::warn!(token, "unknown token, not swapping");
            return Outcome::Skipped(Skip::UnknownToken);
        };
        let Some((router, selector)) = self.config.swap_route(token) else {
            tracing::warn!(token, "router or method id missing, not swapping");
            return Outcome::Skipped(Skip::NoRoute);
        };

        tracing::info!(token, %router, "swapping");
        match self.approve_and_call(token_address, router, selector).await {
            Ok(outcome) => {
                if let Outcome::Completed { amount, symbol, .. } = &outcome {
                    tracing::info!("swapped {amount} {symbol}");
                }
                outcome
            }
            Err(err) => {
                tracing::error!(?err, token, "swap failed");
                Outcome::Failed(format!("{err:#}"))
            }
        }
    }

    /// Stakes the full balance of `name`. `token_override` replaces the
    /// token address configured for `name`.
    pub async fn stake(&self, name: &str, token_override: Option<Address>) -> Outcome {
        let Some(stake_contract) = self.config.stake_contracts.get(name).copied() else {
            tracing::warn!(token = name, "no staking contract");
            return Outcome::Skipped(Skip::NoStakeContract);
        };
        let Some(token) = token_override.or_else(|| self.config.tokens.get(name).copied()) else {
            tracing::warn!(token = name, "unknown token, not staking");
            return Outcome::Skipped(Skip::UnknownToken);
        };

        tracing::info!(token = name, %token, %stake_contract, "staking");
        let outcome = match self
            .approve_and_call(token, stake_contract, self.config.stake_selector)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(?err, token = name, "stake failed");
                return Outcome::Failed(format!("{err:#}"));
            }
        };

        if let Outcome::Completed {
            tx_hash,
            amount,
            symbol,
        } = &outcome
        {
            tracing::info!("staked {amount} {symbol}");
            let message = format_staking_report(symbol, amount, *tx_hash);
            if let Err(err) = self.reporter.report(&message).await {
                tracing::warn!(?err, "failed to deliver staking report");
            }
        }
        outcome
    }

    /// Moves the wallet's whole `token` balance into `target` by calling
    /// `selector(balance)`, approving `target` first when the current
    /// allowance does not cover the balance.
    async fn approve_and_call(
        &self,
        token: Address,
        target: Address,
        selector: Selector,
    ) -> Result<Outcome> {
        let balance = self.token_balance(token).await?;
        if balance.raw.is_zero() {
            tracing::info!(symbol = %balance.symbol, "nothing to move, balance is zero");
            return Ok(Outcome::Skipped(Skip::ZeroBalance));
        }

        let allowance = self.chain_read.allowance(token, target).await?;
        tracing::debug!(
            allowance = %format_units(allowance, balance.decimals).unwrap_or_default(),
            balance = %balance.formatted,
            "current allowance",
        );
        if allowance < balance.raw {
            tracing::info!(symbol = %balance.symbol, %target, "approving");
            self.chain_write
                .approve(token, target, balance.raw)
                .await
                .context("approve")?;
        } else {
            tracing::debug!("allowance sufficient, no approval needed");
        }
        tokio::time::sleep(self.config.step_delay).await;

        let tx_hash = self
            .chain_write
            .call(target, call_data(selector, balance.raw))
            .await?;
        tokio::time::sleep(self.config.step_delay).await;

        Ok(Outcome::Completed {
            tx_hash,
            amount: balance.formatted,
            symbol: balance.symbol,
        })
    }
}

/// Connects each credential to the chain through its own signing provider
/// and runs it against the shared faucet client and reporter.
pub struct OnchainRunner {
    pub node_url: Url,
    pub chain_id: u64,
    pub config: Arc<Config>,
    pub faucet: Arc<dyn Faucet>,
    pub reporter: Arc<dyn Reporter>,
}

#[async_trait::async_trait]
impl AccountRunner for OnchainRunner {
    async fn run(&self, signer: PrivateKeySigner) -> RunReport {
        let address = signer.address();
        let chain = Arc::new(Chain::new(
            self.node_url.clone(),
            signer,
            self.chain_id,
            self.config.gas,
        ));
        let runner = WalletRunner::new(
            self.config.clone(),
            chain.clone(),
            chain,
            self.faucet.clone(),
            self.reporter.clone(),
        );
        runner
            .run()
            .instrument(tracing::info_span!("wallet", %address))
            .await
    }
}
