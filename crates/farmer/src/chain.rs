use {
    crate::{
        config::GasParameters,
        traits::{ChainRead, ChainWrite},
    },
    alloy::{
        network::{EthereumWallet, TransactionBuilder},
        primitives::{Address, Bytes, TxHash, U256},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::TransactionRequest,
        signers::local::PrivateKeySigner,
        sol,
        sol_types::SolCall,
    },
    anyhow::{Context, Result, ensure},
    url::Url,
};

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

/// Chain access for a single wallet. Transactions are signed locally and
/// sent as legacy transactions with fixed gas parameters.
pub struct Chain {
    provider: DynProvider,
    address: Address,
    chain_id: u64,
    gas: GasParameters,
}

impl Chain {
    pub fn new(node_url: Url, signer: PrivateKeySigner, chain_id: u64, gas: GasParameters) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_http(node_url)
            .erased();
        Self::with_provider(provider, address, chain_id, gas)
    }

    pub fn with_provider(
        provider: DynProvider,
        address: Address,
        chain_id: u64,
        gas: GasParameters,
    ) -> Self {
        Self {
            provider,
            address,
            chain_id,
            gas,
        }
    }

    fn token(&self, token: Address) -> IERC20::IERC20Instance<DynProvider> {
        IERC20::new(token, self.provider.clone())
    }

    /// Submits a transaction and blocks until its receipt is available.
    async fn send(&self, to: Address, data: Bytes, kind: &str) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_input(data)
            .with_chain_id(self.chain_id)
            .with_gas_limit(self.gas.limit)
            .with_gas_price(self.gas.price);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .with_context(|| format!("failed to send {kind} transaction"))?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(?tx_hash, %to, "{kind} transaction sent");

        let receipt = pending
            .get_receipt()
            .await
            .with_context(|| format!("failed to confirm {kind} transaction {tx_hash}"))?;
        ensure!(receipt.status(), "{kind} transaction {tx_hash} reverted");
        tracing::info!(?tx_hash, block = ?receipt.block_number, "{kind} transaction confirmed");
        Ok(tx_hash)
    }
}

#[async_trait::async_trait]
impl ChainRead for Chain {
    fn address(&self) -> Address {
        self.address
    }

    async fn native_balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.address)
            .await
            .context("eth_getBalance")
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        self.token(token)
            .decimals()
            .call()
            .await
            .with_context(|| format!("decimals of {token}"))
    }

    async fn balance_of(&self, token: Address) -> Result<U256> {
        self.token(token)
            .balanceOf(self.address)
            .call()
            .await
            .with_context(|| format!("balanceOf {token}"))
    }

    async fn symbol(&self, token: Address) -> Result<String> {
        self.token(token)
            .symbol()
            .call()
            .await
            .with_context(|| format!("symbol of {token}"))
    }

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256> {
        self.token(token)
            .allowance(self.address, spender)
            .call()
            .await
            .with_context(|| format!("allowance of {token} for {spender}"))
    }
}

#[async_trait::async_trait]
impl ChainWrite for Chain {
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let data = IERC20::approveCall { spender, amount }.abi_encode();
        self.send(token, data.into(), "approve").await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<TxHash> {
        self.send(to, data, "contract call").await
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{
            primitives::address,
            providers::mock::Asserter,
            sol_types::SolValue,
        },
    };

    const WALLET: Address = address!("0x1111111111111111111111111111111111111111");
    const TOKEN: Address = address!("0x2222222222222222222222222222222222222222");

    fn mocked_chain() -> (Chain, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased();
        let chain = Chain::with_provider(provider, WALLET, 421614, GasParameters::default());
        (chain, asserter)
    }

    #[tokio::test]
    async fn reads_token_state() {
        let (chain, asserter) = mocked_chain();
        asserter.push_success(&Bytes::from(U256::from(18).abi_encode()));
        asserter.push_success(&Bytes::from(U256::from(1_500).abi_encode()));
        asserter.push_success(&Bytes::from((String::from("vUSD"),).abi_encode_params()));

        assert_eq!(chain.decimals(TOKEN).await.unwrap(), 18);
        assert_eq!(chain.balance_of(TOKEN).await.unwrap(), U256::from(1_500));
        assert_eq!(chain.symbol(TOKEN).await.unwrap(), "vUSD");
    }

    #[tokio::test]
    async fn native_balance() {
        let (chain, asserter) = mocked_chain();
        asserter.push_success(&U256::from(42));
        assert_eq!(chain.native_balance().await.unwrap(), U256::from(42));
    }

    #[tokio::test]
    async fn read_errors_carry_context() {
        let (chain, asserter) = mocked_chain();
        asserter.push_failure_msg("execution reverted");
        let err = chain.symbol(TOKEN).await.unwrap_err();
        assert!(format!("{err:#}").contains("symbol of"));
    }
}
