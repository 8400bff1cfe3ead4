//! Static deployment tables of the Maitrix testnet campaign on Arbitrum
//! Sepolia together with the fixed transaction parameters.

use {
    alloy::primitives::{Address, FixedBytes, address, fixed_bytes},
    indexmap::IndexMap,
    std::time::Duration,
    url::Url,
};

/// 4-byte function selector prefixing router and staking call data.
pub type Selector = FixedBytes<4>;

pub const ARBITRUM_SEPOLIA: u64 = 421614;

/// `stake(uint256)` on every staking contract.
pub const STAKE_SELECTOR: Selector = fixed_bytes!("a694fc3a");

/// The virtual, vnusd and ai16z routers share this entry point.
pub const SHARED_SWAP_SELECTOR: Selector = fixed_bytes!("a6d67510");
pub const ATH_SWAP_SELECTOR: Selector = fixed_bytes!("1bf6318b");

pub const DEFAULT_GAS_LIMIT: u64 = 5_000_000;
pub const DEFAULT_GAS_PRICE_GWEI: u64 = 7;
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_secs(17);

const TOKENS: [(&str, Address); 9] = [
    ("virtual", address!("0xFF27D611ab162d7827bbbA59F140C1E7aE56e95C")),
    ("ath", address!("0x1428444Eacdc0Fd115dd4318FcE65B61Cd1ef399")),
    ("ausd", address!("0x78De28aABBD5198657B26A8dc9777f441551B477")),
    ("usde", address!("0xf4BE938070f59764C85fAcE374F92A4670ff3877")),
    ("lvlusd", address!("0x8802b7bcF8EedCc9E1bA6C20E139bEe89dd98E83")),
    ("vusd", address!("0xc14A8E2Fc341A97a57524000bF0F7F1bA4de4802")),
    ("vnusd", address!("0xBEbF4E25652e7F23CCdCCcaaCB32004501c4BfF8")),
    ("ai16z", address!("0x2d5a4f5634041f50180A25F26b2A8364452E3152")),
    ("azUSD", address!("0x5966cd11aED7D68705C9692e74e5688C892cb162")),
];

const ROUTERS: [(&str, Address); 4] = [
    ("virtual", address!("0x3dCACa90A714498624067948C092Dd0373f08265")),
    ("ath", address!("0x2cFDeE1d5f04dD235AEA47E1aD2fB66e3A61C13e")),
    ("vnusd", address!("0xEfbAE3A68b17a61f21C7809Edfa8Aa3CA7B2546f")),
    ("ai16z", address!("0xb0b53d8b4ef06f9bbe5db624113c6a5d35bb7522")),
];

const STAKE_CONTRACTS: [(&str, Address); 6] = [
    ("ausd", address!("0x054de909723ECda2d119E31583D40a52a332f85c")),
    ("usde", address!("0x3988053b7c748023a1ae19a8ed4c1bf217932bdb")),
    ("lvlusd", address!("0x5De3fBd40D4c3892914c3b67b5B529D776A1483A")),
    ("vusd", address!("0x5bb9Fa02a3DCCDB4E9099b48e8Ba5841D2e59d51")),
    ("vnusd", address!("0x2608A88219BFB34519f635Dd9Ca2Ae971539ca60")),
    ("azUSD", address!("0xf45fde3f484c44cc35bdc2a7fca3ddde0c8f252e")),
];

const SWAP_SELECTORS: [(&str, Selector); 4] = [
    ("virtual", SHARED_SWAP_SELECTOR),
    ("ath", ATH_SWAP_SELECTOR),
    ("vnusd", SHARED_SWAP_SELECTOR),
    ("ai16z", SHARED_SWAP_SELECTOR),
];

/// The vnUSD staking contract takes a different token than the one the
/// vnusd router hands out.
const STAKE_TOKEN_OVERRIDES: [(&str, Address); 1] = [(
    "vnusd",
    address!("0x46a6585a0Ad1750d37B4e6810EB59cBDf591Dc30"),
)];

const SWAP_ORDER: [&str; 4] = ["virtual", "ath", "vnusd", "ai16z"];

const FAUCETS: [(&str, &str); 6] = [
    ("ath", "https://app.x-network.io/maitrix-faucet/faucet"),
    ("usde", "https://app.x-network.io/maitrix-usde/faucet"),
    ("lvlusd", "https://app.x-network.io/maitrix-lvl/faucet"),
    ("virtual", "https://app.x-network.io/maitrix-virtual/faucet"),
    ("vana", "https://app.x-network.io/maitrix-vana/faucet"),
    ("ai16z", "https://app.x-network.io/maitrix-ai16z/faucet"),
];

/// Fixed gas parameters attached to every submitted transaction. Nothing is
/// estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasParameters {
    pub limit: u64,
    /// Legacy gas price in wei.
    pub price: u128,
}

impl GasParameters {
    pub fn from_gwei(limit: u64, price_gwei: u64) -> Self {
        Self {
            limit,
            price: u128::from(price_gwei) * 1_000_000_000,
        }
    }
}

impl Default for GasParameters {
    fn default() -> Self {
        Self::from_gwei(DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_GWEI)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetEndpoint {
    pub name: String,
    pub url: Url,
}

/// Everything a wallet run needs to know about the campaign. Built once at
/// start-up and shared read-only between all runs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token contracts in the order balances are reported.
    pub tokens: IndexMap<String, Address>,
    pub routers: IndexMap<String, Address>,
    /// Staking contracts in the order they are staked into.
    pub stake_contracts: IndexMap<String, Address>,
    pub swap_selectors: IndexMap<String, Selector>,
    pub stake_selector: Selector,
    pub stake_token_overrides: IndexMap<String, Address>,
    pub swap_order: Vec<String>,
    pub faucets: Vec<FaucetEndpoint>,
    pub gas: GasParameters,
    /// Pause after every on-chain step, faucet claim and wallet.
    pub step_delay: Duration,
}

impl Config {
    /// The deployment the bot was written for.
    pub fn maitrix() -> Self {
        Self {
            tokens: table(&TOKENS),
            routers: table(&ROUTERS),
            stake_contracts: table(&STAKE_CONTRACTS),
            swap_selectors: table(&SWAP_SELECTORS),
            stake_selector: STAKE_SELECTOR,
            stake_token_overrides: table(&STAKE_TOKEN_OVERRIDES),
            swap_order: SWAP_ORDER.iter().map(|name| name.to_string()).collect(),
            faucets: FAUCETS
                .iter()
                .map(|(name, url)| FaucetEndpoint {
                    name: name.to_string(),
                    url: Url::parse(url).expect("static faucet url is valid"),
                })
                .collect(),
            gas: GasParameters::default(),
            step_delay: DEFAULT_STEP_DELAY,
        }
    }

    /// Router address and method selector used to swap `token`, if the
    /// token can be swapped at all.
    pub fn swap_route(&self, token: &str) -> Option<(Address, Selector)> {
        Some((
            *self.routers.get(token)?,
            *self.swap_selectors.get(token)?,
        ))
    }
}

fn table<T: Copy>(entries: &[(&str, T)]) -> IndexMap<String, T> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_swap_target_has_a_route_and_token() {
        let config = Config::maitrix();
        for token in &config.swap_order {
            assert!(config.swap_route(token).is_some(), "{token}");
            assert!(config.tokens.contains_key(token), "{token}");
        }
    }

    #[test]
    fn shared_selector_is_reused() {
        let config = Config::maitrix();
        for token in ["virtual", "vnusd", "ai16z"] {
            assert_eq!(config.swap_route(token).unwrap().1, SHARED_SWAP_SELECTOR);
        }
        assert_eq!(config.swap_route("ath").unwrap().1, ATH_SWAP_SELECTOR);
        assert_eq!(config.swap_route("usde"), None);
    }

    #[test]
    fn only_vnusd_stakes_an_overridden_token() {
        let config = Config::maitrix();
        assert_eq!(
            config.stake_token_overrides.get("vnusd"),
            Some(&address!("0x46a6585a0Ad1750d37B4e6810EB59cBDf591Dc30"))
        );
        assert_eq!(config.stake_token_overrides.len(), 1);
    }

    #[test]
    fn stake_targets_keep_table_order() {
        let names: Vec<_> = Config::maitrix().stake_contracts.into_keys().collect();
        assert_eq!(names, ["ausd", "usde", "lvlusd", "vusd", "vnusd", "azUSD"]);
    }

    #[test]
    fn gas_price_in_wei() {
        let gas = GasParameters::default();
        assert_eq!(gas.limit, 5_000_000);
        assert_eq!(gas.price, 7_000_000_000);
    }
}
