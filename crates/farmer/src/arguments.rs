use {
    crate::config::{self, ARBITRUM_SEPOLIA},
    clap::Parser,
    std::time::Duration,
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(Parser)]
pub struct Arguments {
    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "https://sepolia-rollup.arbitrum.io/rpc")]
    pub node_url: Url,

    /// Chain id set on every transaction.
    #[clap(long, env, default_value_t = ARBITRUM_SEPOLIA)]
    pub chain_id: u64,

    /// Gas limit of every approval, swap and stake transaction.
    #[clap(long, env, default_value_t = config::DEFAULT_GAS_LIMIT)]
    pub gas_limit: u64,

    /// Legacy gas price in gwei of every transaction.
    #[clap(long, env, default_value_t = config::DEFAULT_GAS_PRICE_GWEI)]
    pub gas_price_gwei: u64,

    /// Pause after every transaction, faucet claim and wallet.
    #[clap(
        long,
        env,
        default_value = "17s",
        value_parser = humantime::parse_duration,
    )]
    pub step_delay: Duration,

    /// Time between the starts of two passes over all wallets.
    #[clap(
        long,
        env,
        default_value = "24h",
        value_parser = non_zero_duration,
    )]
    pub run_interval: Duration,

    /// Timeout for faucet and report webhook requests.
    #[clap(
        long,
        env,
        default_value = "30s",
        value_parser = humantime::parse_duration,
    )]
    pub http_timeout: Duration,

    /// Webhook receiving a `{"text": ...}` message for every successful
    /// stake. Reports are only logged when unset.
    #[clap(long, env)]
    pub report_webhook_url: Option<Url>,

    #[clap(long, env, default_value = "warn,farmer=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Emit log events as JSON lines.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            node_url,
            chain_id,
            gas_limit,
            gas_price_gwei,
            step_delay,
            run_interval,
            http_timeout,
            report_webhook_url,
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        // Node URLs regularly embed API keys.
        writeln!(f, "node_url: {}", redacted(node_url))?;
        writeln!(f, "chain_id: {chain_id}")?;
        writeln!(f, "gas_limit: {gas_limit}")?;
        writeln!(f, "gas_price_gwei: {gas_price_gwei}")?;
        writeln!(f, "step_delay: {step_delay:?}")?;
        writeln!(f, "run_interval: {run_interval:?}")?;
        writeln!(f, "http_timeout: {http_timeout:?}")?;
        writeln!(
            f,
            "report_webhook_url: {}",
            report_webhook_url
                .as_ref()
                .map(|_| "SECRET")
                .unwrap_or("None")
        )?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

fn non_zero_duration(s: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(s).map_err(|err| err.to_string())?;
    if duration.is_zero() {
        return Err("must be greater than zero".to_string());
    }
    Ok(duration)
}

/// Scheme and host only.
fn redacted(url: &Url) -> String {
    format!("{}://{}/...", url.scheme(), url.host_str().unwrap_or_default())
}
