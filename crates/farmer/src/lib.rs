pub mod arguments;
pub mod chain;
pub mod config;
pub mod credentials;
pub mod driver;
pub mod faucet;
pub mod report;
pub mod runner;
pub mod shutdown;
pub mod traits;

use {
    arguments::Arguments,
    clap::Parser,
    config::{Config, GasParameters},
    credentials::EnvCredentials,
    driver::{BatchDriver, PeriodicTask},
    faucet::HttpFaucet,
    report::{LogReporter, WebhookReporter},
    runner::OnchainRunner,
    std::sync::Arc,
    traits::Reporter,
};

const USER_AGENT: &str = concat!("farmer/", env!("CARGO_PKG_VERSION"));

pub async fn start(args: impl Iterator<Item = String>) {
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&observe::Config::new(
        &args.log_filter,
        args.log_stderr_threshold.into_level(),
        args.use_json_logs,
    ));
    tracing::info!("running farmer with validated arguments:\n{}", args);
    run(args).await;
}

/// Runs the periodic task until a termination signal arrives.
pub async fn run(args: Arguments) {
    let config = Arc::new(Config {
        gas: GasParameters::from_gwei(args.gas_limit, args.gas_price_gwei),
        step_delay: args.step_delay,
        ..Config::maitrix()
    });
    let http = reqwest::Client::builder()
        .timeout(args.http_timeout)
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build http client");
    let reporter: Arc<dyn Reporter> = match args.report_webhook_url {
        Some(url) => Arc::new(WebhookReporter::new(http.clone(), url)),
        None => Arc::new(LogReporter),
    };
    let runner = OnchainRunner {
        node_url: args.node_url,
        chain_id: args.chain_id,
        config: config.clone(),
        faucet: Arc::new(HttpFaucet::new(http)),
        reporter,
    };
    let driver = BatchDriver::new(Arc::new(EnvCredentials), Arc::new(runner), config.step_delay);

    let task = PeriodicTask::start(driver, args.run_interval);
    let signal = shutdown::requested().await;
    tracing::info!(signal, "shutting down after the current wallet");
    if let Err(err) = task.stop().await {
        tracing::error!(?err, "periodic task did not stop cleanly");
    }
}
