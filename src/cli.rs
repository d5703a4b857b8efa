//! CLI definition and dispatch.

use chrono::{Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::alpha_vantage::{self, AlphaVantageAdapter};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::currency_api::{self, CurrencyApiAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http::{build_client, DEFAULT_TIMEOUT_SECS};
use crate::adapters::iex_earnings::{self, IexEarningsAdapter};
use crate::adapters::news_api::{self, NewsApiAdapter};
use crate::domain::analysis::stock_analysis;
use crate::domain::currency::{forecast, CurrencyForecast, FxObservation, MacroFactors, FACTOR_NAMES};
use crate::domain::earnings::{train_earnings_model, EarningsModelReport, FEATURE_NAMES};
use crate::domain::error::BalanceWheelError;
use crate::domain::financial_metrics::{FinancialMetrics, MovingAverageKind};
use crate::domain::fundamentals::Fundamentals;
use crate::domain::ohlcv::normalize;
use crate::domain::portfolio::{Holdings, PortfolioSummary};
use crate::domain::settings::{history_start, AnalysisSettings, MAX_HISTORY_DAYS};
use crate::domain::signal::generate_signal;
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSource;
use crate::ports::earnings_port::EarningsSource;
use crate::ports::fx_port::FxRateSource;
use crate::ports::news_port::NewsSource;

/// Calendar days looked back when only the latest close is needed.
const LATEST_CLOSE_LOOKBACK_DAYS: i64 = 10;
const DEFAULT_LISTEN: &str = "127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(
    name = "balancewheel",
    version,
    about = "Stock indicators, risk metrics and news sentiment"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PriceArgs {
    /// Read `{SYMBOL}.csv` files from this directory instead of Alpha Vantage
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,
    #[arg(long, env = "ALPHA_VANTAGE_API_KEY", hide_env_values = true)]
    pub stock_api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full analysis of one symbol, printed as JSON
    Analyze {
        #[arg(short, long)]
        symbol: String,
        #[command(flatten)]
        prices: PriceArgs,
        #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
        news_api_key: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Indicators and risk metrics for one symbol
    Metrics {
        #[arg(short, long)]
        symbol: String,
        #[command(flatten)]
        prices: PriceArgs,
        /// Calendar days of history (default: [analysis] history_days)
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_HISTORY_DAYS))]
        days: Option<i64>,
        /// Second symbol to correlate closes against
        #[arg(long)]
        compare: Option<String>,
        /// Also fetch company fundamentals
        #[arg(long)]
        fundamentals: bool,
        /// Lag in bars for the return autocorrelation
        #[arg(long, default_value_t = 20)]
        cycle_lag: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Buy/Sell/Hold from RSI and SMA
    Signal {
        #[arg(short, long)]
        symbol: String,
        #[command(flatten)]
        prices: PriceArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Value the configured holdings at current prices
    Portfolio {
        #[command(flatten)]
        prices: PriceArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Train the EPS regression on a year of earnings
    Earnings {
        #[arg(short, long)]
        symbol: String,
        #[arg(long, env = "IEX_TOKEN", hide_env_values = true)]
        token: Option<String>,
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long, default_value_t = crate::domain::earnings::DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
        #[arg(long, default_value_t = crate::domain::regression::DEFAULT_SEED)]
        seed: u64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Forecast an exchange rate from macro factors
    Currency {
        #[arg(long, env = "CURRENCY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Days of history to fit on
        #[arg(
            long,
            default_value_t = 30,
            value_parser = clap::value_parser!(i64).range(2..=MAX_HISTORY_DAYS)
        )]
        days: i64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start the HTTP server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    logging::init(cli.verbose);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let err = BalanceWheelError::from(e);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    match runtime.block_on(dispatch(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

async fn dispatch(command: Command) -> Result<(), BalanceWheelError> {
    match command {
        Command::Analyze {
            symbol,
            prices,
            news_api_key,
            config,
        } => {
            let ctx = Context::load(config.as_ref())?;
            run_analyze(&ctx, &symbol, &prices, news_api_key).await
        }
        Command::Metrics {
            symbol,
            prices,
            days,
            compare,
            fundamentals,
            cycle_lag,
            config,
        } => {
            let ctx = Context::load(config.as_ref())?;
            let opts = MetricsOptions {
                days,
                compare,
                fundamentals,
                cycle_lag,
            };
            run_metrics(&ctx, &symbol, &prices, &opts).await
        }
        Command::Signal {
            symbol,
            prices,
            config,
        } => {
            let ctx = Context::load(config.as_ref())?;
            run_signal(&ctx, &symbol, &prices).await
        }
        Command::Portfolio { prices, config } => {
            let ctx = Context::load(config.as_ref())?;
            run_portfolio(&ctx, &prices).await
        }
        Command::Earnings {
            symbol,
            token,
            api_url,
            test_fraction,
            seed,
            config,
        } => {
            let ctx = Context::load(config.as_ref())?;
            run_earnings(&ctx, &symbol, token, api_url, test_fraction, seed).await
        }
        Command::Currency {
            api_key,
            days,
            config,
        } => {
            let ctx = Context::load(config.as_ref())?;
            run_currency(&ctx, api_key, days).await
        }
        Command::Serve { config } => {
            let ctx = Context::load(Some(&config))?;
            run_serve(&ctx).await
        }
    }
}

/// Config plus the pieces every subcommand derives from it.
pub struct Context {
    pub config: FileConfigAdapter,
}

impl Context {
    pub fn load(path: Option<&PathBuf>) -> Result<Self, BalanceWheelError> {
        let config = match path {
            Some(p) => {
                info!(path = %p.display(), "loading config");
                FileConfigAdapter::from_file(p)?
            }
            None => FileConfigAdapter::empty(),
        };
        Ok(Context { config })
    }

    pub fn settings(&self) -> Result<AnalysisSettings, BalanceWheelError> {
        AnalysisSettings::from_config(&self.config)
    }

    pub fn client(&self) -> Result<reqwest::Client, BalanceWheelError> {
        let secs = self
            .config
            .get_int("api", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);
        let secs = u64::try_from(secs)
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| BalanceWheelError::ConfigInvalid {
                section: "api".into(),
                key: "timeout_secs".into(),
                reason: "must be > 0".into(),
            })?;
        build_client(secs)
    }

    /// `[api] {key}`, or `default`.
    pub fn url(&self, key: &str, default: &str) -> String {
        self.config
            .get_string("api", key)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Flag or environment value first, then `[api] {key}`.
    pub fn api_key(&self, given: Option<String>, key: &str) -> Result<String, BalanceWheelError> {
        given
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.config.get_string("api", key))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BalanceWheelError::ConfigMissing {
                section: "api".into(),
                key: key.into(),
            })
    }

    pub fn price_source(&self, args: &PriceArgs) -> Result<Box<dyn PriceSource>, BalanceWheelError> {
        if let Some(dir) = &args.csv_dir {
            return Ok(Box::new(CsvAdapter::new(dir.clone())));
        }
        let key = self.api_key(args.stock_api_key.clone(), "alpha_vantage_key")?;
        Ok(Box::new(AlphaVantageAdapter::with_base_url(
            self.client()?,
            key,
            self.url("alpha_vantage_url", alpha_vantage::DEFAULT_BASE_URL),
        )))
    }

    pub fn news_source(&self, given: Option<String>) -> Result<Box<dyn NewsSource>, BalanceWheelError> {
        let key = self.api_key(given, "news_api_key")?;
        Ok(Box::new(NewsApiAdapter::with_base_url(
            self.client()?,
            key,
            self.url("news_api_url", news_api::DEFAULT_BASE_URL),
        )))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn load_metrics(
    source: &dyn PriceSource,
    symbol: &str,
    days: i64,
) -> Result<FinancialMetrics, BalanceWheelError> {
    let end = today();
    let bars = normalize(source.fetch_daily(symbol, history_start(end, days)?, end).await?);
    if bars.is_empty() {
        return Err(BalanceWheelError::NoData {
            symbol: symbol.to_string(),
        });
    }
    FinancialMetrics::new(symbol, bars)
}

async fn run_analyze(
    ctx: &Context,
    symbol: &str,
    prices: &PriceArgs,
    news_api_key: Option<String>,
) -> Result<(), BalanceWheelError> {
    let settings = ctx.settings()?;
    let price_source = ctx.price_source(prices)?;
    let news_source = ctx.news_source(news_api_key)?;
    let symbol = symbol.to_ascii_uppercase();

    let analysis = stock_analysis(&symbol, price_source.as_ref(), news_source.as_ref(), &settings).await?;
    let json = serde_json::to_string_pretty(&analysis)
        .map_err(|e| BalanceWheelError::model(format!("serialize analysis: {e}")))?;
    println!("{json}");
    Ok(())
}

pub struct MetricsOptions {
    pub days: Option<i64>,
    pub compare: Option<String>,
    pub fundamentals: bool,
    pub cycle_lag: usize,
}

async fn run_metrics(
    ctx: &Context,
    symbol: &str,
    prices: &PriceArgs,
    opts: &MetricsOptions,
) -> Result<(), BalanceWheelError> {
    let settings = ctx.settings()?;
    let source = ctx.price_source(prices)?;
    let symbol = symbol.to_ascii_uppercase();
    let days = opts.days.unwrap_or(settings.history_days);
    if !(1..=MAX_HISTORY_DAYS).contains(&days) {
        return Err(BalanceWheelError::ConfigInvalid {
            section: "cli".into(),
            key: "days".into(),
            reason: format!("must be between 1 and {MAX_HISTORY_DAYS}"),
        });
    }

    let metrics = load_metrics(source.as_ref(), &symbol, days).await?;

    let correlation = match &opts.compare {
        Some(other) => {
            let other = load_metrics(source.as_ref(), &other.to_ascii_uppercase(), days).await?;
            Some((other.symbol.clone(), metrics.asset_correlation(&other)))
        }
        None => None,
    };
    let fundamentals = if opts.fundamentals {
        Some(source.fetch_fundamentals(&symbol).await?)
    } else {
        None
    };

    print!(
        "{}",
        format_metrics(&metrics, &settings, opts.cycle_lag, correlation, fundamentals.as_ref())
    );
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

pub fn format_metrics(
    metrics: &FinancialMetrics,
    settings: &AnalysisSettings,
    cycle_lag: usize,
    correlation: Option<(String, Option<f64>)>,
    fundamentals: Option<&Fundamentals>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} bars)", metrics.symbol, metrics.bars.len());
    let _ = writeln!(out, "  last close:        {}", fmt_opt(metrics.last_close()));
    let _ = writeln!(
        out,
        "  SMA({}):           {}",
        settings.sma_period,
        fmt_opt(
            metrics
                .moving_average(settings.sma_period, MovingAverageKind::Simple)
                .latest_simple()
        )
    );
    let _ = writeln!(
        out,
        "  EMA({}):           {}",
        settings.ema_period,
        fmt_opt(
            metrics
                .moving_average(settings.ema_period, MovingAverageKind::Exponential)
                .latest_simple()
        )
    );
    let _ = writeln!(
        out,
        "  RSI({}):           {}",
        settings.rsi_period,
        fmt_opt(metrics.rsi(settings.rsi_period).latest_simple())
    );
    let _ = writeln!(
        out,
        "  VaR({:.0}%):         {}",
        settings.var_confidence * 100.0,
        fmt_opt(metrics.value_at_risk(settings.var_confidence))
    );
    let _ = writeln!(
        out,
        "  Sharpe:            {}",
        fmt_opt(metrics.sharpe_ratio(settings.risk_free_rate, settings.periods_per_year))
    );
    let _ = writeln!(out, "  max drawdown:      {}", fmt_opt(metrics.max_drawdown()));
    let _ = writeln!(
        out,
        "  autocorr(lag {}): {}",
        cycle_lag,
        fmt_opt(metrics.cycle_length(cycle_lag))
    );
    if let Some((other, corr)) = correlation {
        let _ = writeln!(out, "  corr vs {other}:     {}", fmt_opt(corr));
    }
    if let Some(f) = fundamentals {
        let _ = writeln!(out, "fundamentals");
        if f.is_empty() {
            let _ = writeln!(out, "  none reported");
            return out;
        }
        for (name, value) in [
            ("P/E", f.pe_ratio),
            ("P/B", f.pb_ratio),
            ("dividend yield %", f.dividend_yield),
            ("EPS", f.eps),
            ("debt/equity", f.debt_to_equity),
            ("ROE %", f.roe),
        ] {
            let _ = writeln!(out, "  {name:<18} {}", fmt_opt(value));
        }
    }
    out
}

async fn run_signal(ctx: &Context, symbol: &str, prices: &PriceArgs) -> Result<(), BalanceWheelError> {
    let settings = ctx.settings()?;
    let source = ctx.price_source(prices)?;
    let symbol = symbol.to_ascii_uppercase();
    let metrics = load_metrics(source.as_ref(), &symbol, settings.history_days).await?;
    let signal = generate_signal(&metrics, &settings)?;
    println!("{symbol}: {signal}");
    Ok(())
}

async fn run_portfolio(ctx: &Context, prices: &PriceArgs) -> Result<(), BalanceWheelError> {
    let holdings = Holdings::from_config(&ctx.config)?;
    let source = ctx.price_source(prices)?;
    let end = today();
    let start = end - Duration::days(LATEST_CLOSE_LOOKBACK_DAYS);

    let mut latest = HashMap::new();
    for symbol in holdings.symbols() {
        match source.fetch_daily(symbol, start, end).await {
            Ok(bars) => {
                if let Some(bar) = normalize(bars).last() {
                    latest.insert(symbol.to_string(), bar.close);
                }
            }
            Err(BalanceWheelError::NoData { .. }) => {
                warn!(symbol, "no price data");
            }
            Err(e) => return Err(e),
        }
    }

    print!("{}", format_portfolio(&holdings.value(&latest)));
    Ok(())
}

pub fn format_portfolio(summary: &PortfolioSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>8} {:>12} {:>14} {:>14} {:>9}",
        "symbol", "shares", "price", "value", "gain", "gain %"
    );
    for p in &summary.positions {
        let _ = writeln!(
            out,
            "{:<8} {:>8} {:>12.2} {:>14.2} {:>14.2} {:>9}",
            p.symbol,
            p.shares,
            p.price,
            p.current_value,
            p.gain,
            p.gain_pct.map_or_else(|| "n/a".to_string(), |g| format!("{g:.2}")),
        );
    }
    let _ = writeln!(
        out,
        "total value {:.2}, cost {:.2}, gain {:.2} ({})",
        summary.total_current_value,
        summary.total_purchase_value,
        summary.total_gain,
        summary
            .total_gain_pct
            .map_or_else(|| "n/a".to_string(), |g| format!("{g:.2}%")),
    );
    if !summary.missing_prices.is_empty() {
        let _ = writeln!(out, "no price for: {}", summary.missing_prices.join(", "));
    }
    out
}

async fn run_earnings(
    ctx: &Context,
    symbol: &str,
    token: Option<String>,
    api_url: Option<String>,
    test_fraction: f64,
    seed: u64,
) -> Result<(), BalanceWheelError> {
    let token = ctx.api_key(token, "iex_token")?;
    let base_url = api_url.unwrap_or_else(|| ctx.url("iex_url", iex_earnings::DEFAULT_BASE_URL));
    let source = IexEarningsAdapter::new(ctx.client()?, token, base_url);
    let symbol = symbol.to_ascii_uppercase();

    let records = source.fetch_earnings(&symbol).await?;
    let report = train_earnings_model(&records, test_fraction, seed)?;
    print!("{}", format_earnings(&symbol, &report));
    Ok(())
}

pub fn format_earnings(symbol: &str, report: &EarningsModelReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{symbol} EPS model: {} train rows, {} test rows",
        report.train_rows, report.test_rows
    );
    let _ = writeln!(out, "  mean squared error: {}", fmt_opt(report.mse));
    let _ = writeln!(out, "  r^2 score:          {}", fmt_opt(report.r2));
    let _ = writeln!(out, "  intercept:          {:.6}", report.model.intercept);
    for (name, coef) in FEATURE_NAMES.iter().zip(&report.model.coefficients) {
        let _ = writeln!(out, "  {name:<19} {coef:.6e}");
    }
    out
}

async fn run_currency(ctx: &Context, api_key: Option<String>, days: i64) -> Result<(), BalanceWheelError> {
    if !(2..=MAX_HISTORY_DAYS).contains(&days) {
        return Err(BalanceWheelError::ConfigInvalid {
            section: "cli".into(),
            key: "days".into(),
            reason: format!("need between 2 and {MAX_HISTORY_DAYS} days of history"),
        });
    }
    let key = ctx.api_key(api_key, "currency_api_key")?;
    let source = CurrencyApiAdapter::with_base_url(
        ctx.client()?,
        key,
        ctx.url("currency_api_url", currency_api::DEFAULT_BASE_URL),
    );
    let base = ctx
        .config
        .get_string("currency", "base")
        .unwrap_or_else(|| "USD".into())
        .to_ascii_uppercase();
    let quote = ctx
        .config
        .get_string("currency", "quote")
        .unwrap_or_else(|| "INR".into())
        .to_ascii_uppercase();
    let factors = MacroFactors::from_config(&ctx.config);

    let start = history_start(today(), days)?;
    let mut history = Vec::with_capacity(days as usize);
    for offset in 0..days {
        let date = start + Duration::days(offset);
        let rate = source.historical(&base, &quote, date).await?;
        history.push(FxObservation {
            date,
            rate,
            factors,
        });
    }
    let actual = source.latest(&base, &quote).await?;

    let result = forecast(&history, &factors, actual)?;
    print!("{}", format_currency(&base, &quote, &result));
    Ok(())
}

pub fn format_currency(base: &str, quote: &str, fc: &CurrencyForecast) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{quote}/{base} over {} observations", fc.observations);
    let _ = writeln!(out, "  predicted: {:.4}", fc.predicted);
    let _ = writeln!(out, "  actual:    {:.4}", fc.actual);
    let _ = writeln!(out, "  error:     {:.4}", fc.absolute_error);
    let _ = writeln!(out, "  intercept: {:.6}", fc.intercept);
    for (name, coef) in FACTOR_NAMES.iter().zip(&fc.coefficients) {
        let _ = writeln!(out, "  {name:<19} {coef:.6}");
    }
    out
}

#[cfg(feature = "web")]
async fn run_serve(ctx: &Context) -> Result<(), BalanceWheelError> {
    use crate::adapters::web::{serve, AppState, HttpSourceFactory};
    use std::net::SocketAddr;
    use std::sync::Arc;

    let settings = ctx.settings()?;
    let raw = ctx
        .config
        .get_string("server", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    let addr: SocketAddr = raw.parse().map_err(|e| BalanceWheelError::ConfigInvalid {
        section: "server".into(),
        key: "listen".into(),
        reason: format!("{raw}: {e}"),
    })?;

    let sources = HttpSourceFactory {
        client: ctx.client()?,
        alpha_vantage_url: ctx.url("alpha_vantage_url", alpha_vantage::DEFAULT_BASE_URL),
        news_api_url: ctx.url("news_api_url", news_api::DEFAULT_BASE_URL),
    };
    serve(
        addr,
        AppState {
            sources: Arc::new(sources),
            settings,
        },
    )
    .await
}

#[cfg(not(feature = "web"))]
async fn run_serve(_ctx: &Context) -> Result<(), BalanceWheelError> {
    Err(BalanceWheelError::ConfigInvalid {
        section: "server".into(),
        key: "listen".into(),
        reason: "built without the web feature".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_metrics_flags() {
        let cli = Cli::try_parse_from([
            "balancewheel",
            "metrics",
            "--symbol",
            "AAPL",
            "--csv-dir",
            "/tmp/prices",
            "--compare",
            "MSFT",
            "--days",
            "90",
        ])
        .unwrap();
        match cli.command {
            Command::Metrics {
                symbol,
                prices,
                days,
                compare,
                fundamentals,
                cycle_lag,
                ..
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(prices.csv_dir, Some(PathBuf::from("/tmp/prices")));
                assert_eq!(days, Some(90));
                assert_eq!(compare.as_deref(), Some("MSFT"));
                assert!(!fundamentals);
                assert_eq!(cycle_lag, 20);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn days_are_bounded() {
        let metrics = |days: &str| {
            Cli::try_parse_from(["balancewheel", "metrics", "-s", "AAPL", "--days", days])
        };
        assert!(metrics("36500").is_ok());
        assert!(metrics("0").is_err());
        assert!(metrics("200000000").is_err());

        let currency = |days: &str| {
            Cli::try_parse_from(["balancewheel", "currency", "--api-key", "k", "--days", days])
        };
        assert!(currency("2").is_ok());
        assert!(currency("1").is_err());
        assert!(currency("36501").is_err());
    }

    #[test]
    fn serve_requires_config() {
        assert!(Cli::try_parse_from(["balancewheel", "serve"]).is_err());
    }

    #[test]
    fn api_key_prefers_flag_then_config() {
        let ctx = Context {
            config: FileConfigAdapter::from_string("[api]\nnews_api_key = from-file\n").unwrap(),
        };
        assert_eq!(ctx.api_key(Some("flag".into()), "news_api_key").unwrap(), "flag");
        assert_eq!(ctx.api_key(None, "news_api_key").unwrap(), "from-file");
        assert_eq!(ctx.api_key(Some("  ".into()), "news_api_key").unwrap(), "from-file");
        assert!(matches!(
            ctx.api_key(None, "iex_token").unwrap_err(),
            BalanceWheelError::ConfigMissing { .. }
        ));
    }

    #[test]
    fn url_override_and_default() {
        let ctx = Context {
            config: FileConfigAdapter::from_string("[api]\nnews_api_url = http://localhost:9/v2\n")
                .unwrap(),
        };
        assert_eq!(ctx.url("news_api_url", "x"), "http://localhost:9/v2");
        assert_eq!(ctx.url("iex_url", "https://default"), "https://default");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let ctx = Context {
            config: FileConfigAdapter::from_string("[api]\ntimeout_secs = 0\n").unwrap(),
        };
        assert!(ctx.client().is_err());
    }

    #[test]
    fn portfolio_report_lists_missing_prices() {
        let mut prices = HashMap::new();
        prices.insert("AAPL".to_string(), 200.0);
        let text = format_portfolio(&Holdings::default().value(&prices));
        assert!(text.contains("AAPL"));
        assert!(text.contains("10000.00"));
        assert!(text.contains("no price for: TSLA, MSFT"));
    }
}
