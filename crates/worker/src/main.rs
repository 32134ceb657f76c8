use anyhow::Context;
use clap::Parser;
use nivesh_core::analysis::config::AnalysisConfig;
use nivesh_core::analysis::engine::run_analysis;
use nivesh_core::domain::contract::validate_approvable;
use nivesh_core::domain::instrument::Instrument;
use nivesh_core::domain::recommendation::RecommendationBundle;
use nivesh_core::domain::series::PricePoint;
use nivesh_core::ingest::provider::{HttpJsonMarketData, MarketDataProvider};
use nivesh_core::ingest::simulated::SimulatedMarketData;
use nivesh_core::review::http::HttpReviewClient;
use nivesh_core::review::ReviewService;
use nivesh_core::time::month::{resolve_as_of_month, Month};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod universe;

#[derive(Debug, Parser)]
#[command(name = "nivesh_worker")]
struct Args {
    /// Analysis as-of month (YYYY-MM). Defaults to the last completed
    /// calendar month.
    #[arg(long)]
    as_of_month: Option<String>,

    /// Months of price history to fetch per instrument.
    #[arg(long, default_value_t = 13)]
    months: u32,

    /// Write the bundle JSON here instead of stdout.
    #[arg(long)]
    output: Option<std::path::PathBuf>,

    /// Submit the validated bundle to the review service.
    #[arg(long)]
    submit_review: bool,

    /// Run the full analysis but skip output and review submission.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = nivesh_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let as_of = resolve_as_of_month(args.as_of_month.as_deref(), chrono::Utc::now())?;

    let opts = universe::UniverseOptions::from_env();
    let (stocks, funds) = universe::build_universes(&opts)?;

    let provider = select_provider(&settings)?;
    tracing::info!(
        %as_of,
        provider = provider.provider_name(),
        stocks = stocks.len(),
        funds = funds.len(),
        months = args.months,
        "starting analysis run"
    );

    let stock_series = fetch_universe(provider.as_ref(), &stocks, as_of, args.months).await;
    let fund_series = fetch_universe(provider.as_ref(), &funds, as_of, args.months).await;

    let cfg = AnalysisConfig::from_env();
    let bundle = match run_analysis(&stock_series, &fund_series, &cfg) {
        Ok(bundle) => bundle,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(%as_of, error = %err, "analysis run failed");
            return Err(err);
        }
    };

    validate_approvable(&bundle, cfg.top_n).context("bundle violates the review contract")?;

    if args.dry_run {
        tracing::info!(
            %as_of,
            dry_run = true,
            top_stocks = bundle.top_stocks.len(),
            top_mutual_funds = bundle.top_mutual_funds.len(),
            stock_pick_periods = bundle.monthly_stock_picks.len(),
            mf_pick_periods = bundle.monthly_mf_picks.len(),
            "dry run complete; skipping output and review"
        );
        return Ok(());
    }

    write_bundle(&bundle, args.output.as_deref())?;

    if args.submit_review {
        submit_for_review(&settings, &bundle).await;
    }

    Ok(())
}

fn select_provider(
    settings: &nivesh_core::config::Settings,
) -> anyhow::Result<Box<dyn MarketDataProvider>> {
    if settings.market_data_base_url.is_some() {
        return Ok(Box::new(HttpJsonMarketData::from_settings(settings)?));
    }

    tracing::info!("MARKET_DATA_BASE_URL not set; using simulated market data");
    Ok(Box::new(SimulatedMarketData))
}

/// Fetch histories for a whole universe, tolerating per-instrument
/// failures: a missing series drops that instrument, never the run.
async fn fetch_universe(
    provider: &dyn MarketDataProvider,
    instruments: &[Instrument],
    as_of: Month,
    months: u32,
) -> Vec<(String, Vec<PricePoint>)> {
    let mut out = Vec::with_capacity(instruments.len());

    for instrument in instruments {
        match provider.fetch_monthly_history(instrument, as_of, months).await {
            Ok(resp) => out.push((instrument.id.clone(), resp.into_price_points())),
            Err(err) => {
                tracing::warn!(
                    instrument = %instrument.id,
                    error = %err,
                    "no usable history; instrument skipped"
                );
            }
        }
    }

    out
}

fn write_bundle(
    bundle: &RecommendationBundle,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(bundle).context("failed to serialize bundle")?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write bundle to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote recommendation bundle");
        }
        None => println!("{json}"),
    }

    Ok(())
}

async fn submit_for_review(
    settings: &nivesh_core::config::Settings,
    bundle: &RecommendationBundle,
) {
    let client = match HttpReviewClient::from_settings(settings) {
        Ok(client) => client,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "review client unavailable; bundle not submitted");
            return;
        }
    };

    match client.submit_bundle(bundle).await {
        Ok(verdict) if verdict.approved => {
            tracing::info!(
                service = client.service_name(),
                feedback = verdict.feedback.as_deref().unwrap_or(""),
                "bundle approved by review"
            );
        }
        Ok(verdict) => {
            tracing::warn!(
                service = client.service_name(),
                feedback = verdict.feedback.as_deref().unwrap_or(""),
                "bundle NOT approved; kept pending"
            );
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "review submission failed");
        }
    }
}

fn init_sentry(settings: &nivesh_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
