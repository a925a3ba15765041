//! Command-line driver: seeds the instrument catalogue with synthetic price
//! history, runs a short scripted trading session through the execution
//! engine, and prints the resulting portfolio.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{Days, Months, NaiveDate, Utc};
use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use papertrader_core::instruments::InstrumentRepositoryTrait;
use papertrader_core::ledger::{
    LedgerRepositoryTrait, NewAccount, NewOrder, OrderSide, OrderType,
};
use papertrader_core::market_data::{
    MarketDataRepositoryTrait, PriceSeriesGenerator, DEFAULT_HISTORY_YEARS,
};
use papertrader_core::utils::round_money;
use papertrader_core::{OrderExecutor, OrderExecutorTrait};
use papertrader_storage_memory::{
    MemoryInstrumentRepository, MemoryLedgerRepository, MemoryMarketDataRepository,
};

#[derive(Parser)]
#[command(name = "papertrader", about = "Paper-trading simulator demo session")]
struct Args {
    /// Base seed for the synthetic price series.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Years of price history to generate.
    #[arg(long, default_value_t = DEFAULT_HISTORY_YEARS)]
    history_years: u32,

    /// Starting cash for the demo account.
    #[arg(long, default_value = "100000")]
    starting_cash: Decimal,

    /// Symbol to trade during the session.
    #[arg(long, default_value = "AAPL")]
    symbol: String,

    /// Shares for the session's market buy.
    #[arg(long, default_value_t = 50)]
    quantity: i64,
}

fn init_tracing() {
    // Core crates log through the `log` facade; bridge those records in.
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let instruments = Arc::new(MemoryInstrumentRepository::new());
    let market_data = Arc::new(MemoryMarketDataRepository::new());
    let ledger = Arc::new(MemoryLedgerRepository::new());
    let executor = OrderExecutor::new(ledger.clone(), market_data.clone());

    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_months(Months::new(args.history_years * 12))
        .context("history window underflows the calendar")?;

    tracing::info!("Seeding catalogue with history from {start} to {end}");
    let generator = PriceSeriesGenerator::new(market_data.clone());
    let bars = generator
        .seed_catalogue(instruments.as_ref(), start, end, args.seed)
        .await?;
    tracing::info!("Generated {bars} bars");

    let account = ledger
        .create_account(NewAccount {
            id: None,
            name: "Demo Account".to_string(),
            initial_cash: args.starting_cash,
        })
        .await?;

    let instrument = instruments
        .get_by_symbol(&args.symbol)?
        .ok_or_else(|| anyhow!("unknown symbol: {}", args.symbol))?;
    let latest = market_data
        .get_latest_bar(&instrument.id)?
        .ok_or_else(|| anyhow!("no price history for {}", args.symbol))?;

    // Session script: a market buy and a limit buy 2% under the latest close,
    // both dated three weeks back, then a day-by-day walk to today.
    let session_start = end
        .checked_sub_days(Days::new(21))
        .context("session window underflows the calendar")?;
    executor
        .place_order(NewOrder {
            account_id: account.id.clone(),
            instrument_id: instrument.id.clone(),
            order_type: OrderType::Market,
            side: OrderSide::Buy,
            quantity: args.quantity,
            limit_price: None,
            order_date: session_start,
        })
        .await?;
    executor
        .place_order(NewOrder {
            account_id: account.id.clone(),
            instrument_id: instrument.id.clone(),
            order_type: OrderType::Limit,
            side: OrderSide::Buy,
            quantity: args.quantity / 2,
            limit_price: Some(round_money(latest.close * dec!(0.98))),
            order_date: session_start,
        })
        .await?;

    let mut day = session_start;
    while day <= end {
        let report = executor.execute_pending_orders(&account.id, day).await?;
        if report.filled > 0 || report.rejected > 0 {
            tracing::info!(
                "{day}: {} filled, {} rejected, {} pending",
                report.filled,
                report.rejected,
                report.still_pending
            );
        }
        day = day.succ_opt().context("date overflow")?;
    }

    // Sell half of whatever the session accumulated, on the last trading day.
    if let Some(position) = ledger.get_position(&account.id, &instrument.id)? {
        if position.quantity >= 2 {
            executor
                .place_order(NewOrder {
                    account_id: account.id.clone(),
                    instrument_id: instrument.id.clone(),
                    order_type: OrderType::Market,
                    side: OrderSide::Sell,
                    quantity: position.quantity / 2,
                    limit_price: None,
                    order_date: latest.date,
                })
                .await?;
            executor
                .execute_pending_orders(&account.id, latest.date)
                .await?;
        }
    }

    executor.revalue_positions(&account.id).await?;
    print_summary(&args.symbol, ledger.as_ref(), instruments.as_ref(), &account.id)?;
    Ok(())
}

fn print_summary(
    traded_symbol: &str,
    ledger: &MemoryLedgerRepository,
    instruments: &MemoryInstrumentRepository,
    account_id: &str,
) -> Result<()> {
    let account = ledger
        .get_account(account_id)?
        .ok_or_else(|| anyhow!("demo account vanished"))?;

    println!();
    println!("=== {} ===", account.name);
    println!("Cash: {}", account.current_cash);
    println!();
    println!(
        "{:<8} {:>8} {:>12} {:>14} {:>12}",
        "Symbol", "Qty", "Avg Cost", "Value", "Unrealized"
    );
    for position in ledger.list_positions(account_id)? {
        let symbol = instruments
            .get_by_id(&position.instrument_id)?
            .map(|i| i.symbol)
            .unwrap_or_else(|| position.instrument_id.clone());
        println!(
            "{:<8} {:>8} {:>12} {:>14} {:>12}",
            symbol,
            position.quantity,
            position.average_cost,
            position.current_value,
            position.unrealized_pnl
        );
    }

    println!();
    println!("Trades in {traded_symbol}:");
    for trade in ledger.list_trades(account_id)? {
        println!(
            "  {} {} {} @ {} (commission {}, total {})",
            trade.trade_date,
            trade.side.as_str(),
            trade.quantity,
            trade.price,
            trade.commission,
            trade.total_amount
        );
    }

    println!();
    println!("Orders:");
    for order in ledger.list_orders(account_id)? {
        println!(
            "  {} {} {:?} x{} -> {:?}",
            order.order_date,
            order.side.as_str(),
            order.order_type,
            order.quantity,
            order.status
        );
    }
    Ok(())
}
