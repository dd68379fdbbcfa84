//! Standalone data collector CLI.

use clap::{Parser, Subcommand};
use kospi_collector::{CollectorConfig, FixedDelay, RefreshPipeline};
use kospi_core::{init_logging, kospi_top10, LogConfig, Period, TrackedSymbol};
use kospi_data::{NaverFinanceSource, PriceStore, SummaryService};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kospi-collector")]
#[command(about = "KOSPI Dashboard Data Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 추적 종목의 회사 정보/일봉 수집
    Refresh {
        /// 특정 종목만 수집 (쉼표로 구분, 예: "005930,000660")
        #[arg(long)]
        symbols: Option<String>,

        /// 수집 기간 (1m/3m/6m/1y, 기본: 설정값)
        #[arg(long)]
        period: Option<Period>,
    },

    /// 저장된 데이터 통계 출력
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화 (RUST_LOG가 있으면 우선)
    init_logging(LogConfig::new(&cli.log_level))?;

    tracing::info!("KOSPI Data Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(database_url = %config.database_url, "설정 로드 완료");

    // DB 연결
    let store = PriceStore::connect(&config.database_url).await?;
    tracing::info!("데이터베이스 연결 성공");

    match cli.command {
        Commands::Refresh { symbols, period } => {
            let tracked = determine_symbols(symbols);
            let period = period.unwrap_or(config.period);

            let pipeline = RefreshPipeline::new(
                store,
                Arc::new(NaverFinanceSource::new()),
                Arc::new(FixedDelay::new(config.request_delay())),
            );

            let report = pipeline.run(&tracked, period).await?;
            if report.errors > 0 {
                tracing::warn!(errors = report.errors, "일부 종목 수집 실패");
            }
        }
        Commands::Stats => {
            let service = SummaryService::new(store);

            let latest = service.latest_prices().await?;
            if latest.is_empty() {
                tracing::warn!("저장된 데이터가 없습니다. 먼저 refresh를 실행하세요");
            }
            for row in latest {
                tracing::info!(
                    symbol = %row.symbol,
                    name = %row.name,
                    date = %row.date,
                    close = row.close,
                    volume = row.volume,
                    "최신 종가"
                );
            }

            let stats = service.price_statistics().await?;
            for s in stats {
                tracing::info!(
                    symbol = %s.symbol,
                    name = %s.name,
                    count = s.count,
                    min_close = s.min_close,
                    max_close = s.max_close,
                    avg_close = format!("{:.1}", s.avg_close),
                    first_date = %s.first_date,
                    last_date = %s.last_date,
                    "가격 통계"
                );
            }
        }
    }

    tracing::info!("KOSPI Data Collector 종료");
    Ok(())
}

/// 수집할 종목 목록 결정 (미지정 시 코스피 상위 10개).
fn determine_symbols(symbols: Option<String>) -> Vec<TrackedSymbol> {
    match symbols {
        Some(s) => s
            .split(',')
            .map(|sym| {
                let sym = sym.trim();
                TrackedSymbol::new(sym, kospi_core::fallback_name(sym))
            })
            .collect(),
        None => kospi_top10(),
    }
}
