use anyhow::Context;
use clap::Parser;
use permesso_tracker::utils::{logger, validation::Validate};
use permesso_tracker::{CheckReport, CliConfig, Tracker, TrackerError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    let format = if cli.json {
        logger::LogFormat::Json
    } else {
        logger::LogFormat::Compact
    };
    logger::init_logger(format, cli.verbose);

    tracing::info!("Starting permesso-tracker");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load_tracker_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let tracker = match Tracker::from_config(&config) {
        Ok(tracker) => tracker,
        Err(e) => fail(&e),
    };

    let reports = tracker.check_all(&cli.codes).await;

    let mut exit_code = 0;
    for report in &reports {
        if cli.json {
            let line = serde_json::to_string(&report.to_json())
                .context("failed to serialize status report")?;
            println!("{}", line);
        } else {
            print_report(report);
        }

        if let Err(e) = &report.outcome {
            let e = TrackerError::from(e.clone());
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_code = exit_code.max(e.exit_code());
        }
    }

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn print_report(report: &CheckReport) {
    println!("📄 Permit Code: {}", report.code);
    match &report.outcome {
        Ok(status) => {
            println!("   Status: {}", status.title());
            println!("   {}", status.description());
        }
        Err(e) => {
            let e = TrackerError::from(e.clone());
            println!("   ❌ {}", e.user_friendly_message());
            println!("   💡 {}", e.recovery_suggestion());
        }
    }
}

fn fail(e: &TrackerError) -> ! {
    tracing::error!("❌ Configuration failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}
