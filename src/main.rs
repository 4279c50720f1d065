use clap::Parser;
use course_tracker::utils::{logger, validation::Validate};
use course_tracker::{
    check_all, CliConfig, Command, CourseQuery, CourseTracker, ErrorCategory, StatusReport,
    TrackerError,
};
use std::sync::Arc;

fn exit_code(e: &TrackerError) -> i32 {
    match e.category() {
        ErrorCategory::NotFound | ErrorCategory::Parse => 1,
        ErrorCategory::Fetch => 2,
        ErrorCategory::Config => 3,
        ErrorCategory::System => 4,
    }
}

fn fail(e: &TrackerError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

fn print_report(report: &StatusReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    match (&report.status, &report.error) {
        (Some(status), _) => println!("{} {}: {}", report.subject, report.crn, status),
        (None, Some(error)) => println!("{} {}: error: {}", report.subject, report.crn, error),
        (None, None) => println!("{} {}: unknown", report.subject, report.crn),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        fail(&e);
    }
    let config = cli.resolve().unwrap_or_else(|e| fail(&e));
    let tracker = CourseTracker::from_config(&config).unwrap_or_else(|e| fail(&e));

    match &cli.command {
        Command::Status { crn, subject } => {
            let result = tracker.check_status(*crn, subject).await;
            if let Err(e) = &result {
                if !cli.json {
                    fail(e);
                }
            }
            let report = StatusReport::from_result(CourseQuery::new(*crn, subject.as_str()), &result);
            tracing::info!("CRN {} in {}: {:?}", crn, subject, report.status);
            print_report(&report, cli.json)?;
            if let Err(e) = &result {
                std::process::exit(exit_code(e));
            }
        }
        Command::Exists { crn, subject } => match tracker.check_validity(*crn, subject).await {
            Ok(found) => {
                tracing::info!("CRN {} in {} exists: {}", crn, subject, found);
                if cli.json {
                    println!(
                        "{}",
                        serde_json::json!({ "crn": crn, "subject": subject, "exists": found })
                    );
                } else {
                    println!("{} {}: {}", subject, crn, if found { "listed" } else { "not listed" });
                }
                if !found {
                    std::process::exit(1);
                }
            }
            Err(e) => fail(&e),
        },
        Command::Check { courses } => {
            let queries = if courses.is_empty() {
                config.queries().unwrap_or_else(|e| fail(&e))
            } else {
                courses.clone()
            };
            if queries.is_empty() {
                fail(&TrackerError::MissingConfigError {
                    field: "courses".to_string(),
                });
            }

            let reports = check_all(Arc::new(tracker), queries, config.concurrent_requests()).await;
            let failed = reports.iter().filter(|r| !r.is_ok()).count();
            for report in &reports {
                print_report(report, cli.json)?;
            }

            tracing::info!("✅ Checked {} courses, {} failed", reports.len(), failed);
            if failed > 0 {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
