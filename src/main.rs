use anyhow::Context;
use clap::Parser;
use engagement_scoping::config::{CliArgs, EngagementConfig, LogFormat};
use engagement_scoping::utils::error::{ErrorSeverity, ScopingError};
use engagement_scoping::utils::{logger, validation::Validate};
use engagement_scoping::{Catalog, EngagementEstimate, ScopingEngine};
use serde::Serialize;

#[derive(Serialize)]
struct EstimateReport<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    engagement: &'a engagement_scoping::config::EngagementInfo,
    estimate: &'a EngagementEstimate,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    match args.log_format {
        LogFormat::Compact => logger::init_cli_logger(args.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::info!("Starting scope-estimate");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let (config, estimate) = match load_and_estimate(&args) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(
                "❌ Estimation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            return Ok(());
        }
    };

    let Some(estimate) = estimate else {
        print_dry_run(&config);
        return Ok(());
    };

    if args.json {
        let report = EstimateReport {
            generated_at: chrono::Utc::now(),
            engagement: &config.engagement,
            estimate: &estimate,
        };
        let json = serde_json::to_string_pretty(&report).context("failed to serialize estimate")?;
        println!("{}", json);
    } else {
        print_summary(&config, &estimate);
    }

    tracing::info!("✅ Estimate for '{}' completed", config.engagement.project_name);
    Ok(())
}

/// Returns no estimate on a dry run.
fn load_and_estimate(
    args: &CliArgs,
) -> Result<(EngagementConfig, Option<EngagementEstimate>), ScopingError> {
    let config = EngagementConfig::from_file(&args.config)?;
    config.validate()?;
    tracing::info!(
        "📄 Loaded engagement '{}' for {} ({} answers)",
        config.engagement.project_name,
        config.engagement.client_name,
        config.scope.len()
    );

    let catalog = Catalog::shared()?;
    config.validate_roles(catalog)?;

    if args.dry_run {
        return Ok((config, None));
    }

    let estimate = ScopingEngine::new(catalog).run(&config.submission());
    Ok((config, Some(estimate)))
}

fn print_dry_run(config: &EngagementConfig) {
    println!("🔎 Dry run: {}", config.engagement.project_name);
    println!("   Client: {}", config.engagement.client_name);
    println!(
        "   Answers: {} ({} in scope)",
        config.scope.len(),
        config.in_scope_count()
    );
    if config.selected_roles.is_empty() {
        println!("   Roles: none selected, allocation will be empty");
    } else {
        println!("   Roles: {}", config.selected_roles.join(", "));
    }
}

fn print_summary(config: &EngagementConfig, estimate: &EngagementEstimate) {
    let scope = &estimate.scope;
    let effort = &estimate.effort;

    println!(
        "📊 {} / {}",
        config.engagement.client_name, config.engagement.project_name
    );
    println!(
        "   Weightage {} -> {} ({} of {} items in scope)",
        scope.total_weightage, scope.tier.name, scope.summary.in_scope_count, scope.summary.total_items
    );
    println!();
    println!("{:<45} {:>10} {:>10}", "Category", "Hours", "Days");
    for category in &effort.categories {
        println!(
            "{:<45} {:>10.2} {:>10.2}",
            category.name, category.final_hours, category.days
        );
    }
    println!(
        "{:<45} {:>10.2} {:>10.2}   ({:.2} months)",
        "Total", effort.summary.total_hours, effort.summary.total_days, effort.summary.total_months
    );

    println!();
    println!("{:<30} {:>10} {:>10} {:>8}", "Role", "Hours", "Days", "Months");
    for role in &estimate.allocation.roles {
        println!(
            "{:<30} {:>10.2} {:>10.2} {:>8.2}",
            role.role, role.hours, role.days, role.months
        );
    }

    println!();
    println!("Key design decisions:");
    for kdd in &estimate.key_design_decisions {
        println!("   {} {}", kdd.id, kdd.title);
    }
}
