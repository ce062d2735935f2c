//! CLI entrypoint for model-ensemble
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use ensemble_application::{
    ConversationLogger, LlmGateway, NoConversationLogger, NoProgress, OrchestrateUseCase,
    PerformanceLedger, ProgressNotifier,
};
use ensemble_domain::{ConfigIssue, OutputFormat, Severity};
use ensemble_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, RoutingGateway};
use ensemble_presentation::{Cli, ConsoleFormatter, ProgressReporter};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting model-ensemble v{}", env!("CARGO_PKG_VERSION"));

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    report_issues(&file_config)?;

    let Some(question) = cli.question.as_deref() else {
        bail!("A question is required. See --help for usage.");
    };

    let mut collaboration = file_config.to_collaboration_config();
    if let Some(topology) = cli.topology {
        collaboration = collaboration.with_topology(topology.into());
    }
    if let Some(combination) = cli.combination {
        collaboration = collaboration.with_combination(combination.into());
    }
    if let Some(max_models) = cli.max_models {
        collaboration = collaboration.with_max_models(max_models);
    }

    let mut params = file_config.to_execution_params();
    if let Some(secs) = cli.timeout {
        params = params.with_call_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(file_config.output.format)
        .unwrap_or_default();
    if !file_config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> = Arc::new(RoutingGateway::from_config(&file_config.providers)?);
    let ledger = Arc::new(PerformanceLedger::new());
    let logger: Arc<dyn ConversationLogger> = match cli.transcript.as_deref() {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => {
                warn!("Transcript disabled: cannot open {}", path.display());
                Arc::new(NoConversationLogger)
            }
        },
        None => Arc::new(NoConversationLogger),
    };

    let use_case = OrchestrateUseCase::new(gateway)
        .with_ledger(Arc::clone(&ledger))
        .with_params(params)
        .with_conversation_logger(logger);

    // Ctrl-C resolves in-flight calls as cancelled contributions
    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight calls");
            on_interrupt.cancel();
        }
    });

    let show_progress = !cli.quiet && file_config.output.show_progress && format != OutputFormat::Json;
    let progress: Box<dyn ProgressNotifier> = if show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(NoProgress)
    };

    let envelope = use_case
        .orchestrate_with_progress(
            question,
            &collaboration,
            None,
            &cli.tools,
            progress.as_ref(),
            cancellation,
        )
        .await;

    let stats = if format == OutputFormat::Full {
        ledger.stats()
    } else {
        Vec::new()
    };
    println!(
        "{}",
        ConsoleFormatter::render(format, question, &envelope, &stats).trim_end()
    );

    Ok(if envelope.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Stderr logging by verbosity, plus daily files under `log_dir` if given.
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "model-ensemble.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// Print every config issue; abort on errors.
fn report_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => eprintln!("config warning: {}", issue.message),
        }
    }
    if ConfigIssue::has_errors(&issues) {
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }
    Ok(())
}
