use anyhow::Context;
use clap::Parser;
use host_site::domain::ports::{DiagnosticSink, HostDocument};
use host_site::utils::error::ErrorSeverity;
use host_site::utils::{logger, validation::Validate};
use host_site::{
    CliConfig, Command, ConsoleSink, LocalSite, MemoryDocument, MemorySink,
    PageInteractionLogger, ServeArgs, SimulateArgs, SiteError, SiteServer,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let outcome = match &config.command {
        Command::Serve(args) => serve(args).await,
        Command::Simulate(args) => simulate(args).await,
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<SiteError>() {
            Some(site_error) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    site_error,
                    site_error.category(),
                    site_error.severity()
                );
                eprintln!("❌ {}", site_error.user_friendly_message());
                eprintln!("💡 {}", site_error.recovery_suggestion());

                let exit_code = match site_error.severity() {
                    ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                };
                std::process::exit(exit_code);
            }
            None => Err(e),
        },
    }
}

async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let settings = args.settings()?;
    tracing::info!(
        "Serving {} on {} (index: {})",
        settings.root,
        settings.bind_address(),
        settings.index
    );

    let site = LocalSite::new(&settings.root);
    let server = SiteServer::bind(&settings.bind_address(), site, &settings.index).await?;
    server.run().await?;
    Ok(())
}

async fn simulate(args: &SimulateArgs) -> anyhow::Result<()> {
    args.validate()?;
    let html = tokio::fs::read_to_string(&args.page)
        .await
        .with_context(|| format!("reading {}", args.page.display()))?;

    let mut document = MemoryDocument::from_html(&args.document_url(), &html)?;
    let memory = Arc::new(MemorySink::new());
    let sink: Arc<dyn DiagnosticSink> = if args.json {
        memory.clone()
    } else {
        Arc::new(ConsoleSink)
    };

    PageInteractionLogger::new(sink).attach(&mut document);
    document.dispatch_ready();
    for anchor in document.anchors() {
        document.click(anchor);
    }
    tracing::info!(
        "Simulated {} clicks on {}",
        document.click_listener_count(),
        document.base_url()
    );

    if args.json {
        for record in memory.records() {
            println!("{}", serde_json::to_string(&record)?);
        }
    }
    Ok(())
}
