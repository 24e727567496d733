mod cli;

use crate::cli::{Command, CreateArgs, LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde_json::{json, Value};
use snaplink_shortener::{CreateParams, Shortener, ShortenerConfig, ShortenerError, ShortenerService};
use snaplink_storage::{FileRepository, InMemoryRepository, Repository};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = CLI::parse();
    init_tracing(cli.log_format);

    let config = ShortenerConfig::builder()
        .base_url(cli.base_url.clone())
        .code_length(cli.code_length)
        .smart_alias(!cli.no_smart_alias)
        .build();
    config.validate()?;

    info!(
        base_url = %config.base_url,
        storage_backend = %cli.storage,
        storage_file = %cli.storage_file.display(),
        "starting snaplink"
    );

    let output = match cli.storage {
        StorageBackendArg::File => {
            let repository = FileRepository::load(&cli.storage_file);
            run(ShortenerService::new(repository, config), cli.command).await?
        }
        StorageBackendArg::InMemory => {
            run(ShortenerService::new(InMemoryRepository::new(), config), cli.command).await?
        }
    };

    match output {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            debug!(error = %e, status = e.status_code(), "command failed");
            eprintln!("{}", serde_json::to_string_pretty(&error_json(&e))?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => subscriber.init(),
        LogFormatArg::Json => subscriber.json().init(),
    }
}

/// Runs one command. The outer error is for failures of the tool itself,
/// the inner one for engine errors reported to the user.
async fn run<R: Repository>(
    service: ShortenerService<R>,
    command: Command,
) -> anyhow::Result<Result<Value, ShortenerError>> {
    let base_url = service.config().base_url().to_string();

    let output = match command {
        Command::Create(args) => {
            let params = create_params(args, Timestamp::now())?;
            render(
                service
                    .create(params)
                    .await
                    .map(|created| created.record.to_info(&base_url)),
            )?
        }
        Command::Bulk { mut urls, file } => {
            if let Some(path) = file {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                urls.extend(
                    content
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string),
                );
            }

            let results = service.bulk_create(urls.clone()).await;
            let entries: Vec<Value> = urls
                .iter()
                .zip(results)
                .map(|(url, result)| match result {
                    Ok(created) => json!({
                        "url": url,
                        "short_url": created.short_url,
                        "short_code": created.record.short_code,
                    }),
                    Err(e) => json!({ "url": url, "error": e.to_string() }),
                })
                .collect();
            Ok(Value::Array(entries))
        }
        Command::Resolve { code, password } => {
            render(service.resolve(&code, password.as_deref()).await)?
        }
        Command::Info { code } => render(service.info(&code).await)?,
        Command::Delete { code } => service
            .delete(&code)
            .await
            .map(|()| json!({ "deleted": code })),
        Command::List { limit, offset } => render(service.list(limit, offset).await)?,
        Command::Recent { limit } => render(service.recent(limit).await)?,
        Command::Stats => render(service.stats().await)?,
        Command::Embed { code } => render(service.render_embed(&code).await)?,
    };

    Ok(output)
}

/// Converts a successful engine result to JSON, leaving engine errors as they are.
fn render<T: serde::Serialize>(
    result: Result<T, ShortenerError>,
) -> anyhow::Result<Result<Value, ShortenerError>> {
    match result {
        Ok(value) => Ok(Ok(
            serde_json::to_value(value).context("failed to serialize command output")?
        )),
        Err(e) => Ok(Err(e)),
    }
}

fn create_params(args: CreateArgs, now: Timestamp) -> anyhow::Result<CreateParams> {
    let expiry_at = match (args.expires_at, args.expires_in) {
        (Some(at), _) => Some(at),
        (None, Some(span)) => Some(
            now.to_zoned(TimeZone::UTC)
                .checked_add(span)
                .with_context(|| format!("expiry {span} is out of range"))?
                .timestamp(),
        ),
        (None, None) => None,
    };

    Ok(CreateParams {
        long_url: args.url,
        custom_alias: args.alias,
        description: args.description,
        expiry_at,
        password: args.password,
    })
}

fn error_json(error: &ShortenerError) -> Value {
    json!({
        "error": error.to_string(),
        "status": error.status_code(),
    })
}
