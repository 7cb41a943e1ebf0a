use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream::Stderr};
use tana_doi::{
    Format, HttpResolver, LinkTable, ResolverConfig,
    cli::{Cli, Command, OutputArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tana_doi=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let result = match args.command {
        Command::Fetch {
            doi,
            output,
            resolver,
            timeout,
        } => {
            let (links, format) = output_options(&output)?;
            let resolver = HttpResolver::new(ResolverConfig {
                base: resolver,
                timeout_global: Duration::from_secs(timeout),
                ..ResolverConfig::default()
            });

            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message(format!("resolving {doi}"));
            spinner.enable_steady_tick(Duration::from_millis(100));
            let result = tana_doi::process(&doi, &resolver, &links, format);
            spinner.finish_and_clear();
            result
        }
        Command::Render { input, output } => {
            let (links, format) = output_options(&output)?;
            let body = input
                .read_to_string()
                .with_context(|| format!("failed to read {input:?}"))?;
            let raw = serde_json::from_str(&body)
                .with_context(|| format!("{input:?} does not hold JSON"))?;
            tana_doi::normalize(&raw, &links, format)
        }
    };

    // Failures are part of the document handed back, not a reason to exit non-zero.
    let (ok, failed) = match result {
        Ok(text) => {
            println!("{text}");
            (1, 0)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "rendering failed");
            println!("{err}");
            (0, 1)
        }
    };
    eprintln!(
        "{} {}",
        format!("✓ {ok}").if_supports_color(Stderr, |t| t.green()),
        format!("✗ {failed}").if_supports_color(Stderr, |t| t.red()),
    );
    Ok(())
}

fn output_options(output: &OutputArgs) -> anyhow::Result<(LinkTable, Format)> {
    let links = match &output.links {
        Some(input) => {
            let document = input
                .read_to_string()
                .with_context(|| format!("failed to read links from {input:?}"))?;
            let links = LinkTable::from_document(&document);
            tracing::debug!(count = links.len(), "loaded link table");
            links
        }
        None => LinkTable::default(),
    };
    let format = if output.json {
        Format::Json
    } else {
        Format::Outline
    };
    Ok((links, format))
}
