//! `stitch` renders one page to stdout.
//!
//! ```text
//! stitch site/about.pogon.html --options '{"title": "About"}'
//! stitch site/about.pogon.html --tag card=card.html --introspect
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use stitch::tags::ComponentTag;
use stitch::{Composer, ComposerConfig, OutputMode};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Compose a content file into its template and print the result
#[derive(Parser, Debug)]
#[command(name = "stitch")]
#[command(version)]
struct Cli {
    /// Content file to render
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Render options as a JSON value
    #[arg(long, value_name = "JSON", conflicts_with = "options_file")]
    options: Option<String>,

    /// Read render options from a JSON file
    #[arg(long, value_name = "PATH")]
    options_file: Option<PathBuf>,

    /// Composer settings file (.yaml, .yml or .json)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Template used when the page does not name one
    #[arg(long, value_name = "NAME")]
    default_template: Option<String>,

    /// Print the introspection record instead of markup
    #[arg(long)]
    introspect: bool,

    /// Maximum outlet resolution passes (0 for no limit)
    #[arg(long, value_name = "N")]
    max_passes: Option<usize>,

    /// Resolve <NAME> elements to a component file, e.g. `card=card.html`
    #[arg(long = "tag", value_name = "NAME=FILE", value_parser = parse_tag)]
    tags: Vec<(String, String)>,
}

impl Cli {
    fn composer_config(&self) -> Result<ComposerConfig> {
        let mut config = match &self.config {
            Some(path) => ComposerConfig::load(path)?,
            None => ComposerConfig::new(),
        };
        if let Some(name) = &self.default_template {
            config.default_template = name.clone();
        }
        if let Some(max_passes) = self.max_passes {
            config.max_passes = max_passes;
        }
        if self.introspect {
            config.mode = OutputMode::Introspect;
        }
        Ok(config)
    }

    fn render_options(&self) -> Result<Value> {
        if let Some(json) = &self.options {
            return serde_json::from_str(json).context("--options is not valid JSON");
        }
        if let Some(path) = &self.options_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()));
        }
        Ok(Value::Object(Default::default()))
    }
}

fn parse_tag(raw: &str) -> Result<(String, String)> {
    let Some((name, file)) = raw.split_once('=') else {
        bail!("expected NAME=FILE, got `{raw}`");
    };
    let (name, file) = (name.trim(), file.trim());
    if name.is_empty() || file.is_empty() {
        bail!("expected NAME=FILE, got `{raw}`");
    }
    Ok((name.to_string(), file.to_string()))
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let options = cli.render_options()?;
    let composer = Composer::with_config(cli.composer_config()?);
    for (name, file) in &cli.tags {
        composer.register_tag(name, ComponentTag::new(file.clone()));
    }

    let output = composer.render(&cli.file, &options).await?;
    println!("{}", output.into_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tag_pairs() {
        assert_eq!(
            parse_tag("card=parts/card.html").unwrap(),
            ("card".to_string(), "parts/card.html".to_string())
        );
        assert!(parse_tag("card").is_err());
        assert!(parse_tag("=card.html").is_err());
        assert!(parse_tag("card=").is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("stitch.yaml");
        std::fs::write(&config_path, "default_template: base.html\nmax_passes: 8\n").unwrap();

        let cli = Cli::try_parse_from([
            "stitch",
            "page.html",
            "--config",
            config_path.to_str().unwrap(),
            "--max-passes",
            "3",
            "--introspect",
        ])
        .unwrap();
        let config = cli.composer_config().unwrap();

        assert_eq!(config.default_template, "base.html");
        assert_eq!(config.max_passes, 3);
        assert_eq!(config.mode, OutputMode::Introspect);
    }

    #[test]
    fn options_default_to_empty_object() {
        let cli = Cli::try_parse_from(["stitch", "page.html"]).unwrap();
        assert_eq!(cli.render_options().unwrap(), json!({}));

        let cli = Cli::try_parse_from(["stitch", "page.html", "--options", r#"{"a": 1}"#]).unwrap();
        assert_eq!(cli.render_options().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn options_and_options_file_conflict() {
        let result = Cli::try_parse_from([
            "stitch",
            "page.html",
            "--options",
            "{}",
            "--options-file",
            "o.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn repeated_tags_collected() {
        let cli =
            Cli::try_parse_from(["stitch", "p.html", "--tag", "a=a.html", "--tag", "b=b.html"]).unwrap();
        assert_eq!(cli.tags.len(), 2);
        assert_eq!(cli.tags[1].0, "b");
    }
}
