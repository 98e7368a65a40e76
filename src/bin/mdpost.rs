//! CLI binary for mdpost.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PipelineConfig` and prints the rendered HTML.

use anyhow::{Context, Result};
use clap::Parser;
use mdpost::{run, run_to_file, PipelineConfig, PrefixRule, UrlPrefix};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r##"EXAMPLES:
  # Render a page to stdout
  mdpost page.md

  # Render to a file, prefixing every local link and image
  mdpost page.md --url-prefix /site/ -o page.html

  # Different prefixes for images and links
  mdpost page.md --image-prefix /static/ --anchor-prefix /docs/

  # Keyed prefixes: URLs starting with KEY get PREFIX prepended, in order
  mdpost page.md --prefix-map img/=/cdn/ --prefix-map docs/=/v2/

  # Fall back to literal text when the page does not exist
  mdpost missing.md --text "# Coming soon"

  # Load prefixes from a JSON config (flags override it)
  mdpost page.md --config mdpost.json

CONFIG FILE (JSON):
  {
    "text": "# Default page",
    "url_prefix": { "keyed": [ { "key": "img/", "prefix": "/cdn/" } ] },
    "ids_as_classes": false
  }

ENVIRONMENT VARIABLES:
  MDPOST_OUTPUT, MDPOST_TEXT, MDPOST_URL_PREFIX, MDPOST_IMAGE_PREFIX,
  MDPOST_ANCHOR_PREFIX, MDPOST_CONFIG, MDPOST_VERBOSE, MDPOST_QUIET
  RUST_LOG overrides the log filter chosen by -v / -q.
"##;

/// Post-process Markdown into HTML.
#[derive(Parser, Debug)]
#[command(
    name = "mdpost",
    version,
    about = "Render Markdown to HTML with local URL prefixes, embedded block rendering, paragraph attributes and typographic dashes",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file. When missing (or not given) the --text fallback is used.
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "MDPOST_OUTPUT")]
    output: Option<PathBuf>,

    /// Literal Markdown used when INPUT is absent or does not exist.
    #[arg(long, env = "MDPOST_TEXT")]
    text: Option<String>,

    /// Prefix for every local image and link URL (overrides the per-category prefixes).
    #[arg(long, env = "MDPOST_URL_PREFIX", conflicts_with = "prefix_map")]
    url_prefix: Option<String>,

    /// Prefix for local image URLs.
    #[arg(long, env = "MDPOST_IMAGE_PREFIX")]
    image_prefix: Option<String>,

    /// Prefix for local link URLs.
    #[arg(long, env = "MDPOST_ANCHOR_PREFIX")]
    anchor_prefix: Option<String>,

    /// Keyed URL prefix as KEY=PREFIX; repeat for more rules, applied in order.
    #[arg(long = "prefix-map", value_name = "KEY=PREFIX", value_parser = parse_prefix_rule)]
    prefix_map: Vec<PrefixRule>,

    /// JSON file with a PipelineConfig. Flags override its values.
    #[arg(long, env = "MDPOST_CONFIG")]
    config: Option<PathBuf>,

    /// Emit `#name` paragraph annotations as classes instead of an id.
    #[arg(long)]
    ids_as_classes: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDPOST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDPOST_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let input = cli.input.as_deref();

    // ── Run pipeline ─────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let written = run_to_file(&config, input, output_path).context("Rendering failed")?;
        if !written {
            anyhow::bail!("{}", unavailable_message(&cli));
        }
        if !cli.quiet {
            eprintln!("Wrote {}", output_path.display());
        }
    } else {
        let html = run(&config, input)
            .context("Rendering failed")?
            .ok_or_else(|| anyhow::anyhow!(unavailable_message(&cli)))?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(html.as_bytes())
            .context("Failed to write to stdout")?;
        if !html.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

/// Map CLI args (and the optional JSON config) to `PipelineConfig`.
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let base = match cli.config {
        Some(ref path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => PipelineConfig::default(),
    };

    let mut builder = PipelineConfig::builder()
        .url_prefix(base.url_prefix)
        .image_prefix(base.image_prefix)
        .anchor_prefix(base.anchor_prefix)
        .ids_as_classes(base.ids_as_classes || cli.ids_as_classes);

    if let Some(text) = cli.text.clone().or(base.text) {
        builder = builder.text(text);
    }
    if let Some(ref prefix) = cli.url_prefix {
        builder = builder.url_prefix(prefix.as_str());
    }
    if !cli.prefix_map.is_empty() {
        builder = builder.url_prefix(UrlPrefix::Keyed(cli.prefix_map.clone()));
    }
    if let Some(ref prefix) = cli.image_prefix {
        builder = builder.image_prefix(prefix.as_str());
    }
    if let Some(ref prefix) = cli.anchor_prefix {
        builder = builder.anchor_prefix(prefix.as_str());
    }

    builder.build().context("Invalid configuration")
}

/// Parse a `--prefix-map` value of the form `KEY=PREFIX`.
///
/// The key may be empty (`=/site/` matches every local URL); the prefix may not.
fn parse_prefix_rule(s: &str) -> Result<PrefixRule, String> {
    let (key, prefix) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PREFIX, got '{s}'"))?;
    if prefix.is_empty() {
        return Err(format!("empty prefix in '{s}'"));
    }
    Ok(PrefixRule::new(key, prefix))
}

fn unavailable_message(cli: &Cli) -> String {
    match cli.input {
        Some(ref path) => format!(
            "{} does not exist and no --text fallback was given",
            path.display()
        ),
        None => "no INPUT file and no --text given; nothing to render".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_long_help_includes_examples() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains(r##"--text "# Coming soon""##), "got: {help}");
        assert!(help.contains(r##""text": "# Default page""##), "got: {help}");
        assert!(help.contains("RUST_LOG overrides"), "got: {help}");
    }

    #[test]
    fn test_parse_prefix_rule() {
        assert_eq!(
            parse_prefix_rule("img/=/cdn/").unwrap(),
            PrefixRule::new("img/", "/cdn/")
        );
        assert_eq!(parse_prefix_rule("=/site/").unwrap(), PrefixRule::new("", "/site/"));
        assert_eq!(
            parse_prefix_rule("a=b=c").unwrap(),
            PrefixRule::new("a", "b=c")
        );
        assert!(parse_prefix_rule("img/").is_err());
        assert!(parse_prefix_rule("img/=").is_err());
    }

    #[test]
    fn test_prefix_map_builds_keyed_url_prefix() {
        let cli = Cli::parse_from([
            "mdpost",
            "page.md",
            "--prefix-map",
            "img/=/cdn/",
            "--prefix-map",
            "docs/=/v2/",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(
            config.url_prefix,
            UrlPrefix::keyed([("img/", "/cdn/"), ("docs/", "/v2/")])
        );
    }

    #[test]
    fn test_url_prefix_conflicts_with_prefix_map() {
        let result = Cli::try_parse_from([
            "mdpost",
            "--url-prefix",
            "/a/",
            "--prefix-map",
            "x=/y/",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "text": "from config", "image_prefix": {{ "uniform": "/old/" }} }}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from([
            "mdpost",
            "--config",
            path.as_str(),
            "--image-prefix",
            "/new/",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.text.as_deref(), Some("from config"));
        assert_eq!(config.image_prefix, UrlPrefix::uniform("/new/"));
    }
}
