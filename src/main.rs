//! stencil - render data into (X)HTML templates

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::info;

use stencil::viewmodel::from_json;
use stencil::{AssetLoader, CsrfProtection, Document, FormData, SnippetCollection};

#[derive(Parser)]
#[command(name = "stencil")]
#[command(version, about = "Render data into (X)HTML templates", long_about = None)]
#[command(after_help = "EXAMPLES:
    stencil page.xhtml -m model.json                 Bind a JSON view model
    stencil page.xhtml -s header.xhtml -o out.xhtml  Apply a snippet file
    stencil page.xhtml --form login --field user=jane --csrf csrf=abc123")]
struct Cli {
    /// Template file; .html/.htm are parsed as HTML, anything else as XML
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// JSON view model (the "@type" key sets a type tag)
    #[arg(short, long, value_name = "FILE.json")]
    model: Option<PathBuf>,

    /// Asset file to apply as a snippet (repeatable)
    #[arg(short, long = "snippet", value_name = "FILE")]
    snippets: Vec<PathBuf>,

    /// Id or name of the form to fill with --field values
    #[arg(long, value_name = "ID", conflicts_with = "form_json")]
    form: Option<String>,

    /// Form field value (repeatable)
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_pair, requires = "form")]
    fields: Vec<(String, String)>,

    /// Form data as JSON: {"identifier": ..., "values": {...}}
    #[arg(long, value_name = "FILE.json")]
    form_json: Option<PathBuf>,

    /// CSRF field name and token
    #[arg(long, value_name = "NAME=TOKEN", value_parser = parse_pair)]
    csrf: Option<(String, String)>,

    /// Serialize as HTML instead of XML
    #[arg(long)]
    html: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut doc = Document::load(&cli.template).map_err(|e| e.to_string())?;

    if let Some(path) = &cli.model {
        let model = from_json(read_json(path)?);
        doc.apply_view_model(model).map_err(|e| e.to_string())?;
        info!("Applied view model {}", path.display());
    }

    if !cli.snippets.is_empty() {
        let loader = AssetLoader::new();
        let mut snippets = SnippetCollection::new();
        for path in &cli.snippets {
            snippets.add(loader.load(path).map_err(|e| e.to_string())?);
        }
        doc.apply_snippets(&snippets).map_err(|e| e.to_string())?;
        info!("Applied {} snippet(s)", snippets.len());
    }

    let form = match (&cli.form, &cli.form_json) {
        (Some(id), _) => Some(FormData::new(id.as_str(), cli.fields.iter().cloned())),
        (None, Some(path)) => Some(
            serde_json::from_value::<FormData>(read_json(path)?)
                .map_err(|e| format!("{}: {e}", path.display()))?,
        ),
        (None, None) => None,
    };
    if let Some(form) = form {
        doc.apply_form_data(&form).map_err(|e| e.to_string())?;
        info!("Filled form '{}'", form.identifier());
    }

    if let Some((name, token)) = &cli.csrf {
        doc.apply_csrf_protection(&CsrfProtection::new(name.as_str(), token.as_str()))
            .map_err(|e| e.to_string())?;
    }

    let out = if cli.html {
        doc.to_html_string()
    } else {
        doc.to_xml_string()
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, out).map_err(|e| format!("{}: {e}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{out}"),
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value, String> {
    let bytes = fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("{}: {e}", path.display()))
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_pair("q=").unwrap(), ("q".to_string(), String::new()));
        assert!(parse_pair("q").is_err());
    }
}
