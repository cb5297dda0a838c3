//! chart-templates CLI entrypoint
//! Scans the template roots and answers lookups the way the chart pipeline would.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chart_templates::core::templates::EnvTemplateConfigReader;
use chart_templates::{
    BackendKind, Error, RegistryConfig, Renderable, RenderableRegistry, ResolvedTemplate,
    TemplateRegistry,
};

// External imports (alphabetized)
use anyhow::{Context, bail};
use clap::Parser;
use serde_json::Value as JsonValue;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chart-templates")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Registry configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Templates root directory, overriding config and environment
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List every indexed template
    List,
    /// Resolve a chart type or chart name to a template
    Resolve {
        /// Chart type to resolve
        #[arg(long = "type", conflicts_with = "name", required_unless_present = "name")]
        chart_type: Option<String>,
        /// Chart name to resolve
        #[arg(long)]
        name: Option<String>,
        /// Backend preference for type resolution, comma separated
        #[arg(long, value_delimiter = ',', requires = "chart_type")]
        prefer: Vec<BackendKind>,
    },
}

/// Code-backed templates are executed by the chart pipeline, not by this tool
struct DeferredTemplate {
    path: PathBuf,
}

impl Renderable for DeferredTemplate {
    fn render(&self, _data: &JsonValue) -> chart_templates::Result<String> {
        Err(Error::render(format!(
            "{} can only be rendered by the chart pipeline",
            self.path.display()
        )))
    }
}

fn build_registry(
    config: Option<&Path>,
    templates_dir: Option<&Path>,
) -> anyhow::Result<TemplateRegistry> {
    let config = RegistryConfig::discover(&EnvTemplateConfigReader, config, templates_dir)
        .context("Failed to load registry configuration")?;

    let mut renderables = RenderableRegistry::new();
    renderables.set_fallback(|request| {
        Ok(Arc::new(DeferredTemplate {
            path: request.path.to_path_buf(),
        }) as Arc<dyn Renderable>)
    });

    Ok(TemplateRegistry::new(config, renderables))
}

fn print_resolved(resolved: &ResolvedTemplate) {
    println!("Backend: {}", resolved.backend);
    println!("Chart type: {}", resolved.chart_type);
    println!("Chart name: {}", resolved.chart_name);
    println!("Path: {}", resolved.handle.path().display());
    println!("Requirements: {}", resolved.requirements.to_json());
}

fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO, on stderr to keep stdout parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = build_registry(cli.config.as_deref(), cli.templates_dir.as_deref())?;
    info!(
        templates_root = %registry.config().templates_root.display(),
        "Starting chart-templates"
    );

    match &cli.command {
        Commands::List => {
            let index = registry.initialize();
            if index.is_empty() {
                println!("No templates found");
            } else {
                println!("Available templates:");
                print!("{}", index.summary());
            }
        }
        Commands::Resolve {
            chart_type,
            name,
            prefer,
        } => {
            registry.initialize();
            let (resolved, query) = match (chart_type, name) {
                (Some(chart_type), _) => {
                    let preference = (!prefer.is_empty()).then_some(prefer.as_slice());
                    (
                        registry.resolve_by_type(chart_type, preference),
                        format!("chart type '{chart_type}'"),
                    )
                }
                (None, Some(name)) => (registry.resolve_by_name(name), format!("chart name '{name}'")),
                (None, None) => bail!("Either --type or --name is required"),
            };
            let Some(resolved) = resolved else {
                bail!("No template found for {query}");
            };
            print_resolved(&resolved);
        }
    }

    Ok(())
}
