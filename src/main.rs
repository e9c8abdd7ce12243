//! Site graph CLI
//!
//! Entry point for the `site-graph` command-line tool.

use clap::{Parser, Subcommand};
use site_graph::config::load_config;
use site_graph::{DecisionKind, ExplainOutput, PageFrontmatter, RuleEngine, SiteGraphConfig};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "site-graph")]
#[command(about = "Site graph configuration and rule diagnostics", version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print a summary
    Verify {
        /// Config files (.json or .toml), merged in order
        #[arg(long = "config", short = 'c')]
        configs: Vec<PathBuf>,
    },

    /// Explain a single decision
    Explain {
        /// Config files (.json or .toml), merged in order
        #[arg(long = "config", short = 'c')]
        configs: Vec<PathBuf>,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Page frontmatter as a JSON object
        #[arg(long)]
        frontmatter: Option<String>,

        /// Decision to explain: page, link, backlinks or tags
        kind: DecisionKind,

        /// Content file path, link target or page slug
        candidate: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Verify { configs } => {
            run_verify(&configs);
        }
        Commands::Explain {
            configs,
            human,
            frontmatter,
            kind,
            candidate,
        } => {
            run_explain(&configs, human, frontmatter.as_deref(), kind, &candidate);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("site_graph=debug,site_graph_rules=debug")
    } else {
        EnvFilter::new("site_graph=info,site_graph_rules=info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn load_or_exit(configs: &[PathBuf]) -> SiteGraphConfig {
    debug!(files = configs.len(), "loading configuration");
    match load_config(configs) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn run_verify(configs: &[PathBuf]) {
    let config = load_or_exit(configs);
    let sitemap = &config.sitemap_config;
    let engine = RuleEngine::new(&config);

    println!("Configuration valid");
    println!();
    println!("  Content root: {}", sitemap.content_root);
    println!("  External links: {}", sitemap.include_external_links);
    println!("  Ignore Starlight links: {}", sitemap.ignore_starlight_links);
    println!(
        "  Page rules: {} ({} effective)",
        sitemap.page_inclusion_rules.len(),
        engine.page_rules().len()
    );
    println!("  Link rules: {}", sitemap.link_inclusion_rules.len());
    println!(
        "  Backlinks visibility rules: {}",
        config.backlinks_config.visibility_rules.len()
    );
    if !sitemap.tag_rules.is_empty() {
        let tags: Vec<&str> = sitemap.tag_rules.iter().map(|(tag, _)| tag).collect();
        println!("  Tags: {}", tags.join(", "));
    }
    if !sitemap.page_titles.is_empty() {
        println!("  Page titles: {}", sitemap.page_titles.len());
    }
    if let Some(ref explicit) = sitemap.sitemap {
        println!("  Explicit sitemap: {} nodes", explicit.len());
    }
}

fn run_explain(
    configs: &[PathBuf],
    human: bool,
    frontmatter: Option<&str>,
    kind: DecisionKind,
    candidate: &str,
) {
    let config = load_or_exit(configs);

    let frontmatter = match frontmatter
        .map(serde_json::from_str::<PageFrontmatter>)
        .transpose()
    {
        Ok(fm) => fm,
        Err(e) => {
            eprintln!("Invalid frontmatter: {}", e);
            process::exit(1);
        }
    };

    let engine = RuleEngine::new(&config);
    let explanation = ExplainOutput::new(&engine, kind, candidate, frontmatter.as_ref());

    if human {
        println!("{}", explanation.to_human());
    } else {
        match explanation.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
}
