// Copyright 2026 Kadrovik Feed Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod acquisition;
mod cache;
mod cli;
mod config;
mod service;
mod types;

#[derive(Parser)]
#[command(
    name = "kadrovik-feed",
    about = "Kadrovik Feed — fetch, extract, and cache kadrovik.uz content",
    version,
    after_help = "Run 'kadrovik-feed <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Newest articles from the home listing
    Latest {
        /// Site language variant ("ru" or "uz")
        #[arg(long, default_value = "ru")]
        lang: String,
        /// Maximum number of articles
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Search articles by keyword
    Search {
        /// Search query
        query: String,
        /// Site language variant ("ru" or "uz")
        #[arg(long, default_value = "ru")]
        lang: String,
    },
    /// List the site's topic index
    Topics,
    /// Articles listed on a topic page
    TopicArticles {
        /// Absolute topic URL
        url: String,
        /// Maximum number of articles
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Full text of one article
    Article {
        /// Absolute article URL
        url: String,
    },
    /// Manage the persisted cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove the cache file
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "kadrovik_feed=debug"
    } else {
        "kadrovik_feed=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().expect("static directive is valid")),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Latest { lang, limit } => cli::latest_cmd::run(&lang, limit, cli.json).await,
        Commands::Search { query, lang } => cli::search_cmd::run(&query, &lang, cli.json).await,
        Commands::Topics => cli::topics_cmd::run(cli.json).await,
        Commands::TopicArticles { url, limit } => {
            cli::topic_articles_cmd::run(&url, limit, cli.json).await
        }
        Commands::Article { url } => cli::article_cmd::run(&url, cli.json).await,
        Commands::Cache { action } => match action {
            CacheAction::Clear => cli::cache_cmd::run_clear(),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "kadrovik-feed", &mut std::io::stdout());
            Ok(())
        }
    }
}
