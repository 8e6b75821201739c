mod commands;
mod config;
mod demo;
mod interactive;
mod output;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{CliConfig, Overrides};

const DEMO_TOPIC: &str = "google";

#[derive(Parser)]
#[command(name = "wikicorpus")]
#[command(about = "Build and inspect a topic corpus from an encyclopedia article", long_about = None)]
struct Cli {
    /// Seed topic, e.g. "data mining"
    topic: Option<String>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Walk through every corpus and analyzer operation
    Demo {
        /// Sections to analyze (defaults to the first three after the introduction)
        #[arg(long = "section")]
        sections: Vec<String>,

        /// A second seed topic opened from the first corpus
        #[arg(long)]
        second_topic: Option<String>,
    },

    /// List the sections of the seed page
    Sections,

    /// List topics, optionally restricted to sections
    Topics {
        #[arg(long = "section")]
        sections: Vec<String>,
    },

    /// List cache file ids, optionally restricted to sections
    Files {
        #[arg(long = "section")]
        sections: Vec<String>,
    },

    /// Print the cleaned text of the documents linked from sections
    Raw {
        #[arg(long = "section", required = true)]
        sections: Vec<String>,
    },

    /// Print the first words of the selected documents
    Words {
        #[arg(long = "section")]
        sections: Vec<String>,

        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// Pair each word with the topic it came from
        #[arg(long)]
        tagged: bool,
    },

    /// Word/topic frequency report over the selected documents
    Analyze {
        #[arg(long = "section")]
        sections: Vec<String>,

        /// Number of entries in each ranking
        #[arg(short, default_value_t = 30)]
        n: usize,

        /// Words that must all occur in a topic
        #[arg(long = "word")]
        words: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,topic_corpus=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env()?.with_overrides(cli.overrides)?;

    let Some(command) = cli.command else {
        output::banner();
        return interactive::run(&config, cli.topic).await;
    };

    match command {
        Command::Demo { sections, second_topic } => {
            let topic = cli.topic.as_deref().unwrap_or(DEMO_TOPIC);
            demo::run(&config, topic, sections, second_topic).await
        }
        command => {
            let Some(topic) = cli.topic else {
                bail!("A seed topic is required for this command");
            };
            run_command(&config, &topic, command).await
        }
    }
}

async fn run_command(config: &CliConfig, topic: &str, command: Command) -> Result<()> {
    let corpus = commands::open_corpus(config, topic).await?;

    match command {
        Command::Sections => commands::sections(&corpus),
        Command::Topics { sections } => commands::topics(&corpus, commands::section_selector(sections))?,
        Command::Files { sections } => commands::files(&corpus, commands::section_selector(sections))?,
        Command::Raw { sections } => commands::raw(&corpus, commands::section_selector(sections)).await?,
        Command::Words { sections, limit, tagged } => {
            commands::words(&corpus, commands::section_selector(sections), limit, tagged).await?
        }
        Command::Analyze { sections, n, words, json } => {
            commands::analyze(&corpus, commands::section_selector(sections), n, words, json).await?
        }
        Command::Demo { .. } => unreachable!(),
    }

    Ok(())
}
