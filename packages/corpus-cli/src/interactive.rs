//! Menu-driven corpus inspection.

use anyhow::Result;
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input, Select};

use topic_corpus::{Corpus, Selector};

use crate::commands;
use crate::config::CliConfig;
use crate::output;

const PREVIEW_WORDS: usize = 100;

pub async fn run(config: &CliConfig, topic: Option<String>) -> Result<()> {
    let term = Term::stdout();
    let theme = ColorfulTheme::default();

    let corpus = open_until_valid(config, topic, &theme).await?;
    println!(
        "{} {}",
        "Topic is".bright_green(),
        corpus.root_topic().as_str().bold()
    );

    loop {
        println!();
        let options = [
            "See sections",
            "See all topics",
            "See topics for a section",
            "See all file ids",
            "See file ids for a section",
            "See first 100 words for a section",
            "See first 100 topic-tagged words for a section",
            "Exit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact_on(&term)?;

        let result = match selection {
            0 => {
                commands::sections(&corpus);
                Ok(())
            }
            1 => commands::topics(&corpus, Selector::All),
            2 => {
                let section = pick_section(&corpus, &theme, &term)?;
                commands::topics(&corpus, Selector::One(section))
            }
            3 => commands::files(&corpus, Selector::All),
            4 => {
                let section = pick_section(&corpus, &theme, &term)?;
                commands::files(&corpus, Selector::One(section))
            }
            5 => {
                let section = pick_section(&corpus, &theme, &term)?;
                commands::words(&corpus, Selector::One(section), PREVIEW_WORDS, false).await
            }
            6 => {
                let section = pick_section(&corpus, &theme, &term)?;
                commands::words(&corpus, Selector::One(section), PREVIEW_WORDS, true).await
            }
            7 => {
                println!("{}", "Goodbye!".bright_blue());
                break;
            }
            _ => unreachable!(),
        };

        if let Err(e) = result {
            output::warning(e);
        }
    }

    Ok(())
}

/// Keep asking for a topic until a corpus opens.
async fn open_until_valid(
    config: &CliConfig,
    mut topic: Option<String>,
    theme: &ColorfulTheme,
) -> Result<Corpus> {
    loop {
        let text = match topic.take() {
            Some(text) => text,
            None => Input::<String>::with_theme(theme)
                .with_prompt("Please enter a topic to search the encyclopedia")
                .interact_text()?,
        };

        if text.trim().is_empty() {
            output::warning("Topic cannot be empty.");
            continue;
        }

        match commands::open_corpus(config, &text).await {
            Ok(corpus) => return Ok(corpus),
            Err(e) => output::warning(format!("Invalid topic ({e}). Please try again.")),
        }
    }
}

fn pick_section(corpus: &Corpus, theme: &ColorfulTheme, term: &Term) -> Result<String> {
    let sections = corpus.sections();
    let index = Select::with_theme(theme)
        .with_prompt("Which section?")
        .items(&sections)
        .default(0)
        .interact_on(term)?;
    Ok(sections[index].to_string())
}
