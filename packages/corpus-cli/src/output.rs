//! Terminal output helpers.

use colored::Colorize;
use std::fmt::Display;

const WIDTH: usize = 80;

pub fn banner() {
    println!("{}", "╔══════════════════════════════════════╗".bright_cyan());
    println!("{}", "║   Encyclopedia Corpus Explorer       ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════╝".bright_cyan());
    println!();
}

pub fn header(text: &str) {
    println!();
    println!("{}", "#".repeat(WIDTH).bright_blue());
    println!(
        "{} {}",
        text.bold(),
        "#".repeat(WIDTH.saturating_sub(text.chars().count() + 1))
            .bright_blue()
    );
    println!("{}", "#".repeat(WIDTH).bright_blue());
}

pub fn list<T: Display>(items: impl IntoIterator<Item = T>) {
    let mut empty = true;
    for item in items {
        println!("  {}", item);
        empty = false;
    }
    if empty {
        println!("  {}", "(none)".dimmed());
    }
}

pub fn counts(items: &[(&str, usize)]) {
    list(
        items
            .iter()
            .map(|(word, count)| format!("{:<30} {}", word, count.to_string().bright_yellow())),
    );
}

pub fn warning(text: impl Display) {
    println!("{} {}", "⚠".yellow(), text.to_string().yellow());
}
