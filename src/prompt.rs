use std::io::{self, Write};

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

use crate::error::AnalyzerError;

/// Source of the two operator decisions: which workbook, and how deep.
/// Implementations block until the operator answers.
pub trait ChoiceProvider {
    /// Pick one entry from the discovered workbook list; returns its index.
    fn pick_file(&mut self, files: &[String]) -> Result<usize>;
    /// Whether to run the detailed (per-row reasons) analysis.
    fn pick_detailed(&mut self) -> Result<bool>;
}

/// Console prompts: an arrow-key selector on attended terminals, plain
/// stdin parsing otherwise so piped runs still work.
#[derive(Debug, Default)]
pub struct ConsoleChoices;

impl ChoiceProvider for ConsoleChoices {
    fn pick_file(&mut self, files: &[String]) -> Result<usize> {
        if console::user_attended() {
            let picked = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Which workbook should be analyzed?")
                .items(files)
                .default(0)
                .interact()?;
            return Ok(picked);
        }
        println!("Workbooks found:");
        for (i, name) in files.iter().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
        print!("Enter the number of the file to analyze: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        parse_selection(line.trim(), files.len())
    }

    fn pick_detailed(&mut self) -> Result<bool> {
        if console::user_attended() {
            let detailed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Include per-row failure reasons (detailed analysis)?")
                .default(false)
                .interact()?;
            return Ok(detailed);
        }
        print!("Include per-row failure reasons? [y/N]: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let answer = line.trim().to_ascii_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }
}

/// Scripted answers for tests and non-interactive callers.
#[derive(Debug, Default)]
pub struct ScriptedChoices {
    pub file: Option<usize>,
    pub detailed: Option<bool>,
}

impl ChoiceProvider for ScriptedChoices {
    fn pick_file(&mut self, files: &[String]) -> Result<usize> {
        let picked = self.file.unwrap_or(0);
        if picked >= files.len() {
            return Err(AnalyzerError::InvalidSelection {
                input: (picked + 1).to_string(),
                max: files.len(),
            }
            .into());
        }
        Ok(picked)
    }

    fn pick_detailed(&mut self) -> Result<bool> {
        Ok(self.detailed.unwrap_or(false))
    }
}

/// Turn a typed 1-based index into a 0-based one. Non-numeric and
/// out-of-range input is terminal, not retried.
pub fn parse_selection(input: &str, max: usize) -> Result<usize> {
    let number: usize = input.parse().map_err(|_| AnalyzerError::InvalidSelection {
        input: input.to_string(),
        max,
    })?;
    if number == 0 || number > max {
        return Err(AnalyzerError::InvalidSelection {
            input: input.to_string(),
            max,
        }
        .into());
    }
    Ok(number - 1)
}
