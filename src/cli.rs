use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{analyze::Mode, report::ReportFormat};

/// Pass/fail analysis of spreadsheet comparison columns.
#[derive(Parser, Debug)]
#[command(name = "xlverdict", version, about)]
pub struct Cli {
    /// Directory scanned for .xlsx/.xls files
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Analyze this workbook instead of prompting for one
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Analysis depth; prompts when omitted
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Xlsx)]
    pub format: FormatArg,

    /// Rule file overriding the built-in keyword lists
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Basic,
    Detailed,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Basic => Mode::Basic,
            ModeArg::Detailed => Mode::Detailed,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Xlsx,
    Text,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => ReportFormat::Workbook,
            FormatArg::Text => ReportFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scan_the_current_directory() {
        let cli = Cli::try_parse_from(["xlverdict"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.mode, None);
        assert_eq!(cli.format, FormatArg::Xlsx);
        assert!(!cli.no_pause);
    }

    #[test]
    fn flags_parse_into_their_enums() {
        let cli = Cli::try_parse_from([
            "xlverdict",
            "--file",
            "batch.xlsx",
            "--mode",
            "detailed",
            "--format",
            "text",
            "--no-pause",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("batch.xlsx")));
        assert_eq!(Mode::from(cli.mode.unwrap()), Mode::Detailed);
        assert_eq!(ReportFormat::from(cli.format), ReportFormat::Text);
        assert!(cli.no_pause);
    }
}
