//! CLI argument parsing for intercore

use crate::error::Result;
use crate::protocol::Protocol;
use crate::sampler::{SamplerConfig, DEFAULT_SAMPLES};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the latency matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "intercore")]
#[command(version)]
#[command(about = "Measure inter-core one-way latency between every pair of CPUs", long_about = None)]
#[command(after_help = "Plot results using gnuplot:\n  intercore -p | gnuplot -p")]
pub struct Cli {
    /// Number of samples per CPU pair (the minimum is reported)
    #[arg(short = 's', long = "samples", value_name = "N", default_value_t = DEFAULT_SAMPLES)]
    pub samples: u32,

    /// Use write cycles (contended compare-and-exchange) instead of read cycles
    #[arg(short = 'w', long = "write")]
    pub write: bool,

    /// Preheat each core for 200ms before measuring
    #[arg(short = 'H', long = "preheat")]
    pub preheat: bool,

    /// Emit a gnuplot script instead of a bare table
    #[arg(short = 'p', long = "plot")]
    pub plot: bool,

    /// Interleave hardware threads with cores in the output
    #[arg(short = 't', long = "smt")]
    pub smt: bool,

    /// Name shown in the graph's title
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Restrict the run to these CPUs (e.g. 0-3,8); default is every allowed CPU
    #[arg(short = 'c', long = "cpus", value_name = "LIST")]
    pub cpus: Option<String>,

    /// Output format (ignored with --plot, which always embeds the text table)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Protocol selected by `--write`
    pub fn protocol(&self) -> Protocol {
        if self.write {
            Protocol::CompareExchange
        } else {
            Protocol::FlagExchange
        }
    }

    /// Validated measurement settings
    pub fn run_config(&self) -> Result<RunConfig> {
        Ok(RunConfig {
            protocol: self.protocol(),
            sampler: SamplerConfig::new(self.samples, self.preheat)?,
        })
    }
}

/// Everything the core needs besides the CPU list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub protocol: Protocol,
    pub sampler: SamplerConfig,
}
