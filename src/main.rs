use anyhow::{Context, Result};
use clap::Parser;
use intercore::affinity::{self, CpuList};
use intercore::cli::{Cli, OutputFormat, RunConfig};
use intercore::matrix::{self, LatencyMatrix};
use intercore::{plot, report};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve the CPUs to measure from the startup affinity snapshot
fn select_cpus(requested: Option<&str>) -> Result<CpuList> {
    let allowed = affinity::available_cpus()?;
    let cpus = match requested {
        Some(list) => CpuList::parse(list, &allowed)?,
        None => allowed,
    };
    cpus.require_pair()?;
    Ok(cpus)
}

/// Render the matrix in the requested presentation
fn render(args: &Cli, matrix: &LatencyMatrix, config: &RunConfig) -> Result<String> {
    let order = report::display_order(matrix.dim(), args.smt);

    if args.plot {
        let table = report::render_text(matrix, &order);
        return Ok(plot::render_plot(&table, args.name.as_deref(), config.protocol));
    }

    Ok(match args.format {
        OutputFormat::Text => report::render_text(matrix, &order),
        OutputFormat::Csv => report::render_csv(matrix, &order),
        OutputFormat::Json => {
            let mut json =
                report::JsonReport::new(matrix, &order, config.protocol, &config.sampler)
                    .to_json()?;
            json.push('\n');
            json
        }
    })
}

fn write_output(path: Option<&Path>, body: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, body)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            print!("{}", body);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = args.run_config()?;
    let cpus = select_cpus(args.cpus.as_deref())?;

    let matrix = matrix::build(&cpus, &config.protocol, &config.sampler);

    let body = render(&args, &matrix, &config)?;
    write_output(args.output.as_deref(), &body)?;

    Ok(())
}
