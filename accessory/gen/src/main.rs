//! Accessory Code Generator
//!
//! Generates record-backed accessor structs from a JSON or YAML model.

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use accessory_define::Model;
use accessory_gen::cargo_gen::{RuntimeSource, write_cargo_toml};
use accessory_gen::errors::GeneratorError;
use accessory_gen::options::GeneratorOptions;
use accessory_gen::output::generate_and_write;
use accessory_gen::planner::{GenerationReport, plan_model};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Accessory code generator - turns schema structs into validated accessors
#[derive(Parser, Debug)]
#[command(name = "accessory-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model file (.json, .yaml or .yml)
    model: PathBuf,

    /// Output directory for generated code
    #[arg(short, long, default_value = "generated/src")]
    output: PathBuf,

    /// Name of the generated package
    #[arg(long, default_value = "generated")]
    package: String,

    /// Reference the accessory runtime by path instead of by version
    #[arg(long)]
    runtime_path: Option<PathBuf>,

    /// Skip validation guards in generated setters
    #[arg(long)]
    no_validation: bool,

    /// Prefix added to every generated module name
    #[arg(long)]
    module_prefix: Option<String>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> GeneratorOptions {
        let mut options = GeneratorOptions::default();
        if self.no_validation {
            options = options.without_validation();
        }
        if let Some(prefix) = &self.module_prefix {
            options = options.with_module_prefix(prefix.clone());
        }
        options
    }

    fn runtime(&self) -> RuntimeSource {
        self.runtime_path
            .clone()
            .map_or_else(RuntimeSource::default, RuntimeSource::Path)
    }
}

fn init_tracing(verbose: u8) {
    if verbose == 0 {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,accessory_gen=info".to_string(),
            2 => "info,accessory_gen=debug,accessory=debug".to_string(),
            _ => "debug,accessory_gen=trace,accessory=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn print_summary(report: &GenerationReport) {
    for plan in &report.plans {
        eprintln!(
            "  {} {} ({} methods)",
            "✓".green(),
            plan.name.bold(),
            plan.methods.len()
        );
    }
    for failure in &report.failures {
        eprintln!(
            "  {} {}: {}",
            "✗".red(),
            failure.struct_name.bold(),
            failure.error
        );
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli.options();
    options.validate()?;

    let model = Model::load(&cli.model)?;
    let report = plan_model(&model, &options);
    print_summary(&report);

    if !report.is_success() {
        return Err(GeneratorError::PlanningFailed {
            failed: report.failures.len(),
            total: model.structs.len(),
        });
    }

    let files = generate_and_write(
        &report.plans,
        &model.restrictions,
        &cli.output,
        &options,
        cli.dry_run,
    )?;

    // Cargo.toml goes next to src/
    let package_dir = cli.output.parent().unwrap_or(Path::new("."));
    write_cargo_toml(package_dir, &cli.package, &cli.runtime(), cli.dry_run)?;

    if !cli.dry_run {
        eprintln!(
            "{} {} files to {}",
            "Generated".green().bold(),
            files.len(),
            cli.output.display()
        );
    }

    Ok(())
}
