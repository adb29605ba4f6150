//! Writes the manual QA results workbook.
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use qa_results_template::template::{
    TemplateBuilder, config::TemplateConfig, instructions, results, summary,
};

#[derive(Debug, Parser)]
#[command(version, about = "Generate the manual QA results workbook")]
struct Cli {
    /// Where to write the workbook. Defaults to the shared Desktop location.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log debug diagnostics to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    let mut config = TemplateConfig::default();
    if let Some(path) = cli.output {
        config = config.with_output_path(path);
    }
    let seeds = config.seeds.len();

    match TemplateBuilder::new(config).generate() {
        Ok(path) => {
            println!("Excel Resultados configurado exitosamente: {}", path.display());
            println!("Total de hojas: 3");
            println!("Smoke Tests configurados: {seeds}");
            println!("Fórmulas automáticas: KPIs y fechas");
            println!();
            println!("Archivo listo para usar: {}", path.display());
            println!();
            println!("Contenido del Excel:");
            println!("  - Hoja 1: {} ({seeds} Smoke Tests)", results::SHEET_NAME);
            println!("  - Hoja 2: {} detalladas", instructions::SHEET_NAME);
            println!("  - Hoja 3: {} automático", summary::SHEET_NAME);
            println!();
            println!("Características:");
            println!("  - Listas desplegables para Estado y Tester");
            println!("  - Fórmulas automáticas para fechas y KPIs");
            println!("  - Colores automáticos según estado");
            println!("  - Instrucciones paso a paso");
            println!();
            println!("¡Perfecto para documentar testing manual!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "workbook generation failed");
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
