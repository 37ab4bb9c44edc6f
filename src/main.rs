use persona_gallery::logging;
use persona_gallery::{Config, Entity, GalleryResult, Library};
use std::path::PathBuf;
use std::process::ExitCode;

/// Summary of the library state at startup
#[derive(Debug, Clone)]
struct Report {
    origins: Vec<(String, usize)>,
    portrayal_count: usize,
    unsorted_count: usize,
    previewable_count: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = logging::init_tracing() {
        eprintln!("{}", e);
    }

    // First argument wins, then $PERSONA_GALLERY_CONFIG, then the user config dir
    let Some(config_path) = std::env::args().nth(1).map(PathBuf::from).or_else(Config::default_path) else {
        tracing::error!("could not determine a configuration path");
        return ExitCode::FAILURE;
    };

    match run(config_path).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config_path: PathBuf) -> GalleryResult<Report> {
    let config = Config::load(&config_path)?;
    let library = Library::open(&config)?;

    // Scans hit the disk; run both on the blocking pool
    let (portrayals, unsorted) = tokio::join!(
        library.all_portrayals_async(),
        library.list_all_unsorted_async()
    );
    let portrayals = portrayals?;
    let unsorted = unsorted?;

    let mut origins = Vec::new();
    for origin in library.list_origins()? {
        origins.push((origin.name(), origin.persona_count()?));
    }

    Ok(Report {
        origins,
        portrayal_count: portrayals.len(),
        unsorted_count: unsorted.len(),
        previewable_count: unsorted.iter().filter(|f| f.media_kind().is_some()).count(),
    })
}

fn print_report(report: &Report) {
    println!("Gallery: {} portrayals", report.portrayal_count);
    for (name, personas) in &report.origins {
        println!("  {} (with {} personas)", name, personas);
    }
    println!(
        "Unsorted: {} files ({} previewable)",
        report.unsorted_count, report.previewable_count
    );
}
