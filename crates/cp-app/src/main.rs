use std::io::Write;

use anyhow::Result;
use clap::Parser;

pub mod cli;

fn main() -> Result<()> {
    // 1. Parse CLI
    let cli = cli::Cli::parse();

    // 2. Initialize logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Acquire the source image
    let frame = match cli.file.as_deref() {
        Some(path) => cp_source::load_path(path)?,
        None => cp_source::load_stdin()?,
    };
    log::info!("source image {}×{}", frame.width, frame.height);

    // 4. Render and encode
    let config = cli.render_config()?;
    let grid = cp_ascii::render(&frame, &config)?;
    let capability = cli.capability();
    log::info!(
        "encoding {}×{} grid for {capability:?}",
        grid.width,
        grid.height
    );
    let bytes = cp_render::encode(&grid, capability);

    // 5. Emit
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;

    Ok(())
}
