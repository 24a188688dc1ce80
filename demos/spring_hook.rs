//! Renders the "Spring Hook" story to PNG frames.
//!
//! ```sh
//! cargo run --example spring_hook -- [output-dir] [fps]
//! ```

use coil::prelude::*;
use coil::runner::init_logging;
use coil::stories;

fn main() -> Result<(), StoryError> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let output_dir = args.next().unwrap_or_else(|| "target/spring_hook".to_string());
    let fps = args.next().and_then(|fps| fps.parse().ok()).unwrap_or(60);

    let mut catalog = StoryCatalog::new();
    stories::register_all(&mut catalog)?;

    let config = RunnerConfig::default()
        .width(360)
        .fps(fps)
        .output_dir(&output_dir);

    let mut runner = StoryRunner::mount(&catalog, "Spring Hook")?;
    let summary = runner.run_realtime(&config)?;
    runner.unmount();

    log::info!(
        "{} frames written to {}, settled: {}",
        summary.written.len(),
        output_dir,
        summary.settled
    );
    Ok(())
}
