use clap::Parser;
use colorfill::{render, Puzzle, PuzzleConfig};
use log::info;
use std::error::Error;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

/// Turn an image into a color-by-numbers puzzle
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path
    img: PathBuf,

    /// Number of puzzle colors (the picture may need fewer)
    #[arg(short, long, default_value_t = 8)]
    colors: usize,

    /// Widest grid, in cells
    #[arg(long, default_value_t = 40)]
    cols: u32,

    /// Size of one cell in pixels for --preview and --output
    #[arg(long, default_value_t = 8)]
    cell: u32,

    /// Print a sixel preview of the solved picture
    #[arg(long)]
    preview: bool,

    /// Write the solved picture to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = PuzzleConfig {
        colors: args.colors,
        max_cols: args.cols,
    };
    let start_time = Instant::now();
    let puzzle = Puzzle::open(&args.img, &config)?;
    info!(
        "Built puzzle: {}x{} cells, {} colors, {}ms",
        puzzle.grid().cols(),
        puzzle.grid().rows(),
        puzzle.palette().len(),
        start_time.elapsed().as_millis()
    );

    let mut stdout = stdout().lock();
    render::write_chart(&puzzle, &mut stdout)?;
    if args.preview {
        render::write_sixel(&puzzle, args.cell as usize, &mut stdout)?;
        writeln!(stdout)?;
    }
    if let Some(path) = &args.output {
        save_solution(&puzzle, args.cell, path)?;
    }
    Ok(())
}

fn save_solution(puzzle: &Puzzle, cell: u32, path: &Path) -> Result<(), Box<dyn Error>> {
    render::solution_image(puzzle, cell).save(path)?;
    info!("Wrote solution to {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}: {e}", args.img.to_string_lossy());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
