//! Page Curl CLI
//!
//! Mount a book, play command scripts on it and export the result.

use clap::{Parser, Subcommand};
use page_curl::{
    export_glb, load_book_config, parse_script, Book, BookConfig, Breakpoint, ClipRecorder,
    Command, FileSource,
};
use page_curl::page::PageGeometryBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "page-curl")]
#[command(author, version, about = "Procedural page-turning book renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a book to GLB, optionally animated by a command script
    Export {
        /// Book description (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Command script, e.g. "open next next wait:500 close"
        #[arg(short, long)]
        script: Option<String>,

        /// Sampling rate of the recorded animation
        #[arg(long, default_value = "30")]
        fps: f32,

        /// Directory page images are resolved against (defaults to the config's directory)
        #[arg(long)]
        images: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Play a command script and report the book state after each command
    Simulate {
        /// Book description (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Command script
        #[arg(short, long)]
        script: String,

        /// Frame rate of the simulation
        #[arg(long, default_value = "60")]
        fps: f32,

        /// Directory page images are resolved against (defaults to the config's directory)
        #[arg(long)]
        images: Option<PathBuf>,
    },

    /// Show information about a book description
    Info {
        /// Book description (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Viewport width in pixels to report the canvas size for
        #[arg(long)]
        viewport: Option<u32>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            config,
            script,
            fps,
            images,
            output,
        } => {
            export_book(&config, script.as_deref(), fps, images, &output)?;
        }
        Commands::Simulate {
            config,
            script,
            fps,
            images,
        } => {
            simulate(&config, &script, fps, images)?;
        }
        Commands::Info { config, viewport } => {
            show_book_info(&config, viewport)?;
        }
    }

    Ok(())
}

fn mount(config_path: &Path, images: Option<PathBuf>) -> Result<Book, Box<dyn std::error::Error>> {
    println!("Loading book from {:?}...", config_path);
    let config = load_book_config(config_path)?;
    let root = images.unwrap_or_else(|| {
        config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    println!("  {} pages, images from {:?}", config.pages.len(), root);

    let mut book = Book::from_source(&config, Arc::new(FileSource::new(root)))?;
    book.wait_for_textures();
    Ok(book)
}

fn export_book(
    config_path: &Path,
    script: Option<&str>,
    fps: f32,
    images: Option<PathBuf>,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut book = mount(config_path, images)?;

    let clip = match script {
        Some(script) => {
            let commands = parse_script(script)?;
            println!("Recording {} commands at {} fps...", commands.len(), fps);
            let clip = ClipRecorder::new(fps).record(&mut book, &commands);
            println!(
                "  {} frames, {:.2}s, ended at page {}",
                clip.frame_count(),
                clip.duration(),
                book.current_page()
            );
            Some(clip)
        }
        None => {
            // Let the pages ease into their resting pose
            let recorder = ClipRecorder::new(fps);
            for _ in 0..(recorder.frame_rate() as usize * 2) {
                book.frame(recorder.frame_time());
            }
            None
        }
    };

    let glb_path = if output_path.extension().is_some() {
        output_path.to_path_buf()
    } else {
        output_path.with_extension("glb")
    };
    let glb_data = export_glb(book.assembly(), clip.as_ref())?;
    fs::write(&glb_path, &glb_data)?;
    println!("Exported GLB ({} bytes) to {:?}", glb_data.len(), glb_path);

    Ok(())
}

fn simulate(
    config_path: &Path,
    script: &str,
    fps: f32,
    images: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut book = mount(config_path, images)?;
    let commands = parse_script(script)?;
    let frame = ClipRecorder::new(fps).frame_time();

    for command in commands {
        if let Command::Wait(duration) = command {
            let mut elapsed = Duration::ZERO;
            while elapsed < duration {
                book.frame(frame);
                elapsed += frame;
            }
            println!("{:<10} waited {}ms", command.to_string(), duration.as_millis());
            continue;
        }

        while book.is_animating() {
            book.frame(frame);
        }
        let accepted = book.apply(command);
        let state = book.state();
        println!(
            "{:<10} {:<8} page {}/{} open={}",
            command.to_string(),
            if accepted { "ok" } else { "ignored" },
            state.current_page,
            state.total_pages,
            state.is_open
        );
    }

    while book.is_animating() {
        book.frame(frame);
    }

    if let Some(bounds) = book.assembly().bounds() {
        let [w, h, d] = bounds.dimensions();
        println!("\nPosed book size: {:.3} x {:.3} x {:.3}", w, h, d);
    }

    println!("\nHinge rotations:");
    for page in book.assembly().pages() {
        println!(
            "  page {:>3}: {:>7.3} rad  depth {:>7.4}",
            page.index(),
            page.rig().rotation(0),
            page.depth_offset()
        );
    }

    Ok(())
}

fn show_book_info(config_path: &Path, viewport: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading book from {:?}...", config_path);
    let config: BookConfig = load_book_config(config_path)?;
    let mesh = PageGeometryBuilder::new(config.page).build();

    println!("\nBook Info:");
    if !config.title.is_empty() {
        println!("  Title: {}", config.title);
    }
    println!("  Pages: {}", config.pages.len());
    println!(
        "  Page size: {} x {} x {}",
        config.page.width, config.page.height, config.page.thickness
    );
    println!("  Bones per page: {}", config.page.bone_count());
    println!(
        "  Mesh per page: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    println!("  Size: {:?}", config.size);
    for breakpoint in [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop] {
        let canvas = config.size.canvas(breakpoint);
        println!("    {:?}: {}x{}", breakpoint, canvas.width, canvas.height);
    }
    if let Some(width) = viewport {
        let canvas = config.size.canvas_for_viewport(width);
        println!(
            "  Canvas at {}px: {}x{} ({:?})",
            width,
            canvas.width,
            canvas.height,
            Breakpoint::from_viewport_width(width)
        );
    }

    Ok(())
}
