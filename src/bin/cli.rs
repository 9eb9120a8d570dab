use clap::Parser;
use realmgen::{GenerationOptions, GridShape, RealmConfig, generate_realm};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор королевств для гексагонального редактора карт
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Радиус шестиугольной сетки (перекрывает форму из конфигурации)
    #[arg(long, conflicts_with_all = ["width", "height"])]
    radius: Option<u32>,

    /// Ширина прямоугольной сетки
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Высота прямоугольной сетки
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Сид генератора (перекрывает сид из конфигурации)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Куда записать JSON королевства (по умолчанию: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (mut shape, mut options) = match &cli.config {
        Some(path) => {
            tracing::info!(?path, "cli.load_config");
            let config = RealmConfig::from_toml_file(path)?;
            (config.shape, config.options)
        }
        None => (GridShape::Hex { radius: 6 }, GenerationOptions::default()),
    };

    if let Some(radius) = cli.radius {
        shape = GridShape::Hex { radius };
    }
    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        shape = GridShape::Rectangular { width, height };
    }
    if cli.seed.is_some() {
        options.seed = cli.seed;
    }

    let realm = generate_realm(shape, &options)?;

    for (terrain, count) in realm.terrain_histogram() {
        tracing::info!(terrain, count, "cli.terrain");
    }
    tracing::info!(
        holdings = realm.holdings().count(),
        landmarks = realm.landmarks().count(),
        myths = realm.myths.len(),
        barriers = realm.barrier_count(),
        seat_of_power = ?realm.seat_of_power,
        "cli.summary"
    );

    match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &realm)?;
            writer.flush()?;
            tracing::info!(?path, "cli.saved");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &realm)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
