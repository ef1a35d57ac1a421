use std::env;
use std::error::Error;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use chromablock::{storage, Base, BlockGeometry, ImageBuilder, ImageReader};

// Usage: cargo run --example file_roundtrip -- [FILE]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let input = env::args().nth(1).map_or_else(|| PathBuf::from("Cargo.toml"), PathBuf::from);
    let base = Base::HEX;

    let record = storage::read_payload_file(&input)?;
    let geometry = BlockGeometry::recommended_for_file(record.data().len() as u64, base);
    println!("Packing {} ({} bytes) with {geometry} blocks", record.name(), record.data().len());

    let text = record.to_string();
    let encoded = ImageBuilder::new(text.as_bytes()).base(base).geometry(geometry).build()?;

    let dir = env::temp_dir().join("chromablock");
    let path = storage::save_image(encoded.image(), &dir.join("file.png"))?;
    println!("Saved {}", path.display());

    let img = storage::load_image(&path, false)?;
    let restored = ImageReader::new(&img).base(Some(base)).geometry(geometry).read_file()?;
    let out = storage::write_payload_file(&restored, &dir.join("restored"))?;
    let report = storage::save_restore_report(&restored, &out, &path)?;
    println!("Restored {}, see {}", out.display(), report.display());
    assert_eq!(restored, record);

    Ok(())
}
