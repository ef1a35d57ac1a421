use std::env;
use std::error::Error;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use chromablock::{storage, Base, BlockGeometry, ImageBuilder, ImageReader};

// Usage: cargo run --example text_roundtrip -- [TEXT] [BASE]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "Hello, world!🌎".to_string());
    let base = match args.next() {
        Some(b) => Base::new(b.parse()?)?,
        None => Base::HEX,
    };

    let geometry = BlockGeometry::recommended_for_text(text.chars().count(), base);
    println!("Encoding {} characters in base {base} with {geometry} blocks", text.chars().count());

    let encoded = ImageBuilder::new(text.as_bytes()).base(base).geometry(geometry).build()?;
    println!("Digits: {}", encoded.digits());

    let dir = env::temp_dir().join("chromablock");
    let path = storage::save_image(encoded.image(), &dir.join("text.png"))?;
    let digits_path = storage::save_digits(encoded.digits(), &path)?;
    println!("Saved {} and {}", path.display(), digits_path.display());

    let img = storage::load_image(&path, false)?;
    let decoded = ImageReader::new(&img).base(Some(base)).geometry(geometry).read_text()?;
    println!("Decoded in base {}: {}", decoded.base(), decoded.text());
    let text_path = storage::save_decoded_text(decoded.text(), &path)?;
    println!("Saved {}", text_path.display());
    assert_eq!(decoded.text(), text);

    Ok(())
}
