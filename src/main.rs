use std::error::Error;

use qrforge::{ECLevel, QRBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let content = args.next().unwrap_or_else(|| "HELLO WORLD".into());
    let ec_level = match args.next() {
        Some(level) => level.parse()?,
        None => ECLevel::M,
    };

    let qr = QRBuilder::new(content.as_bytes()).ec_level(ec_level).build()?;
    println!("{}", qr.to_str());
    println!(
        "version: {}, ec level: {}, mask: {}, size: {} modules",
        *qr.version(),
        qr.ec_level(),
        *qr.mask_pattern(),
        qr.size()
    );

    Ok(())
}
