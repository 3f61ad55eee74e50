//! QR Code 2005 (ISO/IEC 18004) encoder.
//!
//! Turns an arbitrary byte string into a module bitmap: mode-segmented data
//! encoding, Reed-Solomon error correction over GF(256), block interleaving,
//! symbol templating and data masking with penalty-based mask selection.
//!
//! ```
//! use qrforge::{ECLevel, QRBuilder};
//!
//! let qr = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::Q).build().unwrap();
//! assert_eq!(*qr.version(), 1);
//! assert_eq!(qr.size(), 29);
//! ```

pub mod builder;
mod common;
mod render;

pub use builder::{QRBuilder, QRCode, DEFAULT_QUIET_ZONE};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
