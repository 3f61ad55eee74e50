use image::{GrayImage, Luma};

use crate::builder::QRCode;

// Render
//------------------------------------------------------------------------------

impl QRCode {
    /// Renders the code to a grayscale image with `module_size` pixels per
    /// module. The quiet zone is part of the bitmap and renders light.
    pub fn render(&self, module_size: u32) -> GrayImage {
        debug_assert!(module_size > 0, "Module size should be positive");

        let size = self.size() as u32 * module_size;
        GrayImage::from_fn(size, size, |px, py| {
            let x = (px / module_size) as usize;
            let y = (py / module_size) as usize;
            if self.get(x, y) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    /// Renders the code as text for a dark terminal: light modules print as
    /// full blocks, dark modules as spaces.
    pub fn to_str(&self) -> String {
        let size = self.size();
        let mut canvas = String::with_capacity(size * (2 * size + 1));
        for y in 0..size {
            for x in 0..size {
                let c = if self.get(x, y) { "  " } else { "██" };
                canvas.push_str(c);
            }
            canvas.push('\n');
        }
        canvas
    }
}
