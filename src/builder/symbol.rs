use itertools::iproduct;

use crate::common::bits::BitBuffer;
use crate::common::iter::PlacementIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_MAIN,
    FORMAT_INFO_COORDS_SIDE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
};

// Symbol
//------------------------------------------------------------------------------

/// Square module grid with a quiet zone. Two parallel planes: the module
/// colours and a used flag per module, so data placement can tell reserved
/// modules from empty ones. All coordinate access is symbol-relative; the
/// quiet zone offset is applied internally and its modules stay light and
/// unused. Negative coordinates count back from the symbol edge.
#[derive(Debug, Clone)]
pub(crate) struct Symbol {
    modules: Vec<bool>,
    used: Vec<bool>,
    // Side length including quiet zones
    width: usize,
    // Side length of the symbol alone
    symbol_width: usize,
    quiet_zone: usize,
}

impl Symbol {
    pub fn new(symbol_width: usize, quiet_zone: usize) -> Self {
        let width = symbol_width + 2 * quiet_zone;
        Self {
            modules: vec![false; width * width],
            used: vec![false; width * width],
            width,
            symbol_width,
            quiet_zone,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn symbol_width(&self) -> usize {
        self.symbol_width
    }

    fn coord_to_index(&self, x: i16, y: i16) -> usize {
        let w = self.symbol_width as i16;
        debug_assert!(-w <= x && x < w, "x out of range: {x}");
        debug_assert!(-w <= y && y < w, "y out of range: {y}");

        let x = if x < 0 { x + w } else { x };
        let y = if y < 0 { y + w } else { y };
        (y as usize + self.quiet_zone) * self.width + x as usize + self.quiet_zone
    }

    pub fn get(&self, x: i16, y: i16) -> bool {
        self.modules[self.coord_to_index(x, y)]
    }

    pub fn is_used(&self, x: i16, y: i16) -> bool {
        self.used[self.coord_to_index(x, y)]
    }

    pub fn set(&mut self, x: i16, y: i16, dark: bool) {
        let index = self.coord_to_index(x, y);
        self.modules[index] = dark;
        self.used[index] = true;
    }

    pub fn num_empty_modules(&self) -> usize {
        let w = self.symbol_width as i16;
        iproduct!(0..w, 0..w).filter(|&(x, y)| !self.is_used(x, y)).count()
    }

    pub fn count_dark_modules(&self) -> usize {
        let w = self.symbol_width as i16;
        iproduct!(0..w, 0..w).filter(|&(x, y)| self.get(x, y)).count()
    }

    /// Module at absolute coordinates, quiet zone included, (0, 0) top left.
    pub fn module(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.width, "Coordinate out of range: ({x}, {y})");

        self.modules[y * self.width + x]
    }

    /// Row-major copy of the full grid, quiet zone included.
    pub fn bitmap(&self) -> Vec<Vec<bool>> {
        self.modules.chunks(self.width).map(<[bool]>::to_vec).collect()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.symbol_width as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for y in 0..w {
            for x in 0..w {
                res.push(match (self.is_used(x, y), self.get(x, y)) {
                    (false, _) => '.',
                    (true, true) => '#',
                    (true, false) => '-',
                });
            }
            res.push('\n');
        }
        res
    }
}

// Finder patterns
//------------------------------------------------------------------------------

impl Symbol {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(-4, 3);
        self.draw_finder_pattern_at(3, -4);
    }

    // Draws the 7x7 finder centred at (x, y) along with its one-module light
    // separator; the 8x8 footprint leans away from the nearest corner.
    fn draw_finder_pattern_at(&mut self, x: i16, y: i16) {
        let (dx_left, dx_right) = if x > 0 { (-3, 4) } else { (-4, 3) };
        let (dy_top, dy_bottom) = if y > 0 { (-3, 4) } else { (-4, 3) };
        for j in dy_top..=dy_bottom {
            for i in dx_left..=dx_right {
                self.set(
                    x + i,
                    y + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => false,
                        (3 | -3, _) | (_, 3 | -3) => true,
                        (2 | -2, _) | (_, 2 | -2) => false,
                        _ => true,
                    },
                );
            }
        }
    }
}

// Timing patterns
//------------------------------------------------------------------------------

impl Symbol {
    fn draw_timing_patterns(&mut self) {
        let last = self.symbol_width as i16 - 9;
        self.draw_line(8, 6, last, 6);
        self.draw_line(6, 8, 6, last);
    }

    // Alternating line between (x1, y1) and (x2, y2), dark on even coordinates
    fn draw_line(&mut self, x1: i16, y1: i16, x2: i16, y2: i16) {
        debug_assert!(x1 == x2 || y1 == y2, "Line is neither vertical nor horizontal");

        if y1 == y2 {
            for i in x1..=x2 {
                self.set(i, y1, i & 1 == 0);
            }
        } else {
            for j in y1..=y2 {
                self.set(x1, j, j & 1 == 0);
            }
        }
    }
}

// Alignment patterns
//------------------------------------------------------------------------------

impl Symbol {
    fn draw_alignment_patterns(&mut self, version: Version) {
        let positions = version.alignment_pattern();
        for (&y, &x) in iproduct!(positions, positions) {
            self.draw_alignment_pattern_at(x, y);
        }
    }

    fn draw_alignment_pattern_at(&mut self, x: i16, y: i16) {
        let w = self.symbol_width as i16;
        if (y == 6 && (x == 6 || x == w - 7)) || (y == w - 7 && x == 6) {
            return;
        }
        for (j, i) in iproduct!(-2i16..=2, -2i16..=2) {
            self.set(
                x + i,
                y + j,
                matches!((i, j), (-2 | 2, _) | (_, -2 | 2) | (0, 0)),
            );
        }
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl Symbol {
    fn draw_format_info(&mut self, ec_level: ECLevel, mask_pattern: MaskPattern) {
        let format_info = format_info(ec_level, mask_pattern);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_SIDE);
        // Dark module
        self.set(8, -8, true);
    }

    fn draw_version_info(&mut self, version: Version) {
        if *version < 7 {
            return;
        }
        let version_info = version.version_info();
        self.draw_number(version_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_BL);
        self.draw_number(version_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_TR);
    }

    fn draw_number(&mut self, number: u32, bit_len: usize, coords: &[(i16, i16)]) {
        let mut mask = 1 << (bit_len - 1);
        for &(x, y) in coords {
            self.set(x, y, number & mask != 0);
            mask >>= 1;
        }
    }
}

// Data placement
//------------------------------------------------------------------------------

impl Symbol {
    fn draw_data(&mut self, version: Version, mask_pattern: MaskPattern, payload: &BitBuffer) {
        let mask = mask_pattern.mask_function();
        let mut coords = PlacementIter::new(version);
        let mut placed = 0;
        for i in 0..payload.len() {
            let bit = payload.at(i);
            for (x, y) in coords.by_ref() {
                if !self.is_used(x, y) {
                    self.set(x, y, bit != mask(x, y));
                    placed += 1;
                    break;
                }
            }
        }
        debug_assert!(
            placed == payload.len(),
            "Payload doesn't fit the encoding region: Placed {placed}, Payload {}",
            payload.len()
        );
    }
}

/// Builds one candidate symbol: the full template, then the payload walked
/// into the remaining modules with `mask_pattern` applied.
pub(crate) fn build_symbol(
    version: Version,
    ec_level: ECLevel,
    mask_pattern: MaskPattern,
    payload: &BitBuffer,
    quiet_zone: usize,
) -> Symbol {
    let mut symbol = Symbol::new(version.width(), quiet_zone);
    symbol.draw_finder_patterns();
    symbol.draw_timing_patterns();
    symbol.draw_alignment_patterns(version);
    symbol.draw_format_info(ec_level, mask_pattern);
    symbol.draw_version_info(version);
    symbol.draw_data(version, mask_pattern, payload);
    symbol
}
