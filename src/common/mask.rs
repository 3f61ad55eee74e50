use std::ops::Deref;

use crate::builder::symbol::Symbol;

// Masking pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern: {pattern}");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(x: i16, y: i16) -> bool {
        (x + y) & 1 == 0
    }

    pub fn horizontal_lines(_: i16, y: i16) -> bool {
        y & 1 == 0
    }

    pub fn vertical_lines(x: i16, _: i16) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(x: i16, y: i16) -> bool {
        (x + y) % 3 == 0
    }

    pub fn large_checkerboard(x: i16, y: i16) -> bool {
        ((y >> 1) + (x / 3)) & 1 == 0
    }

    pub fn fields(x: i16, y: i16) -> bool {
        ((x * y) & 1) + ((x * y) % 3) == 0
    }

    pub fn diamonds(x: i16, y: i16) -> bool {
        (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
    }

    pub fn meadow(x: i16, y: i16) -> bool {
        (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    /// Flip predicate for this pattern; true means the data module at (x, y)
    /// is inverted.
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid masking pattern"),
        }
    }
}

// Penalty evaluator
//------------------------------------------------------------------------------

const PENALTY_WEIGHT_1: u32 = 3;
const PENALTY_WEIGHT_2: u32 = 3;
const PENALTY_WEIGHT_3: u32 = 40;
const PENALTY_WEIGHT_4: u32 = 10;

pub(crate) fn penalty_score(symbol: &Symbol) -> u32 {
    penalty_adjacent(symbol)
        + penalty_blocks(symbol)
        + penalty_finder_lookalike(symbol)
        + penalty_balance(symbol)
}

// Rule 1: runs of same-coloured modules in a row or column. A run scores
// weight+1 the moment it reaches six modules and one more per further module.
fn penalty_adjacent(symbol: &Symbol) -> u32 {
    let w = symbol.symbol_width() as i16;
    let mut penalty = 0;

    for x in 0..w {
        let mut last = symbol.get(x, 0);
        let mut count = 1;
        for y in 1..w {
            let v = symbol.get(x, y);
            if v != last {
                count = 1;
                last = v;
            } else {
                count += 1;
                if count == 6 {
                    penalty += PENALTY_WEIGHT_1 + 1;
                } else if count > 6 {
                    penalty += 1;
                }
            }
        }
    }

    for y in 0..w {
        let mut last = symbol.get(0, y);
        let mut count = 1;
        for x in 1..w {
            let v = symbol.get(x, y);
            if v != last {
                count = 1;
                last = v;
            } else {
                count += 1;
                if count == 6 {
                    penalty += PENALTY_WEIGHT_1 + 1;
                } else if count > 6 {
                    penalty += 1;
                }
            }
        }
    }

    penalty
}

// Rule 2: every 2x2 block of one colour
fn penalty_blocks(symbol: &Symbol) -> u32 {
    let w = symbol.symbol_width() as i16;
    let mut blocks = 0;

    for y in 1..w {
        for x in 1..w {
            let current = symbol.get(x, y);
            if current == symbol.get(x - 1, y)
                && current == symbol.get(x, y - 1)
                && current == symbol.get(x - 1, y - 1)
            {
                blocks += 1;
            }
        }
    }

    blocks * PENALTY_WEIGHT_2
}

// Rule 3: 1011101 flanked by four light modules, in either direction, plus
// the bare 7-bit pattern when it ends a row or column.
fn penalty_finder_lookalike(symbol: &Symbol) -> u32 {
    let w = symbol.symbol_width() as i16;
    let mut penalty = 0;

    let mut scan_line = |get: &dyn Fn(i16) -> bool| {
        let mut bit_buffer: u16 = 0;
        for i in 0..w {
            bit_buffer <<= 1;
            if get(i) {
                bit_buffer |= 1;
            }

            match bit_buffer & 0x7ff {
                0x05d | 0x5d0 => {
                    penalty += PENALTY_WEIGHT_3;
                    bit_buffer = 0xff;
                }
                _ => {
                    if i == w - 1 && bit_buffer & 0x7f == 0x5d {
                        penalty += PENALTY_WEIGHT_3;
                        bit_buffer = 0xff;
                    }
                }
            }
        }
    };

    for y in 0..w {
        scan_line(&|x| symbol.get(x, y));
    }
    for x in 0..w {
        scan_line(&|y| symbol.get(x, y));
    }

    penalty
}

// Rule 4: deviation of the dark module ratio from 50%, in 5% buckets
fn penalty_balance(symbol: &Symbol) -> u32 {
    let total = (symbol.symbol_width() * symbol.symbol_width()) as i32;
    let dark = symbol.count_dark_modules() as i32;
    let deviation = (total / 2 - dark).abs();

    PENALTY_WEIGHT_4 * (deviation / (total / 20)) as u32
}

#[cfg(test)]
mod mask_tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, &[(0, 0, true), (1, 0, false), (2, 1, false), (3, 1, true)])]
    #[test_case(1, &[(0, 0, true), (5, 0, true), (0, 1, false), (4, 2, true)])]
    #[test_case(2, &[(0, 0, true), (3, 4, true), (2, 0, false)])]
    #[test_case(3, &[(0, 0, true), (1, 2, true), (2, 1, true), (1, 1, false)])]
    #[test_case(4, &[(0, 0, true), (2, 0, true), (3, 0, false), (0, 2, false)])]
    #[test_case(5, &[(0, 0, true), (1, 0, true), (0, 3, true), (1, 1, false)])]
    #[test_case(6, &[(0, 0, true), (1, 1, true), (2, 1, true), (5, 1, false)])]
    #[test_case(7, &[(0, 0, true), (3, 1, true), (1, 0, false), (0, 2, true)])]
    fn test_mask_functions(pattern: u8, probes: &[(i16, i16, bool)]) {
        let f = MaskPattern::new(pattern).mask_function();
        for &(x, y, exp) in probes {
            assert_eq!(f(x, y), exp, "mask {pattern} at ({x}, {y})");
        }
    }

    fn symbol_from_rows(rows: &[&str]) -> Symbol {
        let mut symbol = Symbol::new(rows.len(), 0);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                symbol.set(x as i16, y as i16, c == '#');
            }
        }
        symbol
    }

    #[test]
    fn test_penalty_adjacent() {
        let symbol = symbol_from_rows(&[
            "#.#.#.",
            ".#.#.#",
            "#.#.#.",
            ".#.#.#",
            "#.#.#.",
            ".#.#.#",
        ]);
        assert_eq!(penalty_adjacent(&symbol), 0);

        // One six-run in a row scores 4, a seven-run scores 5
        let symbol = symbol_from_rows(&[
            "######.",
            ".#.#.#.",
            "#.#.#.#",
            ".#.#.#.",
            "#.#.#.#",
            ".#.#.#.",
            "#.#.#.#",
        ]);
        assert_eq!(penalty_adjacent(&symbol), 4);
        let symbol = symbol_from_rows(&[
            "#######",
            ".#.#.#.",
            "#.#.#.#",
            ".#.#.#.",
            "#.#.#.#",
            ".#.#.#.",
            "#.#.#.#",
        ]);
        assert_eq!(penalty_adjacent(&symbol), 5);
    }

    #[test]
    fn test_penalty_blocks() {
        let symbol = symbol_from_rows(&["##..", "##..", "..##", "..##"]);
        // Four one-colour 2x2 starts, one per quadrant
        assert_eq!(penalty_blocks(&symbol), 12);
        let symbol = symbol_from_rows(&["#.#.", ".#.#", "#.#.", ".#.#"]);
        assert_eq!(penalty_blocks(&symbol), 0);
    }

    #[test]
    fn test_penalty_finder_lookalike() {
        let symbol = symbol_from_rows(&[
            "#.###.#....",
            "...........",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
        ]);
        // Row 0 matches 1011101 followed by four light modules
        assert_eq!(penalty_finder_lookalike(&symbol), PENALTY_WEIGHT_3);
    }

    #[test]
    fn test_penalty_finder_lookalike_line_end() {
        let symbol = symbol_from_rows(&[
            "..#.#.###.#",
            "...........",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
            ".#.#.#.#.#.",
            "#.#.#.#.#.#",
        ]);
        // Row 0 ends in the bare 7-bit pattern without trailing quiet modules
        assert_eq!(penalty_finder_lookalike(&symbol), PENALTY_WEIGHT_3);
    }

    #[test]
    fn test_penalty_balance() {
        let mut symbol = Symbol::new(10, 0);
        for y in 0..10 {
            for x in 0..10 {
                symbol.set(x, y, (x + y) & 1 == 0);
            }
        }
        assert_eq!(penalty_balance(&symbol), 0);

        // All dark deviates by 50 percent
        let mut symbol = Symbol::new(10, 0);
        for y in 0..10 {
            for x in 0..10 {
                symbol.set(x, y, true);
            }
        }
        assert_eq!(penalty_balance(&symbol), 100);
    }

    #[test]
    fn test_penalty_balance_symmetric() {
        let mut symbol = Symbol::new(8, 0);
        let mut flipped = Symbol::new(8, 0);
        for y in 0..8 {
            for x in 0..8 {
                let v = (x * 3 + y * 5) % 7 < 3;
                symbol.set(x, y, v);
                flipped.set(x, y, !v);
            }
        }
        assert_eq!(penalty_balance(&symbol), penalty_balance(&flipped));
    }
}
