pub(crate) mod symbol;

use crate::common::bits::BitBuffer;
use crate::common::codec::{encode, pad_remaining_capacity, push_terminator};
use crate::common::ec::rs_encode;
use crate::common::error::{QRError, QRResult};
use crate::common::mask::{penalty_score, MaskPattern};
use crate::common::metadata::{ECLevel, Version};

use symbol::{build_symbol, Symbol};

pub const DEFAULT_QUIET_ZONE: usize = 4;

// QR builder
//------------------------------------------------------------------------------

pub struct QRBuilder<'a> {
    data: &'a [u8],
    ec_level: ECLevel,
    quiet_zone: usize,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, ec_level: ECLevel::M, quiet_zone: DEFAULT_QUIET_ZONE }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Width of the light border around the symbol, in modules.
    pub fn quiet_zone(&mut self, quiet_zone: usize) -> &mut Self {
        self.quiet_zone = quiet_zone;
        self
    }

    pub fn build(&self) -> QRResult<QRCode> {
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }

        // Encode data into mode-segmented bits and pick the version
        let (mut data, version) = encode(self.data, self.ec_level)?;

        let bit_capacity = version.data_bit_capacity(self.ec_level);
        push_terminator(&mut data, bit_capacity);
        pad_remaining_capacity(&mut data, bit_capacity);

        // Split into blocks, add error correction, interleave
        let payload = Self::interleave_blocks(&data, version, self.ec_level);

        // Build a candidate symbol per mask and keep the cheapest; candidates
        // are built one at a time to bound peak memory
        let mut best: Option<(Symbol, MaskPattern, u32)> = None;
        for m in 0..8 {
            let mask_pattern = MaskPattern::new(m);
            let symbol =
                build_symbol(version, self.ec_level, mask_pattern, &payload, self.quiet_zone);
            assert!(
                symbol.num_empty_modules() == 0,
                "Symbol has {} empty modules after data placement (version {})",
                symbol.num_empty_modules(),
                *version
            );

            let penalty = penalty_score(&symbol);
            match &best {
                Some((_, _, best_penalty)) if *best_penalty <= penalty => {}
                _ => best = Some((symbol, mask_pattern, penalty)),
            }
        }
        let (symbol, mask_pattern, _) = best.expect("At least one mask candidate");

        Ok(QRCode { symbol, version, ec_level: self.ec_level, mask_pattern })
    }

    /// Splits the padded data stream into the version's blocks, appends the
    /// Reed-Solomon codewords to each, and interleaves the result: one pass
    /// over the data codewords, then one over the error correction codewords,
    /// a codeword per block in turn. Remainder bits round out the stream.
    fn interleave_blocks(data: &BitBuffer, version: Version, ec_level: ECLevel) -> BitBuffer {
        let (size1, count1, size2, count2) = version.data_codewords_per_block(ec_level);
        let num_ec = version.ecc_per_block(ec_level);

        // (encoded block, ec start offset in bits)
        let mut blocks = Vec::with_capacity(count1 + count2);
        let mut cursor = 0;
        for (size, count) in [(size1, count1), (size2, count2)] {
            for _ in 0..count {
                let end = cursor + size * 8;
                blocks.push((rs_encode(&data.substr(cursor, end), num_ec), size * 8));
                cursor = end;
            }
        }
        debug_assert!(
            cursor == data.len(),
            "Block layout doesn't cover the data: Cursor {cursor}, Length {}",
            data.len()
        );

        let total_bits: usize = blocks.iter().map(|(b, _)| b.len()).sum();
        let mut res = BitBuffer::with_capacity(total_bits + version.remainder_bits());

        let mut i = 0;
        let mut working = true;
        while working {
            working = false;
            for (block, ec_start) in &blocks {
                if i < *ec_start {
                    res.append(&block.substr(i, i + 8));
                    working = true;
                }
            }
            i += 8;
        }

        let mut i = 0;
        let mut working = true;
        while working {
            working = false;
            for (block, ec_start) in &blocks {
                let offset = ec_start + i;
                if offset < block.len() {
                    res.append(&block.substr(offset, offset + 8));
                    working = true;
                }
            }
            i += 8;
        }

        res.push_n(version.remainder_bits(), false);
        res
    }
}

// Built QR code
//------------------------------------------------------------------------------

pub struct QRCode {
    symbol: Symbol,
    version: Version,
    ec_level: ECLevel,
    mask_pattern: MaskPattern,
}

impl QRCode {
    /// Modules per side, quiet zone included.
    pub fn size(&self) -> usize {
        self.symbol.width()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask_pattern(&self) -> MaskPattern {
        self.mask_pattern
    }

    /// Module at (x, y), quiet zone included, (0, 0) top left. Dark is true.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.symbol.module(x, y)
    }

    /// Row-major module grid, quiet zone included.
    pub fn bitmap(&self) -> Vec<Vec<bool>> {
        self.symbol.bitmap()
    }
}
