mod galois;

pub use galois::{gf_add, gf_divide, gf_exp, gf_multiply, GfPoly};

use crate::common::bits::BitBuffer;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

/// Appends `num_ec_codewords` Reed-Solomon error correction codewords to a
/// copy of `data`.
///
/// The data bit sequence is carried over verbatim rather than rebuilt from
/// the polynomial sum, so most-significant zero bits survive intact.
pub fn rs_encode(data: &BitBuffer, num_ec_codewords: usize) -> BitBuffer {
    let data_poly = GfPoly::from_data(data);
    let shifted = data_poly.multiply(&GfPoly::monomial(1, num_ec_codewords));

    let generator = generator_poly(num_ec_codewords);
    let remainder = shifted.remainder(&generator);

    let mut res = data.clone();
    res.append_bytes(&remainder.data(num_ec_codewords));
    res
}

/// G(x) = (x - α^0)(x - α^1) ... (x - α^(degree-1))
fn generator_poly(degree: usize) -> GfPoly {
    debug_assert!(degree >= 2, "Generator degree should be at least 2: {degree}");

    let mut generator = GfPoly::from_coefficients(&[1]);
    for i in 0..degree {
        generator = generator.multiply(&GfPoly::from_coefficients(&[gf_exp(i), 1]));
    }
    generator
}

#[cfg(test)]
mod rs_tests {
    use super::*;
    use crate::common::bits::BitBuffer;

    fn encode_bytes(data: &[u8], num_ec_codewords: usize) -> Vec<u8> {
        let mut bb = BitBuffer::new();
        bb.append_bytes(data);
        let encoded = rs_encode(&bb, num_ec_codewords);
        assert_eq!(encoded.len(), bb.len() + num_ec_codewords * 8);
        encoded.data()[data.len()..].to_vec()
    }

    #[test]
    fn test_generator_poly() {
        // G_2(x) = x^2 + 3x + 2
        assert_eq!(generator_poly(2), GfPoly::from_coefficients(&[2, 3, 1]));
        assert_eq!(generator_poly(7).num_terms(), 8);
    }

    #[test]
    fn test_rs_encode_simple() {
        let ecc = encode_bytes(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10);
        assert_eq!(&*ecc, b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17");
    }

    #[test]
    fn test_rs_encode_13() {
        let ecc = encode_bytes(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13);
        assert_eq!(&*ecc, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_rs_encode_18() {
        let ecc = encode_bytes(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18);
        assert_eq!(&*ecc, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_rs_encode_preserves_leading_zeros() {
        let mut bb = BitBuffer::new();
        bb.append_bytes(&[0x00, 0x00, 0x8a]);
        let encoded = rs_encode(&bb, 5);
        assert_eq!(&encoded.data()[..3], &[0x00, 0x00, 0x8a]);
        assert_eq!(encoded.len(), 64);
    }

    #[test]
    fn test_rs_encode_matches_remainder() {
        let data: Vec<u8> = (0..19).map(|i| (i * 37 + 5) as u8).collect();
        let num_ec = 7;
        let ecc = encode_bytes(&data, num_ec);

        let mut bb = BitBuffer::new();
        bb.append_bytes(&data);
        let shifted = GfPoly::from_data(&bb).multiply(&GfPoly::monomial(1, num_ec));
        let remainder = shifted.remainder(&generator_poly(num_ec));
        assert_eq!(ecc, remainder.data(num_ec));
    }
}
