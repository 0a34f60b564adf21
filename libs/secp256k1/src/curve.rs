//! secp256k1 domain parameters and point arithmetic
//!
//! The curve is `y^2 = x^3 + 7` over the prime field `F_p`. Parameters are
//! parsed once into a process-wide [`CurveParams`] singleton behind a
//! `OnceLock`; everything after initialization is read-only.
//!
//! Scalar multiplication comes in two flavours:
//! - [`CurveParams::mul_base`] uses a fixed-base comb over a precomputed
//!   table of generator multiples (the hot path for key derivation and
//!   signing),
//! - [`CurveParams::mul`] is plain double-and-add for arbitrary points.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::sync::OnceLock;

const P_HEX: &[u8] = b"fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
const N_HEX: &[u8] = b"fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
const GX_HEX: &[u8] = b"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
const GY_HEX: &[u8] = b"483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

/// Comb teeth; the 256-bit scalar is split into 4 rows of 64 columns.
const COMB_TEETH: u64 = 4;
/// Columns per comb row.
const COMB_COLUMNS: u64 = 64;

/// Field element size in bytes
pub const FIELD_SIZE: usize = 32;

/// An affine point on the curve, or the point at infinity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Point {
    /// The group identity
    Infinity,
    /// An affine coordinate pair, both reduced modulo `p`
    Affine {
        /// x coordinate
        x: BigUint,
        /// y coordinate
        y: BigUint,
    },
}

impl Point {
    /// True for the group identity
    #[must_use]
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }
}

/// Immutable secp256k1 domain parameters plus the fixed-base comb table.
pub struct CurveParams {
    /// Prime field modulus
    pub p: BigUint,
    /// Curve coefficient `b` (`a` is zero for secp256k1)
    pub b: BigUint,
    /// Generator point
    pub g: Point,
    /// Group order
    pub n: BigUint,
    /// Cofactor
    pub h: BigUint,
    /// `n >> 1`, the low-S boundary
    pub half_n: BigUint,
    /// `(p + 1) / 4`, the square-root exponent (`p = 3 mod 4`)
    sqrt_exp: BigUint,
    /// Comb table: entry `j` is `sum over set bits i of j: 2^(64*i) * G`
    comb: Vec<Point>,
}

static CURVE: OnceLock<CurveParams> = OnceLock::new();

/// The process-wide secp256k1 domain. Built exactly once; the hex constants
/// are baked in, so a parse failure aborts at first use rather than
/// surfacing as a runtime arithmetic error.
pub fn curve() -> &'static CurveParams {
    CURVE.get_or_init(CurveParams::new)
}

impl CurveParams {
    fn new() -> Self {
        let p = BigUint::parse_bytes(P_HEX, 16).expect("valid field modulus");
        let n = BigUint::parse_bytes(N_HEX, 16).expect("valid group order");
        let gx = BigUint::parse_bytes(GX_HEX, 16).expect("valid generator x");
        let gy = BigUint::parse_bytes(GY_HEX, 16).expect("valid generator y");
        let g = Point::Affine { x: gx, y: gy };
        let half_n = &n >> 1u32;
        let sqrt_exp = (&p + BigUint::one()) >> 2u32;

        let mut params = Self {
            b: BigUint::from(7u32),
            h: BigUint::one(),
            comb: Vec::new(),
            p,
            g,
            n,
            half_n,
            sqrt_exp,
        };
        params.comb = params.build_comb_table();
        params
    }

    /// Precompute the 16-entry comb table of generator multiples.
    fn build_comb_table(&self) -> Vec<Point> {
        // Row bases: G, 2^64 G, 2^128 G, 2^192 G
        let mut rows = Vec::with_capacity(COMB_TEETH as usize);
        let mut base = self.g.clone();
        for _ in 0..COMB_TEETH {
            rows.push(base.clone());
            for _ in 0..COMB_COLUMNS {
                base = self.double(&base);
            }
        }

        let mut table = vec![Point::Infinity; 1 << COMB_TEETH];
        for (j, entry) in table.iter_mut().enumerate() {
            let mut acc = Point::Infinity;
            for (i, row) in rows.iter().enumerate() {
                if j & (1 << i) != 0 {
                    acc = self.add(&acc, row);
                }
            }
            *entry = acc;
        }
        table
    }

    /// Point addition in affine coordinates.
    #[must_use]
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        let (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) = (lhs, rhs) else {
            return if lhs.is_infinity() {
                rhs.clone()
            } else {
                lhs.clone()
            };
        };

        if x1 == x2 {
            return if (y1 + y2) % &self.p == BigUint::zero() {
                Point::Infinity
            } else {
                self.double(lhs)
            };
        }

        let lambda = self.mod_mul(
            &self.mod_sub(y2, y1),
            &self.mod_inv(&self.mod_sub(x2, x1)),
        );
        self.chord(&lambda, x1, x2, y1)
    }

    /// Point doubling in affine coordinates.
    #[must_use]
    pub fn double(&self, point: &Point) -> Point {
        let Point::Affine { x, y } = point else {
            return Point::Infinity;
        };
        if y.is_zero() {
            return Point::Infinity;
        }

        // lambda = 3 x^2 / 2 y
        let three_x2 = self.mod_mul(&(x * x % &self.p), &BigUint::from(3u32));
        let two_y = (y << 1u32) % &self.p;
        let lambda = self.mod_mul(&three_x2, &self.mod_inv(&two_y));
        self.chord(&lambda, x, x, y)
    }

    /// Shared tail of add/double: `x3 = l^2 - x1 - x2`, `y3 = l(x1 - x3) - y1`.
    fn chord(&self, lambda: &BigUint, x1: &BigUint, x2: &BigUint, y1: &BigUint) -> Point {
        let x3 = self.mod_sub(&self.mod_sub(&(lambda * lambda % &self.p), x1), x2);
        let y3 = self.mod_sub(&self.mod_mul(lambda, &self.mod_sub(x1, &x3)), y1);
        Point::Affine { x: x3, y: y3 }
    }

    /// Double-and-add scalar multiplication for arbitrary points.
    ///
    /// The scalar is used as-is (no reduction mod `n`), so `mul(n, point)`
    /// really walks the full order and lands on the identity.
    #[must_use]
    pub fn mul(&self, scalar: &BigUint, point: &Point) -> Point {
        let mut acc = Point::Infinity;
        for i in (0..scalar.bits()).rev() {
            acc = self.double(&acc);
            if scalar.bit(i) {
                acc = self.add(&acc, point);
            }
        }
        acc
    }

    /// Fixed-base comb multiplication by the generator.
    ///
    /// The comb table covers 256 scalar bits; callers pass scalars below
    /// the group order.
    #[must_use]
    pub fn mul_base(&self, scalar: &BigUint) -> Point {
        let mut acc = Point::Infinity;
        for col in (0..COMB_COLUMNS).rev() {
            acc = self.double(&acc);
            let mut idx = 0usize;
            for tooth in 0..COMB_TEETH {
                if scalar.bit(tooth * COMB_COLUMNS + col) {
                    idx |= 1 << tooth;
                }
            }
            if idx != 0 {
                acc = self.add(&acc, &self.comb[idx]);
            }
        }
        acc
    }

    /// Shamir's trick: `k1 * p1 + k2 * p2` in a single double-and-add pass.
    #[must_use]
    pub fn linear_combination(
        &self,
        k1: &BigUint,
        p1: &Point,
        k2: &BigUint,
        p2: &Point,
    ) -> Point {
        let sum = self.add(p1, p2);
        let mut acc = Point::Infinity;
        for i in (0..k1.bits().max(k2.bits())).rev() {
            acc = self.double(&acc);
            match (k1.bit(i), k2.bit(i)) {
                (true, true) => acc = self.add(&acc, &sum),
                (true, false) => acc = self.add(&acc, p1),
                (false, true) => acc = self.add(&acc, p2),
                (false, false) => {}
            }
        }
        acc
    }

    /// SEC1 point encoding: `02/03 || x` compressed, `04 || x || y`
    /// uncompressed. The point at infinity encodes as a single zero byte.
    #[must_use]
    pub fn encode_point(&self, point: &Point, compressed: bool) -> Vec<u8> {
        let Point::Affine { x, y } = point else {
            return vec![0x00];
        };
        if compressed {
            let parity = if y.bit(0) { 0x03 } else { 0x02 };
            let mut out = Vec::with_capacity(1 + FIELD_SIZE);
            out.push(parity);
            out.extend_from_slice(&to_fixed_bytes(x));
            out
        } else {
            let mut out = Vec::with_capacity(1 + 2 * FIELD_SIZE);
            out.push(0x04);
            out.extend_from_slice(&to_fixed_bytes(x));
            out.extend_from_slice(&to_fixed_bytes(y));
            out
        }
    }

    /// Recover the affine point with the given x coordinate and y parity.
    ///
    /// Returns `None` when `x >= p` or `x^3 + 7` has no square root, i.e.
    /// when no such point exists on the curve.
    #[must_use]
    pub fn decompress(&self, x: &BigUint, odd_y: bool) -> Option<Point> {
        if *x >= self.p {
            return None;
        }
        let rhs = (x.modpow(&BigUint::from(3u32), &self.p) + &self.b) % &self.p;
        let y = rhs.modpow(&self.sqrt_exp, &self.p);
        // p = 3 mod 4, so y is a root iff rhs is a quadratic residue
        if y.modpow(&BigUint::from(2u32), &self.p) != rhs {
            return None;
        }
        let y = if y.bit(0) == odd_y { y } else { &self.p - y };
        Some(Point::Affine { x: x.clone(), y })
    }

    /// Modular inverse in `F_p` via Fermat's little theorem.
    fn mod_inv(&self, value: &BigUint) -> BigUint {
        value.modpow(&(&self.p - BigUint::from(2u32)), &self.p)
    }

    fn mod_mul(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        lhs * rhs % &self.p
    }

    fn mod_sub(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        ((lhs % &self.p) + &self.p - (rhs % &self.p)) % &self.p
    }

    /// Modular inverse in the scalar field `Z_n`.
    #[must_use]
    pub fn scalar_inv(&self, value: &BigUint) -> BigUint {
        value.modpow(&(&self.n - BigUint::from(2u32)), &self.n)
    }
}

/// Left-pad a field element to exactly 32 big-endian bytes.
#[must_use]
pub fn to_fixed_bytes(value: &BigUint) -> [u8; FIELD_SIZE] {
    let raw = value.to_bytes_be();
    let mut out = [0u8; FIELD_SIZE];
    out[FIELD_SIZE - raw.len()..].copy_from_slice(&raw);
    out
}
