//! Zobrist keys for position fingerprinting.
//!
//! Keys cover piece placement, side to move, castling availability, and an
//! en-passant file component. They are drawn from a fixed-seed PRNG so a
//! fingerprint means the same thing across processes; persisted
//! transposition entries would otherwise be garbage on reload.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

struct ZobristKeys {
    /// Indexed by [color][piece][square].
    piece_keys: [[[u64; 64]; 6]; 2],
    /// Indexed by the packed castling-rights byte.
    castling_keys: [u64; 16],
    /// Indexed by en-passant file.
    en_passant_keys: [u64; 8],
    black_to_move_key: u64,
}

static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut keys = ZobristKeys {
        piece_keys: [[[0; 64]; 6]; 2],
        castling_keys: [0; 16],
        en_passant_keys: [0; 8],
        black_to_move_key: 0,
    };
    for color in 0..2 {
        for piece in 0..6 {
            for sq in 0..64 {
                keys.piece_keys[color][piece][sq] = rng.gen();
            }
        }
    }
    // Index 0 means "no rights"; keep it zero so the empty state is the
    // identity under XOR.
    for i in 1..16 {
        keys.castling_keys[i] = rng.gen();
    }
    for i in 0..8 {
        keys.en_passant_keys[i] = rng.gen();
    }
    keys.black_to_move_key = rng.gen();
    keys
});

#[must_use]
pub fn piece_key(color: usize, piece: usize, sq: usize) -> u64 {
    ZOBRIST.piece_keys[color][piece][sq]
}

#[must_use]
pub fn castling_key(rights: u8) -> u64 {
    ZOBRIST.castling_keys[(rights & 0x0F) as usize]
}

#[must_use]
pub fn en_passant_key(file: Option<usize>) -> u64 {
    match file {
        Some(file) => ZOBRIST.en_passant_keys[file % 8],
        None => 0,
    }
}

#[must_use]
pub fn black_to_move_key() -> u64 {
    ZOBRIST.black_to_move_key
}
