use rand::seq::SliceRandom;
use rand::Rng;

pub const PALETTE: [&str; 5] = ["#ff006e", "#ffbe0b", "#8338ec", "#3a86ff", "#06d6a0"];
pub const MAX_DELAY_S: f64 = 4.0;

/// One falling confetti `<span>`, the fall itself is pure CSS
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    pub left_pct: f64,
    pub color: &'static str,
    pub delay_s: f64,
}

impl ConfettiPiece {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ConfettiPiece {
            left_pct: rng.gen_range(0.0..100.0),
            color: PALETTE.choose(rng).copied().unwrap_or(PALETTE[0]),
            delay_s: rng.gen_range(0.0..MAX_DELAY_S),
        }
    }

    pub fn scatter<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::random(rng)).collect()
    }
}
