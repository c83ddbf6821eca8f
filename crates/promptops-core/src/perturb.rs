//! Prompt perturbation strategies.
//!
//! A perturbation is a small controlled corruption of the prompt. Every
//! strategy may return its input unchanged, so callers must tolerate
//! `perturbed == original`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Pluggable perturbation capability injected into a test case.
pub trait Perturber: Send + Sync {
    fn perturb(&self, text: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Whitespace plus the ASCII information separators U+001C..=U+001F, which
/// `char::is_whitespace` leaves out but which also split records and fields.
pub fn is_spacing(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Swap the characters at `index` and `index + 1`.
///
/// Returns the input unchanged when it has fewer than two characters, when
/// `index + 1` is out of range, or when either character is spacing (see
/// [`is_spacing`]). Indices count Unicode scalar values, not bytes.
pub fn swap_adjacent_at(text: &str, index: usize) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    if chars.len() < 2 || index + 1 >= chars.len() {
        return text.to_string();
    }
    if is_spacing(chars[index]) || is_spacing(chars[index + 1]) {
        return text.to_string();
    }
    chars.swap(index, index + 1);
    chars.into_iter().collect()
}

/// Swap one uniformly chosen pair of neighbouring characters.
pub fn swap_adjacent<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let len = text.chars().count();
    if len < 2 {
        return text.to_string();
    }
    let index = rng.gen_range(0..=len - 2);
    swap_adjacent_at(text, index)
}

/// Flip the case of the character at `index`; non-alphabetic characters are left alone.
pub fn flip_case_at(text: &str, index: usize) -> String {
    text.chars()
        .enumerate()
        .flat_map(|(i, c)| {
            let flipped: Vec<char> = if i != index || !c.is_alphabetic() {
                vec![c]
            } else if c.is_uppercase() {
                c.to_lowercase().collect()
            } else {
                c.to_uppercase().collect()
            };
            flipped
        })
        .collect()
}

fn lock_rng(rng: &Mutex<StdRng>) -> std::sync::MutexGuard<'_, StdRng> {
    // A poisoned RNG is still a valid RNG.
    rng.lock().unwrap_or_else(|e| e.into_inner())
}

/// Adjacent-character swap with its own seedable random source.
#[derive(Debug)]
pub struct AdjacentSwap {
    rng: Mutex<StdRng>,
}

impl AdjacentSwap {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Perturber for AdjacentSwap {
    fn perturb(&self, text: &str) -> String {
        let mut rng = lock_rng(&self.rng);
        swap_adjacent(text, &mut *rng)
    }

    fn name(&self) -> &'static str {
        "adjacent_swap"
    }
}

/// Flips the case of one randomly chosen character.
#[derive(Debug)]
pub struct CaseFlip {
    rng: Mutex<StdRng>,
}

impl CaseFlip {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Perturber for CaseFlip {
    fn perturb(&self, text: &str) -> String {
        let len = text.chars().count();
        if len == 0 {
            return String::new();
        }
        let index = lock_rng(&self.rng).gen_range(0..len);
        flip_case_at(text, index)
    }

    fn name(&self) -> &'static str {
        "case_flip"
    }
}
