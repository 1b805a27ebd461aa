// SPDX-License-Identifier: MIT

//! Wild-card resolution: a single Bernoulli draw made once when a cycle
//! opens, threaded through to the strategize job's payload from there.

use rand::Rng;

/// Resolve whether the cycle about to open is a wild-card cycle.
///
/// Takes the RNG as a parameter rather than seeding its own, so tests can
/// pass a seeded `rand::rngs::StdRng` and assert deterministic outcomes.
pub fn resolve_wild_card(frequency: f64, rng: &mut impl Rng) -> bool {
    rng.gen_bool(frequency.clamp(0.0, 1.0))
}

#[cfg(test)]
#[path = "wild_card_tests.rs"]
mod tests;
