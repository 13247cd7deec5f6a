//! Simulated assistant behaviour
//!
//! Two policies decide what a reply looks like, independently of when it is
//! delivered: a `Responder` picks the reply text for a prompt, and a
//! `ReplyDelay` picks how long the simulated model takes.

use crate::config::AssistantConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Turns a user prompt into assistant reply text
pub trait Responder: Send {
    fn respond(&mut self, prompt: &str) -> String;
}

impl<F> Responder for F
where
    F: FnMut(&str) -> String + Send,
{
    fn respond(&mut self, prompt: &str) -> String {
        self(prompt)
    }
}

/// Picks one of a fixed set of replies at random, ignoring the prompt
#[derive(Debug)]
pub struct CannedResponder {
    replies: Vec<String>,
    rng: StdRng,
}

impl CannedResponder {
    /// Create a responder over `replies`, seeded for reproducibility if asked
    pub fn new(replies: Vec<String>, seed: Option<u64>) -> Self {
        Self {
            replies,
            rng: rng_from(seed),
        }
    }

    /// Build from the assistant section of the configuration
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.replies.clone(), config.seed)
    }
}

impl Responder for CannedResponder {
    fn respond(&mut self, _prompt: &str) -> String {
        if self.replies.is_empty() {
            return String::new();
        }
        let index = self.rng.gen_range(0..self.replies.len());
        self.replies[index].clone()
    }
}

/// Replies with the prompt itself
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoResponder;

impl Responder for EchoResponder {
    fn respond(&mut self, prompt: &str) -> String {
        prompt.to_string()
    }
}

/// Bounded latency distribution for simulated replies
#[derive(Debug)]
pub struct ReplyDelay {
    min: Duration,
    max: Duration,
    rng: StdRng,
}

impl ReplyDelay {
    /// Uniform delay in `[min, max]`; bounds are swapped if given inverted
    pub fn uniform(min: Duration, max: Duration, seed: Option<u64>) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            rng: rng_from(seed),
        }
    }

    /// Always the same delay
    pub fn fixed(delay: Duration) -> Self {
        Self::uniform(delay, delay, Some(0))
    }

    /// Build from the assistant section of the configuration
    ///
    /// The seed is offset so latency and reply choice do not walk the same
    /// random sequence.
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::uniform(
            config.min_delay(),
            config.max_delay(),
            config.seed.map(|s| s.wrapping_add(1)),
        )
    }

    /// Draw the next delay
    pub fn sample(&mut self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(self.rng.gen_range(min..=max))
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_picks_from_set() {
        let replies = vec!["one".to_string(), "two".to_string()];
        let mut responder = CannedResponder::new(replies.clone(), Some(42));
        for _ in 0..20 {
            let reply = responder.respond("anything");
            assert!(replies.contains(&reply));
        }
    }

    #[test]
    fn test_canned_seed_is_reproducible() {
        let config = AssistantConfig {
            seed: Some(9),
            ..AssistantConfig::default()
        };
        let mut a = CannedResponder::from_config(&config);
        let mut b = CannedResponder::from_config(&config);
        for _ in 0..5 {
            assert_eq!(a.respond("x"), b.respond("x"));
        }
    }

    #[test]
    fn test_echo_and_closure_responders() {
        assert_eq!(EchoResponder.respond("hi"), "hi");

        let mut shout = |prompt: &str| prompt.to_uppercase();
        assert_eq!(Responder::respond(&mut shout, "hi"), "HI");
    }

    #[test]
    fn test_delay_within_bounds() {
        let mut delay =
            ReplyDelay::uniform(Duration::from_millis(1000), Duration::from_millis(3000), Some(1));
        for _ in 0..50 {
            let d = delay.sample();
            assert!(d >= Duration::from_millis(1000) && d <= Duration::from_millis(3000));
        }
    }

    #[test]
    fn test_fixed_and_inverted_delay() {
        let mut fixed = ReplyDelay::fixed(Duration::from_millis(250));
        assert_eq!(fixed.sample(), Duration::from_millis(250));

        let mut inverted =
            ReplyDelay::uniform(Duration::from_millis(50), Duration::from_millis(10), Some(3));
        let d = inverted.sample();
        assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(50));
    }
}
