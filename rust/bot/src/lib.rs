//! Bot decision policies for the hold'em engine.
//!
//! A policy inspects the round through the engine's read accessors and
//! returns one action for the seat it controls. Policies never mutate
//! the round; the engine validates whatever they return.

mod caller;

pub use caller::CallingPolicy;

use holdem_engine::{Action, Round};

/// Strategy interface for a bot-controlled seat.
pub trait BotPolicy: Send + Sync {
    /// Picks an action for `seat`. Must return something the betting
    /// validator accepts for that seat's current state.
    fn decide(&self, round: &Round, seat: usize) -> Action;

    /// Short policy name for logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// Builds a policy by name. Unknown names fall back to the calling
/// policy, the only strategy shipped today.
pub fn create_policy(name: &str) -> Box<dyn BotPolicy> {
    match name {
        "caller" => Box::new(CallingPolicy),
        _ => Box::new(CallingPolicy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_defaults_to_the_calling_policy() {
        assert_eq!(create_policy("caller").name(), "caller");
        assert_eq!(create_policy("no-such-policy").name(), "caller");
    }
}
