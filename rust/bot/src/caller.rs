use holdem_engine::{Action, Round};

use crate::BotPolicy;

/// Passive baseline: checks when free, calls affordable bets, folds
/// to pressure. It never bets or raises, so bot-vs-bot play always
/// terminates.
pub struct CallingPolicy;

impl CallingPolicy {
    /// Largest price the policy will pay, as a fraction of the stack.
    const CALL_DIVISOR: u32 = 4;
}

impl BotPolicy for CallingPolicy {
    fn decide(&self, round: &Round, seat: usize) -> Action {
        let to_call = round.to_call(seat);
        if to_call == 0 {
            return Action::Check;
        }
        let stack = round.seats()[seat].stack();
        if to_call <= stack / Self::CALL_DIVISOR {
            Action::Call
        } else {
            Action::Fold
        }
    }

    fn name(&self) -> &'static str {
        "caller"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::RoundConfig;

    fn started(seed: u64) -> Round {
        let mut round = Round::new(RoundConfig {
            seed: Some(seed),
            ..RoundConfig::default()
        });
        round.start().expect("round starts");
        round
    }

    #[test]
    fn checks_when_nothing_is_owed() {
        let round = started(1);
        let (_, bb) = round.blinds();
        assert_eq!(round.to_call(bb), 0);
        assert_eq!(CallingPolicy.decide(&round, bb), Action::Check);
    }

    #[test]
    fn calls_a_small_bet() {
        let round = started(1);
        let (sb, _) = round.blinds();
        assert_eq!(round.to_call(sb), 1);
        assert_eq!(CallingPolicy.decide(&round, sb), Action::Call);
    }

    #[test]
    fn folds_to_a_large_bet() {
        let mut round = started(1);
        let (sb, bb) = round.blinds();
        round.apply(sb, Action::Raise(150)).expect("big raise");
        assert!(round.to_call(bb) > round.seats()[bb].stack() / 4);
        assert_eq!(CallingPolicy.decide(&round, bb), Action::Fold);
    }

    #[test]
    fn policy_decisions_finish_a_round() {
        let mut round = started(9);
        let human = round.human_seat().expect("human seat");
        loop {
            round
                .advance_bots(|r, seat| CallingPolicy.decide(r, seat))
                .expect("bots act");
            if !round.phase().is_betting() {
                break;
            }
            let action = CallingPolicy.decide(&round, human);
            round.apply(human, action).expect("human acts");
        }
        assert!(round.outcome().is_some());
    }
}
