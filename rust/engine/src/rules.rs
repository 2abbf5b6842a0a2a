use crate::errors::ActionError;
use crate::seat::{Action, Seat};

/// An action vetted against the betting rules, with the chips it
/// moves fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips actually paid; short of the outstanding bet means the
    /// seat goes all-in for less.
    Call { amount: u32 },
    Bet { amount: u32 },
    Raise { amount: u32 },
}

/// Validates a seat's action against the current betting round.
///
/// * `to_call` — chips the seat owes to match the highest street bet
/// * `min_bet` — minimum stake unit (the big blind)
/// * `highest` — highest street contribution among all seats
///
/// Fold is always allowed. Check requires nothing outstanding. Call
/// matches up to the stack (partial call goes all-in). Bet and raise
/// require at least the minimum stake, at most the remaining stack,
/// and a total street contribution strictly above `highest`.
///
/// Returns an [`ActionError`] without side effects on any violation;
/// the round is applied elsewhere, atomically.
pub fn validate_action(
    seat: &Seat,
    to_call: u32,
    min_bet: u32,
    highest: u32,
    action: Action,
) -> Result<ValidatedAction, ActionError> {
    if seat.folded() {
        return Err(ActionError::SeatFolded);
    }
    match action {
        Action::Fold => Ok(ValidatedAction::Fold),
        Action::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(ActionError::CheckFacingBet { to_call })
            }
        }
        Action::Call => Ok(ValidatedAction::Call {
            amount: to_call.min(seat.stack()),
        }),
        Action::Bet(amount) => {
            check_stake(seat, amount, min_bet, highest)?;
            Ok(ValidatedAction::Bet { amount })
        }
        Action::Raise(amount) => {
            check_stake(seat, amount, min_bet, highest)?;
            Ok(ValidatedAction::Raise { amount })
        }
    }
}

fn check_stake(seat: &Seat, amount: u32, min_bet: u32, highest: u32) -> Result<(), ActionError> {
    if amount < min_bet {
        return Err(ActionError::BelowMinimum {
            amount,
            minimum: min_bet,
        });
    }
    if amount > seat.stack() {
        return Err(ActionError::ExceedsStack {
            amount,
            stack: seat.stack(),
        });
    }
    let total = seat.street_bet() + amount;
    if total <= highest {
        return Err(ActionError::MustExceedHighest { total, highest });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::SeatKind;

    fn seat(stack: u32) -> Seat {
        Seat::new("player", SeatKind::Human, stack)
    }

    #[test]
    fn check_requires_matched_bet() {
        let s = seat(100);
        assert_eq!(
            validate_action(&s, 0, 2, 0, Action::Check),
            Ok(ValidatedAction::Check)
        );
        assert_eq!(
            validate_action(&s, 5, 2, 5, Action::Check),
            Err(ActionError::CheckFacingBet { to_call: 5 })
        );
    }

    #[test]
    fn short_call_resolves_to_remaining_stack() {
        let s = seat(3);
        assert_eq!(
            validate_action(&s, 10, 2, 10, Action::Call),
            Ok(ValidatedAction::Call { amount: 3 })
        );
    }

    #[test]
    fn bet_below_minimum_is_rejected() {
        let s = seat(100);
        assert_eq!(
            validate_action(&s, 0, 2, 0, Action::Bet(1)),
            Err(ActionError::BelowMinimum {
                amount: 1,
                minimum: 2
            })
        );
    }

    #[test]
    fn bet_over_stack_is_rejected() {
        let s = seat(10);
        assert_eq!(
            validate_action(&s, 0, 2, 0, Action::Bet(11)),
            Err(ActionError::ExceedsStack {
                amount: 11,
                stack: 10
            })
        );
    }

    #[test]
    fn raise_must_exceed_highest_contribution() {
        let mut s = seat(100);
        s.commit(2);
        assert_eq!(
            validate_action(&s, 8, 2, 10, Action::Raise(8)),
            Err(ActionError::MustExceedHighest {
                total: 10,
                highest: 10
            })
        );
        assert_eq!(
            validate_action(&s, 8, 2, 10, Action::Raise(12)),
            Ok(ValidatedAction::Raise { amount: 12 })
        );
    }

    #[test]
    fn folded_seat_cannot_act() {
        let mut s = seat(100);
        s.fold();
        assert_eq!(
            validate_action(&s, 0, 2, 0, Action::Check),
            Err(ActionError::SeatFolded)
        );
    }
}
