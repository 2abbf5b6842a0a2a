use holdem_engine::{Action, ActionError, EngineError, Phase, Round, RoundConfig};

fn seeded(seed: u64) -> Round {
    let mut round = Round::new(RoundConfig {
        seed: Some(seed),
        ..RoundConfig::default()
    });
    round.start().expect("round starts");
    round
}

fn assert_untouched(round: &Round, pot: u32, turn: Option<usize>) {
    assert_eq!(round.pot(), pot);
    assert_eq!(round.current_turn(), turn);
    assert_eq!(round.phase(), Phase::PreFlop);
}

#[test]
fn rejected_action_leaves_the_round_unchanged() {
    let mut round = seeded(42);
    let actor = round.current_turn().expect("betting open");
    let pot = round.pot();
    let stack = round.seats()[actor].stack();

    let err = round
        .apply(actor, Action::Raise(stack + 100))
        .expect_err("raise over stack");
    match &err {
        EngineError::InvalidAction(ActionError::ExceedsStack { amount, .. }) => {
            assert_eq!(*amount, stack + 100)
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_fatal());
    assert_untouched(&round, pot, Some(actor));
    assert_eq!(round.seats()[actor].stack(), stack);

    // the same seat retries with a legal raise
    round.apply(actor, Action::Raise(6)).expect("valid raise");
    assert_eq!(round.pot(), pot + 6);
}

#[test]
fn repeated_rejection_is_idempotent() {
    let mut round = seeded(42);
    let actor = round.current_turn().expect("betting open");
    let stack = round.seats()[actor].stack();

    let observe = |round: &Round| {
        (
            round.phase(),
            round.current_turn(),
            round.pot(),
            round.actions().len(),
            round
                .seats()
                .iter()
                .map(|s| (s.stack(), s.round_bet(), s.street_bet()))
                .collect::<Vec<_>>(),
        )
    };

    let first = round
        .apply(actor, Action::Raise(stack + 100))
        .expect_err("raise over stack");
    let snapshot = observe(&round);
    let second = round
        .apply(actor, Action::Raise(stack + 100))
        .expect_err("raise over stack");

    // the same violation yields the same error and the same state
    assert_eq!(first, second);
    assert_eq!(observe(&round), snapshot);
}

#[test]
fn acting_out_of_turn_is_rejected() {
    let mut round = seeded(42);
    let actor = round.current_turn().expect("betting open");
    let other = (actor + 1) % round.seats().len();
    let pot = round.pot();

    let err = round.apply(other, Action::Call).expect_err("out of turn");
    assert!(matches!(
        err,
        EngineError::InvalidAction(ActionError::OutOfTurn { expected, actual })
            if expected == actor && actual == other
    ));
    assert_untouched(&round, pot, Some(actor));
}

#[test]
fn check_facing_a_bet_is_rejected() {
    let mut round = seeded(42);
    let actor = round.current_turn().expect("betting open");
    assert!(round.to_call(actor) > 0);

    let err = round.apply(actor, Action::Check).expect_err("owes chips");
    assert!(matches!(
        err,
        EngineError::InvalidAction(ActionError::CheckFacingBet { .. })
    ));
}

#[test]
fn bet_below_big_blind_is_rejected() {
    let mut round = seeded(42);
    let actor = round.current_turn().expect("betting open");

    let err = round.apply(actor, Action::Raise(1)).expect_err("too small");
    assert!(matches!(
        err,
        EngineError::InvalidAction(ActionError::BelowMinimum { amount: 1, minimum: 2 })
    ));
}

#[test]
fn acting_before_start_is_rejected() {
    let mut round = Round::new(RoundConfig::default());
    let err = round.apply(0, Action::Check).expect_err("not started");
    assert!(matches!(
        err,
        EngineError::InvalidAction(ActionError::NoBettingRound)
    ));
}

#[test]
fn raise_reopens_the_action() {
    let mut round = seeded(8);
    let (sb, bb) = round.blinds();

    round.apply(sb, Action::Call).expect("call");
    round.apply(bb, Action::Raise(6)).expect("raise");
    // the caller owes the difference and must answer again
    assert_eq!(round.phase(), Phase::PreFlop);
    assert_eq!(round.current_turn(), Some(sb));
    assert_eq!(round.to_call(sb), 6);

    round.apply(sb, Action::Call).expect("call the raise");
    assert_eq!(round.phase(), Phase::Flop);
    assert_eq!(round.pot(), 16);
}

#[test]
fn maximal_stacks_resolve_without_overflow() {
    // the largest heads-up stack whose combined chips still fit the pot
    let stack = u32::MAX / 2;
    let mut round = Round::new(RoundConfig {
        seed: Some(6),
        starting_stack: stack,
        ..RoundConfig::default()
    });
    round.start().expect("round starts");
    let (sb, bb) = round.blinds();

    round.apply(sb, Action::Raise(stack - 1)).expect("shove");
    round.apply(bb, Action::Call).expect("call all-in");

    assert_eq!(round.phase(), Phase::Showdown);
    assert_eq!(round.outcome().expect("resolved").pot, stack * 2);
    let after: u32 = round.seats().iter().map(|s| s.stack()).sum();
    assert_eq!(after, stack * 2);
}

#[test]
fn short_stack_call_goes_all_in() {
    let mut round = Round::new(RoundConfig {
        seed: Some(3),
        starting_stack: 50,
        ..RoundConfig::default()
    });
    round.start().expect("round starts");
    let (sb, bb) = round.blinds();

    round.apply(sb, Action::Raise(49)).expect("shove");
    assert!(round.seats()[sb].all_in());
    round.apply(bb, Action::Call).expect("call all-in");
    assert!(round.seats()[bb].all_in());

    // nobody can bet further, so the board runs out to showdown
    assert_eq!(round.phase(), Phase::Showdown);
    assert_eq!(round.community().len(), 5);
    assert!(round.outcome().is_some());
}
