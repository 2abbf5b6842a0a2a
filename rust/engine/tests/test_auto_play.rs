use holdem_engine::{Action, EngineError, Phase, Round, RoundConfig, BOT_TURN_CAP};

fn table(seed: u64, bots: usize) -> Round {
    let mut round = Round::new(RoundConfig {
        seed: Some(seed),
        bots,
        ..RoundConfig::default()
    });
    round.start().expect("round starts");
    round
}

/// Calls when chips are owed, checks otherwise.
fn call_or_check(round: &Round, seat: usize) -> Action {
    if round.to_call(seat) > 0 {
        Action::Call
    } else {
        Action::Check
    }
}

#[test]
fn bots_play_until_the_human_holds_the_turn() {
    let mut round = table(11, 3);

    round.advance_bots(call_or_check).expect("bots act");
    match round.current_turn() {
        Some(seat) => assert!(!round.seats()[seat].is_bot()),
        None => assert_eq!(round.phase(), Phase::Showdown),
    }
}

#[test]
fn full_round_alternating_human_and_bots() {
    let mut round = table(23, 3);

    let human = round.human_seat().expect("human seat");
    loop {
        round.advance_bots(call_or_check).expect("bots act");
        if !round.phase().is_betting() {
            break;
        }
        assert_eq!(round.current_turn(), Some(human));
        let action = call_or_check(&round, human);
        round.apply(human, action).expect("human acts");
    }

    assert_eq!(round.phase(), Phase::Showdown);
    assert!(round.outcome().is_some());
}

#[test]
fn runaway_bot_policy_hits_the_turn_cap() {
    let mut round = table(31, 3);
    let human = round.human_seat().expect("human seat");

    round.advance_bots(call_or_check).expect("bots act");
    round.apply(human, Action::Fold).expect("human folds");

    // three bots re-raising each other never settle the street
    let err = round
        .advance_bots(|r, seat| Action::Raise(r.to_call(seat) + r.min_bet()))
        .expect_err("loop must be cut off");
    assert!(matches!(err, EngineError::BotLoopExceeded { cap } if cap == BOT_TURN_CAP));
    assert!(err.is_fatal());
}

#[test]
fn bot_step_reports_whether_a_bot_acted() {
    let mut round = table(11, 1);

    // heads-up the human holds the button and acts first pre-flop
    let human = round.human_seat().expect("human seat");
    assert_eq!(round.current_turn(), Some(human));
    assert!(!round.bot_step(call_or_check).expect("no bot to act"));

    round.apply(human, Action::Call).expect("call");
    assert!(round.bot_step(call_or_check).expect("bot acts"));
}
