use speechtask::trial::{LoadedBuffer, SubmitStep, TrialPhase, TrialRunner};

fn run_one_trial(runner: &mut TrialRunner) -> SubmitStep {
    assert!(runner.respond(), "respond should succeed in AwaitingResponse");
    runner.submit().expect("submit should succeed in Scoring")
}

#[test]
fn empty_runner_stays_idle() {
    let mut runner = TrialRunner::empty();
    assert_eq!(runner.phase(), TrialPhase::Idle);
    assert_eq!(runner.start(), None);
    runner.playback_done();
    assert!(!runner.respond());
    assert_eq!(runner.submit(), None);
    assert_eq!(runner.phase(), TrialPhase::Idle);
}

#[test]
fn zero_length_list_never_arms() {
    let runner = TrialRunner::new(0);
    assert_eq!(runner.phase(), TrialPhase::Idle);
}

#[test]
fn reaches_done_after_exactly_n_trials() {
    let n = 5;
    let mut runner = TrialRunner::new(n);
    assert_eq!(runner.phase(), TrialPhase::AwaitingStart);
    assert_eq!(runner.start(), Some(0));

    let mut completed = 0;
    loop {
        assert_eq!(runner.phase(), TrialPhase::Playing);
        runner.playback_done();
        assert_eq!(runner.phase(), TrialPhase::AwaitingResponse);
        let step = run_one_trial(&mut runner);
        completed += 1;
        match step {
            SubmitStep::Adapt => {
                let next = runner.advance().expect("advance after Adapt");
                assert_eq!(next, completed);
            }
            SubmitStep::Done => break,
        }
    }
    assert_eq!(completed, n, "Done must arrive on trial N exactly");
    assert!(runner.is_done());
}

#[test]
fn done_is_terminal_and_ignores_input() {
    let mut runner = TrialRunner::new(1);
    runner.start();
    runner.playback_done();
    assert_eq!(run_one_trial(&mut runner), SubmitStep::Done);
    assert!(runner.is_done());

    // Every transition is a no-op from Done.
    assert_eq!(runner.start(), None);
    runner.playback_done();
    assert!(!runner.respond());
    assert_eq!(runner.submit(), None);
    assert_eq!(runner.advance(), None);
    assert!(runner.is_done());
}

#[test]
fn only_the_trial_buffer_ends_playing() {
    let mut runner = TrialRunner::new(2);
    assert_eq!(runner.start(), Some(0));
    assert_eq!(runner.phase(), TrialPhase::Playing);

    // A calibration tone (or nothing at all) finishing must not stand in
    // for the trial stimulus.
    runner.playback_done_for(LoadedBuffer::Calibration);
    assert_eq!(runner.phase(), TrialPhase::Playing);
    runner.playback_done_for(LoadedBuffer::None);
    assert_eq!(runner.phase(), TrialPhase::Playing);

    runner.playback_done_for(LoadedBuffer::Trial);
    assert_eq!(runner.phase(), TrialPhase::AwaitingResponse);
}

#[test]
fn out_of_phase_calls_are_rejected() {
    let mut runner = TrialRunner::new(3);
    // Cannot respond or submit before anything played.
    assert!(!runner.respond());
    assert_eq!(runner.submit(), None);
    assert_eq!(runner.advance(), None);

    assert_eq!(runner.start(), Some(0));
    // Cannot start twice or submit while still playing.
    assert_eq!(runner.start(), None);
    assert_eq!(runner.submit(), None);
    runner.playback_done();
    // Submit without respond is rejected.
    assert_eq!(runner.submit(), None);
    assert!(runner.respond());
    assert_eq!(runner.submit(), Some(SubmitStep::Adapt));
}

#[test]
fn abort_returns_to_idle_and_disables_flow() {
    let mut runner = TrialRunner::new(4);
    runner.start();
    runner.abort();
    assert_eq!(runner.phase(), TrialPhase::Idle);
    assert_eq!(runner.start(), None);
}

#[test]
fn trial_numbers_are_one_based() {
    let mut runner = TrialRunner::new(2);
    assert_eq!(runner.trial_number(), 1);
    runner.start();
    runner.playback_done();
    run_one_trial(&mut runner);
    runner.advance();
    assert_eq!(runner.trial_number(), 2);
    assert_eq!(runner.total(), 2);
}
