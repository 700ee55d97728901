use speechtask::scoring::{is_key_word, TrialWords};

#[test]
fn capitalized_words_are_key_words() {
    assert!(is_key_word("Dog"));
    assert!(is_key_word("Mice"));
    assert!(!is_key_word("the"));
    assert!(!is_key_word("ran"));
}

#[test]
fn punctuation_does_not_hide_a_key_word() {
    assert!(is_key_word("Dog,"));
    assert!(is_key_word("\"Barn\""));
    assert!(is_key_word("House."));
    assert!(!is_key_word("(the)"));
}

#[test]
fn literal_article_a_is_never_scorable() {
    assert!(!is_key_word("A"));
    assert!(!is_key_word("A."));
    // Lowercase "a" was never a candidate anyway.
    assert!(!is_key_word("a"));
    // But words starting with a capital A still count.
    assert!(is_key_word("Apple"));
}

#[test]
fn sole_key_word_a_yields_no_scorable_words() {
    let words = TrialWords::from_sentence("A dog ran home");
    assert_eq!(words.key_count(), 0);
    let score = words.score();
    assert_eq!(score.num_key, 0);
    assert!(score.words_correct.is_empty());
    assert!(score.words_incorrect.is_empty());
}

#[test]
fn checkbox_pattern_partitions_key_words() {
    let mut words = TrialWords::from_sentence("The Dog chased a White Cat home");
    // Key words: Dog, White, Cat (The is capitalized too).
    assert_eq!(words.key_count(), 4);

    // Check "Dog" and "Cat", leave "The" and "White" unchecked.
    for w in &mut words.words {
        if w.text == "Dog" || w.text == "Cat" {
            w.checked = true;
        }
    }
    let score = words.score();
    assert_eq!(score.words_correct, "Dog Cat");
    assert_eq!(score.words_incorrect, "The White");
    assert_eq!(score.num_correct, 2);
    assert_eq!(score.num_key, 4);
    assert_eq!(score.outcome, 0);
}

#[test]
fn outcome_is_right_only_when_all_key_words_are_checked() {
    let mut words = TrialWords::from_sentence("Dogs Bark loudly");
    for w in &mut words.words {
        if w.key {
            w.checked = true;
        }
    }
    let score = words.score();
    assert_eq!(score.num_correct, 2);
    assert_eq!(score.outcome, 1);
    assert!(score.is_correct());

    // Unchecking one flips the trial to wrong.
    let mut words = TrialWords::from_sentence("Dogs Bark loudly");
    words.words[0].checked = true;
    assert_eq!(words.score().outcome, 0);
}

#[test]
fn checking_a_non_key_word_is_impossible_to_score() {
    // Checked state on non-key words is ignored by the partition.
    let mut words = TrialWords::from_sentence("the Dog ran");
    for w in &mut words.words {
        w.checked = true;
    }
    let score = words.score();
    assert_eq!(score.words_correct, "Dog");
    assert_eq!(score.num_key, 1);
}

#[test]
fn clear_checks_resets_scoring_state() {
    let mut words = TrialWords::from_sentence("Big Red Barn");
    for w in &mut words.words {
        w.checked = true;
    }
    words.clear_checks();
    assert_eq!(words.score().num_correct, 0);
}
