// tests/verdict_ladder.rs
//
// The verdict is a pure function of the final clamped score.

use credibility_shield::{aggregate, SignalKind, SignalResult, Verdict};

fn ai(score: u32) -> SignalResult {
    SignalResult::triggered(SignalKind::Ai, score, vec![])
}

#[test]
fn documented_boundaries() {
    for (score, expected) in [
        (70, Verdict::LikelyScam),
        (69, Verdict::Suspicious),
        (40, Verdict::Suspicious),
        (39, Verdict::LikelySafe),
        (0, Verdict::LikelySafe),
    ] {
        let r = aggregate(&[ai(score)]);
        assert_eq!(r.score, score);
        assert_eq!(r.verdict, expected, "score {score}");
    }
}

#[test]
fn ladder_is_monotonic_and_bounded() {
    let rank = |v: Verdict| match v {
        Verdict::LikelySafe => 0,
        Verdict::Suspicious => 1,
        Verdict::LikelyScam => 2,
    };
    let mut prev = 0;
    for raw in (0..=300).step_by(7) {
        let r = aggregate(&[ai(raw), SignalResult::unverified_recruiter()]);
        assert!(r.score <= 100);
        assert_eq!(r.score, (raw + 15).min(100));
        let now = rank(r.verdict);
        assert!(now >= prev, "verdict went down at raw={raw}");
        prev = now;
    }
}

#[test]
fn verdict_labels_on_the_wire() {
    assert_eq!(serde_json::to_value(Verdict::LikelySafe).unwrap(), "Likely Safe");
    assert_eq!(serde_json::to_value(Verdict::Suspicious).unwrap(), "Suspicious");
    assert_eq!(serde_json::to_value(Verdict::LikelyScam).unwrap(), "Likely Scam");
}
