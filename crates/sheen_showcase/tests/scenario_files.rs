//! Scenario files shipped in `scenarios/`

use sheen_showcase::{run_scenario, ShowcaseConfig};

#[test]
fn explore_round_trip_scenario_passes() {
    let input = include_str!("../../../scenarios/explore_round_trip.json");
    let outcome = run_scenario(input, &ShowcaseConfig::new()).unwrap();
    let report = outcome.report();
    assert!(report.is_passed(), "{report:?}");
    assert_eq!(report.final_mode, "scroll_driven");
    assert_eq!(
        report.transitions,
        vec![
            "intro -> scroll_driven",
            "scroll_driven -> transitioning",
            "transitioning -> free_explore",
            "free_explore -> transitioning",
            "transitioning -> scroll_driven",
        ]
    );

    let rejected = report
        .actions
        .iter()
        .filter(|a| a.outcome == "Ignored(TransitionInProgress)")
        .count();
    assert_eq!(rejected, 1);
}
