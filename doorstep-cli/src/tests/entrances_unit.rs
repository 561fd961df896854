//! Unit tests for the `entrances` command.

use super::helpers::{DESTINATION_ARG, StubAdapterBuilder, two_entrances};
use super::*;
use crate::entrances::{EntrancesArgs, run_entrances_with};
use doorstep_core::EntranceCandidate;
use rstest::rstest;

#[rstest]
fn prints_candidates_as_json() {
    let builder = StubAdapterBuilder::straight_lines_to(two_entrances());
    let args = EntrancesArgs {
        destination: Some(DESTINATION_ARG.to_owned()),
        search_radius_m: Some(25.0),
        ..EntrancesArgs::default()
    };
    let mut stdout = Vec::new();

    run_entrances_with(args, &builder, &mut stdout).expect("command should succeed");

    let printed: Vec<EntranceCandidate> =
        serde_json::from_slice(&stdout).expect("output should be JSON candidates");
    assert_eq!(printed, two_entrances());
    let seen = builder.seen.borrow();
    let settings = seen.as_ref().expect("settings recorded");
    assert!((settings.search_radius_m - 25.0).abs() < f64::EPSILON);
}

#[rstest]
fn missing_destination_names_the_environment_variable() {
    let builder = StubAdapterBuilder::straight_lines_to(Vec::new());
    let mut stdout = Vec::new();

    let err = run_entrances_with(EntrancesArgs::default(), &builder, &mut stdout)
        .expect_err("destination is required");

    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DESTINATION);
            assert_eq!(env, ENV_ENTRANCES_DESTINATION);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}
