use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_up_and_down_conflict() {
    let result = Cli::try_parse_from(["om", "--up", "--down"]);
    assert!(result.is_err());
}

#[test]
fn test_negative_step_parses() {
    let cli = Cli::try_parse_from(["om", "--down", "--step", "-2"]).unwrap();
    assert_eq!(cli.step, Some(-2));
}

#[test]
fn test_sumfile_conflicts_with_migration() {
    assert!(Cli::try_parse_from(["om", "--sumfile", "--up"]).is_err());
}

#[test]
fn test_overrides_carry_flags() {
    let cli = Cli::try_parse_from([
        "om",
        "--objects-path",
        "file:///srv/objects",
        "--resolution-policy",
        "nearest",
        "--resolve",
        "3",
    ])
    .unwrap();

    let overrides = cli.config_overrides();
    assert_eq!(overrides.objects_path.as_deref(), Some("file:///srv/objects"));
    assert_eq!(overrides.resolution_policy, Some(ResolutionPolicy::Nearest));
    assert_eq!(cli.resolve, Some(3));
    assert_eq!(cli.output, OutputFormat::Text);
}
