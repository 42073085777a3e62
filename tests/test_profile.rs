use camino::Utf8PathBuf;
use mutsense::error::MutsenseError;
use mutsense::profile::RulesProfile;
use mutsense::rules::{COVERAGE_RATIO_PARAM, RuleConfig, RuleId, coverage_threshold};
use tempfile::TempDir;

#[test]
fn empty_profile_activates_nothing() {
    let rules = RulesProfile::parse("").unwrap().active_rules();
    assert!(!rules.is_active(RuleId::SurvivedMutant));
    assert!(!rules.is_active(RuleId::InsufficientMutationCoverage));
}

#[test]
fn present_table_activates_rule() {
    let profile = RulesProfile::parse("[rules.survived-mutant]\n").unwrap();
    let rules = profile.active_rules();
    assert!(rules.is_active(RuleId::SurvivedMutant));
    assert!(!rules.is_active(RuleId::InsufficientMutationCoverage));
}

#[test]
fn integer_and_string_params_are_accepted() {
    let int = RulesProfile::parse("[rules.insufficient-mutation-coverage]\ncoverageRatio = 70\n")
        .unwrap()
        .active_rules();
    assert_eq!(coverage_threshold(&int), 70);

    let string = RulesProfile::parse("[rules.insufficient-mutation-coverage]\ncoverageRatio = \"65\"\n")
        .unwrap()
        .active_rules();
    assert_eq!(coverage_threshold(&string), 65);
}

#[test]
fn float_param_falls_back_to_default() {
    let rules = RulesProfile::parse("[rules.insufficient-mutation-coverage]\ncoverageRatio = 70.5\n")
        .unwrap()
        .active_rules();
    assert_eq!(
        rules.parameter(RuleId::InsufficientMutationCoverage, COVERAGE_RATIO_PARAM),
        Some("70.5".to_string())
    );
    assert_eq!(coverage_threshold(&rules), 50);
}

#[test]
fn non_scalar_param_is_ignored() {
    let rules = RulesProfile::parse("[rules.insufficient-mutation-coverage]\ncoverageRatio = [1, 2]\n")
        .unwrap()
        .active_rules();
    assert!(rules.is_active(RuleId::InsufficientMutationCoverage));
    assert_eq!(rules.parameter(RuleId::InsufficientMutationCoverage, COVERAGE_RATIO_PARAM), None);
}

#[test]
fn unknown_rules_are_ignored() {
    let rules = RulesProfile::parse("[rules.made-up]\n[rules.survived-mutant]\n")
        .unwrap()
        .active_rules();
    assert_eq!(rules.active().collect::<Vec<_>>(), vec![RuleId::SurvivedMutant]);
}

#[test]
fn load_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("rules.toml")).unwrap();
    std::fs::write(
        &path,
        "[rules.survived-mutant]\n\n[rules.insufficient-mutation-coverage]\ncoverageRatio = 80\n",
    )
    .unwrap();

    let rules = RulesProfile::load(&path).unwrap().active_rules();
    assert!(rules.is_active(RuleId::SurvivedMutant));
    assert_eq!(coverage_threshold(&rules), 80);
}

#[test]
fn load_missing_file_is_io_error() {
    let err = RulesProfile::load(camino::Utf8Path::new("/nonexistent/rules.toml")).unwrap_err();
    assert!(matches!(err, MutsenseError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/rules.toml"));
}

#[test]
fn load_invalid_toml_is_toml_error() {
    let dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("bad.toml")).unwrap();
    std::fs::write(&path, "[rules\n").unwrap();

    let err = RulesProfile::load(&path).unwrap_err();
    assert!(matches!(err, MutsenseError::Toml { .. }));
}
