use pretty_assertions::assert_eq;
use study_test_utils::template_root;
use study_version::{
    available_versions, CreateApp, CreateError, IniModel, StudyAntares, StudyVersion, TemplateDir,
    TemplateSource, UpgradeApp,
};

fn v(text: &str) -> StudyVersion {
    text.parse().unwrap()
}

#[test]
fn lists_template_versions_ascending() {
    let root = template_root(&["empty_study_92", "empty_study_880", "empty_study_700", "notes"]);
    std::fs::write(root.path().join("README_880.txt"), "not a template").unwrap();

    let source = TemplateDir::new(root.path());
    assert_eq!(source.versions().unwrap(), [v("7.0"), v("8.8"), v("9.2")]);
    assert_eq!(available_versions(&source).unwrap(), ["7.0", "8.8", "9.2"]);
}

#[test]
fn creates_study_from_template() {
    let root = template_root(&["empty_study_880"]);
    let target = tempfile::tempdir().unwrap();
    let study_dir = target.path().join("north-sea");

    let app = CreateApp::new(&study_dir, " North Sea ", v("8.8"), " planner ").unwrap();
    app.run(&TemplateDir::new(root.path())).unwrap();

    assert!(study_dir.join("settings/generaldata.ini").is_file());
    assert!(study_dir.join("input/areas").is_dir());

    let study = StudyAntares::from_source(&study_dir).unwrap();
    assert_eq!(study.version, v("8.8"));
    assert_eq!(study.caption, "North Sea");
    assert_eq!(study.author, "planner");
    assert_eq!(study.created_date, study.last_save_date);

    let text = std::fs::read_to_string(study_dir.join("study.antares")).unwrap();
    assert!(text.contains("version = 880\n"));
}

#[test]
fn missing_template_lists_available_versions() {
    let root = template_root(&["empty_study_880", "empty_study_92"]);
    let target = tempfile::tempdir().unwrap();

    let app = CreateApp::new(target.path().join("s"), "s", v("8.6"), "").unwrap();
    let err = app.run(&TemplateDir::new(root.path())).unwrap_err();

    match err {
        CreateError::NoTemplate { version, available } => {
            assert_eq!(version, v("8.6"));
            assert_eq!(available, ["8.8", "9.2"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!target.path().join("s").exists());
}

#[test]
fn created_study_can_be_upgraded() {
    let root = template_root(&["empty_study_880"]);
    let target = tempfile::tempdir().unwrap();
    let study_dir = target.path().join("s");

    CreateApp::new(&study_dir, "s", v("8.8"), "me")
        .unwrap()
        .run(&TemplateDir::new(root.path()))
        .unwrap();
    UpgradeApp::new(&study_dir, v("9.3")).run().unwrap();

    assert_eq!(StudyVersion::from_study(&study_dir).unwrap(), v("9.3"));
}
