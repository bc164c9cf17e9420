use kicadcut_core::{CutMode, Orientation};
use kicadcut_settings::{RunConfig, SettingsError};
use tempfile::TempDir;

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = RunConfig::new();
    config.cut_mode = CutMode::Fast;
    config.plotter.orientation = Orientation::Landscape;
    config.stencil.filters = vec!["U*".to_string(), "R1".to_string()];
    config.save_to_file(&path).unwrap();

    let loaded = RunConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = RunConfig::new();
    config.passes.speed = vec![1, 2, 3];
    config.passes.force = vec![5, 10, 33];
    config.save_to_file(&path).unwrap();

    let loaded = RunConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.passes, config.passes);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
cut_mode = "fast"

[plotter]
media_size = [279.4, 215.9]
orientation = "landscape"

[stencil]
border = [0.0, 0.0]
"#,
    )
    .unwrap();

    let config = RunConfig::load_from_file(&path).unwrap();
    assert_eq!(config.cut_mode, CutMode::Fast);
    assert_eq!(config.plotter.orientation, Orientation::Landscape);
    assert_eq!(config.plotter.media_size, (215.9, 279.4));
    assert_eq!(config.plotter.offset, (10.0, 10.0));
    assert!(!config.stencil.has_border());
    assert_eq!(config.passes.force, vec![8, 30]);
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "stencil": { "shrink_rel": 2.0 } }"#).unwrap();
    assert!(matches!(
        RunConfig::load_from_file(&path),
        Err(SettingsError::Config(_))
    ));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    assert!(RunConfig::new().save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = RunConfig::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(SettingsError::LoadError(_))));
}
