use maps_core::config::{AnalysisConfig, HistogramScale};
use maps_core::frame::Resolution;

#[test]
fn test_empty_config_uses_defaults() {
    let config: AnalysisConfig = toml::from_str("").unwrap();
    assert_eq!(config.resolution, Resolution::default());
    assert_eq!(config.resolution.shape(), (520, 520));
    assert_eq!(config.start_frame, 0);
    assert_eq!(config.raw_extension, "raw");
    assert_eq!(config.pearson.points_per_bin, 1);
    assert_eq!(config.pearson.scale, HistogramScale::Density);
    assert!(config.calibration.offset.is_none());
}

#[test]
fn test_partial_config() {
    let config: AnalysisConfig = toml::from_str(
        r#"
        resolution = [64, 32]
        start_frame = 3

        [calibration]
        offset = "cal/offset.npy"
        read_noise = "cal/noise.npy"

        [pearson]
        scale = "Counts"
        "#,
    )
    .unwrap();
    assert_eq!(config.resolution.shape(), (64, 32));
    assert_eq!(config.start_frame, 3);
    assert_eq!(config.pearson.points_per_bin, 1);
    assert_eq!(config.pearson.scale, HistogramScale::Counts);
    assert_eq!(
        config.calibration.read_noise.as_deref(),
        Some(std::path::Path::new("cal/noise.npy"))
    );
}

#[test]
fn test_resolution_needs_two_dimensions() {
    assert!(toml::from_str::<AnalysisConfig>("resolution = [520]").is_err());
    assert!(toml::from_str::<AnalysisConfig>("resolution = [520, 520, 3]").is_err());
    assert!(toml::from_str::<AnalysisConfig>("resolution = [0, 520]").is_err());
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = AnalysisConfig::default();
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: AnalysisConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed.resolution, config.resolution);
    assert_eq!(parsed.raw_extension, config.raw_extension);
}

#[test]
fn test_scale_display() {
    assert_eq!(HistogramScale::Density.to_string(), "Density");
    assert_eq!(HistogramScale::Counts.to_string(), "Counts");
}

#[test]
fn test_relative_outputs_land_in_output_dir() {
    let config: AnalysisConfig = toml::from_str(r#"output_dir = "results/w4""#).unwrap();
    assert_eq!(
        config.output_path(std::path::Path::new("chi2.npy")),
        std::path::PathBuf::from("results/w4/chi2.npy")
    );

    let absolute = std::env::temp_dir().join("offset.npy");
    assert_eq!(config.output_path(&absolute), absolute);

    let default = AnalysisConfig::default();
    assert_eq!(
        default.output_path(std::path::Path::new("ptc")),
        std::path::PathBuf::from("./ptc")
    );
}
