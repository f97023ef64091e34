// gif2avif-core/tests/config_tests.rs

use gif2avif_core::config::{
    ChromaSubsampling, ColorTagging, CoreConfig, DEFAULT_CODEC_OPTIONS, DEFAULT_QUALITY_ALPHA,
    DEFAULT_QUALITY_COLOR,
};
use gif2avif_core::error::CoreError;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn defaults_match_the_stock_encoder_settings() {
    let config = CoreConfig::default();
    assert_eq!(config.chroma.to_string(), "420");
    assert_eq!(config.color_tagging, ColorTagging::default());
    assert_eq!(config.quality_color, DEFAULT_QUALITY_COLOR);
    assert_eq!(config.quality_alpha, DEFAULT_QUALITY_ALPHA);
    assert_eq!(config.codec_options, DEFAULT_CODEC_OPTIONS);
    assert!(config.validate().is_ok());
}

#[test]
fn config_with_output_dir_and_timeout_validates() {
    let mut config = CoreConfig::new(PathBuf::from("/tmp/avif"));
    config.chroma = "444".parse::<ChromaSubsampling>().unwrap();
    config.color_tagging = "9/16/9".parse().unwrap();
    config.tool_timeout = Some(Duration::from_secs(30));
    config.set_parallel_jobs(4);

    assert!(config.validate().is_ok());
    assert_eq!(config.parallel_jobs, 4);
}

#[test]
fn invalid_values_are_config_errors() {
    let config = CoreConfig {
        speed: 42,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(CoreError::Config(_))));

    assert!(matches!(
        "4:2:0".parse::<ChromaSubsampling>(),
        Err(CoreError::Config(_))
    ));
    assert!(matches!(
        "1/13/1/1".parse::<ColorTagging>(),
        Err(CoreError::Config(_))
    ));
}
