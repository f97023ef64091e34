// ============================================================================
// gif2avif-core/src/processing/encode.rs
// ============================================================================
//
// AVIF ENCODING: avifenc Invocation
//
// Builds the avifenc command line for an ordered frame set and runs it once.
// Every frame gets the same duration on a fixed 1000-units-per-second
// timescale.
//
// KEY COMPONENTS:
// - build_avifenc_args: complete argument list from configuration and frames
// - encode_frames: runs avifenc and verifies the produced file

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::ExternalTool;
use crate::processing::frame_rate::{FrameDuration, TIMESCALE};
use crate::processing::frame_set::FrameSet;

// ---- Standard library imports ----
use std::ffi::OsString;
use std::path::Path;

/// Builds the avifenc arguments that encode `frames` into `output`.
///
/// Layout: `--yuv --nclx --codec --qcolor --qalpha --jobs --speed
/// [--autotiling] [-a opt]... --timescale 1000 --duration D -o OUTPUT FRAME...`
pub fn build_avifenc_args(
    config: &CoreConfig,
    frames: &FrameSet,
    duration: FrameDuration,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(24 + frames.len());
    let mut push = |flag: &str, value: String| {
        args.push(flag.into());
        args.push(value.into());
    };

    push("--yuv", config.chroma.to_string());
    push("--nclx", config.color_tagging.to_string());
    push("--codec", config.codec.clone());
    push("--qcolor", config.quality_color.to_string());
    push("--qalpha", config.quality_alpha.to_string());
    push("--jobs", config.encoder_jobs.to_string());
    push("--speed", config.speed.to_string());

    if config.autotiling {
        args.push("--autotiling".into());
    }

    for option in &config.codec_options {
        args.push("-a".into());
        args.push(option.into());
    }

    args.push("--timescale".into());
    args.push(TIMESCALE.to_string().into());
    args.push("--duration".into());
    args.push(duration.units().to_string().into());
    args.push("-o".into());
    args.push(output.as_os_str().to_owned());

    args.extend(frames.frames().iter().map(|frame| frame.as_os_str().to_owned()));
    args
}

/// Encodes `frames` into `output` and returns the output size in bytes.
///
/// Any failure (start, timeout, non-zero exit, missing or empty output) is an
/// [`CoreError::EncodeFailure`] naming `source`.
pub fn encode_frames<T: ExternalTool>(
    avifenc: &T,
    config: &CoreConfig,
    frames: &FrameSet,
    duration: FrameDuration,
    output: &Path,
    source: &Path,
) -> CoreResult<u64> {
    let encode_failure = |message: String| CoreError::EncodeFailure {
        path: source.to_path_buf(),
        message,
    };

    let args = build_avifenc_args(config, frames, duration, output);
    let result = avifenc
        .invoke(&args)
        .map_err(|e| encode_failure(e.to_string()))?;

    if !result.success() {
        return Err(encode_failure(format!(
            "{} failed: {}",
            avifenc.name(),
            result.failure_summary()
        )));
    }

    let size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(encode_failure(format!(
            "{} did not produce {}",
            avifenc.name(),
            output.display()
        )));
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChromaSubsampling, ColorTagging};
    use crate::external::mocks::MockTool;
    use crate::processing::frame_rate::FrameRate;
    use crate::processing::frame_set::assemble_frame_set;
    use crate::processing::frames::frame_file_name;
    use tempfile::{TempDir, tempdir};

    fn frames(count: usize) -> (TempDir, FrameSet) {
        let dir = tempdir().unwrap();
        for i in 1..=count {
            std::fs::write(dir.path().join(frame_file_name(i)), b"png").unwrap();
        }
        let set = assemble_frame_set(dir.path(), Path::new("a.gif")).unwrap();
        (dir, set)
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn default_arguments() {
        let (_dir, set) = frames(2);
        let duration = FrameDuration::from_rate(FrameRate::DEFAULT);
        let args = strings(&build_avifenc_args(
            &CoreConfig::default(),
            &set,
            duration,
            Path::new("/ws/output.avif"),
        ));

        let expected_head = [
            "--yuv", "420", "--nclx", "1/13/1", "--codec", "aom", "--qcolor", "30", "--qalpha",
            "95", "--jobs", "8", "--speed", "2", "--autotiling", "-a", "aq-mode=3", "-a",
            "enable-qm=1", "-a", "enable-chroma-deltaq=1", "-a", "enable-tpl-model=1", "-a",
            "end-usage=vbr", "-a", "tune=ssim", "--timescale", "1000", "--duration", "40", "-o",
            "/ws/output.avif",
        ];
        assert_eq!(&args[..expected_head.len()], &expected_head[..]);

        let tail: Vec<&String> = args[expected_head.len()..].iter().collect();
        assert_eq!(tail.len(), 2);
        assert!(tail[0].ends_with("000001.png"));
        assert!(tail[1].ends_with("000002.png"));
    }

    #[test]
    fn custom_settings_flow_into_arguments() {
        let (_dir, set) = frames(3);
        let config = CoreConfig {
            chroma: ChromaSubsampling::Yuv444,
            color_tagging: ColorTagging {
                primaries: 9,
                transfer: 16,
                matrix: 9,
            },
            codec: "svt".to_string(),
            autotiling: false,
            codec_options: vec![],
            ..Default::default()
        };
        let args = strings(&build_avifenc_args(
            &config,
            &set,
            FrameDuration::from_rate(FrameRate::new(10, 1).unwrap()),
            Path::new("out.avif"),
        ));

        assert!(args.windows(2).any(|w| w == ["--yuv", "444"]));
        assert!(args.windows(2).any(|w| w == ["--nclx", "9/16/9"]));
        assert!(args.windows(2).any(|w| w == ["--codec", "svt"]));
        assert!(args.windows(2).any(|w| w == ["--duration", "100"]));
        assert!(!args.iter().any(|a| a == "--autotiling" || a == "-a"));
        assert_eq!(args.len(), 20 + 3);
    }

    #[test]
    fn encode_reports_output_size() {
        let (dir, set) = frames(2);
        let output = dir.path().join("output.avif");
        let avifenc = MockTool::new("avifenc").writes_arg_after("-o");

        let size = encode_frames(
            &avifenc,
            &CoreConfig::default(),
            &set,
            FrameDuration::from_rate(FrameRate::DEFAULT),
            &output,
            Path::new("a.gif"),
        )
        .unwrap();
        assert!(size > 0);
        assert_eq!(avifenc.received_calls().len(), 1);
    }

    #[test]
    fn encoder_errors_are_encode_failures() {
        let (dir, set) = frames(2);
        let output = dir.path().join("output.avif");
        let duration = FrameDuration::from_rate(FrameRate::DEFAULT);
        let config = CoreConfig::default();

        let failing = MockTool::new("avifenc").exit_code(1).stderr("ERROR: Failed to encode");
        let err = encode_frames(&failing, &config, &set, duration, &output, Path::new("a.gif")).unwrap_err();
        assert!(matches!(err, CoreError::EncodeFailure { .. }));
        assert!(err.to_string().contains("Failed to encode"));

        let silent = MockTool::new("avifenc");
        let err = encode_frames(&silent, &config, &set, duration, &output, Path::new("a.gif")).unwrap_err();
        assert!(err.to_string().contains("did not produce"));

        let missing = MockTool::new("avifenc").fails_to_start();
        let err = encode_frames(&missing, &config, &set, duration, &output, Path::new("a.gif")).unwrap_err();
        assert!(matches!(err, CoreError::EncodeFailure { .. }));
    }
}
