use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::path::PathBuf;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn gif2avif_cmd() -> Command {
    Command::cargo_bin("gif2avif").expect("Failed to find gif2avif binary")
}

#[test]
fn test_help_lists_commands() -> Result<(), Box<dyn Error>> {
    gif2avif_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("convert"))
        .stdout(contains("check"));
    Ok(())
}

#[test]
fn test_convert_non_existent_input() -> Result<(), Box<dyn Error>> {
    let output_dir = tempdir()?;
    let non_existent_input = PathBuf::from("surely/this/does/not/exist/input.gif");

    gif2avif_cmd()
        .arg("convert")
        .arg(&non_existent_input)
        .arg("-o")
        .arg(output_dir.path())
        .arg("--no-log")
        .assert()
        .failure()
        .stderr(contains("Invalid input path"));

    Ok(())
}

#[test]
fn test_convert_rejects_non_gif_input() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let input_file = input_dir.path().join("photo.png");
    std::fs::write(&input_file, "dummy content")?;

    gif2avif_cmd()
        .arg("convert")
        .arg(&input_file)
        .arg("--no-log")
        .assert()
        .failure()
        .stderr(contains("is not a .gif file"));

    Ok(())
}

#[test]
fn test_convert_rejects_non_avif_output_name() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let input_file = input_dir.path().join("dance.gif");
    std::fs::write(&input_file, "GIF89a")?;

    gif2avif_cmd()
        .arg("convert")
        .arg(&input_file)
        .arg("-o")
        .arg(input_dir.path().join("dance.webp"))
        .assert()
        .failure()
        .stderr(contains(".avif extension"));

    Ok(())
}

#[test]
fn test_convert_empty_directory_succeeds_and_writes_run_log() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    gif2avif_cmd()
        .arg("convert")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .assert()
        .success()
        .stdout(contains("No GIF files found"));

    let logs: Vec<_> = std::fs::read_dir(output_dir.path().join("logs"))?
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].starts_with("gif2avif_run_"));

    Ok(())
}

#[test]
fn test_convert_empty_directory_json_summary() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;

    let output = gif2avif_cmd()
        .arg("convert")
        .arg(input_dir.path())
        .arg("--json")
        .output()?;

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(summary["succeeded"], serde_json::json!([]));
    assert_eq!(summary["failed"], serde_json::json!([]));

    Ok(())
}

#[test]
fn test_convert_invalid_arguments() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;

    gif2avif_cmd()
        .args(["convert", "--speed", "11"])
        .arg(input_dir.path())
        .assert()
        .failure()
        .stderr(contains("11"));

    gif2avif_cmd()
        .args(["convert", "--yuv", "411"])
        .arg(input_dir.path())
        .assert()
        .failure()
        .stderr(contains("Unknown chroma subsampling"));

    Ok(())
}

#[test]
fn test_check_lists_every_tool() -> Result<(), Box<dyn Error>> {
    // Exit status depends on the host; only the listing is checked.
    gif2avif_cmd()
        .arg("check")
        .assert()
        .stdout(contains("ffmpeg"))
        .stdout(contains("ffprobe"))
        .stdout(contains("avifenc"))
        .stdout(contains("gifsicle"));

    Ok(())
}
