//! Command-line tests for the mkvtrim binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mkvtrim(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mkvtrim").unwrap();
    cmd.current_dir(cwd.path())
        .env_remove("RUST_LOG")
        .env_remove("MKVTRIM_ENGINE_DIR")
        .env_remove("MKVTRIM_TOOL_TIMEOUT")
        .env_remove("MKVTRIM_LOG_LEVEL")
        .env_remove("MKVTRIM_RENAME_ATTEMPTS");
    cmd
}

#[test]
fn help_lists_pipeline_commands() {
    let cwd = TempDir::new().unwrap();
    mkvtrim(&cwd)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("trim"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("finish"));
}

#[test]
fn config_prints_effective_values() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("mkvtrim.toml"), "[trim]\ncrf = 8\n").unwrap();

    mkvtrim(&cwd)
        .env("MKVTRIM_RENAME_ATTEMPTS", "4")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("crf = 8"))
        .stdout(predicate::str::contains("rename_attempts = 4"))
        .stdout(predicate::str::contains("audio_codec = \"aac\""));
}

#[test]
fn crf_out_of_range_is_rejected_by_parser() {
    let cwd = TempDir::new().unwrap();
    mkvtrim(&cwd)
        .args(["trim", "--ad-length", "10000", "--key-frame", "12000", "--crf", "60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--crf"));
}

#[test]
fn timing_beyond_signed_range_is_rejected() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("episode.mkv"), b"SRC").unwrap();

    mkvtrim(&cwd)
        .args(["trim", "--ad-length", "10000", "--key-frame", "18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));

    assert!(cwd.path().join("episode.mkv").exists());
}

#[test]
fn missing_engine_tool_is_reported() {
    let cwd = TempDir::new().unwrap();
    let engine = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("episode.mkv"), b"SRC").unwrap();

    mkvtrim(&cwd)
        .arg("--engine-dir")
        .arg(engine.path())
        .args(["trim", "--ad-length", "10000", "--key-frame", "12000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ffprobe not found"));
}

#[test]
fn prompts_for_missing_timing() {
    let cwd = TempDir::new().unwrap();
    let engine = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("episode.mkv"), b"SRC").unwrap();

    mkvtrim(&cwd)
        .arg("--engine-dir")
        .arg(engine.path())
        .arg("trim")
        .write_stdin("10000\n12000\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Advertisement length (ms): "))
        .stderr(predicate::str::contains("Estimated keyframe (ms): "))
        .stderr(predicate::str::contains("ffprobe not found"));
}

#[cfg(unix)]
mod with_stub_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    const FFPROBE: &str = r#"
for last; do :; done
case "$*" in
  *format=duration*)
    case "$last" in
      untrimmed.episode.mkv) echo 60.000000 ;;
      video.episode.mkv) echo 48.000000 ;;
      *) echo "$last: No such file or directory" >&2; exit 1 ;;
    esac ;;
  *) echo 24000/1001 ;;
esac
"#;

    const FFMPEG: &str = r#"
for last; do :; done
echo "$*" > "$last"
"#;

    const MKCLEAN: &str = r#"cp "$2" "$3""#;

    fn install(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn engine() -> TempDir {
        let engine = TempDir::new().unwrap();
        install(engine.path(), "ffprobe", FFPROBE);
        install(engine.path(), "ffmpeg", FFMPEG);
        install(engine.path(), "mkclean", MKCLEAN);
        engine
    }

    #[test]
    fn finish_runs_every_stage_and_leaves_one_file() {
        let cwd = TempDir::new().unwrap();
        let engine = engine();
        std::fs::write(cwd.path().join("episode.mkv"), b"SRC").unwrap();
        std::fs::write(cwd.path().join("subtitles.episode.ass"), b"[Script Info]").unwrap();

        mkvtrim(&cwd)
            .arg("--engine-dir")
            .arg(engine.path())
            .args([
                "finish",
                "--ad-length",
                "10000",
                "--key-frame",
                "12000",
                "--audio-lang",
                "jpn",
                "--subtitle-lang",
                "eng",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("keyframe gap 2000 ms"))
            .stdout(predicate::str::contains("Merged eng subtitles"));

        let mut files: Vec<String> = std::fs::read_dir(cwd.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        assert_eq!(files, vec!["episode.mkv"]);

        let episode = std::fs::read_to_string(cwd.path().join("episode.mkv")).unwrap();
        assert!(episode.contains("-disposition:s:0 default"));
    }

    #[test]
    fn trim_json_report() {
        let cwd = TempDir::new().unwrap();
        let engine = engine();
        std::fs::write(cwd.path().join("episode.mkv"), b"SRC").unwrap();

        let output = mkvtrim(&cwd)
            .arg("--engine-dir")
            .arg(engine.path())
            .args(["--report", "json"])
            .args(["trim", "--ad-length", "10000", "--key-frame", "12000"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["key_frame_gap_ms"], 2000);
        assert_eq!(report["frame_rate"]["num"], 24000);
        assert_eq!(report["frame_rate"]["den"], 1001);
        assert_eq!(report["fine_cut"], true);
    }

    #[test]
    fn prompted_json_report_keeps_stdout_parseable() {
        let cwd = TempDir::new().unwrap();
        let engine = engine();
        std::fs::write(cwd.path().join("episode.mkv"), b"SRC").unwrap();

        let output = mkvtrim(&cwd)
            .arg("--engine-dir")
            .arg(engine.path())
            .args(["--report", "json", "trim"])
            .write_stdin("10000\n12000\n")
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["timing"]["ad_length_ms"], 10000);
        assert!(String::from_utf8_lossy(&output.stderr).contains("Estimated keyframe (ms): "));
    }
}
