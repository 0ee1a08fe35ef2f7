//! Integration tests for reelstate

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Command isolated from the user's config and state files
    fn reelstate(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("reelstate");
        cmd.env_remove("REELSTATE_CONFIG")
            .env_remove("REELSTATE_STATE_DIR")
            .arg("--config")
            .arg(home.join("config.toml"))
            .arg("--state-dir")
            .arg(home.join("state"));
        cmd
    }

    fn frames(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"pixels").unwrap();
        }
        dir
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("reelstate")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("batch cursors"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("reelstate")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("reelstate"));
    }

    #[test]
    fn fingerprint_prints_truncated_sha256() {
        let home = TempDir::new().unwrap();
        let file = home.path().join("abc.bin");
        fs::write(&file, b"abc").unwrap();

        reelstate(home.path())
            .arg("fingerprint")
            .arg(&file)
            .assert()
            .success()
            .stdout("ba7816bf8f01cfea\n");
    }

    #[test]
    fn fingerprint_missing_file() {
        let home = TempDir::new().unwrap();

        reelstate(home.path())
            .args(["fingerprint", "/nonexistent/clip.mp4"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn check_missing_file() {
        let home = TempDir::new().unwrap();

        reelstate(home.path())
            .args(["check", "/nonexistent/clip.mp4"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn check_mark_check() {
        let home = TempDir::new().unwrap();
        let source = home.path().join("clip.mov");
        fs::write(&source, b"source video").unwrap();

        let chunks = home.path().join("chunks");
        fs::create_dir_all(&chunks).unwrap();
        fs::write(chunks.join("chunk_000.mp4"), b"chunk").unwrap();
        fs::write(chunks.join("chunk_001.mp4"), b"chunk").unwrap();

        reelstate(home.path())
            .args(["check", "--format", "plain"])
            .arg(&source)
            .assert()
            .success()
            .stdout("\n");

        reelstate(home.path())
            .arg("mark")
            .arg(&source)
            .arg(&chunks)
            .assert()
            .success();

        reelstate(home.path())
            .args(["check", "--format", "json"])
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"processed\": true"))
            .stdout(predicate::str::contains("\"artifact_count\": 2"));

        let state = fs::read_to_string(home.path().join("state/processed_videos.json")).unwrap();
        assert!(state.contains("chunks"));
    }

    #[test]
    fn mark_honors_dotted_extensions() {
        let home = TempDir::new().unwrap();
        fs::write(
            home.path().join("config.toml"),
            "[cache]\nartifact_extensions = [\".MP4\"]\n",
        )
        .unwrap();
        let source = home.path().join("clip.mov");
        fs::write(&source, b"source video").unwrap();

        let chunks = home.path().join("chunks");
        fs::create_dir_all(&chunks).unwrap();
        fs::write(chunks.join("chunk_000.mp4"), b"chunk").unwrap();

        reelstate(home.path())
            .arg("mark")
            .arg(&source)
            .arg(&chunks)
            .assert()
            .success()
            .stdout(predicate::str::contains("1 artifact"))
            .stdout(predicate::str::contains("no artifacts").not());

        reelstate(home.path())
            .args(["check", "--format", "json"])
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"artifact_count\": 1"));
    }

    #[test]
    fn check_heals_deleted_artifacts() {
        let home = TempDir::new().unwrap();
        let source = home.path().join("clip.mov");
        fs::write(&source, b"source video").unwrap();

        let chunks = home.path().join("chunks");
        fs::create_dir_all(&chunks).unwrap();
        fs::write(chunks.join("chunk_000.mp4"), b"chunk").unwrap();

        reelstate(home.path())
            .arg("mark")
            .arg(&source)
            .arg(&chunks)
            .assert()
            .success();

        fs::remove_dir_all(&chunks).unwrap();

        reelstate(home.path())
            .args(["check", "--format", "json"])
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"processed\": false"));

        reelstate(home.path())
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("");
    }

    #[test]
    fn batch_next_cycles() {
        let home = TempDir::new().unwrap();
        let dir = frames(&["a.png", "b.png", "notes.txt"]);

        let mut served = Vec::new();
        for _ in 0..3 {
            let output = reelstate(home.path())
                .args(["batch", "next", "Batch 001"])
                .arg(dir.path())
                .output()
                .unwrap();
            assert!(output.status.success());
            served.push(String::from_utf8(output.stdout).unwrap());
        }

        assert!(served[0].trim_end().ends_with("a.png"));
        assert!(served[1].trim_end().ends_with("b.png"));
        assert!(served[2].trim_end().ends_with("a.png"));
    }

    #[test]
    fn batch_peek_and_reset() {
        let home = TempDir::new().unwrap();
        let dir = frames(&["a.png", "b.png", "c.png"]);

        for _ in 0..2 {
            reelstate(home.path())
                .args(["batch", "next", "L"])
                .arg(dir.path())
                .assert()
                .success();
        }

        reelstate(home.path())
            .args(["batch", "peek", "L"])
            .assert()
            .success()
            .stdout("2\n");

        reelstate(home.path())
            .args(["batch", "reset", "L"])
            .assert()
            .success();

        reelstate(home.path())
            .args(["batch", "peek", "L"])
            .assert()
            .success()
            .stdout("0\n");
    }

    #[test]
    fn batch_kinds_use_separate_files() {
        let home = TempDir::new().unwrap();
        let dir = frames(&["a.png", "b.mp4"]);

        reelstate(home.path())
            .args(["batch", "next", "L", "--kind", "video"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("b.mp4"));

        assert!(home.path().join("state/video_batch_state.json").exists());
        assert!(!home.path().join("state/image_batch_state.json").exists());
    }

    #[test]
    fn batch_next_empty_directory() {
        let home = TempDir::new().unwrap();
        let dir = frames(&["notes.txt"]);

        reelstate(home.path())
            .args(["batch", "next", "L"])
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("no items"));
    }

    #[test]
    fn batch_at_out_of_range() {
        let home = TempDir::new().unwrap();
        let dir = frames(&["a.png"]);

        reelstate(home.path())
            .args(["batch", "at"])
            .arg(dir.path())
            .arg("0")
            .assert()
            .success()
            .stdout(predicate::str::contains("a.png"));

        reelstate(home.path())
            .args(["batch", "at"])
            .arg(dir.path())
            .arg("5")
            .assert()
            .failure()
            .stderr(predicate::str::contains("out of range"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();

        reelstate(home.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();

        reelstate(home.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn config_init_keeps_existing() {
        let home = TempDir::new().unwrap();

        reelstate(home.path())
            .args(["config", "init"])
            .assert()
            .success();
        assert!(home.path().join("config.toml").exists());

        fs::write(home.path().join("config.toml"), "[cache]\noutput_dir = \"mine\"\n").unwrap();
        reelstate(home.path())
            .args(["config", "init"])
            .assert()
            .success();
        let kept = fs::read_to_string(home.path().join("config.toml")).unwrap();
        assert!(kept.contains("mine"));
    }

    #[test]
    fn invalid_config_reports_hint() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("config.toml"), "[store\nbroken").unwrap();

        reelstate(home.path())
            .args(["cache", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
