//! Integration tests for CLI commands
//!
//! Tests for init, styles, rules and check.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a command for the prosecheck CLI bound to a data directory
fn prosecheck_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_prosecheck"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".vale.ini")
}

fn write_config(data_dir: &Path, content: &str) {
    fs::write(config_path(data_dir), content).unwrap();
}

fn read_config(data_dir: &Path) -> String {
    fs::read_to_string(config_path(data_dir)).unwrap()
}

mod init_command {
    use super::*;

    #[test]
    fn creates_default_config_and_styles_dir() {
        let temp_dir = TempDir::new().unwrap();

        prosecheck_cmd(temp_dir.path())
            .arg("init")
            .assert()
            .success()
            .stderr(predicate::str::contains("Initialized"));

        assert_eq!(
            read_config(temp_dir.path()),
            "StylesPath = styles\n\n[*.md]\nBasedOnStyles = Vale\n"
        );
        assert!(temp_dir.path().join("styles").is_dir());
    }

    #[test]
    fn keeps_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let custom = "StylesPath = mine\n\n[*.md]\nBasedOnStyles = Vale, Google\n";
        write_config(temp_dir.path(), custom);

        prosecheck_cmd(temp_dir.path())
            .arg("init")
            .assert()
            .success()
            .stderr(predicate::str::contains("already exists"));

        assert_eq!(read_config(temp_dir.path()), custom);
        assert!(temp_dir.path().join("mine").is_dir());
    }
}

mod styles_commands {
    use super::*;

    #[test]
    fn enable_and_disable_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "StylesPath = styles\n\n[*.md]\nBasedOnStyles = Vale\n",
        );

        prosecheck_cmd(temp_dir.path())
            .args(["styles", "enable", "Google"])
            .assert()
            .success();
        assert!(read_config(temp_dir.path()).contains("BasedOnStyles = Vale, Google"));

        prosecheck_cmd(temp_dir.path())
            .args(["styles", "disable", "Google"])
            .assert()
            .success();
        assert!(read_config(temp_dir.path()).contains("BasedOnStyles = Vale\n"));
    }

    #[test]
    fn disabling_absent_style_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let original = "; hand written\nStylesPath=styles\n[*.md]\nBasedOnStyles=Vale\n";
        write_config(temp_dir.path(), original);

        prosecheck_cmd(temp_dir.path())
            .args(["styles", "disable", "Microsoft"])
            .assert()
            .success()
            .stderr(predicate::str::contains("is not enabled"));

        assert_eq!(read_config(temp_dir.path()), original);
    }

    #[test]
    fn selector_targets_another_section() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "[*.md]\nBasedOnStyles = Vale\n");

        prosecheck_cmd(temp_dir.path())
            .args(["--selector", "*.txt", "styles", "enable", "Vale"])
            .assert()
            .success();

        assert_eq!(
            read_config(temp_dir.path()),
            "[*.md]\nBasedOnStyles = Vale\n\n[*.txt]\nBasedOnStyles = Vale\n"
        );
    }

    #[test]
    fn list_shows_catalog_and_installed_state() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "StylesPath = styles\n\n[*.md]\nBasedOnStyles = Vale, Google\n",
        );
        fs::create_dir_all(temp_dir.path().join("styles/Microsoft")).unwrap();
        fs::create_dir_all(temp_dir.path().join("styles/House")).unwrap();

        prosecheck_cmd(temp_dir.path())
            .args(["styles", "list"])
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"Google\s+yes\s+no").unwrap())
            .stdout(predicate::str::is_match(r"Microsoft\s+no\s+yes").unwrap())
            .stdout(predicate::str::is_match(r"House\s+no\s+yes").unwrap())
            .stdout(predicate::str::is_match(r"Vale\s+yes\s+yes").unwrap());
    }

    #[test]
    fn uninstall_removes_directory_and_reference() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "StylesPath = styles\n\n[*.md]\nBasedOnStyles = Vale, Google\n",
        );
        let google = temp_dir.path().join("styles/Google");
        fs::create_dir_all(&google).unwrap();
        fs::write(google.join("We.yml"), "extends: existence\n").unwrap();

        prosecheck_cmd(temp_dir.path())
            .args(["styles", "uninstall", "Google"])
            .assert()
            .success();

        assert!(!google.exists());
        assert!(read_config(temp_dir.path()).contains("BasedOnStyles = Vale\n"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "[*.md\nBasedOnStyles = Vale\n");

        prosecheck_cmd(temp_dir.path())
            .args(["styles", "enable", "Google"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("line 1"));
    }
}

mod rules_commands {
    use super::*;

    #[test]
    fn set_and_reset_override() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "[*.md]\nBasedOnStyles = Vale, Google\n");

        prosecheck_cmd(temp_dir.path())
            .args(["rules", "set", "Google", "Passive", "off"])
            .assert()
            .success();
        assert!(read_config(temp_dir.path()).contains("Google.Passive = NO"));

        prosecheck_cmd(temp_dir.path())
            .args(["rules", "set", "Google", "Passive", "error"])
            .assert()
            .success();
        assert!(read_config(temp_dir.path()).contains("Google.Passive = error"));

        prosecheck_cmd(temp_dir.path())
            .args(["rules", "set", "Google", "Passive", "default"])
            .assert()
            .success();
        assert_eq!(
            read_config(temp_dir.path()),
            "[*.md]\nBasedOnStyles = Vale, Google\n"
        );
    }

    #[test]
    fn list_merges_style_files_and_overrides() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "StylesPath = styles\n\n[*.md]\nBasedOnStyles = Google\nGoogle.We = NO\nGoogle.Custom = warning\n",
        );
        let google = temp_dir.path().join("styles/Google");
        fs::create_dir_all(&google).unwrap();
        fs::write(google.join("Passive.yml"), "extends: existence\n").unwrap();
        fs::write(google.join("We.yml"), "extends: existence\n").unwrap();

        prosecheck_cmd(temp_dir.path())
            .args(["rules", "list", "Google"])
            .assert()
            .success()
            .stdout("Google.Custom warning\nGoogle.Passive default\nGoogle.We off\n");
    }

    #[test]
    fn rejects_unknown_decision() {
        let temp_dir = TempDir::new().unwrap();

        prosecheck_cmd(temp_dir.path())
            .args(["rules", "set", "Google", "Passive", "loud"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected one of"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn missing_binary_asks_for_setup() {
        let temp_dir = TempDir::new().unwrap();
        let doc = temp_dir.path().join("doc.md");
        fs::write(&doc, "Helo world\n").unwrap();

        prosecheck_cmd(temp_dir.path())
            .arg("check")
            .arg(&doc)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Vale is not set up"));
    }

    #[test]
    fn unreachable_server_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        fs::write(
            temp_dir.path().join("settings.json"),
            format!(r#"{{"type": "server", "server": {{"url": "http://127.0.0.1:{port}"}}}}"#),
        )
        .unwrap();
        let doc = temp_dir.path().join("doc.md");
        fs::write(&doc, "Helo world\n").unwrap();

        prosecheck_cmd(temp_dir.path())
            .arg("check")
            .arg(&doc)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Couldn't connect to Vale Server."));
    }

    #[cfg(unix)]
    mod with_fake_engine {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        const ALERTS: &str = r#"{"doc.md":[{"Action":{"Name":"","Params":null},"Check":"Vale.Spelling","Description":"","Line":1,"Link":"","Message":"Did you really mean Helo?","Severity":"error","Span":[1,4],"Match":"Helo"}]}"#;

        /// Installs a shell script as the managed Vale binary.
        fn install_fake_vale(data_dir: &Path, body: &str) {
            let bin = data_dir.join("bin");
            fs::create_dir_all(&bin).unwrap();
            let path = bin.join("vale");
            fs::write(&path, format!("#!/bin/sh\ncat > /dev/null\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            write_config(data_dir, "StylesPath = styles\n\n[*.md]\nBasedOnStyles = Vale\n");
        }

        fn document(dir: &Path) -> PathBuf {
            let doc = dir.join("doc.md");
            fs::write(&doc, "Helo world\n").unwrap();
            doc
        }

        #[test]
        fn alerts_exit_with_one_and_underline_text() {
            let temp_dir = TempDir::new().unwrap();
            install_fake_vale(temp_dir.path(), &format!("echo '{}'\nexit 1", ALERTS));

            prosecheck_cmd(temp_dir.path())
                .arg("check")
                .arg(document(temp_dir.path()))
                .assert()
                .code(1)
                .stdout(predicate::str::contains("1:1 error"))
                .stdout(predicate::str::contains("[Vale.Spelling]"))
                .stdout(predicate::str::contains("    Helo world\n    ^^^^\n"))
                .stdout(predicate::str::contains("Found 1 alerts"));
        }

        #[test]
        fn json_output() {
            let temp_dir = TempDir::new().unwrap();
            install_fake_vale(temp_dir.path(), &format!("echo '{}'\nexit 1", ALERTS));

            let output = prosecheck_cmd(temp_dir.path())
                .arg("check")
                .arg(document(temp_dir.path()))
                .args(["--output", "json"])
                .output()
                .unwrap();

            assert_eq!(output.status.code(), Some(1));
            let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
            assert_eq!(json["format"], ".md");
            assert_eq!(json["alerts"][0]["Check"], "Vale.Spelling");
            assert_eq!(json["alerts"][0]["Span"], serde_json::json!([1, 4]));
        }

        #[test]
        fn clean_document_exits_zero() {
            let temp_dir = TempDir::new().unwrap();
            install_fake_vale(temp_dir.path(), "echo 'ignored'\nexit 0");

            prosecheck_cmd(temp_dir.path())
                .arg("check")
                .arg(document(temp_dir.path()))
                .assert()
                .success()
                .stdout(predicate::str::contains("No alerts in"));
        }

        #[test]
        fn unexpected_exit_code_is_an_error() {
            let temp_dir = TempDir::new().unwrap();
            install_fake_vale(temp_dir.path(), "exit 2");

            prosecheck_cmd(temp_dir.path())
                .arg("check")
                .arg(document(temp_dir.path()))
                .assert()
                .code(2)
                .stderr(predicate::str::contains("child exited with code 2"));
        }

        #[test]
        fn ext_flag_is_passed_through() {
            let temp_dir = TempDir::new().unwrap();
            let args_file = temp_dir.path().join("args.txt");
            install_fake_vale(
                temp_dir.path(),
                &format!("echo \"$@\" > '{}'\nexit 0", args_file.display()),
            );

            prosecheck_cmd(temp_dir.path())
                .arg("check")
                .arg(document(temp_dir.path()))
                .args(["--ext", "rst"])
                .assert()
                .success();

            let args = fs::read_to_string(args_file).unwrap();
            assert!(args.contains("--ext .rst --output JSON"), "{}", args);
        }
    }
}
