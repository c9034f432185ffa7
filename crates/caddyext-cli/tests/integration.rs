//! Integration tests for the caddyext binary

use anyhow::Result;
use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Result<Sandbox> {
        Ok(Sandbox {
            dir: TempDir::new()?,
        })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn directives(&self) -> PathBuf {
        self.path().join("caddy").join("directives.go")
    }

    /// Command isolated from the user's config, log file and GOPATH
    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("caddyext");
        cmd.env("CADDYEXT_CONFIG", self.path().join("caddyext.toml"))
            .env("HOME", self.path())
            .env("GOPATH", self.path().join("go"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn cmd_with_file(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--file").arg(self.directives());
        cmd
    }
}

#[test]
fn test_version() -> Result<()> {
    Sandbox::new()?
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("caddyext"));
    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    Sandbox::new()?
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("third-party directives"));
    Ok(())
}

#[test]
fn test_invalid_command() -> Result<()> {
    Sandbox::new()?.cmd().arg("invalid").assert().failure();
    Ok(())
}

#[test]
fn test_init_add_list() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.cmd_with_file().arg("init").assert().success();
    assert!(sandbox.directives().exists());

    sandbox
        .cmd_with_file()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No third-party directives"));

    sandbox
        .cmd_with_file()
        .args(["add", "ipfilter", "github.com/pyed/ipfilter"])
        .assert()
        .success();
    sandbox
        .cmd_with_file()
        .args(["add", "cors", "github.com/captncraig/cors/caddy"])
        .assert()
        .success();

    sandbox
        .cmd_with_file()
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"ipfilter\""))
        .stdout(predicate::str::contains(
            "\"import_path\": \"github.com/captncraig/cors/caddy\"",
        ));

    let content = fs::read_to_string(sandbox.directives())?;
    assert!(content.contains("{\"ipfilter\", ipfilter.Setup}"));
    assert!(content.contains("{\"cors\", caddy.Setup}"));
    Ok(())
}

#[test]
fn test_add_duplicate_fails() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.cmd_with_file().arg("init").assert().success();
    sandbox
        .cmd_with_file()
        .args(["add", "ipfilter", "github.com/pyed/ipfilter"])
        .assert()
        .success();
    let before = fs::read(sandbox.directives())?;

    sandbox
        .cmd_with_file()
        .args(["add", "ipfilter", "github.com/other/ipfilter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ipfilter"));
    assert_eq!(fs::read(sandbox.directives())?, before);
    Ok(())
}

#[test]
fn test_init_refuses_existing_file() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.cmd_with_file().arg("init").assert().success();
    sandbox.cmd_with_file().arg("init").assert().failure();
    Ok(())
}

#[test]
fn test_list_missing_file_fails() -> Result<()> {
    Sandbox::new()?
        .cmd_with_file()
        .arg("list")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_directives_file_from_gopath() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.cmd().arg("init").assert().success();
    assert!(sandbox
        .path()
        .join("go/src/github.com/mholt/caddy/caddy/directives.go")
        .exists());
    Ok(())
}

#[test]
fn test_config_set_show_path() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let file = sandbox.directives();
    sandbox
        .cmd()
        .args(["config", "set", "directives-file"])
        .arg(&file)
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration:"))
        .stdout(predicate::str::contains(file.display().to_string()));

    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("caddyext.toml"));

    // The configured file is used without --file
    sandbox.cmd().arg("init").assert().success();
    assert!(file.exists());
    Ok(())
}

#[test]
fn test_config_set_unknown_key_fails() -> Result<()> {
    Sandbox::new()?
        .cmd()
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Supported keys"));
    Ok(())
}
