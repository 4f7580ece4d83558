//! Integration tests for the passman CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`. The
//! passphrase is supplied through `PASSMAN_PASSPHRASE`, secrets through
//! stdin, and `HOME` points at a temp dir so no user config leaks in.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSPHRASE: &str = "hunter2";

/// Helper: get a Command pointing at the passman binary.
fn passman() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("passman").expect("binary should exist")
}

/// Helper: a command bound to a store inside `tmp`.
fn passman_in(tmp: &TempDir) -> Command {
    let mut cmd = passman();
    cmd.env("HOME", tmp.path())
        .env("PASSMAN_PASSPHRASE", PASSPHRASE)
        .env_remove("PASSMAN_STORE")
        .env_remove("RUST_LOG")
        .arg("--file")
        .arg(tmp.child("store").path());
    cmd
}

/// Helper: a fresh temp dir with an initialized (cheap) store.
fn initialized() -> TempDir {
    let tmp = TempDir::new().unwrap();
    passman_in(&tmp)
        .args(["init", "--log-n", "10"])
        .assert()
        .success();
    tmp
}

fn set_entry(tmp: &TempDir, id: &str, name: &str, secret: &str) {
    passman_in(tmp)
        .args(["set", id, "--name", name])
        .write_stdin(format!("{secret}\n"))
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// Parser surface
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    passman()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted password store"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("set-param"))
        .stdout(predicate::str::contains("stat"))
        .stdout(predicate::str::contains("gen"))
        .stdout(predicate::str::contains("clip"));
}

#[test]
fn version_flag_shows_version() {
    passman()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passman"));
}

#[test]
fn no_args_shows_help() {
    passman()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn completions_generate_script() {
    passman()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passman"));
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_store_file() {
    let tmp = initialized();
    tmp.child("store").assert(predicate::path::exists());
}

#[test]
fn init_refuses_existing_store() {
    let tmp = initialized();
    passman_in(&tmp)
        .args(["init", "--log-n", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_rejects_invalid_params() {
    let tmp = TempDir::new().unwrap();
    passman_in(&tmp)
        .args(["init", "--log-n", "10", "--r", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key derivation"));
    tmp.child("store").assert(predicate::path::missing());
}

#[test]
fn init_uses_store_file_from_config() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".passman.toml")
        .write_str("store_file = \"from-config\"\nscrypt_log_n = 10\n")
        .unwrap();

    passman()
        .env("HOME", tmp.path())
        .env("PASSMAN_PASSPHRASE", PASSPHRASE)
        .env_remove("PASSMAN_STORE")
        .arg("init")
        .assert()
        .success();

    tmp.child("from-config").assert(predicate::path::exists());
}

#[test]
fn init_flags_override_configured_kdf_costs() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".passman.toml")
        .write_str("scrypt_log_n = 10\nscrypt_r = 2\nscrypt_p = 3\n")
        .unwrap();

    passman_in(&tmp)
        .args(["init", "--r", "4"])
        .assert()
        .success();

    passman_in(&tmp)
        .arg("stat")
        .assert()
        .success()
        .stdout(predicate::str::contains("N=1024 r=4 p=3"));
}

// ---------------------------------------------------------------------------
// set / get
// ---------------------------------------------------------------------------

#[test]
fn set_then_get_roundtrip() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "correcthorsebatterystaple");

    passman_in(&tmp)
        .args(["get", "email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("password: correcthorsebatterystaple"));
}

#[test]
fn set_updates_metadata_without_new_password() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");

    passman_in(&tmp)
        .args(["set", "email", "--meta", "url=https://mail.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated"));

    passman_in(&tmp)
        .args(["get", "email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("url: https://mail.example.com"))
        .stdout(predicate::str::contains("password: s3cret"));
}

#[test]
fn set_without_changes_on_existing_entry_fails() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");

    passman_in(&tmp)
        .args(["set", "email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn set_rename_moves_entry() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");

    passman_in(&tmp)
        .args(["set", "email", "--rename", "mail"])
        .assert()
        .success();

    passman_in(&tmp).args(["get", "email"]).assert().failure();
    passman_in(&tmp)
        .args(["get", "mail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("password: s3cret"));
}

#[test]
fn set_rejects_malformed_meta() {
    let tmp = initialized();
    passman_in(&tmp)
        .args(["set", "email", "--meta", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn get_missing_entry_fails() {
    let tmp = initialized();
    passman_in(&tmp)
        .args(["get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn get_on_missing_store_fails() {
    let tmp = TempDir::new().unwrap();
    passman_in(&tmp)
        .args(["get", "email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Store not found"));
}

#[test]
fn wrong_passphrase_is_reported() {
    let tmp = initialized();
    passman_in(&tmp)
        .env("PASSMAN_PASSPHRASE", "Hunter2")
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect passphrase"));
}

// ---------------------------------------------------------------------------
// list / delete
// ---------------------------------------------------------------------------

#[test]
fn list_shows_ids_and_filters() {
    let tmp = initialized();
    set_entry(&tmp, "work/vpn", "alice", "a");
    set_entry(&tmp, "bank", "bob", "b");

    passman_in(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("work/vpn"))
        .stdout(predicate::str::contains("bank"))
        .stdout(predicate::str::contains("bob"))
        .stdout(predicate::str::contains("2 of 2 entries"));

    passman_in(&tmp)
        .args(["list", "^work/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("work/vpn"))
        .stdout(predicate::str::contains("bank").not());
}

#[test]
fn list_never_prints_secrets() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "topsecretvalue");

    passman_in(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("topsecretvalue").not());
}

#[test]
fn list_rejects_invalid_pattern() {
    let tmp = initialized();
    passman_in(&tmp)
        .args(["list", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));
}

#[test]
fn delete_removes_entry() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");

    passman_in(&tmp)
        .args(["delete", "email", "--force"])
        .assert()
        .success();

    passman_in(&tmp).args(["get", "email"]).assert().failure();
}

#[test]
fn rm_alias_works() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");

    passman_in(&tmp)
        .args(["rm", "email", "-f"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// stat / set-param
// ---------------------------------------------------------------------------

#[test]
fn stat_needs_no_passphrase() {
    let tmp = initialized();
    passman_in(&tmp)
        .env_remove("PASSMAN_PASSPHRASE")
        .arg("stat")
        .assert()
        .success()
        .stdout(predicate::str::contains("706173736d616e"))
        .stdout(predicate::str::contains("N=1024 r=8 p=1"));
}

#[test]
fn set_param_reencrypts_with_new_cost() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");

    passman_in(&tmp)
        .args(["set-param", "log-n", "11"])
        .assert()
        .success();

    passman_in(&tmp)
        .arg("stat")
        .assert()
        .success()
        .stdout(predicate::str::contains("N=2048"));

    passman_in(&tmp)
        .args(["get", "email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("password: s3cret"));
}

#[test]
fn set_param_rejects_invalid_value() {
    let tmp = initialized();
    passman_in(&tmp)
        .args(["set-param", "p", "0"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// gen / export
// ---------------------------------------------------------------------------

#[test]
fn gen_prints_requested_passwords() {
    passman()
        .env("HOME", TempDir::new().unwrap().path())
        .args(["gen", "--length", "16", "--count", "3", "--digit"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?m)^[0-9]{16}  \(53\.2 bits\)$").unwrap())
        .stdout(predicate::function(|out: &str| out.lines().count() == 3));
}

#[test]
fn export_prints_json_document() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");

    passman_in(&tmp)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"email\""))
        .stdout(predicate::str::contains("\"log_n\": 10"));
}

#[test]
fn export_refuses_to_overwrite() {
    let tmp = initialized();
    let existing = tmp.child("export.json");
    existing.write_str("keep me").unwrap();

    passman_in(&tmp)
        .args(["export", "--output"])
        .arg(existing.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));

    existing.assert("keep me");
}

#[test]
fn export_writes_new_file() {
    let tmp = initialized();
    set_entry(&tmp, "email", "alice", "s3cret");
    let dest = tmp.child("export.json");

    passman_in(&tmp)
        .args(["export", "--output"])
        .arg(dest.path())
        .assert()
        .success();

    dest.assert(predicate::str::contains("\"alice\""));
}
