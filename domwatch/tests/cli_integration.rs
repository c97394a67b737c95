// domwatch/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::net::UdpSocket;
use std::thread;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

/// Command isolated from the user's config files and DW_* variables.
fn domwatch(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domwatch").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "DW_SERVER",
        "DW_TRANSPORT",
        "DW_TYPES",
        "DW_TIMEOUT",
        "DW_CONCURRENCY",
        "DW_JSON",
        "DW_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write to temp file");
    file
}

/// Loopback bootstrap server that answers every query with an empty
/// NOERROR response. Returns its "ip:port".
fn empty_bootstrap_server(replies: usize) -> String {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    let addr = socket.local_addr().unwrap().to_string();

    thread::spawn(move || {
        let mut buf = [0u8; 512];
        for _ in 0..replies {
            let Ok((len, peer)) = socket.recv_from(&mut buf) else {
                return;
            };
            let mut response = buf[..len].to_vec();
            // QR=1, keep RD; RA=1, RCODE=0. Counts stay: 1 question, 0 records.
            response[2] |= 0x80;
            response[3] = 0x80;
            let _ = socket.send_to(&response, peer);
        }
    });

    addr
}

#[test]
fn test_help_lists_flags() {
    let home = TempDir::new().unwrap();
    domwatch(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--udp"))
        .stdout(predicate::str::contains("--tcp"))
        .stdout(predicate::str::contains("--soa"))
        .stdout(predicate::str::contains("--types"))
        .stdout(predicate::str::contains("--server"));
}

#[test]
fn test_no_domains_is_an_error() {
    let home = TempDir::new().unwrap();
    domwatch(&home)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("at least one domain"));
}

#[test]
fn test_not_a_domain_name() {
    let home = TempDir::new().unwrap();
    domwatch(&home)
        .arg("localhost")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("'localhost' is not a domain name"));
}

#[test]
fn test_invalid_name_in_file_stops_before_checking() {
    let home = TempDir::new().unwrap();
    let file = write_file("# watchlist\nexample.com\nnot a domain\n");
    domwatch(&home)
        .args(["-f", file.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'not a domain' is not a domain name"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_tcp_and_udp_conflict() {
    let home = TempDir::new().unwrap();
    domwatch(&home)
        .args(["--tcp", "--udp", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_empty_types_in_config() {
    let home = TempDir::new().unwrap();
    let config = write_file("[defaults]\ntypes = []\n");
    domwatch(&home)
        .args(["--config", config.path().to_str().unwrap(), "example.com"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No type to query selected"));
}

#[test]
fn test_unknown_record_type() {
    let home = TempDir::new().unwrap();
    domwatch(&home)
        .args(["-t", "BOGUS", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown record type 'BOGUS'"));
}

#[test]
fn test_invalid_env_concurrency_is_ignored() {
    let home = TempDir::new().unwrap();
    // Invalid DW_CONCURRENCY is dropped; the run still fails on the domain.
    domwatch(&home)
        .env("DW_CONCURRENCY", "0")
        .arg("localhost")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a domain name"));
}

#[test]
fn test_bootstrap_without_nameservers_fails() {
    let home = TempDir::new().unwrap();
    let server = empty_bootstrap_server(1);
    domwatch(&home)
        .args(["--udp", "--server", &server, "--timeout", "5s", "example.com"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No nameservers found for 'com.'"));
}

#[test]
fn test_bootstrap_failure_in_json() {
    let home = TempDir::new().unwrap();
    let server = empty_bootstrap_server(1);
    domwatch(&home)
        .args(["--udp", "-s", &server, "--json", "example.com"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"status\": \"unknown\""))
        .stdout(predicate::str::contains("\"domain\": \"example.com\""));
}

#[test]
fn test_server_from_config_file() {
    let home = TempDir::new().unwrap();
    let server = empty_bootstrap_server(1);
    fs::write(
        home.path().join("domwatch.toml"),
        format!("[defaults]\nserver = \"{}\"\ntransport = \"udp\"\n", server),
    )
    .unwrap();

    domwatch(&home)
        .arg("example.org")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No nameservers found for 'org.'"));
}

#[test]
#[ignore = "requires network access"]
fn test_live_registered_domain() {
    let home = TempDir::new().unwrap();
    domwatch(&home)
        .args(["--udp", "--soa", "example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'example.com' is NOT available"));
}
