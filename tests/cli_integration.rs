//! End-to-end tests for the command line.
//!
//! Binary tests only cover paths that fail or finish before any network
//! access. Full runs call `cli::execute` with a config file that points every
//! endpoint at a local wiremock server.

use std::path::PathBuf;

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use waybackprov::cli::{execute, Cli};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn waybackprov() -> Command {
    Command::cargo_bin("waybackprov").unwrap()
}

fn empty_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();
    path
}

mod binary {
    use super::*;

    #[test]
    fn help_describes_collapse() {
        waybackprov()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--collapse"))
            .stdout(predicate::str::contains("focused_crawls"));
    }

    #[test]
    fn version_flag_works() {
        waybackprov()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("waybackprov"));
    }

    #[test]
    fn missing_url_is_a_usage_error() {
        waybackprov().assert().failure().code(2);
    }

    #[test]
    fn invalid_match_pattern_fails_before_fetching() {
        waybackprov()
            .args(["--prefix", "--match", "(unclosed", "https://twitter.com/Guccifer_2"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid match pattern"));
    }

    #[test]
    fn reversed_year_range_fails() {
        let dir = TempDir::new().unwrap();
        let config = empty_config(&dir);

        waybackprov()
            .arg("--config")
            .arg(&config)
            .args(["--start", "2018", "--end", "2016", "https://epa.gov"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("start year 2018 is after end year 2016"));
    }

    #[test]
    fn missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();

        waybackprov()
            .arg("--config")
            .arg(dir.path().join("absent.toml"))
            .arg("https://epa.gov")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }

    #[test]
    fn malformed_config_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[archive]\nwayback_base = \"ftp://example.org\"\n").unwrap();

        waybackprov()
            .arg("--config")
            .arg(&path)
            .arg("https://epa.gov")
            .assert()
            .failure()
            .stderr(predicate::str::contains("must use http or https"));
    }
}

mod full_run {
    use super::*;

    const URL: &str = "https://www.epa.gov/";

    async fn archive_server() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/__wb/calendarcaptures"))
            .and(query_param("url", URL))
            .and(query_param("selected_year", "2017"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[[
                {
                    "st": [200, 200, 302],
                    "ts": [20170120000000u64, 20170121000000u64, 20170122000000u64],
                    "why": [["web", "focused_crawls", "edgi_monitor"], ["web"], []]
                },
                null
            ]]])))
            .expect(1)
            .mount(&server)
            .await;

        for (id, metadata) in [
            ("web", json!({"title": "Web"})),
            ("focused_crawls", json!({"collection": "web"})),
            ("edgi_monitor", json!({"collection": ["focused_crawls"]})),
        ] {
            Mock::given(method("GET"))
                .and(path(format!("/metadata/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "metadata": metadata })))
                .expect(0..=1)
                .mount(&server)
                .await;
        }

        server
    }

    fn config_for(server: &MockServer, dir: &TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        let contents = format!(
            "[archive]\n\
             wayback_base = \"{uri}\"\n\
             metadata_base = \"{uri}/metadata\"\n\
             details_base = \"https://archive.org/details\"\n\
             \n\
             [retry]\n\
             max_attempts = 1\n\
             request_timeout_secs = 5\n",
            uri = server.uri()
        );
        std::fs::write(&path, contents).unwrap();
        path
    }

    async fn run(args: &[&str]) -> String {
        let server = archive_server().await;
        let dir = TempDir::new().unwrap();
        let config = config_for(&server, &dir);

        let mut argv = vec!["waybackprov", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["--start", "2017", "--end", "2017", URL]);
        let cli = Cli::try_parse_from(argv).unwrap();

        let mut out = Vec::new();
        execute(&cli, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn text_report_counts_every_collection() {
        let output = run(&[]).await;
        assert_eq!(
            output,
            "2 https://archive.org/details/web\n\
             1 https://archive.org/details/focused_crawls\n\
             1 https://archive.org/details/edgi_monitor\n"
        );
    }

    #[tokio::test]
    async fn collapsed_report_keeps_most_specific_collection() {
        let output = run(&["--collapse"]).await;
        assert_eq!(
            output,
            "1 https://archive.org/details/edgi_monitor\n\
             1 https://archive.org/details/web\n"
        );
    }

    #[tokio::test]
    async fn json_report_lists_every_capture() {
        let output = run(&["--format", "json"]).await;
        let records: serde_json::Value = serde_json::from_str(&output).unwrap();

        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["status"], 302);
        assert_eq!(records[2]["collections"], json!([]));
        assert!(records[0]["url"]
            .as_str()
            .unwrap()
            .ends_with("/web/20170120000000/https://www.epa.gov/"));
    }

    #[tokio::test]
    async fn csv_report_has_header_and_rows() {
        let output = run(&["--format", "csv", "--collapse"]).await;
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "timestamp,status,collections,url");
        assert!(lines[1].starts_with("20170120000000,200,edgi_monitor,"));
        assert!(lines[3].starts_with("20170122000000,302,,"));
    }
}
