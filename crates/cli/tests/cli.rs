// ABOUTME: Integration tests for the marquee CLI binary against a mock BFF.
// ABOUTME: Covers listings, details, favorites persistence, health and the browse loop.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn marquee(server: &MockServer, favorites: &Path) -> Command {
    let mut cmd = Command::cargo_bin("marquee").unwrap();
    cmd.env_remove("MARQUEE_API_URL")
        .env_remove("MARQUEE_IMAGE_URL")
        .env_remove("MARQUEE_TIMEOUT_SECS")
        .env("MARQUEE_FAVORITES", favorites)
        .arg("--api-url")
        .arg(server.url("/api"));
    cmd
}

fn movie(id: i64, title: &str, rating: f64, date: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": "",
        "posterPath": format!("/{id}.jpg"),
        "backdropPath": null,
        "releaseDate": date,
        "rating": rating,
        "voteCount": 10
    })
}

fn page(page: u32, total_pages: u32, results: Vec<Value>) -> Value {
    json!({
        "page": page,
        "results": results,
        "totalPages": total_pages,
        "totalResults": total_pages * 2
    })
}

fn mock_popular(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/movies/popular")
            .query_param("page", "1");
        then.status(200).json_body(page(
            1,
            2,
            vec![
                movie(1, "Dune", 7.8, "2021-09-15"),
                movie(2, "Arrival", 7.6, "2016-11-10"),
            ],
        ));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/movies/popular")
            .query_param("page", "2");
        then.status(200)
            .json_body(page(2, 2, vec![movie(3, "Heat", 7.9, "1995-12-15")]));
    });
}

fn mock_details(server: &MockServer, id: i64, title: &str) {
    let mut body = movie(id, title, 8.1, "1979-05-25");
    body["runtime"] = json!(117);
    body["tagline"] = json!("In space no one can hear you scream.");
    body["genres"] = json!([{"id": 27, "name": "Horror"}]);
    body["backdropPath"] = json!(format!("/{id}-backdrop.jpg"));
    server.mock(|when, then| {
        when.method(GET).path(format!("/api/movies/{id}"));
        then.status(200).json_body(body);
    });
}

#[test]
fn popular_lists_first_page() {
    let server = MockServer::start();
    mock_popular(&server);
    let dir = TempDir::new().unwrap();

    marquee(&server, &dir.path().join("f.json"))
        .arg("popular")
        .assert()
        .success()
        .stdout(predicate::str::contains("  1. Dune (2021)  rating 7.8"))
        .stdout(predicate::str::contains("page 1 of 2 (4 results, more available)"))
        .stdout(predicate::str::contains("Heat").not());
}

#[test]
fn popular_pages_accumulate_in_json() {
    let server = MockServer::start();
    mock_popular(&server);
    let dir = TempDir::new().unwrap();

    let output = marquee(&server, &dir.path().join("f.json"))
        .args(["popular", "--pages", "5", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["page"], 2);
    assert_eq!(parsed["results"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["results"][2]["title"], "Heat");
}

#[test]
fn blank_search_is_rejected() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();

    marquee(&server, &dir.path().join("f.json"))
        .args(["search", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("search query must not be empty"));
}

#[test]
fn search_failure_shows_server_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/movies/search");
        then.status(500)
            .json_body(json!({"success": false, "message": "TMDB unavailable"}));
    });
    let dir = TempDir::new().unwrap();

    marquee(&server, &dir.path().join("f.json"))
        .args(["search", "alien"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB unavailable"));
}

#[test]
fn details_render_and_not_found() {
    let server = MockServer::start();
    mock_details(&server, 348, "Alien");
    server.mock(|when, then| {
        when.method(GET).path("/api/movies/9");
        then.status(404)
            .json_body(json!({"success": false, "message": "Movie not found"}));
    });
    let dir = TempDir::new().unwrap();
    let favorites = dir.path().join("f.json");

    marquee(&server, &favorites)
        .args(["details", "348"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25/05/1979 | 1h 57min | rating 8.1"))
        .stdout(predicate::str::contains("Genres: Horror"))
        .stdout(predicate::str::contains("Poster: https://image.tmdb.org/t/p/w500/348.jpg"))
        .stdout(predicate::str::contains(
            "Backdrop: https://image.tmdb.org/t/p/w1280/348-backdrop.jpg",
        ));

    marquee(&server, &favorites)
        .args(["details", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("movie 9 not found"));
}

#[test]
fn favorites_add_list_and_toggle() {
    let server = MockServer::start();
    mock_details(&server, 348, "Alien");
    mock_details(&server, 679, "Aliens");
    let dir = TempDir::new().unwrap();
    let favorites = dir.path().join("data").join("favorites.json");

    marquee(&server, &favorites)
        .args(["favorites", "add", "679"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added \"Aliens\" to favorites"));
    marquee(&server, &favorites)
        .args(["favorites", "add", "348"])
        .assert()
        .success();
    marquee(&server, &favorites)
        .args(["favorites", "add", "348"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already in favorites"));

    let stored: Vec<Value> = serde_json::from_str(&fs::read_to_string(&favorites).unwrap()).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["id"], 679);

    marquee(&server, &favorites)
        .args(["favorites", "list", "--sort", "title-asc"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)1\. Alien .*2\. Aliens ").unwrap());

    marquee(&server, &favorites)
        .args(["favorites", "toggle", "348"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed \"Alien\" from favorites"));

    marquee(&server, &favorites)
        .args(["favorites", "remove", "348"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in favorites"));
}

#[test]
fn unknown_sort_is_a_usage_error() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();

    marquee(&server, &dir.path().join("f.json"))
        .args(["favorites", "list", "--sort", "loudest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort criterion"));
}

#[test]
fn health_reports_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .json_body(json!({"status": "ok", "message": "BFF Server is running"}));
    });
    let dir = TempDir::new().unwrap();

    marquee(&server, &dir.path().join("f.json"))
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: BFF Server is running"));
}

#[test]
fn api_url_falls_back_to_environment() {
    let server = MockServer::start();
    mock_popular(&server);
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("marquee")
        .unwrap()
        .env("MARQUEE_API_URL", server.url("/api"))
        .env("MARQUEE_FAVORITES", dir.path().join("f.json"))
        .arg("popular")
        .assert()
        .success()
        .stdout(predicate::str::contains("Arrival"));
}

#[test]
fn browse_scrolls_and_favorites() {
    let server = MockServer::start();
    mock_popular(&server);
    let dir = TempDir::new().unwrap();
    let favorites = dir.path().join("f.json");

    marquee(&server, &favorites)
        .arg("browse")
        .write_stdin(":more\n:more\n:fav 3\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("  3. Heat (1995)"))
        .stdout(predicate::str::contains("End of list."))
        .stdout(predicate::str::contains("Added \"Heat\" to favorites"));

    let stored = fs::read_to_string(&favorites).unwrap();
    assert!(stored.contains("\"Heat\""));
}

#[test]
fn browse_search_settles_at_end_of_input() {
    let server = MockServer::start();
    mock_popular(&server);
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/api/movies/search")
            .query_param("q", "superman")
            .query_param("page", "1");
        then.status(200)
            .json_body(page(1, 1, vec![movie(1924, "Superman", 7.1, "1978-12-14")]));
    });
    let dir = TempDir::new().unwrap();

    marquee(&server, &dir.path().join("f.json"))
        .arg("browse")
        .write_stdin("batman\nsuperman\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Searching..."))
        .stdout(predicate::str::contains("  1. Superman (1978)"));
    search.assert_hits(1);
}
