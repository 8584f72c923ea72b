#![allow(deprecated)]
use cucumber::{given, then};
use serde_json::Value;

use crate::BlogWorld;
use crate::steps::web_steps::{http_get, parse_last_response, send, url};

fn reason_entries(world: &BlogWorld) -> Vec<Value> {
    let json = parse_last_response(world);
    json["posts"]
        .as_array()
        .unwrap_or_else(|| panic!("expected a 'posts' array in: {json}"))
        .clone()
}

/// Record a visitor reason and look up its ID by name.
#[given(expr = "a visitor {string} left the reason {string} as {string}")]
async fn a_visitor_left_a_reason(world: &mut BlogWorld, name: String, why: String, alias: String) {
    let req = world
        .http_client
        .post(url(world, "/where_to"))
        .form(&[("name", name.as_str()), ("why", why.as_str())]);
    let (status, body) = send(world, req).await;
    assert_eq!(status, 200, "expected 200 from POST /where_to but got {status}: {body}");

    let (status, body) = http_get(world, "/get_reasons").await;
    assert_eq!(status, 200, "GET /get_reasons failed: {body}");
    let id = reason_entries(world)
        .iter()
        .find(|r| r["name"].as_str() == Some(name.as_str()))
        .and_then(|r| r["id"].as_str().map(str::to_string))
        .unwrap_or_else(|| panic!("no reason named '{name}' in /get_reasons"));
    world.ids.insert(alias, id);
}

/// Fetch `/get_reasons` and compare names, newest first.
#[then(expr = "the reason names are {string}")]
async fn the_reason_names_are(world: &mut BlogWorld, expected: String) {
    let (status, body) = http_get(world, "/get_reasons").await;
    assert_eq!(status, 200, "GET /get_reasons failed: {body}");
    let names: Vec<String> = reason_entries(world)
        .iter()
        .map(|r| r["name"].as_str().unwrap_or("").to_string())
        .collect();
    let expected: Vec<String> = if expected.is_empty() {
        Vec::new()
    } else {
        expected.split(',').map(|s| s.trim().to_string()).collect()
    };
    assert_eq!(names, expected, "unexpected reason names (newest first)");
}
