#![allow(deprecated)]
use cucumber::{given, then, when};

use crate::BlogWorld;
use crate::steps::web_steps::{http_get, parse_last_response, send, url, with_admin};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Replace `@alias` segments of a path with recorded IDs.
fn resolve_path(world: &BlogWorld, path: &str) -> String {
    path.split('/')
        .map(|seg| match seg.strip_prefix('@') {
            Some(alias) => world.id_for(alias),
            None => seg.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

async fn upload_post(world: &mut BlogWorld, title: &str, content: &str) -> (u16, String) {
    let req = world
        .http_client
        .post(url(world, "/upload"))
        .form(&[("title", title), ("content", content)]);
    let req = with_admin(world, req);
    send(world, req).await
}

fn post_titles(world: &BlogWorld) -> Vec<String> {
    let json = parse_last_response(world);
    json["posts"]
        .as_array()
        .unwrap_or_else(|| panic!("expected a 'posts' array in: {json}"))
        .iter()
        .map(|p| p["title"].as_str().unwrap_or("").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given(expr = "I uploaded a post titled {string} with content {string} as {string}")]
async fn i_uploaded_a_post(world: &mut BlogWorld, title: String, content: String, alias: String) {
    let (status, body) = upload_post(world, &title, &content).await;
    assert_eq!(status, 200, "expected 200 from POST /upload but got {status}: {body}");
    let json = parse_last_response(world);
    let id = json["id"]
        .as_str()
        .unwrap_or_else(|| panic!("POST /upload response has no 'id' field: {json}"))
        .to_string();
    world.ids.insert(alias, id);
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when(expr = "I upload a post titled {string} with content {string}")]
async fn i_upload_a_post(world: &mut BlogWorld, title: String, content: String) {
    upload_post(world, &title, &content).await;
}

#[when(expr = "I upload a multipart post titled {string} with content {string}")]
async fn i_upload_a_multipart_post(world: &mut BlogWorld, title: String, content: String) {
    let form = reqwest::multipart::Form::new()
        .text("title", title)
        .text("content", content);
    let req = world.http_client.post(url(world, "/upload")).multipart(form);
    let req = with_admin(world, req);
    send(world, req).await;
}

/// GET a path; `@alias` segments become recorded IDs.
#[when(expr = "I GET the resource {string}")]
async fn i_get_the_resource(world: &mut BlogWorld, path: String) {
    let path = resolve_path(world, &path);
    http_get(world, &path).await;
}

/// PUT a urlencoded form body, sending the admin token if one is held.
#[when(expr = "I PUT {string} with form {string}")]
async fn i_put_with_form(world: &mut BlogWorld, path: String, form: String) {
    let path = resolve_path(world, &path);
    let req = world
        .http_client
        .put(url(world, &path))
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(form);
    let req = with_admin(world, req);
    send(world, req).await;
}

/// PUT with no body at all.
#[when(expr = "I PUT {string} with no body")]
async fn i_put_with_no_body(world: &mut BlogWorld, path: String) {
    let path = resolve_path(world, &path);
    let req = with_admin(world, world.http_client.put(url(world, &path)));
    send(world, req).await;
}

/// DELETE a path, sending the admin token if one is held.
#[when(expr = "I DELETE {string}")]
async fn i_delete(world: &mut BlogWorld, path: String) {
    let path = resolve_path(world, &path);
    let req = with_admin(world, world.http_client.delete(url(world, &path)));
    send(world, req).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

/// Fetch `/get` and compare titles, newest first.
#[then(expr = "the post titles are {string}")]
async fn the_post_titles_are(world: &mut BlogWorld, expected: String) {
    let (status, body) = http_get(world, "/get").await;
    assert_eq!(status, 200, "GET /get failed: {body}");
    let titles = post_titles(world);
    let expected: Vec<String> = if expected.is_empty() {
        Vec::new()
    } else {
        expected.split(',').map(|s| s.trim().to_string()).collect()
    };
    assert_eq!(titles, expected, "unexpected post titles (newest first)");
}
