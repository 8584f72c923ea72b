#![allow(deprecated)]
use cucumber::{given, then, when};

use crate::BlogWorld;
use crate::steps::web_steps::{ADMIN_KEY, ADMIN_NAME, parse_last_response, send, url, with_admin};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// POST the visitor form to `/where_to`; keep any token handed back.
async fn submit_visitor_form(world: &mut BlogWorld, name: &str, why: &str, multipart: bool) {
    let req = world.http_client.post(url(world, "/where_to"));
    let req = if multipart {
        let form = reqwest::multipart::Form::new()
            .text("name", name.to_string())
            .text("why", why.to_string());
        req.multipart(form)
    } else {
        req.form(&[("name", name), ("why", why)])
    };
    let (status, _) = send(world, req).await;

    if status == 200 {
        let json = parse_last_response(world);
        if let Some(token) = json["token"].as_str() {
            world.admin_token = Some(token.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("I am logged in as admin")]
async fn i_am_logged_in_as_admin(world: &mut BlogWorld) {
    submit_visitor_form(world, ADMIN_NAME, ADMIN_KEY, false).await;
    assert!(
        world.admin_token.is_some(),
        "admin login did not return a token: {:?}",
        world.last_response_body
    );
}

#[given(expr = "I use the bearer token {string}")]
async fn i_use_the_bearer_token(world: &mut BlogWorld, token: String) {
    world.admin_token = Some(token);
}

#[given("I have no admin token")]
async fn i_have_no_admin_token(world: &mut BlogWorld) {
    world.admin_token = None;
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when(expr = "I submit the visitor form with name {string} and why {string}")]
async fn i_submit_the_visitor_form(world: &mut BlogWorld, name: String, why: String) {
    submit_visitor_form(world, &name, &why, false).await;
}

#[when(expr = "I submit the visitor form as multipart with name {string} and why {string}")]
async fn i_submit_the_visitor_form_multipart(world: &mut BlogWorld, name: String, why: String) {
    submit_visitor_form(world, &name, &why, true).await;
}

#[when("I log in with the admin credentials")]
async fn i_log_in_with_admin_credentials(world: &mut BlogWorld) {
    submit_visitor_form(world, ADMIN_NAME, ADMIN_KEY, false).await;
}

#[when("I log out")]
async fn i_log_out(world: &mut BlogWorld) {
    let req = with_admin(world, world.http_client.post(url(world, "/logout")));
    send(world, req).await;
}

/// Send a DELETE with a literal Authorization header value.
#[when(expr = "I DELETE {string} with Authorization {string}")]
async fn i_delete_with_authorization(world: &mut BlogWorld, path: String, header: String) {
    let req = world
        .http_client
        .delete(url(world, &path))
        .header(reqwest::header::AUTHORIZATION, header);
    send(world, req).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("I hold an admin token")]
async fn i_hold_an_admin_token(world: &mut BlogWorld) {
    let token = world
        .admin_token
        .as_deref()
        .expect("expected an admin token to have been issued");
    assert_eq!(token.len(), 32, "token should be 32 hex chars: {token}");
    assert!(
        token.chars().all(|c| c.is_ascii_hexdigit()),
        "token should be hex: {token}"
    );
}
