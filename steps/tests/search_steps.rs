mod common;

use analysis_api_client_instrumented::prelude::ScriptedTransport;
use analysis_steps::steps;
use common::{context, context_with_response};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn search_result() -> serde_json::Value {
    json!({"result": [
        {"ecosystem": "pypi", "name": "six"},
        {"ecosystem": "pypi", "name": "sixer"}
    ]})
}

#[test]
fn search_stores_the_response() {
    let transport = Arc::new(ScriptedTransport::new().with_json(200, search_result()));
    let mut ctx = context(transport.clone());

    steps::search_for_component(&mut ctx, "six", true).unwrap();

    let request = &transport.requests()[0];
    assert_eq!("http://core.test/api/v1/component-search/six", request.url.as_str());
    assert_eq!(Some("Bearer t0k"), request.header("authorization"));
    assert_eq!(200, ctx.response().unwrap().status);
}

#[test]
fn search_without_token_stores_rejection() {
    let transport = Arc::new(ScriptedTransport::new().with_response(401, "{}"));
    let mut ctx = context(transport.clone());

    steps::search_for_component(&mut ctx, "six", false).unwrap();

    assert_eq!(None, transport.requests()[0].header("authorization"));
    assert_eq!(401, ctx.response().unwrap().status);
}

#[test]
fn component_count_and_identity() {
    let mut ctx = context_with_response(search_result());

    steps::check_components(&mut ctx, 2, &names(&["six", "sixer"]), "pypi").unwrap();
    steps::check_components(&mut ctx, 2, &names(&["sixer", "six", "other"]), "pypi").unwrap();

    // wrong count
    steps::check_components(&mut ctx, 1, &names(&["six", "sixer"]), "pypi").unwrap_err();
    // name outside of the set
    steps::check_components(&mut ctx, 2, &names(&["six"]), "pypi").unwrap_err();
    // wrong ecosystem
    steps::check_components(&mut ctx, 2, &names(&["six", "sixer"]), "npm").unwrap_err();
}

#[test]
fn no_components() {
    let mut ctx = context_with_response(json!({"result": []}));

    steps::check_components(&mut ctx, 0, &[], "").unwrap();
}

#[test]
fn component_existence_uses_containment() {
    let mut ctx = context_with_response(search_result());

    steps::check_component_analysis_existence(&mut ctx, "six", "pypi").unwrap();
    steps::check_component_analysis_existence(&mut ctx, "ixe", "py").unwrap();
    steps::check_component_analysis_existence(&mut ctx, "six", "npm").unwrap_err();
    steps::check_component_analysis_existence(&mut ctx, "seven", "pypi").unwrap_err();
}

#[test]
fn component_nonexistence_uses_exact_match() {
    let mut ctx = context_with_response(search_result());

    steps::check_component_analysis_nonexistence_in_ecosystem(&mut ctx, "six", "pypi").unwrap_err();
    steps::check_component_analysis_nonexistence_in_ecosystem(&mut ctx, "six", "npm").unwrap();
    steps::check_component_analysis_nonexistence_in_ecosystem(&mut ctx, "si", "pypi").unwrap();

    steps::check_component_analysis_nonexistence_in_any_ecosystem(&mut ctx, "sixer").unwrap_err();
    steps::check_component_analysis_nonexistence_in_any_ecosystem(&mut ctx, "sixe").unwrap();
}
