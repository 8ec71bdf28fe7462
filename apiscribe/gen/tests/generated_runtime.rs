//! Runs the request builder of the generated runtime.
//!
//! The runtime source emitted as `runtime.rs` is compiled here as a module,
//! so these tests execute exactly the code every generated client ships.

#[path = "../templates/runtime.rs"]
#[allow(dead_code)]
mod runtime;

use apiscribe_define::GroupSpec;
use apiscribe_gen::compiler::{CompileOptions, compile};
use runtime::{BodyEncoding, InputError, RequestBody, RequestContext, RequestPlan, build_request};
use serde_json::{Value, json};

const GET_ITEM: RequestPlan = RequestPlan {
    method: "GET",
    path: "/items/{id}",
    headers: &["x-tenant"],
    query: &["fields"],
    body: &[],
    params: &["id"],
    encoding: BodyEncoding::Json,
};

const UPDATE_ITEM: RequestPlan = RequestPlan {
    method: "PUT",
    path: "/shops/{shop}/items/{id}",
    headers: &[],
    query: &[],
    body: &["title", "price"],
    params: &["shop", "id"],
    encoding: BodyEncoding::Json,
};

fn with_encoding(encoding: BodyEncoding) -> RequestPlan {
    RequestPlan {
        encoding,
        ..UPDATE_ITEM
    }
}

fn context() -> RequestContext {
    RequestContext::new("https://api.example.com/v1/")
}

#[test]
fn every_bucket_lands_in_its_location() {
    let input = json!({
        "id": 42,
        "x-tenant": "acme",
        "fields": ["name", "price"],
        "session": "internal-only"
    });

    let request = build_request(&GET_ITEM, &input, &context().with_header("accept", "application/json")).unwrap();

    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "https://api.example.com/v1/items/42");
    assert_eq!(
        request.headers,
        vec![
            ("accept".to_string(), "application/json".to_string()),
            ("x-tenant".to_string(), "acme".to_string()),
        ]
    );
    assert_eq!(
        request.query,
        vec![
            ("fields".to_string(), "name".to_string()),
            ("fields".to_string(), "price".to_string()),
        ]
    );
    assert_eq!(request.body, None);
}

#[test]
fn fields_outside_the_plan_are_ignored() {
    let input = json!({ "id": "a1", "session": "secret", "debug": true });
    let request = build_request(&GET_ITEM, &input, &context()).unwrap();

    assert!(request.headers.is_empty());
    assert!(request.query.is_empty());
    assert!(!request.url.contains("secret"));
}

#[test]
fn null_counts_as_absent() {
    let input = json!({ "id": "a1", "x-tenant": null, "fields": null });
    let request = build_request(&GET_ITEM, &input, &context()).unwrap();

    assert!(request.headers.is_empty());
    assert!(request.query.is_empty());

    let input = json!({ "shop": "s", "id": 1, "title": "Lamp", "price": null });
    let request = build_request(&UPDATE_ITEM, &input, &context()).unwrap();
    assert_eq!(request.body, Some(RequestBody::Json(json!({ "title": "Lamp" }))));
}

#[test]
fn path_parameters_are_percent_encoded() {
    let input = json!({ "id": "a/b?x=1#frag" });
    let request = build_request(&GET_ITEM, &input, &context()).unwrap();

    assert_eq!(request.url, "https://api.example.com/v1/items/a%2Fb%3Fx%3D1%23frag");
    assert!(request.query.is_empty());
}

#[test]
fn unreserved_characters_stay_readable() {
    let input = json!({ "shop": "north-1", "id": "item_2.v~3" });
    let request = build_request(&UPDATE_ITEM, &input, &context()).unwrap();

    assert_eq!(request.url, "https://api.example.com/v1/shops/north-1/items/item_2.v~3");
}

#[test]
fn placeholder_text_in_a_value_is_not_substituted_again() {
    let input = json!({ "shop": "{id}", "id": "7" });
    let request = build_request(&UPDATE_ITEM, &input, &context()).unwrap();

    assert_eq!(request.url, "https://api.example.com/v1/shops/%7Bid%7D/items/7");
}

#[test]
fn missing_path_parameter_is_an_error() {
    let err = build_request(&GET_ITEM, &json!({ "id": null }), &context()).unwrap_err();
    assert_eq!(err, InputError::MissingPathParam("id"));
    assert_eq!(err.to_string(), "missing path parameter `id`");
}

#[test]
fn non_object_input_is_rejected() {
    let err = build_request(&GET_ITEM, &json!(["id"]), &context()).unwrap_err();
    assert_eq!(err, InputError::NotAnObject);
}

#[test]
fn structured_header_value_is_unsupported() {
    let input = json!({ "id": 1, "x-tenant": { "name": "acme" } });
    let err = build_request(&GET_ITEM, &input, &context()).unwrap_err();

    assert_eq!(
        err,
        InputError::Unsupported {
            field: "x-tenant".to_string(),
            location: "header",
        }
    );
}

#[test]
fn structured_form_value_is_unsupported() {
    let input = json!({ "shop": "s", "id": 1, "title": ["a", "b"] });
    let err = build_request(&with_encoding(BodyEncoding::Form), &input, &context()).unwrap_err();

    assert_eq!(
        err,
        InputError::Unsupported {
            field: "title".to_string(),
            location: "form body",
        }
    );
}

#[test]
fn body_encodings() {
    let input = json!({ "shop": "s", "id": 1, "title": "Lamp", "price": 12.5 });

    let json_body = build_request(&UPDATE_ITEM, &input, &context()).unwrap().body;
    assert_eq!(
        json_body,
        Some(RequestBody::Json(json!({ "title": "Lamp", "price": 12.5 })))
    );

    let form_body = build_request(&with_encoding(BodyEncoding::Form), &input, &context())
        .unwrap()
        .body;
    assert_eq!(
        form_body,
        Some(RequestBody::Form(vec![
            ("title".to_string(), "Lamp".to_string()),
            ("price".to_string(), "12.5".to_string()),
        ]))
    );

    let multipart_body = build_request(&with_encoding(BodyEncoding::Multipart), &input, &context())
        .unwrap()
        .body;
    assert_eq!(
        multipart_body,
        Some(RequestBody::Multipart(vec![
            ("title".to_string(), json!("Lamp")),
            ("price".to_string(), json!(12.5)),
        ]))
    );

    let raw_body = build_request(&with_encoding(BodyEncoding::Raw("text/csv")), &input, &context())
        .unwrap()
        .body;
    match raw_body {
        Some(RequestBody::Raw { content_type, fields }) => {
            assert_eq!(content_type, "text/csv");
            assert_eq!(Value::Object(fields), json!({ "title": "Lamp", "price": 12.5 }));
        }
        other => panic!("expected raw body, got {other:?}"),
    }
}

#[test]
fn encodings_report_their_content_type() {
    assert_eq!(BodyEncoding::Json.content_type(), "application/json");
    assert_eq!(BodyEncoding::Form.content_type(), "application/x-www-form-urlencoded");
    assert_eq!(BodyEncoding::Multipart.content_type(), "multipart/form-data");
    assert_eq!(BodyEncoding::Raw("text/csv").content_type(), "text/csv");
}

#[test]
fn compiled_runtime_artifact_is_this_module() {
    let artifacts = compile(&GroupSpec::new(), &CompileOptions::default()).unwrap();
    let runtime = &artifacts["runtime.rs"];

    assert!(runtime.contains("pub fn build_request("));
    assert!(runtime.contains("utf8_percent_encode"));
    assert!(runtime.contains("type Input;"));
}
