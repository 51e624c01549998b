//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Expected landmarks are decoded through the same
//! lenient `Landmark` deserializer, so the vectors can state coordinates as
//! plain numbers while the simulated server sends decimal strings.

use landmark_core::{
    ApiError, Category, CredentialStore, HttpBody, HttpMethod, HttpResponse, Landmark,
    LandmarkClient, LandmarkFields, LandmarkFilters, TokenPair,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000";

fn client() -> LandmarkClient {
    LandmarkClient::new(BASE_URL, CredentialStore::new())
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(sim["status"].as_u64().unwrap() as u16, sim["body"].as_str().unwrap())
}

fn assert_expected_error(name: &str, case: &Value, err: ApiError) {
    let expected = &case["expected_error"];
    match err {
        ApiError::Api { status, message, .. } => {
            assert_eq!(u64::from(status), expected["status"].as_u64().unwrap(), "{name}: status");
            assert_eq!(message.as_deref(), expected["message"].as_str(), "{name}: message");
        }
        other => panic!("{name}: expected Api failure, got {other:?}"),
    }
}

fn optional_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["filters"];
        let filters = LandmarkFilters {
            search: optional_text(&input["search"]),
            category: input["category"].as_str().map(Category::from_api_value),
            title: optional_text(&input["title"]),
        };
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_landmarks(&filters);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.query, string_pairs(&expected_req["query"]), "{name}: query");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let landmarks = c.parse_list_landmarks(simulated(case)).unwrap();
        let expected: Vec<Landmark> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(landmarks, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let raw = include_str!("../../test-vectors/get.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get_landmark(id);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_get_landmark(simulated(case));
        if case.get("expected_error").is_some() {
            assert_expected_error(name, case, result.unwrap_err());
        } else {
            let landmark = result.unwrap();
            let expected: Landmark = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(landmark, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let mut fields = LandmarkFields::new(
            input["title"].as_str().unwrap(),
            Category::from_api_value(input["category"].as_str().unwrap()),
        )
        .with_description(input["description"].as_str().unwrap());
        if let (Some(latitude), Some(longitude)) = (input["latitude"].as_f64(), input["longitude"].as_f64()) {
            fields = fields.with_coordinates(latitude, longitude);
        }
        if let Some(country) = input["country"].as_str() {
            fields = fields.with_country(country);
        }
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_create_landmark(&fields, None);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, string_pairs(&expected_req["headers"]), "{name}: headers");
        match req.body {
            Some(HttpBody::Form(pairs)) => {
                assert_eq!(pairs, string_pairs(&expected_req["form"]), "{name}: form");
            }
            other => panic!("{name}: expected form body, got {other:?}"),
        }

        // Verify parse
        let landmark = c.parse_create_landmark(simulated(case)).unwrap();
        let expected: Landmark = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(landmark, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_delete_landmark(id);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_delete_landmark(simulated(case));
        if case.get("expected_error").is_some() {
            assert_expected_error(name, case, result.unwrap_err());
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

#[test]
fn token_test_vectors() {
    let raw = include_str!("../../test-vectors/token.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c
            .build_login(input["email"].as_str().unwrap(), input["password"].as_str().unwrap())
            .unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, string_pairs(&expected_req["headers"]), "{name}: headers");
        match req.body {
            Some(HttpBody::Json(body)) => {
                let body: Value = serde_json::from_str(&body).unwrap();
                assert_eq!(body, expected_req["body"], "{name}: body");
            }
            other => panic!("{name}: expected JSON body, got {other:?}"),
        }

        // Verify parse
        let result = c.parse_token_pair(simulated(case));
        if case.get("expected_error").is_some() {
            assert_expected_error(name, case, result.unwrap_err());
        } else {
            let expected: TokenPair = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
