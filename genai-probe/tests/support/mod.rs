#![allow(dead_code)]

use serde_json::{json, Value};

use genai_probe::report::Narrator;
use genai_probe::Client;

pub fn build_gemini_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key-0123456789abc")
        .base_url(base_url)
        .build()
        .unwrap()
}

pub fn buffer_narrator() -> Narrator<Vec<u8>> {
    Narrator::new(Vec::new())
}

pub fn narration(narrator: Narrator<Vec<u8>>) -> String {
    String::from_utf8(narrator.into_inner()).unwrap()
}

pub fn text_response(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": text}
                    ]
                },
                "finishReason": "STOP"
            }
        ]
    })
}

pub fn models_page(names: &[(&str, &[&str])], next_page_token: Option<&str>) -> Value {
    let models: Vec<Value> = names
        .iter()
        .map(|(name, methods)| {
            json!({
                "name": name,
                "displayName": name,
                "supportedGenerationMethods": methods,
            })
        })
        .collect();
    let mut body = json!({ "models": models });
    if let Some(token) = next_page_token {
        body["nextPageToken"] = json!(token);
    }
    body
}
