//! Console narration of a diagnostic run.

use std::fmt;
use std::io::{self, Write};

use genai_probe_types::models::Model;

use crate::error::Error;
use crate::models::GenerationResult;

/// 管理 API Key 的页面。
pub const API_KEY_CONSOLE_URL: &str = "https://aistudio.google.com/app/apikey";

const MASK_PREFIX_CHARS: usize = 10;

/// 诊断过程的文字输出。
///
/// 写入失败只记录日志，不中断诊断流程。
pub struct Narrator<W = io::Stdout> {
    out: W,
}

impl Narrator<io::Stdout> {
    /// 输出到标准输出。
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Narrator<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// 取回底层 writer。
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.out.write_fmt(args).and_then(|()| self.out.write_all(b"\n")) {
            tracing::debug!(error = %err, "narration write failed");
        }
    }

    pub fn banner(&mut self) {
        self.line(format_args!("🚀 Bắt đầu kiểm tra Gemini API..."));
        self.line(format_args!("{}", "=".repeat(50)));
    }

    pub fn list_section(&mut self) {
        self.line(format_args!("\n1️⃣ Lấy danh sách model có sẵn:"));
    }

    pub fn models_listed(&mut self, models: &[Model]) {
        self.line(format_args!("📋 Các model có sẵn:"));
        for model in models {
            self.line(format_args!(
                "  - {} | Methods: [{}]",
                model.name,
                model.supported_generation_methods.join(", ")
            ));
        }
    }

    pub fn list_failed(&mut self, err: &Error) {
        match err {
            Error::ApiError { status, message } => {
                self.line(format_args!("❌ Không thể lấy danh sách model: {status}"));
                self.line(format_args!("{message}"));
            }
            other => self.line(format_args!("❌ Lỗi khi lấy danh sách model: {other}")),
        }
    }

    pub fn probe_section(&mut self) {
        self.line(format_args!("\n2️⃣ Test các model phổ biến:"));
        self.line(format_args!("🧪 Testing multiple models..."));
    }

    pub fn attempt_started(&mut self, model: &str) {
        self.line(format_args!("\n--- Testing {model} ---"));
    }

    pub fn testing(&mut self, model: &str, api_key: &str) {
        self.line(format_args!("🔄 Testing model: {model}"));
        self.line(format_args!("🔄 API key: {}", mask_api_key(api_key)));
    }

    pub fn generation_ok(&mut self, result: &GenerationResult) {
        self.line(format_args!("✅ API key và model hoạt động bình thường!"));
        if let Some(text) = &result.text {
            self.line(format_args!("📄 Response: {text}"));
        }
    }

    pub fn generation_failed(&mut self, err: &Error) {
        match err {
            Error::ApiError { status, message } => {
                self.line(format_args!("❌ Lỗi HTTP: {status}"));
                self.line(format_args!("📄 Error: {message}"));
            }
            other => self.line(format_args!("❌ Lỗi kết nối: {other}")),
        }
    }

    pub fn attempt_finished(&mut self, model: &str, success: bool) {
        if success {
            self.line(format_args!("✅ Model {model} hoạt động!"));
        } else {
            self.line(format_args!("❌ Model {model} không hoạt động"));
        }
    }

    pub fn no_candidates(&mut self) {
        self.line(format_args!("⚠️ Danh sách model cần test đang trống"));
    }

    pub fn summary(&mut self, working_model: Option<&str>, api_key: &str) {
        if let Some(model) = working_model {
            self.line(format_args!("\n🎉 Tìm thấy model hoạt động: {model}"));
            self.line(format_args!("💡 Sử dụng model này trong cấu hình:"));
            self.line(format_args!("   model: \"{model}\""));
            self.line(format_args!("💡 API key để thêm vào .env:"));
            self.line(format_args!("   GEMINI_API_KEY={}", mask_api_key(api_key)));
        } else {
            self.line(format_args!("\n💥 Không có model nào hoạt động với API key này"));
            self.line(format_args!(
                "🔗 Hãy kiểm tra lại API key tại: {API_KEY_CONSOLE_URL}"
            ));
        }
    }
}

/// 只保留 API Key 开头部分用于展示。
///
/// 最多显示 10 个字符，且不超过 Key 长度的一半。
#[must_use]
pub fn mask_api_key(api_key: &str) -> String {
    let visible = MASK_PREFIX_CHARS.min(api_key.chars().count() / 2);
    let prefix: String = api_key.chars().take(visible).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered(f: impl FnOnce(&mut Narrator<Vec<u8>>)) -> String {
        let mut narrator = Narrator::new(Vec::new());
        f(&mut narrator);
        String::from_utf8(narrator.into_inner()).unwrap()
    }

    #[test]
    fn mask_keeps_ten_characters_of_long_keys() {
        assert_eq!(mask_api_key("AIzaSyDgmFxM35AawEq5"), "AIzaSyDgmF...");
    }

    #[test]
    fn mask_never_reveals_more_than_half() {
        assert_eq!(mask_api_key("abcdef"), "abc...");
        assert_eq!(mask_api_key(""), "...");
    }

    #[test]
    fn models_listed_prints_name_and_methods() {
        let models = vec![Model {
            name: "models/gemini-1.5-flash".into(),
            supported_generation_methods: vec!["generateContent".into(), "countTokens".into()],
            ..Model::default()
        }];
        let out = rendered(|n| n.models_listed(&models));
        assert!(out.contains("  - models/gemini-1.5-flash | Methods: [generateContent, countTokens]"));
    }

    #[test]
    fn generation_ok_without_text_prints_no_response_line() {
        let result = GenerationResult::from_raw(json!({}));
        let out = rendered(|n| n.generation_ok(&result));
        assert!(out.contains("hoạt động bình thường"));
        assert!(!out.contains("📄 Response"));
    }

    #[test]
    fn generation_failed_reports_status_and_body() {
        let err = Error::ApiError {
            status: 404,
            message: "not found".into(),
        };
        let out = rendered(|n| n.generation_failed(&err));
        assert!(out.contains("❌ Lỗi HTTP: 404"));
        assert!(out.contains("📄 Error: not found"));
    }

    #[test]
    fn summary_masks_key() {
        let out = rendered(|n| n.summary(Some("gemini-pro"), "AIzaSyDgmFxM35AawEq5"));
        assert!(out.contains("model: \"gemini-pro\""));
        assert!(out.contains("GEMINI_API_KEY=AIzaSyDgmF..."));
        assert!(!out.contains("AIzaSyDgmFxM35AawEq5"));
    }

    #[test]
    fn summary_failure_points_at_console() {
        let out = rendered(|n| n.summary(None, "key"));
        assert!(out.contains(API_KEY_CONSOLE_URL));
    }
}
