//! Model listing, single-model checks and the first-match prober.

use std::io::Write;

use futures_util::future::BoxFuture;
use genai_probe_types::models::{ListModelsConfig, Model};

use crate::error::Result;
use crate::models::{GenerationResult, Models};
use crate::report::Narrator;

/// 列出可用模型并输出每个模型的名称与支持的方法。
///
/// 任何失败（非 2xx、网络错误、响应无法解析）都只会被输出，返回 `None`。
pub async fn list_available_models<W: Write>(
    models: &Models,
    config: ListModelsConfig,
    narrator: &mut Narrator<W>,
) -> Option<Vec<Model>> {
    match models.all_with_config(config).await {
        Ok(items) => {
            tracing::debug!(count = items.len(), "listed models");
            narrator.models_listed(&items);
            Some(items)
        }
        Err(err) => {
            tracing::warn!(error = %err, "listing models failed");
            narrator.list_failed(&err);
            None
        }
    }
}

/// 用测试 prompt 调用一个模型，并输出结果。
///
/// HTTP 成功即视为成功，即使响应里没有可提取的文本。
pub async fn test_model<W: Write>(
    models: &Models,
    model: &str,
    prompt: &str,
    api_key: &str,
    narrator: &mut Narrator<W>,
) -> Result<GenerationResult> {
    narrator.testing(model, api_key);
    let result = models.generate_content(model, prompt).await;
    match &result {
        Ok(generation) => narrator.generation_ok(generation),
        Err(err) => {
            tracing::warn!(model, error = %err, "model check failed");
            narrator.generation_failed(err);
        }
    }
    result
}

/// 单个模型检查的抽象，便于在不访问网络的情况下驱动探测流程。
pub trait ModelTester: Send {
    fn test_model<'a, W: Write + Send>(
        &'a mut self,
        model: &'a str,
        narrator: &'a mut Narrator<W>,
    ) -> BoxFuture<'a, Result<GenerationResult>>;
}

/// 通过真实 API 检查模型。
pub struct ApiTester {
    models: Models,
    prompt: String,
    api_key: String,
}

impl ApiTester {
    pub fn new(client: &crate::Client, prompt: impl Into<String>) -> Self {
        Self {
            models: client.models(),
            prompt: prompt.into(),
            api_key: client.api_key().to_string(),
        }
    }
}

impl ModelTester for ApiTester {
    fn test_model<'a, W: Write + Send>(
        &'a mut self,
        model: &'a str,
        narrator: &'a mut Narrator<W>,
    ) -> BoxFuture<'a, Result<GenerationResult>> {
        Box::pin(test_model(
            &self.models,
            model,
            &self.prompt,
            &self.api_key,
            narrator,
        ))
    }
}

/// 一次模型检查的记录。
#[derive(Debug)]
pub struct ProbeAttempt {
    pub model: String,
    pub result: Result<GenerationResult>,
}

impl ProbeAttempt {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// 探测结果：按顺序记录的尝试与第一个可用模型。
#[derive(Debug, Default)]
pub struct ProbeSummary {
    pub attempts: Vec<ProbeAttempt>,
}

impl ProbeSummary {
    /// 第一个检查成功的模型。
    #[must_use]
    pub fn working_model(&self) -> Option<&str> {
        self.attempts
            .iter()
            .find(|attempt| attempt.succeeded())
            .map(|attempt| attempt.model.as_str())
    }

    /// 已尝试的模型，按尝试顺序。
    #[must_use]
    pub fn tried(&self) -> Vec<&str> {
        self.attempts.iter().map(|attempt| attempt.model.as_str()).collect()
    }
}

/// 依次检查候选模型，遇到第一个成功的即停止。
pub async fn probe_models<T, W>(
    tester: &mut T,
    candidates: &[String],
    narrator: &mut Narrator<W>,
) -> ProbeSummary
where
    T: ModelTester,
    W: Write + Send,
{
    let mut summary = ProbeSummary::default();
    if candidates.is_empty() {
        narrator.no_candidates();
        return summary;
    }

    for model in candidates {
        narrator.attempt_started(model);
        let result = tester.test_model(model, narrator).await;
        let success = result.is_ok();
        narrator.attempt_finished(model, success);
        summary.attempts.push(ProbeAttempt {
            model: model.clone(),
            result,
        });
        if success {
            break;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    struct ScriptedTester {
        working: Option<&'static str>,
        calls: Vec<String>,
    }

    impl ModelTester for ScriptedTester {
        fn test_model<'a, W: Write + Send>(
            &'a mut self,
            model: &'a str,
            _narrator: &'a mut Narrator<W>,
        ) -> BoxFuture<'a, Result<GenerationResult>> {
            self.calls.push(model.to_string());
            let works = self.working == Some(model);
            Box::pin(async move {
                if works {
                    Ok(GenerationResult::from_raw(json!({})))
                } else {
                    Err(Error::ApiError {
                        status: 404,
                        message: "not found".into(),
                    })
                }
            })
        }
    }

    fn candidates() -> Vec<String> {
        vec!["first".into(), "second".into(), "third".into()]
    }

    #[tokio::test]
    async fn stops_at_first_working_model() {
        let mut tester = ScriptedTester {
            working: Some("second"),
            calls: Vec::new(),
        };
        let mut narrator = Narrator::new(Vec::new());
        let summary = probe_models(&mut tester, &candidates(), &mut narrator).await;

        assert_eq!(summary.working_model(), Some("second"));
        assert_eq!(tester.calls, vec!["first", "second"]);
        assert_eq!(summary.tried(), vec!["first", "second"]);
        assert!(!summary.attempts[0].succeeded());
    }

    #[tokio::test]
    async fn returns_none_when_all_fail() {
        let mut tester = ScriptedTester {
            working: None,
            calls: Vec::new(),
        };
        let mut narrator = Narrator::new(Vec::new());
        let summary = probe_models(&mut tester, &candidates(), &mut narrator).await;

        assert_eq!(summary.working_model(), None);
        assert_eq!(tester.calls, vec!["first", "second", "third"]);
        let out = String::from_utf8(narrator.into_inner()).unwrap();
        assert!(out.contains("❌ Model third không hoạt động"));
    }

    #[tokio::test]
    async fn empty_candidate_list_makes_no_calls() {
        let mut tester = ScriptedTester {
            working: Some("first"),
            calls: Vec::new(),
        };
        let mut narrator = Narrator::new(Vec::new());
        let summary = probe_models(&mut tester, &[], &mut narrator).await;

        assert!(summary.attempts.is_empty());
        assert!(tester.calls.is_empty());
    }
}
