//! End-to-end diagnostic run.

use std::io::Write;

use genai_probe_types::models::{ListModelsConfig, Model};

use crate::client::Client;
use crate::config::ProbeConfig;
use crate::probe::{list_available_models, probe_models, ApiTester, ProbeSummary};
use crate::report::Narrator;

/// 一次诊断的结果。
#[derive(Debug)]
pub struct DiagnosticReport {
    /// 模型列表；跳过或失败时为 `None`。
    pub models: Option<Vec<Model>>,
    pub probe: ProbeSummary,
}

impl DiagnosticReport {
    #[must_use]
    pub fn working_model(&self) -> Option<&str> {
        self.probe.working_model()
    }
}

/// 列出模型、逐个探测候选模型并输出建议配置。
///
/// 单个请求的失败不会中断流程，总会输出最终总结。
pub async fn run<W: Write + Send>(
    client: &Client,
    config: &ProbeConfig,
    narrator: &mut Narrator<W>,
) -> DiagnosticReport {
    tracing::debug!(
        endpoint = %client.endpoint(),
        candidates = config.candidates.len(),
        "starting diagnostic run"
    );
    narrator.banner();

    let models = if config.list_models {
        narrator.list_section();
        let list_config = ListModelsConfig {
            page_size: config.page_size,
            page_token: None,
        };
        let models_api = client.models();
        list_available_models(&models_api, list_config, narrator).await
    } else {
        None
    };

    narrator.probe_section();
    let mut tester = ApiTester::new(client, config.prompt.clone());
    let probe = probe_models(&mut tester, &config.candidates, narrator).await;

    narrator.summary(probe.working_model(), client.api_key());
    DiagnosticReport { models, probe }
}
