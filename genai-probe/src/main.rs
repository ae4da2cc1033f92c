use std::process::ExitCode;

use clap::Parser;
use genai_probe::config::{parse_model_list, ProbeConfig};
use genai_probe::report::Narrator;
use genai_probe::Client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Checks a Gemini API key by listing models and probing candidate models.
#[derive(Debug, Parser)]
#[command(name = "genai-probe", version, about)]
struct Cli {
    /// API key (falls back to GOOGLE_API_KEY when GEMINI_API_KEY is unset)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the API
    #[arg(long, env = "GENAI_BASE_URL")]
    base_url: Option<String>,

    /// API version path segment, e.g. v1beta
    #[arg(long, env = "GENAI_API_VERSION")]
    api_version: Option<String>,

    /// Candidate model to probe; repeat to probe several in order
    #[arg(long = "model", short = 'm', value_name = "MODEL")]
    models: Vec<String>,

    /// Comma-separated candidate models, used when no --model is given
    /// (falls back to GENAI_PROBE_MODELS)
    #[arg(long, value_name = "LIST")]
    model_list: Option<String>,

    /// Prompt sent to each candidate model (falls back to GENAI_PROBE_PROMPT)
    #[arg(long)]
    prompt: Option<String>,

    /// Page size for the models listing
    #[arg(long)]
    page_size: Option<i32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip listing available models
    #[arg(long)]
    skip_list: bool,
}

impl Cli {
    fn client(&self) -> genai_probe::Result<Client> {
        let mut builder = Client::builder();
        if let Some(api_key) = self.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            builder = builder.api_key(api_key);
        }
        if let Some(base_url) = self.base_url.as_deref().filter(|url| !url.trim().is_empty()) {
            builder = builder.base_url(base_url);
        }
        if let Some(version) = self.api_version.as_deref().filter(|v| !v.trim().is_empty()) {
            builder = builder.api_version(version);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.with_env()?.build()
    }

    fn probe_config(&self) -> genai_probe::Result<ProbeConfig> {
        let mut config = ProbeConfig::from_env()?;
        if !self.models.is_empty() {
            config.candidates.clone_from(&self.models);
        } else if let Some(list) = self.model_list.as_deref().filter(|l| !l.trim().is_empty()) {
            config.candidates = parse_model_list(list)?;
        }
        if let Some(prompt) = self.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            config.prompt = prompt.to_string();
        }
        config.list_models = !self.skip_list;
        config.page_size = self.page_size;
        Ok(config)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let setup = cli
        .client()
        .and_then(|client| cli.probe_config().map(|config| (client, config)));
    let (client, config) = match setup {
        Ok(parts) => parts,
        Err(err) => {
            eprintln!("genai-probe: {err}");
            return ExitCode::from(2);
        }
    };

    let mut narrator = Narrator::stdout();
    let report = genai_probe::run(&client, &config, &mut narrator).await;
    if report.working_model().is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
