use genai_probe::Client;

#[tokio::main]
async fn main() -> genai_probe::Result<()> {
    let client = Client::from_env()?;
    for model in client.models().all().await? {
        if model.supports("generateContent") {
            println!("{}", model.name);
        }
    }
    Ok(())
}
