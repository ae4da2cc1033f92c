use genai_probe::{Client, Error};

#[tokio::main]
async fn main() -> genai_probe::Result<()> {
    let client = Client::from_env()?;
    let result = client
        .models()
        .generate_content("invalid-model", "hello")
        .await;

    match result {
        Ok(generation) => println!("unexpected success: {:?}", generation.text),
        Err(Error::ApiError { status, message }) => {
            eprintln!("request rejected with status {status}: {message}");
        }
        Err(err) => eprintln!("request failed: {err}"),
    }

    Ok(())
}
