use httpclient::{with_header, with_json, Client};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let url = std::env::var("HTTPCLIENT_DEMO_URL")
        .unwrap_or_else(|_| "https://httpbin.org/post".to_owned());
    let client = Client::from_env()?;

    let mut request = client.post(
        url,
        [
            with_header("Accept", "application/json"),
            with_json(&json!({"name": "Kit", "tags": ["demo"]})),
        ],
    );

    let result = request.execute().await;
    if let Some(head) = request.last_response() {
        println!("status: {}", head.status);
    }
    let body = result?;
    println!("{} bytes", body.len());
    println!("{}", String::from_utf8_lossy(&body));

    Ok(())
}
