//! Helpers shared by the HTTP-level tests.

use std::net::SocketAddr;

use axum::Router;

/// Serve `app` on an ephemeral localhost port and return its address.
///
/// The server task lives until the test runtime shuts down.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// Build an OpenRouter-style completion body whose first choice carries `content`.
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "gen-test",
        "model": "deepseek/deepseek-r1:free",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content }
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 30, "total_tokens": 42 }
    })
}
