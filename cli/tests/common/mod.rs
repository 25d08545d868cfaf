use axum::{http::StatusCode, routing::get, Router};

/// Serve a canned repository listing on an ephemeral local port, returns the API base
pub async fn serve(status: u16, body: &'static str) -> String {
    let app = Router::new().route(
        "/users/{user}/repos",
        get(move || async move { (StatusCode::from_u16(status).unwrap(), body) }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    format!("http://{address}")
}
