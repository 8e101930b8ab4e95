use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::Config;

pub fn test_config(url: &str) -> Config {
    Config {
        supabase_url: Some(url.to_string()),
        supabase_key: Some("test-key".to_string()),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

/// Answers exactly one HTTP request with `status` and a JSON `body`.
/// The handle resolves to the raw request head the client sent.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let (url, handle) = serve_sequence(vec![(status, body)]).await;
    let handle = tokio::spawn(async move { handle.await.unwrap().remove(0) });
    (url, handle)
}

/// Answers one request per `(status, body)` pair, in order, on the same
/// address. The handle resolves to every request head received.
pub async fn serve_sequence(
    responses: Vec<(&'static str, &'static str)>,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();

        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            requests.push(String::from_utf8_lossy(&request).into_owned());
        }

        requests
    });

    (url, handle)
}
