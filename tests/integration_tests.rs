//! Integration tests for the roleplay chat client.
//! Each test stands up a one-shot HTTP server on localhost.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use roleplay_chat::chat::{RESPONSE_UNAVAILABLE, RecordingNavigator, RoleplaySession, Update};
    use roleplay_chat::{Catalog, ChatRequest, HistoryEntry, HttpChatClient, Topic};

    /// Serves a single response and hands back the raw request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/api/chat", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        });
        (endpoint, handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = content_length(&text[..end]);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    fn content_length(headers: &str) -> usize {
        headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse().ok())
            .unwrap_or(0)
    }

    fn request_body(raw: &str) -> Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_successful_reply() {
        let (endpoint, server) = serve_once("200 OK", r#"{"reply": "Welcome"}"#).await;
        let client = HttpChatClient::new(Some(endpoint)).unwrap();

        let reply = client
            .send(&ChatRequest::initialize("TopicA - SubA"))
            .await
            .unwrap();
        assert_eq!(reply.reply, "Welcome");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/chat HTTP/1.1\r\n"));
        assert_eq!(
            request_body(&raw),
            json!({"topic": "TopicA - SubA", "userMessage": "", "messages": ""})
        );
    }

    #[tokio::test]
    async fn test_message_body() {
        let (endpoint, server) = serve_once("200 OK", r#"{"reply": "Sure."}"#).await;
        let client = HttpChatClient::new(Some(endpoint)).unwrap();
        let request = ChatRequest::new("TopicA - SubA", "hi", "🤖: Welcome\n🧑: hi");
        client.send(&request).await.unwrap();
        assert_eq!(
            request_body(&server.await.unwrap()),
            json!({
                "topic": "TopicA - SubA",
                "userMessage": "hi",
                "messages": "🤖: Welcome\n🧑: hi"
            })
        );
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let (endpoint, server) = serve_once("200 OK", "<html>oops</html>").await;
        let client = HttpChatClient::new(Some(endpoint)).unwrap();
        let err = client
            .send(&ChatRequest::initialize("A - a"))
            .await
            .unwrap_err();
        assert!(err.is_serialization(), "{err}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_reply_field() {
        let (endpoint, server) = serve_once("200 OK", r#"{"message": "hello"}"#).await;
        let client = HttpChatClient::new(Some(endpoint)).unwrap();
        let err = client
            .send(&ChatRequest::initialize("A - a"))
            .await
            .unwrap_err();
        assert!(err.is_serialization(), "{err}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let (endpoint, server) =
            serve_once("500 Internal Server Error", r#"{"error": "model down"}"#).await;
        let client = HttpChatClient::new(Some(endpoint)).unwrap();
        let err = client
            .send(&ChatRequest::initialize("A - a"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/api/chat", listener.local_addr().unwrap());
        drop(listener);

        let client = HttpChatClient::new(Some(endpoint)).unwrap();
        let err = client
            .send(&ChatRequest::initialize("A - a"))
            .await
            .unwrap_err();
        assert!(err.is_connection(), "{err}");
    }

    #[tokio::test]
    async fn test_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/api/chat", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client =
            HttpChatClient::with_options(Some(endpoint), Some(Duration::from_millis(200))).unwrap();
        let err = client
            .send(&ChatRequest::initialize("A - a"))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "{err}");
        server.abort();
    }

    #[tokio::test]
    async fn test_session_over_http() {
        let (endpoint, server) = serve_once("200 OK", r#"{"reply": "Hello, how can I help?"}"#).await;
        let catalog = Arc::new(
            Catalog::from_topics(vec![Topic::new("Hotel", None, ["Check in"])]).unwrap(),
        );
        let client = HttpChatClient::new(Some(endpoint)).unwrap();
        let mut session = RoleplaySession::new(client, RecordingNavigator::new(), catalog);

        session.select_topic("Hotel").unwrap();
        session.select_subtopic("Check in").unwrap();
        assert_eq!(session.next_completion().await, Some(Update::Replied));
        assert_eq!(
            session.state().history(),
            &[
                HistoryEntry::notice("You selected: Hotel - Check in"),
                HistoryEntry::assistant("Hello, how can I help?"),
            ]
        );
        server.await.unwrap();

        // The one-shot server is gone, so the next send fails and is shown inline.
        assert!(session.submit("I have a reservation.").unwrap());
        assert_eq!(session.next_completion().await, Some(Update::Failed));
        assert_eq!(
            session.state().history().last(),
            Some(&HistoryEntry::error(RESPONSE_UNAVAILABLE))
        );
    }
}
