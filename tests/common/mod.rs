#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pa_agent::api::{AssistantReply, ChatTransport, CompletionOptions, FragmentStream, Reply};
use pa_agent::error::{AgentError, Result};
use pa_agent::models::{Message, ToolCall, Usage};

/// What the agent sent on one transport call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
    pub streaming: bool,
}

/// Scripted transport: replays queued replies in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Reply>>>,
    streams: Mutex<VecDeque<Vec<Result<String>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queue(&self, reply: Result<Reply>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_text(&self, text: &str) {
        self.queue(Ok(text_reply(text)));
    }

    pub fn queue_tool_calls(&self, calls: Vec<ToolCall>) {
        self.queue(Ok(tool_reply(calls)));
    }

    pub fn queue_stream(&self, fragments: Vec<Result<String>>) {
        self.streams.lock().unwrap().push_back(fragments);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn record(&self, messages: &[Message], options: &CompletionOptions, streaming: bool) {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: messages.to_vec(),
            options: options.clone(),
            streaming,
        });
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> Result<Reply> {
        self.record(messages, options, false);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Other("no scripted reply left".to_string())))
    }

    async fn complete_streaming(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<FragmentStream> {
        self.record(messages, options, true);
        let fragments = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Other("no scripted stream left".to_string()))?;
        Ok(Box::pin(stream::iter(fragments)))
    }
}

pub fn text_reply(text: &str) -> Reply {
    Reply {
        message: AssistantReply {
            content: Some(text.to_string()),
            tool_calls: Vec::new(),
        },
        usage: Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        },
        model: Some("test/model".to_string()),
    }
}

pub fn tool_reply(calls: Vec<ToolCall>) -> Reply {
    Reply {
        message: AssistantReply {
            content: None,
            tool_calls: calls,
        },
        usage: Usage {
            prompt_tokens: 20,
            completion_tokens: 8,
            total_tokens: 28,
        },
        model: Some("test/model".to_string()),
    }
}

/// One captured HTTP request.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Minimal HTTP/1.1 server answering every request with one canned response.
pub struct TestServer {
    addr: std::net::SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: tokio::sync::oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start(status: u16, content_type: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let captured = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();

        let response = format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {}",
            status,
            reason(status),
            content_type,
            body.len(),
            body
        );

        let sink = Arc::clone(&captured);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accept = listener.accept() => {
                        if let Ok((mut socket, _)) = accept {
                            let response = response.clone();
                            let sink = Arc::clone(&sink);
                            tokio::spawn(async move {
                                if let Some(request) = read_request(&mut socket).await {
                                    sink.lock().unwrap().push(request);
                                }
                                let _ = socket.write_all(response.as_bytes()).await;
                                let _ = socket.shutdown().await;
                            });
                        }
                    }
                }
            }
        });

        Self {
            addr,
            captured,
            shutdown: shutdown_tx,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/webhook", self.addr)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.await;
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(CapturedRequest { head, body })
}

/// An address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/webhook", addr)
}

/// Server that reads each request, optionally writes `prefix`, then holds the
/// connection open without sending anything more.
pub struct StallingServer {
    addr: std::net::SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl StallingServer {
    pub async fn start(prefix: Option<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let prefix = prefix.clone();
                tokio::spawn(async move {
                    let _ = read_request(&mut socket).await;
                    if let Some(prefix) = prefix {
                        let _ = socket.write_all(prefix.as_bytes()).await;
                        let _ = socket.flush().await;
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                    drop(socket);
                });
            }
        });

        Self { addr, handle }
    }

    /// Response head for a chunked event stream followed by one chunk of `data`.
    pub fn event_stream_prefix(data: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\n\
             Content-Type: text/event-stream\r\n\
             Transfer-Encoding: chunked\r\n\
             \r\n\
             {:x}\r\n{}\r\n",
            data.len(),
            data
        )
    }

    pub fn url(&self) -> String {
        format!("http://{}/webhook", self.addr)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for StallingServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
