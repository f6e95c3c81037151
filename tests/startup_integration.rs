//! Process-level behavior of the server binary

use std::process::{Output, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::process::Command;

/// Pipeline-shaped answer ranking "display directory contents" first
const LS_RANKING: &str = r#"{"sequence":"ls","labels":["display directory contents","show command instructions","repeat user input"],"scores":[0.83,0.12,0.05]}"#;

type RequestLog = Arc<Mutex<Vec<String>>>;

/// Serve `LS_RANKING` to every request on an ephemeral local port
async fn spawn_inference_stub() -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = RequestLog::default();

    let seen = requests.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let _ = answer_request(stream, seen).await;
            });
        }
    });

    (format!("http://{}/models", addr), requests)
}

async fn answer_request(mut stream: TcpStream, seen: RequestLog) -> std::io::Result<()> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        raw.extend_from_slice(&chunk[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while raw.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);
    }
    seen.lock().unwrap().push(String::from_utf8_lossy(&raw).into_owned());

    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        LS_RANKING.len(),
        LS_RANKING
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Run the binary against `url`, feed it `input`, and close stdin
async fn run_server(url: &str, input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_omnimind-nlu"))
        .env("NLU_INFERENCE_URL", url)
        .env("HF_API_TOKEN", "test-token")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env("no_proxy", "127.0.0.1,localhost")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input).await.unwrap();
    drop(stdin);

    tokio::time::timeout(Duration::from_secs(60), child.wait_with_output())
        .await
        .expect("server did not exit")
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exit_sentinel_ends_process_with_status_zero() {
    let (url, requests) = spawn_inference_stub().await;

    let output = run_server(&url, b"ls\n__EXIT__\n").await;

    assert_eq!(output.status.code(), Some(0));
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["original_text"], "ls");
    assert_eq!(lines[0]["intent"], "ls");
    assert_eq!(lines[0]["predicted_label"], "display directory contents");
    assert!((lines[0]["confidence"].as_f64().unwrap() - 0.83).abs() < 1e-9);

    // Warm-up plus the one classified line
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests.iter() {
        let lower = request.to_lowercase();
        assert!(lower.starts_with("post /models/facebook/bart-large-mnli "));
        assert!(lower.contains("authorization: bearer test-token"));
        assert!(request.contains(r#""multi_label":false"#));
    }
    assert!(requests[1].contains(r#""inputs":"ls""#));
    assert!(requests[1].contains("display directory contents"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Classifier initialized successfully."));
    assert!(stderr.contains("Shutting down."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_end_of_input_ends_process_with_status_zero() {
    let (url, _requests) = spawn_inference_stub().await;

    let output = run_server(&url, b"ls -la /tmp\n\n").await;

    assert_eq!(output.status.code(), Some(0));
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["arguments_text"], "-la /tmp");
}

#[test]
fn test_unreachable_model_exits_with_status_one() {
    // Nothing listens on the discard port locally, so initialization fails fast
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_omnimind-nlu"))
        .env("NLU_INFERENCE_URL", "http://127.0.0.1:9/models")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env("no_proxy", "127.0.0.1,localhost")
        .env_remove("HF_API_TOKEN")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout must carry protocol output only");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nlu_server"));
    assert!(stderr.contains("HF_API_TOKEN not set"));
    assert!(stderr.contains("Error initializing classifier"));
}
