//! The free `generate` function honours environment configuration
//!
//! Lives in its own test binary: it sets process environment variables.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use cadgen::{generate, Complexity, Dialect};
use pretty_assertions::assert_eq;

const REPLY: &str = r#"[{"generated_text": "Sub Pad()\n    part.Update\nEnd Sub"}]"#;

/// Read one HTTP request: headers, then `Content-Length` bytes of body
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve a single JSON reply on a local port
fn serve_once(body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/generate", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        request
    });

    (url, handle)
}

#[test]
fn test_env_endpoint_reaches_free_generate() {
    let (url, server) = serve_once(REPLY);
    std::env::set_var("CADGEN_AI_ENDPOINT", &url);
    std::env::set_var("CADGEN_AI_TIMEOUT_SECS", "5");

    let script = generate("Make a pad", Dialect::Vba, Complexity::Basic, true).unwrap();
    assert_eq!(script, "Sub Pad()\n    part.Update\nEnd Sub");

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /generate"));
    assert!(request.contains("Description: Make a pad"));

    // disabled AI never touches the endpoint and gets no header
    let script = generate("Make a pad", Dialect::Vba, Complexity::Basic, false).unwrap();
    assert!(script.starts_with("Sub CreatePart()"));
}
