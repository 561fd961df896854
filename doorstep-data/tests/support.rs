//! One-thread HTTP stub for exercising the adapters end to end.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

/// Directory containing test fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a fixture file into a string.
pub fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"))
}

/// A running stub server.
pub struct StubServer {
    /// `http://127.0.0.1:<port>`.
    pub base_url: String,
    paths: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Request targets received so far, in arrival order.
    pub fn requested_paths(&self) -> Vec<String> {
        self.paths.lock().expect("path log lock").clone()
    }
}

/// Serve every request with `handler(target) -> (status, body)`.
///
/// Connections are handled one at a time and closed after each response.
/// The server thread lives until the test process exits.
pub fn serve<F>(handler: F) -> StubServer
where
    F: Fn(&str) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let address = listener.local_addr().expect("stub server address");
    let paths = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&paths);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(target) = read_target(&mut stream) else {
                continue;
            };
            log.lock().expect("path log lock").push(target.clone());
            let (status, body) = handler(&target);
            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    StubServer {
        base_url: format!("http://{address}"),
        paths,
    }
}

/// Address nothing is listening on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let address = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{address}")
}

fn read_target(stream: &mut impl Read) -> Option<String> {
    let mut head = Vec::new();
    let mut buffer = [0_u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            return None;
        }
        head.extend_from_slice(&buffer[..read]);
    }
    let head = String::from_utf8_lossy(&head);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_owned)
}
