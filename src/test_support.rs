//! Loopback HTTP responders used to exercise the real clients.

use std::{
    io::{BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    sync::mpsc::{self, Receiver},
    thread,
    time::Duration,
};

use crate::config::Config;

/// Canned answer written back to the first connection.
pub struct Reply {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: &'static str,
    /// Content-Length larger than `body` plus a pause leaves the body unfinished.
    pub stall: Option<(usize, Duration)>,
}

impl Reply {
    pub fn json(status: &'static str, body: &'static str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
            stall: None,
        }
    }
}

/// Serves one request and hands the raw request text back to the test.
pub fn serve_once(reply: Reply) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let request = read_request(&stream);
        let _ = tx.send(request);

        let declared = reply.stall.map_or(reply.body.len(), |(len, _)| len);
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            reply.status, reply.content_type, declared
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(reply.body.as_bytes());
        let _ = stream.flush();
        if let Some((_, pause)) = reply.stall {
            thread::sleep(pause);
        }
    });

    (url, rx)
}

fn read_request(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request = String::new();
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
        let end_of_head = line == "\r\n";
        request.push_str(&line);
        if end_of_head {
            break;
        }
    }
    let mut body = vec![0; content_length];
    if reader.read_exact(&mut body).is_ok() {
        request.push_str(&String::from_utf8_lossy(&body));
    }
    request
}

/// URL of a loopback port nobody listens on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn config(endpoint: &str, telegram_api_url: &str) -> Config {
    Config {
        practicum_token: "y0_token".into(),
        telegram_token: "123:abc".into(),
        telegram_chat_id: "42".into(),
        retry_period: Duration::from_secs(1),
        endpoint: endpoint.into(),
        telegram_api_url: telegram_api_url.into(),
        request_timeout: Duration::from_secs(1),
        lookback: Duration::ZERO,
    }
}
