mod common;

use std::time::Duration;

use artemis::protocol::ConnectionLimits;
use artemis::AnalyticEphemeris;
use common::{EmptyEphemeris, GridEphemeris, TestServer};
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::test]
async fn test_moon_phase_reply_format() {
    let server = TestServer::start(AnalyticEphemeris::new()).await;
    let shape = Regex::new(r"^\d+\.\d{10}\n\.\n$").unwrap();

    for request in ["MoonPhaseReal\n", "MoonPhaseMOO\n"] {
        let reply = server.request(request.as_bytes()).await;
        assert!(shape.is_match(&reply), "{request:?} → {reply:?}");

        let degrees: f64 = reply.lines().next().unwrap().parse().unwrap();
        assert!((0.0..360.0).contains(&degrees));
    }
}

#[tokio::test]
async fn test_unknown_command_is_exact() {
    let server = TestServer::start(GridEphemeris::default()).await;
    assert_eq!(server.request(b"Frobnicate\n").await, "UnknownCommand\n.\n");
    assert_eq!(server.request(b"moonphasereal\n").await, "UnknownCommand\n.\n");
    assert_eq!(server.request(b"\n").await, "UnknownCommand\n.\n");
}

#[tokio::test]
async fn test_malformed_bytes() {
    let server = TestServer::start(GridEphemeris::default()).await;
    assert_eq!(server.request(b"Moon\xffPhase\n").await, "BadCommand\n.\n");
}

#[tokio::test]
async fn test_trailing_whitespace_and_missing_newline() {
    let server = TestServer::start(GridEphemeris::default()).await;
    let with_crlf = server.request(b"SunRiseSetReal \r\n").await;
    let bare = server.request(b"SunRiseSetReal").await;

    let shape = Regex::new(r"^(-?\d+\n){4}\.\n$").unwrap();
    assert!(shape.is_match(&with_crlf), "{with_crlf:?}");
    assert!(shape.is_match(&bare), "{bare:?}");
}

#[tokio::test]
async fn test_only_first_line_is_served() {
    let server = TestServer::start(GridEphemeris::default()).await;
    let reply = server.request(b"Frobnicate\nMoonPhaseReal\n").await;
    assert_eq!(reply, "UnknownCommand\n.\n");
}

#[tokio::test]
async fn test_every_command_answers() {
    let server = TestServer::start(GridEphemeris::default()).await;
    let eclipse = Regex::new(r"^\d+\n(Penumbral|Partial|Total)\n\.\n$").unwrap();
    let eclipse_pair =
        Regex::new(r"^\d+\n(Penumbral|Partial|Total)\n\d+\n(Penumbral|Partial|Total)\n\.\n$")
            .unwrap();
    let rise_set = Regex::new(r"^(\d+\n){4}\.\n$").unwrap();

    for (request, shape) in [
        ("NearestLunarEclipseReal", &eclipse),
        ("NearestLunarEclipseMOO", &eclipse),
        ("LunarEclipsesReal", &eclipse_pair),
        ("LunarEclipsesMOO", &eclipse_pair),
        ("SunRiseSetReal", &rise_set),
        ("SunRiseSetMOO", &rise_set),
        ("MoonRiseSetReal", &rise_set),
        ("MoonRiseSetMOO", &rise_set),
    ] {
        let reply = server.request(format!("{request}\n").as_bytes()).await;
        // a world instant landing on Feb 29 legitimately answers BadValue
        assert!(
            shape.is_match(&reply) || reply == "BadValue\n.\n",
            "{request} → {reply:?}"
        );
    }
}

#[tokio::test]
async fn test_nothing_found_is_bad_value() {
    let server = TestServer::start(EmptyEphemeris).await;
    for request in ["LunarEclipsesReal\n", "NearestLunarEclipseMOO\n", "MoonRiseSetReal\n"] {
        assert_eq!(server.request(request.as_bytes()).await, "BadValue\n.\n");
    }
}

#[tokio::test]
async fn test_silent_client_does_not_block_others() {
    let limits = ConnectionLimits {
        timeout: Some(Duration::from_millis(300)),
        ..Default::default()
    };
    let server = TestServer::start_with_limits(GridEphemeris::default(), limits).await;

    // holds its connection open without sending anything
    let mut idle = TcpStream::connect(server.addr).await.unwrap();

    assert_eq!(server.request(b"Frobnicate\n").await, "UnknownCommand\n.\n");

    // the idle connection is dropped at the deadline, without a reply
    let mut received = Vec::new();
    let n = tokio::time::timeout(Duration::from_secs(5), idle.read_to_end(&mut received))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_client_closing_early_is_survived() {
    let server = TestServer::start(GridEphemeris::default()).await;

    let mut quitter = TcpStream::connect(server.addr).await.unwrap();
    quitter.shutdown().await.unwrap();
    drop(quitter);

    assert_eq!(server.request(b"Frobnicate\n").await, "UnknownCommand\n.\n");
}

#[tokio::test]
async fn test_concurrent_connections() {
    let server = TestServer::start(GridEphemeris::default()).await;

    let replies = request_concurrently(&server, 16).await;
    assert!(replies.iter().all(|reply| reply == "UnknownCommand\n.\n"));
}

async fn request_concurrently(server: &TestServer, n: usize) -> Vec<String> {
    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..n {
        let addr = server.addr;
        tasks.spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"Frobnicate\n").await.unwrap();
            let mut reply = String::new();
            stream.read_to_string(&mut reply).await.unwrap();
            reply
        });
    }
    tasks.join_all().await
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = TestServer::start(GridEphemeris::default()).await;
    let addr = server.addr;
    assert!(server.shutdown().await.is_ok());

    // the listener socket is closed with the accept loop
    assert!(TcpStream::connect(addr).await.is_err());
}
