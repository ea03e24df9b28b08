use std::io;
use std::net::Shutdown;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use seqsink::payload::{is_sentinel, SENTINEL_LEN};
use seqsink::{Config, Disconnect, SeqpacketConn, Server};

static NEXT: AtomicUsize = AtomicUsize::new(0);

fn config(tag: &str) -> Config {
    seqsink::trace::init_tracing();
    let name = format!(
        "seqsink-test/{}/{}/{}",
        tag,
        process::id(),
        NEXT.fetch_add(1, Ordering::SeqCst)
    );
    Config::default().with_name(name)
}

/// Starts the server on the calling thread, then serves `cycles` peers on a
/// background thread.
fn spawn(config: Config, cycles: usize) -> (String, JoinHandle<Vec<Disconnect>>) {
    let name = config.name.clone();
    let server = Server::start(config).unwrap();
    let handle = thread::spawn(move || {
        (0..cycles)
            .map(|_| server.serve_next().unwrap())
            .collect()
    });
    (name, handle)
}

fn connect(name: &str) -> SeqpacketConn {
    let conn = SeqpacketConn::connect(name).unwrap();
    conn.get_ref()
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    conn
}

fn recv_record(conn: &SeqpacketConn) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; SENTINEL_LEN * 2];
    let n = conn.recv(&mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

fn closed_by_peer(reason: &Disconnect) -> bool {
    matches!(
        reason,
        Disconnect::EndOfFile | Disconnect::ReadFailed(_) | Disconnect::WriteFailed(_)
    )
}

#[test]
fn sends_identical_records() {
    let (name, server) = spawn(config("records"), 1);

    let client = connect(&name);
    for _ in 0..16 {
        let record = recv_record(&client).unwrap();
        assert_eq!(record.len(), SENTINEL_LEN);
        assert!(is_sentinel(&record));
    }
    drop(client);

    let reasons = server.join().unwrap();
    assert!(closed_by_peer(&reasons[0]), "{:?}", reasons);
}

#[test]
fn orderly_shutdown_is_end_of_file() {
    let (name, server) = spawn(config("eof"), 1);

    let client = connect(&name);
    client.shutdown(Shutdown::Write).unwrap();

    let reasons = server.join().unwrap();
    assert!(matches!(reasons[0], Disconnect::EndOfFile), "{:?}", reasons);

    // whatever was queued before the close is still intact, then end of file
    loop {
        let record = recv_record(&client).unwrap();
        if record.is_empty() {
            break;
        }
        assert!(is_sentinel(&record));
    }
}

#[test]
fn inbound_data_is_not_echoed() {
    let (name, server) = spawn(config("no-echo"), 1);

    let client = connect(&name);
    client.send(b"hello").unwrap();
    client.send(b"0123456789abcdef").unwrap();
    client.send(&[0xAF]).unwrap();

    for _ in 0..32 {
        let record = recv_record(&client).unwrap();
        assert!(is_sentinel(&record), "unexpected record of {} bytes", record.len());
    }

    client.shutdown(Shutdown::Write).unwrap();
    let reasons = server.join().unwrap();
    assert!(matches!(reasons[0], Disconnect::EndOfFile), "{:?}", reasons);
}

#[test]
fn immediate_close_recycles() {
    let (name, server) = spawn(config("recycle"), 2);

    drop(connect(&name));

    let client = connect(&name);
    assert!(is_sentinel(&recv_record(&client).unwrap()));
    client.shutdown(Shutdown::Write).unwrap();

    let reasons = server.join().unwrap();
    assert!(closed_by_peer(&reasons[0]), "{:?}", reasons);
    assert!(matches!(reasons[1], Disconnect::EndOfFile), "{:?}", reasons);
}

#[test]
fn close_with_unread_records_recycles() {
    let (name, server) = spawn(config("unread"), 2);

    let first = connect(&name);
    assert!(is_sentinel(&recv_record(&first).unwrap()));
    // more records are queued by now; closing discards them
    drop(first);

    let second = connect(&name);
    assert!(is_sentinel(&recv_record(&second).unwrap()));
    drop(second);

    let reasons = server.join().unwrap();
    assert!(reasons.iter().all(closed_by_peer), "{:?}", reasons);
}

#[test]
fn second_peer_waits_for_first() {
    let (name, server) = spawn(config("sequential"), 2);

    let first = connect(&name);
    assert!(is_sentinel(&recv_record(&first).unwrap()));

    let second = connect(&name);
    second
        .get_ref()
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    let err = recv_record(&second).unwrap_err();
    assert!(
        matches!(
            err.kind(),
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
        ),
        "{:?}",
        err
    );

    first.shutdown(Shutdown::Write).unwrap();
    drop(first);

    second
        .get_ref()
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    assert!(is_sentinel(&recv_record(&second).unwrap()));
    second.shutdown(Shutdown::Write).unwrap();

    let reasons = server.join().unwrap();
    assert_eq!(reasons.len(), 2);
    assert!(matches!(reasons[1], Disconnect::EndOfFile), "{:?}", reasons);
}

#[test]
fn blocking_mode_writes_until_peer_leaves() {
    let (name, server) = spawn(config("blocking").with_non_blocking(false), 2);

    let first = connect(&name);
    for _ in 0..4 {
        assert!(is_sentinel(&recv_record(&first).unwrap()));
    }
    drop(first);

    let second = connect(&name);
    assert!(is_sentinel(&recv_record(&second).unwrap()));
    drop(second);

    let reasons = server.join().unwrap();
    assert!(
        reasons
            .iter()
            .all(|r| matches!(r, Disconnect::WriteFailed(_))),
        "{:?}",
        reasons
    );
}

#[test]
fn bind_conflict_is_fatal() {
    let config = config("conflict");
    let _server = Server::start(config.clone()).unwrap();

    let err = match Server::start(config) {
        Ok(_) => panic!("second bind succeeded"),
        Err(err) => err,
    };
    assert_eq!(err.op, "bind");
    assert!(err.to_string().starts_with("bind: "));
}
