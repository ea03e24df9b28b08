use std::io;
use std::process;

use seqsink::config::DEFAULT_NAME;
use seqsink::payload::{is_sentinel, SENTINEL_LEN};
use seqsink::SeqpacketConn;

const RECORDS: usize = 8;

fn main() -> io::Result<()> {
    let conn = SeqpacketConn::connect(DEFAULT_NAME)?;
    println!("connected to @{}", DEFAULT_NAME);

    let mut buf = vec![0u8; SENTINEL_LEN * 2];
    for i in 0..RECORDS {
        let n = conn.recv(&mut buf)?;
        if n == 0 {
            println!("server closed after {} records", i);
            return Ok(());
        }
        if !is_sentinel(&buf[..n]) {
            eprintln!("record {}: unexpected {} bytes, first byte {:#04x}", i, n, buf[0]);
            process::exit(1);
        }
        println!("record {}: {} bytes ok", i, n);
    }

    Ok(())
}
