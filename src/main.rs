use std::process;

use seqsink::{trace, Config, Server};

fn main() {
    trace::init_tracing();

    let err = match Server::start(Config::default()) {
        Ok(server) => match server.run() {
            Ok(never) => match never {},
            Err(err) => err,
        },
        Err(err) => err,
    };

    eprintln!("{}", err);
    process::exit(1);
}
