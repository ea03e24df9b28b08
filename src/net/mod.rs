pub mod addr;
pub mod conn;
pub mod listener;

pub use addr::abstract_addr;
pub use conn::SeqpacketConn;
pub use listener::SeqpacketListener;
