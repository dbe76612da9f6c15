// Server module entry point
// Listener creation, connection handling, accept loop and shutdown

pub mod connection;
pub mod listener;
pub mod shutdown;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::{create_listener, listen_addr};
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};
