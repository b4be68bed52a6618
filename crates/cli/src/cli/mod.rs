pub mod commands;
pub mod handler;
pub mod output;

pub use commands::CliArgs;
pub use handler::handle_request;
