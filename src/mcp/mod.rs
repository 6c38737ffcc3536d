//! Model Context Protocol adapter exposing the odds client as tools.

pub mod server;
pub mod tools;

pub use server::OddsMcpServer;
pub use tools::ToolCall;
