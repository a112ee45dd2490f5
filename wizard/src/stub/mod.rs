pub mod catalog;
pub mod server;

pub use server::StubBackend;
