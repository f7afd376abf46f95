//! Remote account boundary: the client port plus the process-wide
//! authenticated handle every action goes through.

pub mod client;
pub mod remote;

pub use client::AccountClient;
pub use remote::RemoteAccount;
