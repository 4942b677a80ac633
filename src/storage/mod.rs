//! Local artifacts produced by a login: the QR code image and the credentials file.

pub mod credentials;
pub mod qr;

pub use credentials::{load_credentials, save_credentials};
