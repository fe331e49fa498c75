pub mod advisor;
pub mod qr;
pub mod token;
