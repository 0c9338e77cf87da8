pub mod compositor;
pub mod draw;
pub mod fingerprint;
