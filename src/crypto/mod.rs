pub mod fhe;

pub use fhe::{decode, encode, CodecError, FHE_PREFIX};
