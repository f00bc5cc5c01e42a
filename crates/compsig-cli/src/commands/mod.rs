pub mod add_digests;
pub mod canonicalize;
pub mod digest;
pub mod sign;
pub mod verify;
