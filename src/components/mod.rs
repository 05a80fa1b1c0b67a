pub mod network;
pub mod typing;
