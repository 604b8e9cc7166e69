pub mod board;
pub mod client;
pub mod controller;
