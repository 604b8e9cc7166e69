pub mod json;

mod tests;
