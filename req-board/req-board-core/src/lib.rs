pub mod record;
pub mod render;
pub mod schema;
pub mod storage;
