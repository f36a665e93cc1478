pub mod models;
pub mod pool;
pub mod todos;
pub mod users;
