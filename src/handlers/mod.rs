pub mod subscription;
pub mod todos;
pub mod webhooks;
