pub mod memory_store;
pub mod json_store;
pub mod console_notifier;
pub mod discord_notifier;
pub mod multi_notifier;
