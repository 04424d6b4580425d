// Storage module for tenant attachments on the local filesystem

pub mod local;

pub use local::LocalStorage;
