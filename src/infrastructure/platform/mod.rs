pub mod clock;
pub mod notifier;
pub mod permissions;
pub mod prompts;
