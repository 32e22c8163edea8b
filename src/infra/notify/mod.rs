pub mod webhook_notifier;
