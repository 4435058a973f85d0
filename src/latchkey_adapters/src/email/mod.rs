pub mod email_notifier;
pub mod mock_email_client;
