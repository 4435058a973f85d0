pub mod hashmap_account_store;
pub mod hashmap_reset_request_store;
