pub mod account;
pub mod credential;
pub mod email;
pub mod password;
pub mod principal;
pub mod reset_code;
pub mod reset_request;
pub mod session;
