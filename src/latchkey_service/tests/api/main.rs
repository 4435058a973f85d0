mod accounts;
mod audit_log;
mod helpers;
mod login;
mod password_reset;
