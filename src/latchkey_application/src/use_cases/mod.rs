pub mod change_password;
pub mod delete_account;
pub mod find_account;
pub mod signup;
pub mod update_account;
