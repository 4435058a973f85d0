pub mod env {
    pub const ENV_PREFIX: &str = "LATCHKEY";
    pub const ENV_SEPARATOR: &str = "__";
    pub const CONFIG_FILE: &str = "config/latchkey";
}

pub mod defaults {
    pub const JWT_TIME_TO_LIVE_IN_SECONDS: i64 = 7 * 24 * 60 * 60;
    pub const HASHER_ITERATIONS: u32 = 3;
    pub const HASHER_MEMORY_IN_KIB: u32 = 19 * 1024;
    pub const HASHER_PARALLELISM: u32 = 1;
    pub const RESET_DURATION_AMOUNT: i64 = 1;
    pub const RESET_MAX_CODE_ATTEMPTS: u32 = 3;
    pub const RESET_RETRY_BACKOFF_IN_MILLIS: u64 = 10;
}

pub mod hashing {
    pub const SALT_LEN: usize = 16;
    pub const MIN_SALT_LEN: usize = 8;
    pub const DIGEST_LEN: usize = 64;
}

pub mod reset {
    pub const CODE_BYTES: usize = 32;
}

pub mod email {
    pub const FORGOT_PASSWORD_SUBJECT: &str = "Reset your password";
    pub const PASSWORD_CHANGED_SUBJECT: &str = "Your password was changed";
    pub const SIGNUP_SUCCESSFUL_SUBJECT: &str = "Welcome!";
}
