use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use latchkey_core::{ResetCode, ResetCodeGenerator};
use rand::RngCore;

use crate::config::constants::reset::CODE_BYTES;

/// URL-safe reset codes drawn from the thread-local CSPRNG.
#[derive(Debug, Clone, Default)]
pub struct RandomResetCodeGenerator;

impl RandomResetCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ResetCodeGenerator for RandomResetCodeGenerator {
    fn generate(&self) -> ResetCode {
        let mut bytes = [0u8; CODE_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        ResetCode::new(URL_SAFE_NO_PAD.encode(bytes))
    }
}
