//! # Latchkey - Credential & Session Core
//!
//! Facade crate that re-exports the public APIs of the latchkey components:
//! password hashing, signed session tokens, the forgot-password workflow and
//! the per-request authorization guard.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! latchkey = { path = "../latchkey" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Account`, `Email`, `Password`, `ResetRequest`, etc.
//! - **Ports**: `AccountStore`, `ResetRequestStore`, `CredentialHasher`, `TokenService`
//! - **Application services**: `AuthenticationService`, `ResetWorkflowService`,
//!   `AuthorizationGuard` and the account use cases
//! - **Adapters**: `Argon2CredentialHasher`, `JwtTokenService`, in-memory stores
//! - **Service**: `LatchkeyService` - the main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use latchkey_core::*;
}

// Re-export most commonly used core types at the root level
pub use latchkey_core::{
    AccessToken, Account, AccountId, AccountProfile, AuthError, Email, Password, RequestPrincipal,
    ResetCode, ResetRequest, ResetStatus, Role, SessionClaims, StatusClass,
};

// ============================================================================
// Ports
// ============================================================================

/// Repository and service trait definitions
pub mod ports {
    pub use latchkey_core::{
        AccountStore, AccountStoreError, CredentialHasher, EmailClient, HasherError,
        NotificationError, Notifier, ResetCodeGenerator, ResetRequestStore,
        ResetRequestStoreError, TokenError, TokenService,
    };
}

pub use ports::*;

// ============================================================================
// Application Services
// ============================================================================

/// Application services and use cases
pub mod application {
    pub use latchkey_application::*;
}

pub use latchkey_application::{
    AuthenticationService, AuthorizationGuard, ChangePasswordUseCase, DeleteAccountUseCase,
    FindAccountUseCase, LoginCredentials, LoginOutcome, ProfileUpdate, Registration, ResetPolicy,
    ResetWorkflowService, SignupUseCase, UpdateAccountUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use latchkey_adapters::persistence::*;
    }

    /// Email client and notifier implementations
    pub mod email {
        pub use latchkey_adapters::email::*;
    }

    /// Configuration
    pub mod config {
        pub use latchkey_adapters::config::*;
    }

    /// Tracing setup
    pub mod telemetry {
        pub use latchkey_adapters::telemetry::*;
    }
}

pub use latchkey_adapters::{
    Argon2CredentialHasher, EmailNotifier, HashMapAccountStore, HashMapResetRequestStore,
    JwtTokenService, LatchkeySettings, MockEmailClient, RandomResetCodeGenerator,
};

// ============================================================================
// Latchkey Service (Main Entry Point)
// ============================================================================

pub use latchkey_service::{LatchkeyService, ServiceError};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
