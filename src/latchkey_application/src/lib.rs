pub mod authentication;
pub mod authorization;
pub mod credentials;
pub mod password_reset;
pub mod use_cases;


pub use authentication::{AuthenticationService, LoginCredentials, LoginOutcome};
pub use authorization::{
    AuthorizationGuard, live_account, live_admin, require_admin, require_authenticated,
};
pub use password_reset::{ResetPolicy, ResetWorkflowService, read_with_lazy_expiry};
pub use use_cases::{
    change_password::ChangePasswordUseCase, delete_account::DeleteAccountUseCase,
    find_account::FindAccountUseCase,
    signup::{Registration, SignupUseCase},
    update_account::{ProfileUpdate, UpdateAccountUseCase},
};
