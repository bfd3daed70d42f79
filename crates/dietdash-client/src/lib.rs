//! Encrypted HTTP client for the `DietDash` REST API.
//!
//! Every request body travels as a single encrypted envelope, every
//! response body is an envelope opened back into typed data, and the
//! bearer token is attached from an injected session store — except on the
//! configured excluded routes (login, registration), which must work
//! unauthenticated.
//!
//! # Example
//!
//! ```rust,no_run
//! use dietdash_client::{ApiClient, ApiConfig};
//! use dietdash_core::session::SessionStore;
//!
//! # async fn example() -> Result<(), dietdash_client::ApiError> {
//! let session = SessionStore::new();
//! let config = ApiConfig {
//!     secret_key: std::env::var("DIETDASH_SECRET").unwrap_or_default(),
//!     ..ApiConfig::default()
//! };
//! let client = ApiClient::with_config(config, session)?;
//! let auth = client.login("admin@dietdash.io", "hunter22").await?;
//! let users = client.get_all_users(&Default::default()).await?;
//! println!("{} of {} users, logged in as {}", users.data.len(), users.total, auth.user.email);
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
mod error;
mod form;
mod types;

pub use error::ApiError;
pub use form::{FilePart, FormPayload, FormValue};
pub use types::{
    AuthResponse, BmiLog, DietPlan, FieldError, Meal, MealCategory, MealInput, MutationOutcome,
    NewUser, NutritionalValues, Paginated, PlanMealType, PlanPeriod, PlannedMeal, StatusPage,
    User, UserDetails, UserDetailsInput, UserListQuery, UserUpdate,
};

use std::time::Duration;

use dietdash_core::envelope::EnvelopeKey;
use dietdash_core::session::SessionStore;

/// Default API origin (the backend's local dev server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:5555";

/// Fixed per-request timeout. Surfaces as [`ApiError::Timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Routes that never carry a bearer token, regardless of session state.
pub const DEFAULT_EXCLUDED_ROUTES: [&str; 2] = ["/api/user/login", "/api/user/add-user"];

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API origin. Default: `http://localhost:5555`.
    pub base_url: String,
    /// Shared passphrase the envelope key is derived from.
    pub secret_key: String,
    /// Path prefixes that never carry a bearer token. The two built-in
    /// entries cover login and registration; callers add any future
    /// unauthenticated endpoint here instead of the client guessing.
    pub excluded_routes: Vec<String>,
    /// Per-request timeout. Default: 10 seconds.
    pub timeout: Duration,
    /// User-agent header value.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            secret_key: String::new(),
            excluded_routes: DEFAULT_EXCLUDED_ROUTES
                .iter()
                .map(|r| (*r).to_owned())
                .collect(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("dietdash-client/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// The encrypted API client.
///
/// Cheap to clone is not a goal; create one per base URL and share it.
/// All verbs return `Result<T, ApiError>`: success carries the decrypted,
/// typed payload, failure one of the tagged transport errors.
pub struct ApiClient {
    base_url: String,
    excluded_routes: Vec<String>,
    key: EnvelopeKey,
    http: reqwest::Client,
    session: SessionStore,
}
