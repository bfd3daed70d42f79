//! Typed operations for every REST endpoint the dashboard consumes.
//!
//! Thin wrappers over the encrypted verbs: each method knows its path, its
//! query shape, and its payload type, nothing else. Ids are percent-encoded
//! into path segments.

use dietdash_core::session::Session;
use dietdash_table::TableQuery;
use serde::Serialize;
use tracing::info;

use crate::form::{FilePart, FormPayload};
use crate::types::{
    AuthResponse, BmiLog, Meal, MealInput, MutationOutcome, NewUser, Paginated, StatusPage, User,
    UserDetails, UserDetailsInput, UserListQuery, UserUpdate,
};
use crate::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Log in and establish a session in the injected store.
    ///
    /// `POST /api/user/login` — excluded route, goes out unauthenticated.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; on failure the session store is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse = self
            .post("/api/user/login", Some(&LoginRequest { email, password }))
            .await?;

        self.session()
            .set(Session::new(
                auth.token.clone(),
                auth.user.id.clone(),
                auth.user.role.clone(),
            ))
            .await;
        info!(user_id = %auth.user.id, "logged in");
        Ok(auth)
    }

    /// Drop the session. Client-side only; the server keeps no state.
    pub async fn logout(&self) {
        self.session().clear().await;
    }

    /// Register a user. `POST /api/user/add-user` — excluded route.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]. Field-level validation problems come back inside
    /// the outcome, not as an error.
    pub async fn add_user(&self, user: &NewUser) -> Result<MutationOutcome, ApiError> {
        self.post("/api/user/add-user", Some(user)).await
    }

    /// Register a user with a profile picture, as a multipart form. Text
    /// fields are sealed one by one; the picture passes through untouched.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn add_user_with_picture(
        &self,
        user: &NewUser,
        picture: FilePart,
    ) -> Result<MutationOutcome, ApiError> {
        let form = FormPayload::new()
            .text("email", user.email.clone())
            .text("password", user.password.clone())
            .text("role", user.role.clone())
            .file("profilePicture", picture);
        self.post_form("/api/user/add-user", form).await
    }

    /// Update a user. `POST /api/user/update-user`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_user(&self, update: &UserUpdate) -> Result<MutationOutcome, ApiError> {
        self.post("/api/user/update-user", Some(update)).await
    }

    /// List users under the given filter. `GET /api/user/getallusers`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_all_users(&self, query: &UserListQuery) -> Result<Paginated<User>, ApiError> {
        self.get("/api/user/getallusers", &query.to_query_pairs())
            .await
    }

    /// Toggle a user's soft-delete flag.
    /// `POST /api/user/delete-user/:id/:deleted`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn set_user_deleted(
        &self,
        user_id: &str,
        deleted: bool,
    ) -> Result<MutationOutcome, ApiError> {
        let path = format!(
            "/api/user/delete-user/{}/{deleted}",
            urlencoding::encode(user_id)
        );
        self.post(&path, None::<&()>).await
    }

    /// Fetch one user. `GET /api/user/getcurrentuser/:id`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_current_user(&self, user_id: &str) -> Result<User, ApiError> {
        let path = format!("/api/user/getcurrentuser/{}", urlencoding::encode(user_id));
        self.get(&path, &[]).await
    }

    /// Fetch a user's health profile. `GET /api/user/get-userdetails/:id`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_user_details(&self, user_id: &str) -> Result<UserDetails, ApiError> {
        let path = format!("/api/user/get-userdetails/{}", urlencoding::encode(user_id));
        self.get(&path, &[]).await
    }

    /// Create the health profile for the logged-in user.
    /// `POST /api/user/create-UserDetails`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn create_user_details(
        &self,
        details: &UserDetailsInput,
    ) -> Result<MutationOutcome, ApiError> {
        self.post("/api/user/create-UserDetails", Some(details))
            .await
    }

    /// Update a health profile. `POST /api/user/update-UserDetails/:id`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_user_details(
        &self,
        user_id: &str,
        details: &UserDetailsInput,
    ) -> Result<MutationOutcome, ApiError> {
        let path = format!(
            "/api/user/update-UserDetails/{}",
            urlencoding::encode(user_id)
        );
        self.post(&path, Some(details)).await
    }

    /// A user's BMI history under the table's view state.
    /// `GET /api/user/bmi-logs/:id?page&limit&search&sortBy&order`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn bmi_logs(
        &self,
        user_id: &str,
        query: &TableQuery,
    ) -> Result<StatusPage<BmiLog>, ApiError> {
        let path = format!("/api/user/bmi-logs/{}", urlencoding::encode(user_id));
        self.get(&path, &query.to_query_pairs()).await
    }

    /// The meal catalog under the table's view state.
    /// `GET /api/user/getmeal`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn get_meals(&self, query: &TableQuery) -> Result<Paginated<Meal>, ApiError> {
        self.get("/api/user/getmeal", &query.to_query_pairs()).await
    }

    /// Add a meal to the catalog. `POST /api/user/add-meals`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn add_meal(&self, meal: &MealInput) -> Result<MutationOutcome, ApiError> {
        self.post("/api/user/add-meals", Some(meal)).await
    }

    /// Update a catalog meal. `POST /api/user/update-meal/:id`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn update_meal(
        &self,
        meal_id: &str,
        meal: &MealInput,
    ) -> Result<MutationOutcome, ApiError> {
        let path = format!("/api/user/update-meal/{}", urlencoding::encode(meal_id));
        self.post(&path, Some(meal)).await
    }
}
