//! Wire types for the `DietDash` REST API.
//!
//! Field names follow the wire (camelCase, Mongo-style `_id`), so these
//! types serialize to exactly what the backend emits and accepts.

use serde::{Deserialize, Serialize};

/// A dashboard user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub contact_number: String,
    pub role: String,
    #[serde(default)]
    pub shift_start: String,
    #[serde(default)]
    pub shift_end: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    /// URL of the stored profile picture, when one was uploaded.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Registration payload for `add-user`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl NewUser {
    /// A self-service registration (role `User`).
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: "User".to_owned(),
        }
    }
}

/// Update payload for `update-user`.
///
/// Carries both the target (`_id`) and the acting user (`id`); the backend
/// expects both fields on every update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub email: String,
    /// Omitted when the password is unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: String,
    /// Id of the user performing the update.
    pub id: String,
}

/// Filter state for the user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListQuery {
    /// 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
    /// Search term (empty means unfiltered).
    pub search: String,
    /// Role filter (empty means all roles).
    pub role: String,
    /// Whether to list soft-deleted users.
    pub deleted: bool,
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
            role: String::new(),
            deleted: false,
        }
    }
}

impl UserListQuery {
    /// Request parameters in the order the endpoint expects.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_owned(), self.page.to_string()),
            ("limit".to_owned(), self.limit.to_string()),
            ("search".to_owned(), self.search.clone()),
            ("role".to_owned(), self.role.clone()),
            ("deleted".to_owned(), self.deleted.to_string()),
        ]
    }
}

/// Health profile attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub age: u32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub activity_level: String,
    pub dietary_preferences: String,
    pub health_goals: String,
}

/// Create/update payload for a health profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsInput {
    pub age: u32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub activity_level: String,
    pub dietary_preferences: String,
    pub health_goals: String,
}

/// Meal catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// A meal in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: MealCategory,
    pub dietary_tags: Vec<String>,
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Create/update payload for a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealInput {
    pub name: String,
    pub category: MealCategory,
    pub dietary_tags: Vec<String>,
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// One BMI log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiLog {
    #[serde(rename = "_id")]
    pub id: String,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
}

/// Diet plan periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanPeriod {
    Daily,
    Weekly,
}

/// Meal slots within a diet plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanMealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Summary nutrition for a planned meal slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionalValues {
    pub calories: f64,
    pub proteins: f64,
}

/// One slot of a diet plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub meal_id: String,
    pub meal_type: PlanMealType,
    pub suggested_meals: Vec<String>,
    pub nutritional_values: NutritionalValues,
}

/// A user's diet plan. Display-only data: the dashboard renders plans but
/// the backend exposes no plan endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub period: PlanPeriod,
    pub meals: Vec<PlannedMeal>,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub message: String,
}

/// A page of rows plus the full result-set size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

/// A page of rows wrapped in the `{status, message, data, total}` shape
/// some endpoints use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPage<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

/// A server-reported validation error for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name, as submitted.
    pub path: String,
    /// Human-readable message for that field.
    pub msg: String,
}

/// Outcome of a mutation endpoint: overall status plus either a message or
/// field-level errors the caller maps back onto its form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}
