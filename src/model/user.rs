use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Roster entry for one employee, as returned by the roster provider.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "name": "John Doe",
        "phone": "+8801712345678",
        "role": "WH",
        "zone": "RL",
        "outlet": "Outlet 3"
    })
)]
pub struct UserRef {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "WH")]
    pub role: String,

    #[schema(example = "RL", nullable = true)]
    pub zone: Option<String>,

    #[schema(example = "Outlet 3", nullable = true)]
    pub outlet: Option<String>,
}

/// Optional role/group/zone dimensions narrowing a roster query.
///
/// An unset field means "no restriction". Zero matches is not an error; it
/// yields an empty report.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RosterFilter {
    /// Filter by role
    #[param(example = "WH")]
    pub role: Option<String>,
    /// Filter by group
    #[param(example = "WH")]
    pub group: Option<String>,
    /// Filter by zone
    #[param(example = "RL")]
    pub zone: Option<String>,
}
