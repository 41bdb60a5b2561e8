use crate::api::leave::{CreateLeave, LeaveFilter, LeaveListResponse, QuotaQuery, QuotaResponse};
use crate::model::leave_record::LeaveRecord;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave Management Service

This API powers an employee **leave request portal**: users submit leave
requests, check their remaining allowance, and withdraw requests that have
not yet elapsed.

### 🔹 Key Features
- **Leave Requests**
  - Submit a request with a reason and an inclusive date range
  - List your own requests, optionally restricted to one calendar year
  - Withdraw a request whose leave period has not ended yet
- **Quota**
  - Fixed annual allowance of leave days per user
  - Remaining-days lookup per calendar year

### 🔒 Validation Rules
Every submission runs through an ordered rule chain: date parsing, range
order, a two-month advance booking horizon, the annual quota, and overlap
with the user's existing requests. The first failing rule decides the
response.

### 🔐 Security
All leave endpoints require **JWT Bearer authentication**. Requests are
always scoped to the authenticated user; nobody can read or withdraw
another user's leave.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::create_leave,
        crate::api::leave::delete_leave,
        crate::api::leave::leave_quota
    ),
    components(
        schemas(
            CreateLeave,
            LeaveFilter,
            LeaveListResponse,
            QuotaQuery,
            QuotaResponse,
            LeaveRecord
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request and quota APIs"),
    )
)]
pub struct ApiDoc;
