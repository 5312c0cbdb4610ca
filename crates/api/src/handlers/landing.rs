//! Navigation hub served at `/`.

use axum::Json;
use serde::Serialize;

use crate::response::DataResponse;

/// One destination on the landing page.
#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    /// Front-end route.
    pub href: &'static str,
    /// API endpoint backing the page.
    pub api: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Landing {
    pub name: &'static str,
    pub version: &'static str,
    pub links: &'static [NavLink],
}

const LINKS: &[NavLink] = &[
    NavLink {
        label: "Sign in",
        href: "/auth",
        api: "/api/v1/auth/login",
    },
    NavLink {
        label: "Submit a complaint",
        href: "/complaints",
        api: "/api/v1/complaints",
    },
    NavLink {
        label: "Track a complaint",
        href: "/track",
        api: "/api/v1/track/{ticket}",
    },
    NavLink {
        label: "Admin dashboard",
        href: "/admin",
        api: "/api/v1/admin/complaints",
    },
];

/// GET / -- static, needs no session.
pub async fn landing() -> Json<DataResponse<Landing>> {
    Json(DataResponse {
        data: Landing {
            name: "Complaint Desk",
            version: env!("CARGO_PKG_VERSION"),
            links: LINKS,
        },
    })
}
