//! Public academy information.

use serde::Serialize;

use super::{success, ApiResult};
use crate::models::Belt;

/// Name shown across the portal.
pub const ACADEMY_NAME: &str = "Golden Shoto Karate Academy";

#[derive(Debug, Serialize)]
pub struct AcademyInfo {
    pub name: &'static str,
    pub belts: Vec<&'static str>,
}

/// GET /api/academy - Academy name and belt order.
pub async fn get_academy() -> ApiResult<AcademyInfo> {
    success(AcademyInfo {
        name: ACADEMY_NAME,
        belts: Belt::ALL.iter().map(Belt::as_str).collect(),
    })
}

/// GET /api/belts - Belts in progression order.
pub async fn list_belts() -> ApiResult<Vec<Belt>> {
    success(Belt::ALL.to_vec())
}
