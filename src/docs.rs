use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use aress_core::{ErrorResponse, SuccessResponse};
use aress_models::{
    CurrentUser, DeleteUserRequest, Permissions, Profile, Role, SweepReport, UpdateUserDto, UserId,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::admin::controller::delete_user,
        crate::modules::admin::controller::sweep_orphans,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::sync_me,
    ),
    components(
        schemas(
            UserId,
            Role,
            Profile,
            Permissions,
            CurrentUser,
            DeleteUserRequest,
            UpdateUserDto,
            SweepReport,
            SuccessResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Admin", description = "Admin-only user lifecycle operations"),
        (name = "Users", description = "User profiles and roles")
    ),
    info(
        title = "Aress CRM API",
        version = "0.1.0",
        description = "User administration for the Aress CRM, backed by a hosted auth service and Postgres.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
