use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use propdesk_core::listing::ListResult;
use propdesk_core::permissions::{Action, Resource, Role};

use crate::modules::auth::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
};
use crate::modules::clients::model::{Client, CreateClientDto, UpdateClientDto};
use crate::modules::contracts::model::{Contract, CreateContractDto, UpdateContractDto};
use crate::modules::facilities::model::{CreateFacilityDto, PropertyFacility, UpdateFacilityDto};
use crate::modules::features::model::{CreateFeatureDto, PropertyFeature, UpdateFeatureDto};
use crate::modules::media::model::{
    CreateMediaDto, PropertyMedia, PropertyMediaWithUrl, UpdateMediaDto,
};
use crate::modules::owners::model::{ContactStatus, CreateOwnerDto, Owner, UpdateOwnerDto};
use crate::modules::payments::model::{CreatePaymentDto, Payment, UpdatePaymentDto};
use crate::modules::properties::model::{
    CreatePropertyDto, Property, PropertyStatusDto, UpdatePropertyDto,
};
use crate::modules::reminders::model::{CreateReminderDto, Reminder, UpdateReminderDto};
use crate::modules::role_permissions::model::{
    CreateRolePermissionDto, RolePermission, UpdatePermissionActionsDto,
};
use crate::modules::user_permissions::model::{
    CreateUserPermissionDto, UpdateUserPermissionActionsDto, UserPermission,
};
use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User, UserStatusDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::set_user_status,
        crate::modules::properties::controller::create_property,
        crate::modules::properties::controller::get_properties,
        crate::modules::properties::controller::get_property,
        crate::modules::properties::controller::update_property,
        crate::modules::properties::controller::delete_property,
        crate::modules::properties::controller::set_property_status,
        crate::modules::owners::controller::create_owner,
        crate::modules::owners::controller::get_owners,
        crate::modules::owners::controller::get_owner,
        crate::modules::owners::controller::update_owner,
        crate::modules::owners::controller::delete_owner,
        crate::modules::clients::controller::create_client,
        crate::modules::clients::controller::get_clients,
        crate::modules::clients::controller::get_client,
        crate::modules::clients::controller::update_client,
        crate::modules::clients::controller::delete_client,
        crate::modules::contracts::controller::create_contract,
        crate::modules::contracts::controller::get_contracts,
        crate::modules::contracts::controller::get_contract,
        crate::modules::contracts::controller::update_contract,
        crate::modules::contracts::controller::delete_contract,
        crate::modules::payments::controller::create_payment,
        crate::modules::payments::controller::get_payments,
        crate::modules::payments::controller::get_payment,
        crate::modules::payments::controller::update_payment,
        crate::modules::payments::controller::delete_payment,
        crate::modules::reminders::controller::create_reminder,
        crate::modules::reminders::controller::get_reminders,
        crate::modules::reminders::controller::get_reminder,
        crate::modules::reminders::controller::update_reminder,
        crate::modules::reminders::controller::delete_reminder,
        crate::modules::reminders::controller::notify_due_reminders,
        crate::modules::media::controller::create_media,
        crate::modules::media::controller::get_media_list,
        crate::modules::media::controller::get_media,
        crate::modules::media::controller::update_media,
        crate::modules::media::controller::delete_media,
        crate::modules::features::controller::create_feature,
        crate::modules::features::controller::get_features,
        crate::modules::features::controller::get_feature,
        crate::modules::features::controller::get_feature_by_property,
        crate::modules::features::controller::update_feature,
        crate::modules::features::controller::delete_feature,
        crate::modules::facilities::controller::create_facility,
        crate::modules::facilities::controller::get_facilities,
        crate::modules::facilities::controller::get_facility,
        crate::modules::facilities::controller::get_facility_by_property,
        crate::modules::facilities::controller::update_facility,
        crate::modules::facilities::controller::delete_facility,
        crate::modules::role_permissions::controller::create_role_permission,
        crate::modules::role_permissions::controller::get_role_permissions,
        crate::modules::role_permissions::controller::get_role_permissions_by_role,
        crate::modules::role_permissions::controller::update_role_permission,
        crate::modules::role_permissions::controller::delete_role_permission,
        crate::modules::user_permissions::controller::create_user_permission,
        crate::modules::user_permissions::controller::get_user_permissions,
        crate::modules::user_permissions::controller::get_user_permissions_for_user,
        crate::modules::user_permissions::controller::update_user_permission,
        crate::modules::user_permissions::controller::delete_user_permission,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            UserStatusDto,
            Property,
            CreatePropertyDto,
            UpdatePropertyDto,
            PropertyStatusDto,
            Owner,
            CreateOwnerDto,
            UpdateOwnerDto,
            ContactStatus,
            Client,
            CreateClientDto,
            UpdateClientDto,
            Contract,
            CreateContractDto,
            UpdateContractDto,
            Payment,
            CreatePaymentDto,
            UpdatePaymentDto,
            Reminder,
            CreateReminderDto,
            UpdateReminderDto,
            PropertyMedia,
            PropertyMediaWithUrl,
            CreateMediaDto,
            UpdateMediaDto,
            PropertyFeature,
            CreateFeatureDto,
            UpdateFeatureDto,
            PropertyFacility,
            CreateFacilityDto,
            UpdateFacilityDto,
            RolePermission,
            CreateRolePermissionDto,
            UpdatePermissionActionsDto,
            UserPermission,
            CreateUserPermissionDto,
            UpdateUserPermissionActionsDto,
            Role,
            Resource,
            Action,
            ListResult,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "Back-office user management"),
        (name = "Properties", description = "Property listings"),
        (name = "Owners", description = "Owner contact records"),
        (name = "Clients", description = "Client contact records"),
        (name = "Contracts", description = "Property contracts"),
        (name = "Payments", description = "Payment records"),
        (name = "Reminders", description = "Staff reminders"),
        (name = "Media", description = "Property media"),
        (name = "Features", description = "Property feature records"),
        (name = "Facilities", description = "Property facility records"),
        (name = "Role permissions", description = "Role-level permission table (admin only)"),
        (name = "User permissions", description = "Per-user permission overrides (admin only)")
    ),
    info(
        title = "Propdesk API",
        version = "0.1.0",
        description = "Real-estate back-office REST API built with Rust, Axum, and PostgreSQL, with capability-based authorization per resource and action.",
        contact(
            name = "API Support",
            email = "support@propdesk.io"
        ),
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
