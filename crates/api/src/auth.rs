// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role checks for administrative operations.
//!
//! Booking status changes are gated in the core planning step, where the
//! requester/ownership rule lives. The checks here cover the operations
//! that depend on role alone.

use roombook_domain::{User, UserId, UserRole};
use roombook_persistence::BookingRepository;

use crate::error::{ApiError, AuthError, translate_persistence_error};

/// Authorization service for role-gated operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor may create, update, or delete rooms.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is inactive or not an admin.
    pub fn authorize_manage_rooms(actor: &User) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_rooms")
    }

    /// Checks that an actor may import, preview, or export data.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is inactive or not an admin.
    pub fn authorize_data_management(actor: &User) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_data")
    }

    /// Checks that an actor may see the pending approval queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is inactive or cannot review bookings.
    pub fn authorize_review_queue(actor: &User) -> Result<(), AuthError> {
        Self::require_active(actor)?;
        if actor.role.can_review() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("view_pending_approvals"),
                required_role: String::from("APPROVER or ADMIN"),
            })
        }
    }

    fn require_admin(actor: &User, action: &str) -> Result<(), AuthError> {
        Self::require_active(actor)?;
        match actor.role {
            UserRole::Admin => Ok(()),
            UserRole::Member | UserRole::Approver => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from(UserRole::Admin.as_str()),
            }),
        }
    }

    fn require_active(actor: &User) -> Result<(), AuthError> {
        if actor.is_active() {
            Ok(())
        } else {
            Err(AuthError::InactiveAccount {
                username: actor.username.clone(),
            })
        }
    }
}

/// Loads the user acting on a request.
///
/// # Errors
///
/// Returns `ResourceNotFound` if no such user exists, or a persistence
/// error if the lookup fails.
pub async fn resolve_actor(
    repository: &dyn BookingRepository,
    actor_id: UserId,
) -> Result<User, ApiError> {
    repository
        .get_user(actor_id)
        .await
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {actor_id} does not exist"),
        })
}
