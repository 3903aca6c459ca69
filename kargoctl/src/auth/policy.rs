//! Endpoint access rules.
//!
//! Three audiences exist: couriers (`kurye`), admins, and customer-service
//! staff, who are couriers with the `is_customer_service` flag. Warehouse
//! couriers are couriers without that flag.

use crate::auth::CurrentUser;
use crate::errors::{Error, Result};

fn forbidden() -> Error {
    Error::Forbidden { message: None }
}

/// Field operations: logging barcode batches, exchange cargos.
pub fn ensure_kurye(user: &CurrentUser) -> Result<()> {
    if user.is_kurye() { Ok(()) } else { Err(forbidden()) }
}

/// Destructive office operations.
pub fn ensure_admin(user: &CurrentUser) -> Result<()> {
    if user.is_admin() { Ok(()) } else { Err(forbidden()) }
}

/// Office review screens: batch details, exchange lists, courier dropdown,
/// problem-shipment status changes.
pub fn ensure_admin_or_customer_service(user: &CurrentUser) -> Result<()> {
    if user.is_admin() || user.is_customer_service {
        Ok(())
    } else {
        Err(forbidden())
    }
}

/// Warehouse note entry: couriers only, and customer-service staff record
/// their view through the regular status flow instead.
pub fn ensure_depo(user: &CurrentUser) -> Result<()> {
    if user.is_kurye() && !user.is_customer_service {
        Ok(())
    } else {
        Err(forbidden())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;

    fn user(role: Role, is_customer_service: bool) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "test".to_string(),
            role,
            name: "Test".to_string(),
            is_customer_service,
        }
    }

    #[test]
    fn admin_is_not_a_courier() {
        assert!(ensure_kurye(&user(Role::Kurye, false)).is_ok());
        assert!(ensure_kurye(&user(Role::Admin, false)).is_err());
    }

    #[test]
    fn customer_service_counts_as_office_staff() {
        assert!(ensure_admin_or_customer_service(&user(Role::Admin, false)).is_ok());
        assert!(ensure_admin_or_customer_service(&user(Role::Kurye, true)).is_ok());
        assert!(ensure_admin_or_customer_service(&user(Role::Kurye, false)).is_err());
    }

    #[test]
    fn warehouse_note_excludes_customer_service() {
        assert!(ensure_depo(&user(Role::Kurye, false)).is_ok());
        assert!(ensure_depo(&user(Role::Kurye, true)).is_err());
        assert!(ensure_depo(&user(Role::Admin, false)).is_err());
    }
}
