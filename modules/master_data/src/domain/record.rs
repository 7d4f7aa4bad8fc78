//! What the generic service needs to know about one master entity.

use std::fmt::Debug;

use crate::contract::model::{
    AuditInfo, Biodata, BiodataPatch, Module, ModulePatch, NewBiodata, NewModule, NewRole,
    NewUser, Password, Role, RolePatch, User, UserPatch,
};
use crate::domain::error::DomainError;
use crate::domain::password;

pub const ROLE_NAME_MAX: usize = 20;
pub const ROLE_CODE_MAX: usize = 20;
pub const FULLNAME_MAX: usize = 255;
pub const MOBILE_PHONE_MAX: usize = 15;
pub const IMAGE_PATH_MAX: usize = 255;
pub const EMAIL_MAX: usize = 100;
pub const PASSWORD_MAX: usize = 128;
pub const MODULE_NAME_MAX: usize = 100;

/// A master row: created from `New`, changed by `Patch`, soft deleted through its audit block.
///
/// `id() == 0` means "not stored yet"; the store assigns ids.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    /// Short lowercase name used in errors and spans.
    const KIND: &'static str;

    type New: Debug + Send + Sync + 'static;
    type Patch: Debug + Send + Sync + 'static;

    fn id(&self) -> i64;
    fn audit(&self) -> &AuditInfo;
    fn audit_mut(&mut self) -> &mut AuditInfo;

    fn validate_new(new: &Self::New) -> Result<(), DomainError>;
    fn validate_patch(patch: &Self::Patch) -> Result<(), DomainError>;

    /// Id the caller asked for, if any.
    fn requested_id(new: &Self::New) -> Option<i64>;

    /// Build the unsaved row. Fails only when a derived value (a password digest) cannot be made.
    fn create(new: Self::New, audit: AuditInfo) -> Result<Self, DomainError>;

    /// Copy the data fields the patch carries. Audit fields are left to the caller.
    fn apply(&mut self, patch: Self::Patch) -> Result<(), DomainError>;

    /// True when the patch asks for the row to be deleted.
    fn patch_deletes(patch: &Self::Patch) -> bool;
}

/* ---------- validation helpers ---------- */

fn required(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(
            field,
            format!("too long: {len} characters (max: {max})"),
        ));
    }
    Ok(())
}

fn text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    required(field, value)?;
    max_len(field, value, max)
}

fn email(value: &str) -> Result<(), DomainError> {
    text("email", value, EMAIL_MAX)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::validation("email", format!("invalid address '{value}'"))),
    }
}

fn secret(value: &Password) -> Result<(), DomainError> {
    // Never echo the value itself in the message.
    if value.expose().is_empty() {
        return Err(DomainError::validation("password", "must not be empty"));
    }
    let len = value.expose().chars().count();
    if len > PASSWORD_MAX {
        return Err(DomainError::validation(
            "password",
            format!("too long: {len} characters (max: {PASSWORD_MAX})"),
        ));
    }
    Ok(())
}

fn non_negative(field: &str, value: i64) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::validation(field, "must not be negative"));
    }
    Ok(())
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/* ---------- role ---------- */

impl Record for Role {
    const KIND: &'static str = "role";
    type New = NewRole;
    type Patch = RolePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }

    fn validate_new(new: &NewRole) -> Result<(), DomainError> {
        text("name", &new.name, ROLE_NAME_MAX)?;
        text("code", &new.code, ROLE_CODE_MAX)?;
        non_negative("level", i64::from(new.level))
    }

    fn validate_patch(patch: &RolePatch) -> Result<(), DomainError> {
        if let Some(name) = &patch.name {
            text("name", name, ROLE_NAME_MAX)?;
        }
        if let Some(code) = &patch.code {
            text("code", code, ROLE_CODE_MAX)?;
        }
        if let Some(level) = patch.level {
            non_negative("level", i64::from(level))?;
        }
        Ok(())
    }

    fn requested_id(new: &NewRole) -> Option<i64> {
        new.id
    }

    fn create(new: NewRole, audit: AuditInfo) -> Result<Self, DomainError> {
        Ok(Self {
            id: 0,
            name: new.name,
            code: new.code,
            level: new.level,
            audit,
        })
    }

    fn apply(&mut self, patch: RolePatch) -> Result<(), DomainError> {
        set(&mut self.name, patch.name);
        set(&mut self.code, patch.code);
        set(&mut self.level, patch.level);
        Ok(())
    }

    fn patch_deletes(patch: &RolePatch) -> bool {
        patch.is_delete == Some(true)
    }
}

/* ---------- biodata ---------- */

impl Record for Biodata {
    const KIND: &'static str = "biodata";
    type New = NewBiodata;
    type Patch = BiodataPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }

    fn validate_new(new: &NewBiodata) -> Result<(), DomainError> {
        text("fullname", &new.fullname, FULLNAME_MAX)?;
        max_len("mobilePhone", &new.mobile_phone, MOBILE_PHONE_MAX)?;
        if let Some(path) = &new.image_path {
            max_len("imagePath", path, IMAGE_PATH_MAX)?;
        }
        Ok(())
    }

    fn validate_patch(patch: &BiodataPatch) -> Result<(), DomainError> {
        if let Some(fullname) = &patch.fullname {
            text("fullname", fullname, FULLNAME_MAX)?;
        }
        if let Some(phone) = &patch.mobile_phone {
            max_len("mobilePhone", phone, MOBILE_PHONE_MAX)?;
        }
        if let Some(path) = &patch.image_path {
            max_len("imagePath", path, IMAGE_PATH_MAX)?;
        }
        Ok(())
    }

    fn requested_id(new: &NewBiodata) -> Option<i64> {
        new.id
    }

    fn create(new: NewBiodata, audit: AuditInfo) -> Result<Self, DomainError> {
        Ok(Self {
            id: 0,
            fullname: new.fullname,
            mobile_phone: new.mobile_phone,
            image: new.image,
            image_path: new.image_path,
            audit,
        })
    }

    fn apply(&mut self, patch: BiodataPatch) -> Result<(), DomainError> {
        set(&mut self.fullname, patch.fullname);
        set(&mut self.mobile_phone, patch.mobile_phone);
        if patch.image.is_some() {
            self.image = patch.image;
        }
        if patch.image_path.is_some() {
            self.image_path = patch.image_path;
        }
        Ok(())
    }

    fn patch_deletes(patch: &BiodataPatch) -> bool {
        patch.is_delete == Some(true)
    }
}

/* ---------- user ---------- */

impl Record for User {
    const KIND: &'static str = "user";
    type New = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }

    fn validate_new(new: &NewUser) -> Result<(), DomainError> {
        email(&new.email)?;
        if let Some(pw) = &new.password {
            secret(pw)?;
        }
        non_negative("loginAttempt", i64::from(new.login_attempt))
    }

    fn validate_patch(patch: &UserPatch) -> Result<(), DomainError> {
        if let Some(addr) = &patch.email {
            email(addr)?;
        }
        if let Some(pw) = &patch.password {
            secret(pw)?;
        }
        if let Some(attempts) = patch.login_attempt {
            non_negative("loginAttempt", i64::from(attempts))?;
        }
        Ok(())
    }

    fn requested_id(new: &NewUser) -> Option<i64> {
        new.id
    }

    fn create(new: NewUser, audit: AuditInfo) -> Result<Self, DomainError> {
        let password = new.password.as_ref().map(password::hash).transpose()?;
        Ok(Self {
            id: 0,
            biodata_id: new.biodata_id,
            role_id: new.role_id,
            email: new.email,
            password,
            login_attempt: new.login_attempt,
            is_locked: new.is_locked,
            last_login: new.last_login,
            audit,
        })
    }

    fn apply(&mut self, patch: UserPatch) -> Result<(), DomainError> {
        if let Some(pw) = &patch.password {
            self.password = Some(password::hash(pw)?);
        }
        if patch.biodata_id.is_some() {
            self.biodata_id = patch.biodata_id;
        }
        if patch.role_id.is_some() {
            self.role_id = patch.role_id;
        }
        set(&mut self.email, patch.email);
        set(&mut self.login_attempt, patch.login_attempt);
        set(&mut self.is_locked, patch.is_locked);
        if patch.last_login.is_some() {
            self.last_login = patch.last_login;
        }
        Ok(())
    }

    fn patch_deletes(patch: &UserPatch) -> bool {
        patch.is_delete == Some(true)
    }
}

/* ---------- module ---------- */

impl Record for Module {
    const KIND: &'static str = "module";
    type New = NewModule;
    type Patch = ModulePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }

    fn validate_new(new: &NewModule) -> Result<(), DomainError> {
        text("name", &new.name, MODULE_NAME_MAX)
    }

    fn validate_patch(patch: &ModulePatch) -> Result<(), DomainError> {
        match &patch.name {
            Some(name) => text("name", name, MODULE_NAME_MAX),
            None => Ok(()),
        }
    }

    fn requested_id(new: &NewModule) -> Option<i64> {
        new.id
    }

    fn create(new: NewModule, audit: AuditInfo) -> Result<Self, DomainError> {
        Ok(Self {
            id: 0,
            name: new.name,
            audit,
        })
    }

    fn apply(&mut self, patch: ModulePatch) -> Result<(), DomainError> {
        set(&mut self.name, patch.name);
        Ok(())
    }

    fn patch_deletes(patch: &ModulePatch) -> bool {
        patch.is_delete == Some(true)
    }
}
