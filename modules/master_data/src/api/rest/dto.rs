use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{
    AuditInfo, Biodata, BiodataPatch, Module, ModulePatch, NewBiodata, NewModule, NewRole,
    NewUser, Password, Role, RolePatch, User, UserPatch,
};
use crate::domain::error::DomainError;

/// `YYYY-MM-DD hh:mm:ss` on the wire; `T` as separator is accepted on input.
pub mod json_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
    }

    pub fn serialize<S: Serializer>(t: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&t.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(t: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
            match t {
                Some(t) => super::serialize(t, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if !raw.trim().is_empty() => {
                    super::parse(&raw).map(Some).map_err(serde::de::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}

/* ---------- audit ---------- */

/// Audit columns, flattened into every record DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditDto {
    pub created_by: i64,
    #[serde(with = "json_time")]
    #[schema(value_type = String, example = "2024-02-16 10:33:10")]
    pub created_on: NaiveDateTime,
    pub modified_by: Option<i64>,
    #[serde(with = "json_time::option", default)]
    #[schema(value_type = Option<String>, example = "2024-02-16 10:33:10")]
    pub modified_on: Option<NaiveDateTime>,
    pub deleted_by: Option<i64>,
    #[serde(with = "json_time::option", default)]
    #[schema(value_type = Option<String>, example = "2024-02-16 10:33:10")]
    pub deleted_on: Option<NaiveDateTime>,
    pub is_delete: bool,
}

impl From<AuditInfo> for AuditDto {
    fn from(a: AuditInfo) -> Self {
        Self {
            created_by: a.created_by,
            created_on: a.created_on,
            modified_by: a.modified_by,
            modified_on: a.modified_on,
            deleted_by: a.deleted_by,
            deleted_on: a.deleted_on,
            is_delete: a.is_delete,
        }
    }
}

/* ---------- role ---------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub level: i16,
    #[serde(flatten)]
    #[schema(inline)]
    pub audit: AuditDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleReq {
    /// Rejected with 409 if a row with this id already exists; never used as the new id.
    pub id: Option<i64>,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub level: i16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleReq {
    pub name: Option<String>,
    pub code: Option<String>,
    pub level: Option<i16>,
    /// `true` soft-deletes the row.
    pub is_delete: Option<bool>,
}

impl From<Role> for RoleDto {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
            code: r.code,
            level: r.level,
            audit: r.audit.into(),
        }
    }
}

impl From<CreateRoleReq> for NewRole {
    fn from(req: CreateRoleReq) -> Self {
        Self {
            id: req.id,
            name: req.name,
            code: req.code,
            level: req.level,
        }
    }
}

impl From<UpdateRoleReq> for RolePatch {
    fn from(req: UpdateRoleReq) -> Self {
        Self {
            name: req.name,
            code: req.code,
            level: req.level,
            is_delete: req.is_delete,
        }
    }
}

/* ---------- biodata ---------- */

/// `image` travels as standard base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiodataDto {
    pub id: i64,
    pub fullname: String,
    pub mobile_phone: String,
    pub image: Option<String>,
    pub image_path: Option<String>,
    #[serde(flatten)]
    #[schema(inline)]
    pub audit: AuditDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBiodataReq {
    pub id: Option<i64>,
    pub fullname: String,
    #[serde(default)]
    pub mobile_phone: String,
    pub image: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBiodataReq {
    pub fullname: Option<String>,
    pub mobile_phone: Option<String>,
    pub image: Option<String>,
    pub image_path: Option<String>,
    pub is_delete: Option<bool>,
}

fn decode_image(image: Option<String>) -> Result<Option<Vec<u8>>, DomainError> {
    image
        .map(|b64| {
            BASE64
                .decode(b64.trim())
                .map_err(|e| DomainError::validation("image", format!("invalid base64: {e}")))
        })
        .transpose()
}

impl From<Biodata> for BiodataDto {
    fn from(b: Biodata) -> Self {
        Self {
            id: b.id,
            fullname: b.fullname,
            mobile_phone: b.mobile_phone,
            image: b.image.map(|bytes| BASE64.encode(bytes)),
            image_path: b.image_path,
            audit: b.audit.into(),
        }
    }
}

impl TryFrom<CreateBiodataReq> for NewBiodata {
    type Error = DomainError;

    fn try_from(req: CreateBiodataReq) -> Result<Self, Self::Error> {
        Ok(Self {
            id: req.id,
            fullname: req.fullname,
            mobile_phone: req.mobile_phone,
            image: decode_image(req.image)?,
            image_path: req.image_path,
        })
    }
}

impl TryFrom<UpdateBiodataReq> for BiodataPatch {
    type Error = DomainError;

    fn try_from(req: UpdateBiodataReq) -> Result<Self, Self::Error> {
        Ok(Self {
            fullname: req.fullname,
            mobile_phone: req.mobile_phone,
            image: decode_image(req.image)?,
            image_path: req.image_path,
            is_delete: req.is_delete,
        })
    }
}

/* ---------- user ---------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub biodata_id: Option<i64>,
    pub role_id: Option<i64>,
    pub email: String,
    pub login_attempt: i32,
    pub is_locked: bool,
    #[serde(with = "json_time::option", default)]
    #[schema(value_type = Option<String>, example = "2024-02-16 10:33:10")]
    pub last_login: Option<NaiveDateTime>,
    #[serde(flatten)]
    #[schema(inline)]
    pub audit: AuditDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserReq {
    pub id: Option<i64>,
    pub biodata_id: Option<i64>,
    pub role_id: Option<i64>,
    pub email: String,
    /// Hashed on arrival; never returned.
    #[serde(default, skip_serializing)]
    #[schema(write_only, format = Password)]
    pub password: Option<String>,
    #[serde(default)]
    pub login_attempt: i32,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(with = "json_time::option", default)]
    #[schema(value_type = Option<String>, example = "2024-02-16 10:33:10")]
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserReq {
    pub biodata_id: Option<i64>,
    pub role_id: Option<i64>,
    pub email: Option<String>,
    /// Replaces the stored digest when present.
    #[serde(default, skip_serializing)]
    #[schema(write_only, format = Password)]
    pub password: Option<String>,
    pub login_attempt: Option<i32>,
    pub is_locked: Option<bool>,
    #[serde(with = "json_time::option", default)]
    #[schema(value_type = Option<String>, example = "2024-02-16 10:33:10")]
    pub last_login: Option<NaiveDateTime>,
    pub is_delete: Option<bool>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            biodata_id: u.biodata_id,
            role_id: u.role_id,
            email: u.email,
            login_attempt: u.login_attempt,
            is_locked: u.is_locked,
            last_login: u.last_login,
            audit: u.audit.into(),
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            id: req.id,
            biodata_id: req.biodata_id,
            role_id: req.role_id,
            email: req.email,
            password: req.password.map(Password::new),
            login_attempt: req.login_attempt,
            is_locked: req.is_locked,
            last_login: req.last_login,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            biodata_id: req.biodata_id,
            role_id: req.role_id,
            email: req.email,
            password: req.password.map(Password::new),
            login_attempt: req.login_attempt,
            is_locked: req.is_locked,
            last_login: req.last_login,
            is_delete: req.is_delete,
        }
    }
}

/* ---------- module ---------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDto {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    #[schema(inline)]
    pub audit: AuditDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleReq {
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModuleReq {
    pub name: Option<String>,
    pub is_delete: Option<bool>,
}

impl From<Module> for ModuleDto {
    fn from(m: Module) -> Self {
        Self {
            id: m.id,
            name: m.name,
            audit: m.audit.into(),
        }
    }
}

impl From<CreateModuleReq> for NewModule {
    fn from(req: CreateModuleReq) -> Self {
        Self {
            id: req.id,
            name: req.name,
        }
    }
}

impl From<UpdateModuleReq> for ModulePatch {
    fn from(req: UpdateModuleReq) -> Self {
        Self {
            name: req.name,
            is_delete: req.is_delete,
        }
    }
}
