use chrono::NaiveDateTime;

/// Bookkeeping block carried by every master row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditInfo {
    pub created_by: i64,
    pub created_on: NaiveDateTime,
    pub modified_by: Option<i64>,
    pub modified_on: Option<NaiveDateTime>,
    pub deleted_by: Option<i64>,
    pub deleted_on: Option<NaiveDateTime>,
    pub is_delete: bool,
}

impl AuditInfo {
    pub fn created(actor: i64, at: NaiveDateTime) -> Self {
        Self {
            created_by: actor,
            created_on: at,
            modified_by: None,
            modified_on: None,
            deleted_by: None,
            deleted_on: None,
            is_delete: false,
        }
    }

    pub fn touch(&mut self, actor: i64, at: NaiveDateTime) {
        self.modified_by = Some(actor);
        self.modified_on = Some(at);
    }

    pub fn mark_deleted(&mut self, actor: i64, at: NaiveDateTime) {
        self.deleted_by = Some(actor);
        self.deleted_on = Some(at);
        self.is_delete = true;
    }
}

/* ---------- role ---------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub level: i16,
    pub audit: AuditInfo,
}

/// `id` is only used to detect a duplicate; the store assigns the real one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewRole {
    pub id: Option<i64>,
    pub name: String,
    pub code: String,
    pub level: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RolePatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub level: Option<i16>,
    pub is_delete: Option<bool>,
}

/* ---------- biodata ---------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Biodata {
    pub id: i64,
    pub fullname: String,
    pub mobile_phone: String,
    pub image: Option<Vec<u8>>,
    pub image_path: Option<String>,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBiodata {
    pub id: Option<i64>,
    pub fullname: String,
    pub mobile_phone: String,
    pub image: Option<Vec<u8>>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BiodataPatch {
    pub fullname: Option<String>,
    pub mobile_phone: Option<String>,
    pub image: Option<Vec<u8>>,
    pub image_path: Option<String>,
    pub is_delete: Option<bool>,
}

/* ---------- user ---------- */

/// Plain-text password as submitted by a caller. Hashed before it is stored.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Password(String);

impl Password {
    pub fn new(plain: impl Into<String>) -> Self {
        Self(plain.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored password hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest(***)")
    }
}

/// Login account. The password is kept only as a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub biodata_id: Option<i64>,
    pub role_id: Option<i64>,
    pub email: String,
    pub password: Option<PasswordDigest>,
    pub login_attempt: i32,
    pub is_locked: bool,
    pub last_login: Option<NaiveDateTime>,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub id: Option<i64>,
    pub biodata_id: Option<i64>,
    pub role_id: Option<i64>,
    pub email: String,
    pub password: Option<Password>,
    pub login_attempt: i32,
    pub is_locked: bool,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub biodata_id: Option<i64>,
    pub role_id: Option<i64>,
    pub email: Option<String>,
    pub password: Option<Password>,
    pub login_attempt: Option<i32>,
    pub is_locked: Option<bool>,
    pub last_login: Option<NaiveDateTime>,
    pub is_delete: Option<bool>,
}

/* ---------- module ---------- */

/// Application module (menu entry) a role can be granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: i64,
    pub name: String,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewModule {
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModulePatch {
    pub name: Option<String>,
    pub is_delete: Option<bool>,
}
