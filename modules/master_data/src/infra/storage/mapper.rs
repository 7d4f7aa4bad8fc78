//! Entity ⇄ contract model conversion; binds each table to its record type.

use sea_orm::{ActiveValue, NotSet, Set};

use crate::contract::model::{AuditInfo, Biodata, Module, PasswordDigest, Role, User};
use crate::infra::storage::entity::{biodata, module, role, user};
use crate::infra::storage::sea_orm_repo::MasterEntity;

/// Audit columns share names across all tables.
macro_rules! audit_from_model {
    ($m:expr) => {
        AuditInfo {
            created_by: $m.created_by,
            created_on: $m.created_on,
            modified_by: $m.modified_by,
            modified_on: $m.modified_on,
            deleted_by: $m.deleted_by,
            deleted_on: $m.deleted_on,
            is_delete: $m.is_delete,
        }
    };
}

/// Expands to the audit fields of an ActiveModel literal.
macro_rules! audit_active {
    ($Active:ident { $($field:ident: $value:expr),* $(,)? }, $a:expr) => {{
        let a: AuditInfo = $a;
        $Active {
            $($field: $value,)*
            created_by: Set(a.created_by),
            created_on: Set(a.created_on),
            modified_by: Set(a.modified_by),
            modified_on: Set(a.modified_on),
            deleted_by: Set(a.deleted_by),
            deleted_on: Set(a.deleted_on),
            is_delete: Set(a.is_delete),
        }
    }};
}

fn id_value(id: i64) -> ActiveValue<i64> {
    if id == 0 {
        NotSet
    } else {
        Set(id)
    }
}

impl MasterEntity for role::Entity {
    type Record = Role;
    type Active = role::ActiveModel;

    fn col_id() -> role::Column {
        role::Column::Id
    }

    fn col_is_delete() -> role::Column {
        role::Column::IsDelete
    }

    fn to_record(m: role::Model) -> Role {
        Role {
            audit: audit_from_model!(m),
            id: m.id,
            name: m.name,
            code: m.code,
            level: m.level,
        }
    }

    fn to_active(r: Role) -> role::ActiveModel {
        use role::ActiveModel;
        audit_active!(
            ActiveModel {
                id: id_value(r.id),
                name: Set(r.name),
                code: Set(r.code),
                level: Set(r.level),
            },
            r.audit
        )
    }
}

impl MasterEntity for biodata::Entity {
    type Record = Biodata;
    type Active = biodata::ActiveModel;

    fn col_id() -> biodata::Column {
        biodata::Column::Id
    }

    fn col_is_delete() -> biodata::Column {
        biodata::Column::IsDelete
    }

    fn to_record(m: biodata::Model) -> Biodata {
        Biodata {
            audit: audit_from_model!(m),
            id: m.id,
            fullname: m.fullname,
            mobile_phone: m.mobile_phone,
            image: m.image,
            image_path: m.image_path,
        }
    }

    fn to_active(b: Biodata) -> biodata::ActiveModel {
        use biodata::ActiveModel;
        audit_active!(
            ActiveModel {
                id: id_value(b.id),
                fullname: Set(b.fullname),
                mobile_phone: Set(b.mobile_phone),
                image: Set(b.image),
                image_path: Set(b.image_path),
            },
            b.audit
        )
    }
}

impl MasterEntity for user::Entity {
    type Record = User;
    type Active = user::ActiveModel;

    fn col_id() -> user::Column {
        user::Column::Id
    }

    fn col_is_delete() -> user::Column {
        user::Column::IsDelete
    }

    fn to_record(m: user::Model) -> User {
        User {
            audit: audit_from_model!(m),
            id: m.id,
            biodata_id: m.biodata_id,
            role_id: m.role_id,
            email: m.email,
            password: m.password.map(PasswordDigest::from_stored),
            login_attempt: m.login_attempt,
            is_locked: m.is_locked,
            last_login: m.last_login,
        }
    }

    fn to_active(u: User) -> user::ActiveModel {
        use user::ActiveModel;
        audit_active!(
            ActiveModel {
                id: id_value(u.id),
                biodata_id: Set(u.biodata_id),
                role_id: Set(u.role_id),
                email: Set(u.email),
                password: Set(u.password.map(PasswordDigest::into_inner)),
                login_attempt: Set(u.login_attempt),
                is_locked: Set(u.is_locked),
                last_login: Set(u.last_login),
            },
            u.audit
        )
    }
}

impl MasterEntity for module::Entity {
    type Record = Module;
    type Active = module::ActiveModel;

    fn col_id() -> module::Column {
        module::Column::Id
    }

    fn col_is_delete() -> module::Column {
        module::Column::IsDelete
    }

    fn to_record(m: module::Model) -> Module {
        Module {
            audit: audit_from_model!(m),
            id: m.id,
            name: m.name,
        }
    }

    fn to_active(m: Module) -> module::ActiveModel {
        use module::ActiveModel;
        audit_active!(
            ActiveModel {
                id: id_value(m.id),
                name: Set(m.name),
            },
            m.audit
        )
    }
}
