//! Binds a domain record to its REST surface so handlers and routes can stay generic.

use modkit_db::Listable;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

use crate::api::rest::dto::{
    BiodataDto, CreateBiodataReq, CreateModuleReq, CreateRoleReq, CreateUserReq, ModuleDto,
    RoleDto, UpdateBiodataReq, UpdateModuleReq, UpdateRoleReq, UpdateUserReq, UserDto,
};
use crate::contract::model::{Biodata, Module, Role, User};
use crate::domain::error::DomainError;
use crate::domain::record::Record;
use crate::infra::storage::entity::{biodata, module, role, user};

pub trait RestResource: Record {
    /// Collection path, e.g. `/m-role`.
    const PATH: &'static str;
    const TAG: &'static str;

    type Dto: Serialize + ToSchema + From<Self> + Send + 'static;
    type CreateReq: DeserializeOwned + ToSchema + Send + 'static;
    type UpdateReq: DeserializeOwned + ToSchema + Send + 'static;

    fn new_from(req: Self::CreateReq) -> Result<Self::New, DomainError>;
    fn patch_from(req: Self::UpdateReq) -> Result<Self::Patch, DomainError>;

    /// Names accepted by `_sort` and `_filter`, listed in the API docs.
    fn fields() -> Vec<&'static str>;
}

impl RestResource for Role {
    const PATH: &'static str = "/m-role";
    const TAG: &'static str = "roles";

    type Dto = RoleDto;
    type CreateReq = CreateRoleReq;
    type UpdateReq = UpdateRoleReq;

    fn new_from(req: CreateRoleReq) -> Result<Self::New, DomainError> {
        Ok(req.into())
    }

    fn patch_from(req: UpdateRoleReq) -> Result<Self::Patch, DomainError> {
        Ok(req.into())
    }

    fn fields() -> Vec<&'static str> {
        role::Entity::field_map().names()
    }
}

impl RestResource for Biodata {
    const PATH: &'static str = "/m-biodata";
    const TAG: &'static str = "biodata";

    type Dto = BiodataDto;
    type CreateReq = CreateBiodataReq;
    type UpdateReq = UpdateBiodataReq;

    fn new_from(req: CreateBiodataReq) -> Result<Self::New, DomainError> {
        req.try_into()
    }

    fn patch_from(req: UpdateBiodataReq) -> Result<Self::Patch, DomainError> {
        req.try_into()
    }

    fn fields() -> Vec<&'static str> {
        biodata::Entity::field_map().names()
    }
}

impl RestResource for User {
    const PATH: &'static str = "/m-user";
    const TAG: &'static str = "users";

    type Dto = UserDto;
    type CreateReq = CreateUserReq;
    type UpdateReq = UpdateUserReq;

    fn new_from(req: CreateUserReq) -> Result<Self::New, DomainError> {
        Ok(req.into())
    }

    fn patch_from(req: UpdateUserReq) -> Result<Self::Patch, DomainError> {
        Ok(req.into())
    }

    fn fields() -> Vec<&'static str> {
        user::Entity::field_map().names()
    }
}

impl RestResource for Module {
    const PATH: &'static str = "/m-module";
    const TAG: &'static str = "modules";

    type Dto = ModuleDto;
    type CreateReq = CreateModuleReq;
    type UpdateReq = UpdateModuleReq;

    fn new_from(req: CreateModuleReq) -> Result<Self::New, DomainError> {
        Ok(req.into())
    }

    fn patch_from(req: UpdateModuleReq) -> Result<Self::Patch, DomainError> {
        Ok(req.into())
    }

    fn fields() -> Vec<&'static str> {
        module::Entity::field_map().names()
    }
}
