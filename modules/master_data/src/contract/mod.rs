pub mod client;
pub mod error;
pub mod model;

pub use client::MasterDataApi;
pub use error::MasterDataError;
pub use model::{
    AuditInfo, Biodata, BiodataPatch, Module, ModulePatch, NewBiodata, NewModule, NewRole,
    NewUser, Password, PasswordDigest, Role, RolePatch, User, UserPatch,
};
