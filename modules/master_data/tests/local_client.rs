use anyhow::Result;
use modkit_db::{ConnectOpts, DbHandle};
use page_core::ListQuery;
use tokio_util::sync::CancellationToken;

use master_data::config::MasterDataConfig;
use master_data::contract::{
    error::MasterDataError,
    model::{Module, ModulePatch, NewModule, NewRole, Role},
};
use master_data::MasterData;

async fn ready_module(cfg: &MasterDataConfig) -> Result<MasterData> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
    let module = MasterData::new();
    module.migrate(&db).await?;
    module.init(cfg, &db, CancellationToken::new())?;
    Ok(module)
}

#[tokio::test]
async fn client_is_unavailable_before_init() {
    let module = MasterData::new();
    assert!(module.client::<Role>().is_err());
}

#[tokio::test]
async fn init_rejects_inconsistent_page_sizes() -> Result<()> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
    let cfg = MasterDataConfig {
        default_page_size: 50,
        max_page_size: 10,
        ..Default::default()
    };
    assert!(MasterData::new()
        .init(&cfg, &db, CancellationToken::new())
        .is_err());
    Ok(())
}

#[tokio::test]
async fn local_client_crud() -> Result<()> {
    let module = ready_module(&MasterDataConfig::default()).await?;
    let modules = module.client::<Module>()?;

    let created = modules
        .create(NewModule {
            id: None,
            name: "Dashboard".into(),
        })
        .await?;
    assert!(created.id > 0);
    assert_eq!(created.audit.created_by, 0);

    let renamed = modules
        .update(
            created.id,
            ModulePatch {
                name: Some("Home".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(renamed.name, "Home");
    assert!(renamed.audit.modified_on.is_some());

    let page = modules.list(ListQuery::new()).await?;
    assert_eq!(page.total_elements, 1);

    modules.delete(created.id).await?;
    match modules.get(created.id).await {
        Err(MasterDataError::NotFound { kind, id }) => {
            assert_eq!(kind, "module");
            assert_eq!(id, created.id);
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn local_client_maps_errors_to_the_contract() -> Result<()> {
    let module = ready_module(&MasterDataConfig::default()).await?;
    let roles = module.client::<Role>()?;

    let err = roles
        .create(NewRole {
            name: String::new(),
            code: "X".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MasterDataError::Validation { .. }));

    let err = roles.list(ListQuery::new().with_size(0)).await.unwrap_err();
    assert!(matches!(err, MasterDataError::Validation { .. }));

    let admin = roles
        .create(NewRole {
            name: "Admin".into(),
            code: "ADM".into(),
            level: 1,
            ..Default::default()
        })
        .await?;
    let err = roles
        .create(NewRole {
            id: Some(admin.id),
            name: "Again".into(),
            code: "AGN".into(),
            level: 2,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MasterDataError::Conflict { .. }));
    Ok(())
}

#[tokio::test]
async fn configured_page_size_reaches_the_repository() -> Result<()> {
    let cfg = MasterDataConfig {
        default_page_size: 2,
        max_page_size: 3,
        ..Default::default()
    };
    let module = ready_module(&cfg).await?;
    let roles = module.client::<Role>()?;
    for i in 1..=4 {
        roles
            .create(NewRole {
                name: format!("Role {i}"),
                code: format!("R{i}"),
                level: i,
                ..Default::default()
            })
            .await?;
    }

    assert_eq!(roles.list(ListQuery::new()).await?.size, 2);
    assert_eq!(roles.list(ListQuery::new().with_size(99)).await?.size, 3);
    Ok(())
}
