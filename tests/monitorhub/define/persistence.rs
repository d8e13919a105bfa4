use crate::support::DefineDirs;

use monitorhub::monitorhub::define::custom::CustomTemplate;
use monitorhub::monitorhub::define::job::{NameMap, ParamDefine, ParamDefineDoc};
use monitorhub::monitorhub::define::service::TemplateService;
use monitorhub::monitorhub::define::TemplateError;
use serial_test::serial;

fn names(label: &str) -> NameMap {
    NameMap::from([("en-US".to_string(), label.to_string())])
}

fn some_params() -> Vec<ParamDefine> {
    vec![ParamDefine {
        field: "token".to_string(),
        param_type: "password".to_string(),
        name: names("API Token"),
        required: true,
        ..Default::default()
    }]
}

/// Breaks the parameter define directory by replacing it with a plain
/// file, so every subsequent document write fails.
fn sabotage_param_dir(dirs: &DefineDirs) {
    std::fs::remove_dir_all(&dirs.param_dir).expect("remove param dir");
    std::fs::write(&dirs.param_dir, "not a directory").expect("block param dir");
}

#[test]
#[serial]
fn failed_write_surfaces_but_keeps_the_edit_visible() {
    let dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("flaky", names("Flaky"), "test")
        .expect("create");
    sabotage_param_dir(&dirs);

    let err = service
        .set_custom_param_info("flaky", some_params())
        .unwrap_err();
    assert!(matches!(err, TemplateError::Persistence(_)));

    // Write-behind: the accepted edit is already in memory.
    let stored = service.get_param_defines("flaky");
    assert_eq!(stored, some_params());
    let composite = service.get_one_custom_info("flaky").expect("present");
    assert!(composite.params.is_some());
}

#[test]
#[serial]
fn persistence_can_be_retried_without_resubmitting() {
    let dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("flaky", names("Flaky"), "test")
        .expect("create");
    sabotage_param_dir(&dirs);
    assert!(service
        .set_custom_param_info("flaky", some_params())
        .is_err());

    // Repair the deployment, then retry with the already-accepted value.
    std::fs::remove_file(&dirs.param_dir).expect("unblock param dir");
    std::fs::create_dir_all(&dirs.param_dir).expect("restore param dir");

    let accepted = service.get_param_defines("flaky");
    service
        .set_custom_param_info("flaky", accepted)
        .expect("retry succeeds");
    assert!(dirs.param_dir.join("param-flaky.yml").exists());
}

#[test]
#[serial]
fn update_with_broken_param_dir_reports_persistence_error() {
    let dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("flaky", names("Flaky"), "test")
        .expect("create");
    service
        .set_custom_param_info("flaky", some_params())
        .expect("initial attach");
    sabotage_param_dir(&dirs);

    let mut replacement = some_params();
    replacement[0].required = false;
    let err = service
        .update_custom_info(CustomTemplate {
            app: "flaky".to_string(),
            params: Some(ParamDefineDoc {
                app: "flaky".to_string(),
                param: replacement.clone(),
            }),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, TemplateError::Persistence(_)));

    // The in-memory registry already reflects the replacement.
    assert_eq!(service.get_param_defines("flaky"), replacement);
}
