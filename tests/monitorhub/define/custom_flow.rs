use crate::support::DefineDirs;

use monitorhub::monitorhub::define::custom::CustomTemplate;
use monitorhub::monitorhub::define::job::{Field, Job, Metric, NameMap, ParamDefine, ParamDefineDoc};
use monitorhub::monitorhub::define::service::TemplateService;
use monitorhub::monitorhub::define::TemplateError;
use serial_test::serial;

fn names(label: &str) -> NameMap {
    NameMap::from([("en-US".to_string(), label.to_string())])
}

fn dynamo_schema() -> Job {
    Job {
        app: "dynamo".to_string(),
        category: "db".to_string(),
        name: names("Dynamo"),
        metrics: vec![Metric {
            name: "tables".to_string(),
            protocol: Some("http".to_string()),
            priority: Some(0),
            fields: vec![Field {
                field: "count".to_string(),
                field_type: Some("number".to_string()),
                ..Default::default()
            }],
        }],
    }
}

fn dynamo_params() -> Vec<ParamDefine> {
    vec![
        ParamDefine {
            field: "host".to_string(),
            param_type: "host".to_string(),
            name: names("Target Host"),
            required: true,
            ..Default::default()
        },
        ParamDefine {
            field: "port".to_string(),
            param_type: "number".to_string(),
            name: names("Port"),
            required: true,
            default_value: Some("8000".to_string()),
            range: Some("[0,65535]".to_string()),
            ..Default::default()
        },
    ]
}

#[test]
#[serial]
fn create_is_case_insensitively_unique() {
    let _dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("dynamo", names("Dynamo"), "db")
        .expect("first create succeeds");
    let err = service
        .set_custom_info("Dynamo", names("Dynamo"), "db")
        .unwrap_err();
    assert!(matches!(err, TemplateError::Conflict(_)));

    // A base app identifier is taken too.
    let err = service
        .set_custom_info("Linux", names("Linux"), "os")
        .unwrap_err();
    assert!(matches!(err, TemplateError::Conflict(_)));
}

#[test]
#[serial]
fn create_rejects_empty_identity_fields() {
    let _dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    let err = service
        .set_custom_info("", names("Nameless"), "db")
        .unwrap_err();
    assert!(matches!(err, TemplateError::Invalid(_)));
    let err = service
        .set_custom_info("nameless", NameMap::new(), "db")
        .unwrap_err();
    assert!(matches!(err, TemplateError::Invalid(_)));
}

#[test]
#[serial]
fn facets_require_an_existing_identity() {
    let _dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    let err = service
        .set_custom_param_info("ghost", dynamo_params())
        .unwrap_err();
    assert!(matches!(err, TemplateError::NotFound(_)));
    let err = service
        .set_custom_defined_info("ghost", dynamo_schema())
        .unwrap_err();
    assert!(matches!(err, TemplateError::NotFound(_)));
    let err = service.get_one_custom_info("ghost").unwrap_err();
    assert!(matches!(err, TemplateError::NotFound(_)));
}

#[test]
#[serial]
fn attach_params_persists_the_parameter_document() {
    let dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("dynamo", names("Dynamo"), "db")
        .expect("create");
    service
        .set_custom_param_info("dynamo", dynamo_params())
        .expect("attach params");

    assert_eq!(service.get_param_defines("DYNAMO").len(), 2);

    let written = std::fs::read_to_string(dirs.param_dir.join("param-dynamo.yml"))
        .expect("parameter document written");
    let doc: serde_yaml::Value = serde_yaml::from_str(&written).expect("valid yaml");
    assert_eq!(
        doc.get("app").and_then(serde_yaml::Value::as_str),
        Some("dynamo")
    );
    let params = doc
        .get("param")
        .and_then(serde_yaml::Value::as_sequence)
        .expect("param list");
    assert_eq!(params.len(), 2);
    let port = params[1].as_mapping().expect("port entry");
    assert_eq!(
        port.get(serde_yaml::Value::String("defaultValue".to_string()))
            .and_then(serde_yaml::Value::as_str),
        Some("8000")
    );
    assert_eq!(
        port.get(serde_yaml::Value::String("range".to_string()))
            .and_then(serde_yaml::Value::as_str),
        Some("[0,65535]")
    );

    // The schema document is untouched by a params-only edit.
    assert!(!dirs.app_dir.join("app-dynamo.yml").exists());
}

#[test]
#[serial]
fn params_without_a_schema_surface_in_i18n_resources() {
    let _dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("dynamo", names("Dynamo"), "db")
        .expect("create");
    service
        .set_custom_param_info("dynamo", dynamo_params())
        .expect("attach params");

    // No schema facet attached yet; the parameter labels must still
    // appear in the resource map.
    let resources = service.get_i18n_resources("en-US");
    assert_eq!(
        resources
            .get("monitor.app.dynamo.param.host")
            .map(String::as_str),
        Some("Target Host")
    );
    assert_eq!(
        resources
            .get("monitor.app.dynamo.param.port")
            .map(String::as_str),
        Some("Port")
    );
}

#[test]
#[serial]
fn attach_schema_keys_the_document_by_the_template_identity() {
    let dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("dynamo", names("Dynamo"), "db")
        .expect("create");
    let mut stray = dynamo_schema();
    stray.app = "somethingelse".to_string();
    service
        .set_custom_defined_info("dynamo", stray)
        .expect("attach schema");

    // The schema lands under the addressed app, not the one named
    // inside the submitted document.
    let job = service.get_app_define("dynamo").expect("registered");
    assert_eq!(job.app, "dynamo");
    let err = service.get_app_define("somethingelse").unwrap_err();
    assert!(matches!(err, TemplateError::NotFound(_)));
    let composite = service.get_one_custom_info("dynamo").expect("present");
    assert_eq!(composite.define.as_ref().map(|d| d.app.as_str()), Some("dynamo"));

    assert!(dirs.app_dir.join("app-dynamo.yml").exists());
    assert!(!dirs.app_dir.join("app-somethingelse.yml").exists());
}

#[test]
#[serial]
fn all_custom_info_lists_every_composite_sorted_by_app() {
    let _dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("dynamo", names("Dynamo"), "db")
        .expect("create");
    service
        .set_custom_info("aerospike", names("Aerospike"), "db")
        .expect("create");

    let all = service.get_all_custom_info();
    let apps: Vec<&str> = all.iter().map(|t| t.app.as_str()).collect();
    // Seeded base composites and fresh creates, ordered by app id.
    assert_eq!(apps, vec!["aerospike", "dynamo", "linux"]);
    let linux = all.iter().find(|t| t.app == "linux").expect("seeded");
    assert!(linux.define.is_some());
    let dynamo = all.iter().find(|t| t.app == "dynamo").expect("created");
    assert!(dynamo.define.is_none());
}

#[test]
#[serial]
fn attach_schema_persists_both_documents() {
    let dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("dynamo", names("Dynamo"), "db")
        .expect("create");
    service
        .set_custom_param_info("dynamo", dynamo_params())
        .expect("attach params");
    service
        .set_custom_defined_info("dynamo", dynamo_schema())
        .expect("attach schema");

    // The schema facet now serves reads and the metric index.
    let names = service.get_metric_names(Some("dynamo")).expect("registered");
    assert_eq!(names, vec!["tables"]);

    let schema = std::fs::read_to_string(dirs.app_dir.join("app-dynamo.yml"))
        .expect("schema document written");
    let doc: serde_yaml::Value = serde_yaml::from_str(&schema).expect("valid yaml");
    let metrics = doc
        .get("metrics")
        .and_then(serde_yaml::Value::as_sequence)
        .expect("metrics section");
    assert_eq!(
        metrics[0].get("protocol").and_then(serde_yaml::Value::as_str),
        Some("http")
    );

    // The paired parameter document is rewritten to stay consistent.
    assert!(dirs.param_dir.join("param-dynamo.yml").exists());
}

#[test]
#[serial]
fn update_replaces_supplied_facets_and_keeps_the_rest() {
    let _dirs = DefineDirs::seeded();
    let service = TemplateService::bootstrap().expect("bootstrap succeeds");

    service
        .set_custom_info("dynamo", names("Dynamo"), "db")
        .expect("create");
    service
        .set_custom_param_info("dynamo", dynamo_params())
        .expect("attach params");
    service
        .set_custom_defined_info("dynamo", dynamo_schema())
        .expect("attach schema");

    let mut replacement = dynamo_schema();
    replacement.metrics[0].name = "tables_v2".to_string();
    service
        .update_custom_info(CustomTemplate {
            app: "dynamo".to_string(),
            define: Some(replacement),
            params: None,
            ..Default::default()
        })
        .expect("update succeeds");

    let names = service.get_metric_names(Some("dynamo")).expect("registered");
    assert_eq!(names, vec!["tables_v2"]);
    // The untouched parameter facet survives the update.
    let composite = service.get_one_custom_info("dynamo").expect("present");
    let doc: &ParamDefineDoc = composite.params.as_ref().expect("params kept");
    assert_eq!(doc.param.len(), 2);
}
