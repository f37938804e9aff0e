//! Integration tests for the control bus deployment client

use controlbus_client::{
    run_deployment, ArtifactRef, ArtifactScope, BuildInputs, ClientBuilder, Credentials,
    DeployConfig, DeployError, Deployer, DeploymentWarning, ResolutionWarning,
};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "01234567890012345678901234567890123456789012345";

fn config_for(server: &MockServer) -> DeployConfig {
    let mut config = DeployConfig {
        credentials: Credentials::new("deployer", "secret"),
        ..Default::default()
    };
    config.control_bus.host = "127.0.0.1".to_string();
    config.control_bus.port = server.address().port();
    config
}

async fn mount_auth(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_string(r#"{:username "deployer" :password "secret"}"#))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_primary_artifact_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let err = run_deployment(&config, BuildInputs::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Configuration(_)));
    assert_eq!(err.error_code(), "CONTROLBUS_CONFIG_ERROR");
}

#[tokio::test]
async fn test_authenticate_returns_exact_token() {
    let mock_server = MockServer::start().await;
    mount_auth(&mock_server, 201, &format!("{{:token \"{TOKEN}\"}}")).await;

    let client = ClientBuilder::default()
        .base_url(mock_server.uri())
        .build()
        .unwrap();
    let token = client
        .authenticate(&Credentials::new("deployer", "secret"))
        .await
        .unwrap();

    assert_eq!(token.as_str(), TOKEN);
}

#[tokio::test]
async fn test_rejected_credentials_stop_before_deploy() {
    let mock_server = MockServer::start().await;
    mount_auth(&mock_server, 403, "bad credentials").await;

    Mock::given(method("POST"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = config_for(&mock_server);
    config.build.output_directory = Some(dir.path().to_path_buf());

    let err = run_deployment(&config, BuildInputs::default())
        .await
        .unwrap_err();

    assert!(err.is_remote());
    assert!(err.to_string().contains("bad credentials"));
    assert!(matches!(err, DeployError::Authentication { .. }));
}

#[tokio::test]
async fn test_full_deployment_succeeds() {
    let mock_server = MockServer::start().await;
    mount_auth(&mock_server, 201, &format!("{{:token \"{TOKEN}\"}}")).await;

    let dir = TempDir::new().unwrap();
    let classes = dir.path().join("classes");
    std::fs::create_dir(&classes).unwrap();
    let classes_url = url::Url::from_directory_path(&classes).unwrap();

    Mock::given(method("POST"))
        .and(path("/apps"))
        .and(header("Authorization", format!("Token {TOKEN}").as_str()))
        .and(header("Content-Type", "application/edn"))
        .and(body_string(format!(
            r#"{{:name "orders" :description nil :classpaths ["{classes_url}"]}}"#
        )))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.build.output_directory = Some(classes.clone());

    let report = run_deployment(
        &config,
        BuildInputs {
            project_name: Some("orders".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.classpaths, vec![classes_url.to_string()]);
    assert_eq!(report.receipt.status, 201);
}

#[tokio::test]
async fn test_lib_dir_replaces_artifacts_and_manifest_is_copied() {
    let mock_server = MockServer::start().await;
    mount_auth(&mock_server, 201, r#"{:token "abc"}"#).await;
    Mock::given(method("POST"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let classes = dir.path().join("classes");
    let lib = dir.path().join("lib");
    std::fs::create_dir(&classes).unwrap();
    std::fs::create_dir(&lib).unwrap();
    std::fs::write(lib.join("a.jar"), b"").unwrap();
    std::fs::write(lib.join("notes.txt"), b"").unwrap();

    let mut config = config_for(&mock_server);
    config.build.output_directory = Some(classes.clone());
    config.build.lib_dir = Some(lib.clone());
    config.build.deployment_path = Path::new("META-INF").join("beans.xml");

    let deployer = Deployer::new(config).unwrap();
    let report = deployer
        .run(BuildInputs {
            project_name: None,
            artifacts: vec![ArtifactRef::new("/ignored/dep.jar", ArtifactScope::Compile)],
            manifest: Some(b"<beans/>".to_vec()),
        })
        .await
        .unwrap();

    assert_eq!(report.classpaths.len(), 2);
    assert!(report.classpaths[1].ends_with("/lib/a.jar"));
    assert_eq!(
        std::fs::read(classes.join("META-INF").join("beans.xml")).unwrap(),
        b"<beans/>"
    );
}

#[tokio::test]
async fn test_unreadable_lib_dir_is_a_warning() {
    let mock_server = MockServer::start().await;
    mount_auth(&mock_server, 201, r#"{:token "abc"}"#).await;
    Mock::given(method("POST"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = config_for(&mock_server);
    config.build.output_directory = Some(dir.path().to_path_buf());
    config.build.lib_dir = Some(dir.path().join("missing"));

    let report = run_deployment(&config, BuildInputs::default())
        .await
        .unwrap();

    assert_eq!(report.classpaths.len(), 1);
    assert!(matches!(
        report.warnings.as_slice(),
        [DeploymentWarning::Classpath(ResolutionWarning::UnreadableLibDir { .. })]
    ));
}

#[tokio::test]
async fn test_unconvertible_artifact_is_a_warning_on_success() {
    let mock_server = MockServer::start().await;
    mount_auth(&mock_server, 201, r#"{:token "abc"}"#).await;

    let dir = TempDir::new().unwrap();
    let dep = dir.path().join("dep.jar");
    let dep_url = url::Url::from_file_path(&dep).unwrap();
    let classes_url = url::Url::from_directory_path(dir.path()).unwrap();

    Mock::given(method("POST"))
        .and(path("/apps"))
        .and(body_string(format!(
            r#"{{:description nil :classpaths ["{classes_url}" "{dep_url}"]}}"#
        )))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.build.output_directory = Some(dir.path().to_path_buf());

    let report = run_deployment(
        &config,
        BuildInputs {
            artifacts: vec![
                ArtifactRef::new("", ArtifactScope::Compile),
                ArtifactRef::new(dep.clone(), ArtifactScope::Runtime),
            ],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.receipt.status, 201);
    assert_eq!(report.classpaths.len(), 2);
    assert!(matches!(
        report.warnings.as_slice(),
        [DeploymentWarning::Classpath(ResolutionWarning::Encoding(_))]
    ));
}
