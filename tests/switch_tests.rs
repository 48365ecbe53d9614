//! End-to-end switch scenarios on temporary project trees.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use depflip::config::DependencyConfig;
use depflip::ops::Context;
use depflip::ops::switch::{
    RefRequest, WORKSPACE_SENTINEL, switch_github, switch_gitlab, switch_local, switch_npm,
};
use depflip::workspace::WORKSPACE_FILE;

fn project_with(manifest: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("app");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("package.json"), manifest).unwrap();
    (dir, root)
}

fn context(root: &Path) -> Context {
    Context::new(root.to_path_buf(), reqwest::Client::new())
}

fn tracked() -> DependencyConfig {
    DependencyConfig {
        local_path: Some("../y".to_string()),
        github: Some("org/y".to_string()),
        ..Default::default()
    }
}

fn manifest_at(root: &Path) -> String {
    fs::read_to_string(root.join("package.json")).unwrap()
}

#[tokio::test]
async fn local_then_github_scenario() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "^1.0.0"}}"#);
    let ctx = context(&root);

    let outcome = switch_local(&ctx, "@x/y", &tracked()).unwrap();
    assert_eq!(outcome.specifier, WORKSPACE_SENTINEL);
    assert!(manifest_at(&root).contains(r#""@x/y": "workspace:*""#));
    assert_eq!(
        fs::read_to_string(root.join(WORKSPACE_FILE)).unwrap(),
        "packages:\n  - '.'\n  - '../y'\n"
    );

    let outcome = switch_github(&ctx, "@x/y", &tracked(), RefRequest::Raw("main".into()))
        .await
        .unwrap();
    assert_eq!(outcome.specifier, "https://github.com/org/y#main");
    assert!(manifest_at(&root).contains(r#""@x/y": "https://github.com/org/y#main""#));
    // Only `.` and `../y` were present, so the membership file is gone.
    assert!(!root.join(WORKSPACE_FILE).exists());
}

#[tokio::test]
async fn github_switch_resolves_the_dist_branch_through_the_api() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "workspace:*"}}"#);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/org/y/commits/dist")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sha": "abc1234def5678"}"#)
        .create_async()
        .await;

    let mut ctx = context(&root);
    ctx.github_api = server.url();

    let outcome = switch_github(&ctx, "@x/y", &tracked(), RefRequest::DistBranch)
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(outcome.specifier, "https://github.com/org/y#abc1234def5678");
}

#[tokio::test]
async fn github_switch_appends_the_configured_subdir() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "^1.0.0"}}"#);
    let ctx = context(&root);

    let cfg = DependencyConfig {
        github: Some("org/mono".to_string()),
        subdir: Some("packages/y".to_string()),
        ..Default::default()
    };
    let outcome = switch_github(&ctx, "@x/y", &cfg, RefRequest::Raw("abc1234".into()))
        .await
        .unwrap();
    assert_eq!(
        outcome.specifier,
        "https://github.com/org/mono#abc1234&path:/packages/y"
    );
}

#[tokio::test]
async fn gitlab_switch_builds_the_tarball_url_from_the_resolved_ref() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "^1.0.0"}}"#);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            "/projects/group%2Fsub%2Frepo-name/repository/commits/dist",
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "abc1234"}"#)
        .create_async()
        .await;

    let mut ctx = context(&root);
    ctx.gitlab_api = server.url();

    let cfg = DependencyConfig {
        gitlab: Some("group/sub/repo-name".to_string()),
        ..Default::default()
    };
    let outcome = switch_gitlab(&ctx, "@x/y", &cfg, RefRequest::DistBranch)
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(
        outcome.specifier,
        "https://gitlab.com/group/sub/repo-name/-/archive/abc1234/repo-name-abc1234.tar.gz"
    );
}

#[tokio::test]
async fn gitlab_resolution_failure_aborts_without_touching_the_manifest() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "^1.0.0"}}"#);

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects/group%2Frepo/repository/commits/dist")
        .with_status(404)
        .create_async()
        .await;

    let mut ctx = context(&root);
    ctx.gitlab_api = server.url();

    let cfg = DependencyConfig {
        gitlab: Some("group/repo".to_string()),
        ..Default::default()
    };
    let err = switch_gitlab(&ctx, "@x/y", &cfg, RefRequest::DistBranch)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("GitLab"));
    assert!(manifest_at(&root).contains(r#""@x/y": "^1.0.0""#));
}

#[tokio::test]
async fn npm_switch_defaults_to_the_registry_latest() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "workspace:*"}}"#);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/@x%2Fy")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"dist-tags": {"latest": "2.3.1"}, "versions": {}}"#)
        .create_async()
        .await;

    let mut ctx = context(&root);
    ctx.npm_registry = server.url();

    let outcome = switch_npm(&ctx, "@x/y", &tracked(), None).await.unwrap();
    mock.assert_async().await;
    assert_eq!(outcome.specifier, "^2.3.1");
    assert!(manifest_at(&root).contains(r#""@x/y": "^2.3.1""#));
}

#[tokio::test]
async fn npm_switch_with_an_explicit_version_skips_the_registry() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "workspace:*"}}"#);
    let ctx = context(&root);

    let outcome = switch_npm(&ctx, "@x/y", &tracked(), Some("1.4.0".into()))
        .await
        .unwrap();
    assert_eq!(outcome.specifier, "^1.4.0");
}

#[tokio::test]
async fn switching_away_cleans_overrides_but_keeps_siblings() {
    let (_dir, root) = project_with(
        r#"{
  "dependencies": {"@x/a": "workspace:*", "@x/b": "workspace:*"},
  "pnpm": {"overrides": {"@x/a": "link:../a", "@x/b": "link:../b"}}
}"#,
    );
    let ctx = context(&root);

    let cfg_a = DependencyConfig {
        github: Some("org/a".to_string()),
        ..Default::default()
    };
    switch_github(&ctx, "@x/a", &cfg_a, RefRequest::Raw("main".into()))
        .await
        .unwrap();

    let manifest = manifest_at(&root);
    assert!(!manifest.contains(r#""@x/a": "link:../a""#));
    assert!(manifest.contains(r#""@x/b": "link:../b""#));

    let cfg_b = DependencyConfig {
        github: Some("org/b".to_string()),
        ..Default::default()
    };
    switch_github(&ctx, "@x/b", &cfg_b, RefRequest::Raw("main".into()))
        .await
        .unwrap();
    assert!(!manifest_at(&root).contains("pnpm"));
}

#[tokio::test]
async fn unrelated_workspace_content_survives_a_full_round_trip() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "^1.0.0"}}"#);
    fs::write(
        root.join(WORKSPACE_FILE),
        "packages:\n  - '.'\nshamefully-hoist: true\n",
    )
    .unwrap();
    let ctx = context(&root);

    switch_local(&ctx, "@x/y", &tracked()).unwrap();
    assert_eq!(
        fs::read_to_string(root.join(WORKSPACE_FILE)).unwrap(),
        "packages:\n  - '.'\n  - '../y'\nshamefully-hoist: true\n"
    );

    switch_github(&ctx, "@x/y", &tracked(), RefRequest::Raw("main".into()))
        .await
        .unwrap();
    // The unrelated key keeps the file alive, byte-identical.
    assert_eq!(
        fs::read_to_string(root.join(WORKSPACE_FILE)).unwrap(),
        "packages:\n  - '.'\nshamefully-hoist: true\n"
    );
}

#[tokio::test]
async fn switching_to_the_active_source_twice_changes_nothing() {
    let (_dir, root) = project_with(r#"{"dependencies": {"@x/y": "^1.0.0"}}"#);
    let ctx = context(&root);

    switch_github(&ctx, "@x/y", &tracked(), RefRequest::Raw("main".into()))
        .await
        .unwrap();
    let manifest_once = manifest_at(&root);

    switch_github(&ctx, "@x/y", &tracked(), RefRequest::Raw("main".into()))
        .await
        .unwrap();
    assert_eq!(manifest_at(&root), manifest_once);
    assert!(!root.join(WORKSPACE_FILE).exists());
}

#[tokio::test]
async fn switch_rejects_a_dependency_missing_from_the_manifest() {
    let (_dir, root) = project_with(r#"{"dependencies": {"other": "^1.0.0"}}"#);
    let ctx = context(&root);

    let err = switch_local(&ctx, "@x/y", &tracked()).unwrap_err();
    assert!(err.to_string().contains("not declared"));
}
