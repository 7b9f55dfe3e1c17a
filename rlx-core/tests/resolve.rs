mod common;

use std::collections::HashSet;

use common::{app, install_app, lib_dir, names};
use rlx_common::{AppDescriptor, AppRegistry, Goal, RlxError};
use rlx_core::{resolve, NoSystemPath, RootLibDirs};

fn resolve_registry(
    goals: &[Goal],
    registry: &AppRegistry,
    exclude: &[&str],
) -> Result<Vec<AppDescriptor>, RlxError> {
    let exclude: HashSet<String> = exclude.iter().map(|s| s.to_string()).collect();
    resolve(goals, registry, &[], false, &exclude, &NoSystemPath)
}

#[test]
fn shared_dependency_is_resolved_once_and_goal_order_kept() {
    let registry: AppRegistry = [
        app("app1", "1.0", &["libA"]),
        app("app2", "1.0", &["libA"]),
        app("libA", "1.0", &[]),
    ]
    .into_iter()
    .collect();

    let out = resolve_registry(&[Goal::new("app1"), Goal::new("app2")], &registry, &[]).unwrap();
    assert_eq!(names(&out), vec!["libA", "app1", "app2"]);
}

#[test]
fn dependencies_precede_dependents() {
    let registry: AppRegistry = [
        app("web", "1.0", &["cowboy", "jsx"]),
        app("cowboy", "2.10", &["cowlib", "ranch"]),
        app("cowlib", "2.12", &[]),
        app("ranch", "1.8", &["cowlib"]),
        app("jsx", "3.1", &[]),
    ]
    .into_iter()
    .collect();

    let out = resolve_registry(&[Goal::new("web")], &registry, &[]).unwrap();
    assert_eq!(names(&out), vec!["cowlib", "ranch", "cowboy", "jsx", "web"]);

    for (i, descriptor) in out.iter().enumerate() {
        for dep in descriptor.applications() {
            let pos = out.iter().position(|a| a.name() == dep).unwrap();
            assert!(pos < i, "{dep} must precede {}", descriptor.name());
        }
    }
}

#[test]
fn resolution_is_deterministic() {
    let registry: AppRegistry = [
        app("a", "1", &["b", "c"]),
        app("b", "1", &["d"]),
        app("c", "1", &["d"]),
        app("d", "1", &[]),
    ]
    .into_iter()
    .collect();
    let goals = [Goal::new("a")];

    let first = resolve_registry(&goals, &registry, &[]).unwrap();
    let second = resolve_registry(&goals, &registry, &[]).unwrap();
    assert_eq!(first, second);

    let unique: HashSet<&str> = names(&first).into_iter().collect();
    assert_eq!(unique.len(), first.len());
}

#[test]
fn mutual_dependencies_do_not_loop() {
    let registry: AppRegistry = [app("a", "1", &["b"]), app("b", "1", &["a"])]
        .into_iter()
        .collect();

    let out = resolve_registry(&[Goal::new("a")], &registry, &[]).unwrap();
    assert_eq!(names(&out), vec!["b", "a"]);
}

#[test]
fn missing_optional_dependency_is_skipped() {
    let registry: AppRegistry = [AppDescriptor::new("a", "1", "/apps/a")
        .with_applications(["b"])
        .with_optional_applications(["x"])]
    .into_iter()
    .chain([app("b", "1", &[])])
    .collect();

    let out = resolve_registry(&[Goal::new("a")], &registry, &[]).unwrap();
    assert_eq!(names(&out), vec!["b", "a"]);
}

#[test]
fn present_optional_dependency_is_included() {
    let registry: AppRegistry = [
        AppDescriptor::new("a", "1", "/apps/a").with_optional_applications(["telemetry"]),
        app("telemetry", "1.2", &[]),
    ]
    .into_iter()
    .collect();

    let out = resolve_registry(&[Goal::new("a")], &registry, &[]).unwrap();
    assert_eq!(names(&out), vec!["telemetry", "a"]);
}

#[test]
fn optional_miss_is_scoped_to_its_parent() {
    // "a" may do without "x", but "c" requires it: the earlier optional miss
    // must not hide the later hard failure.
    let registry: AppRegistry = [
        AppDescriptor::new("a", "1", "/apps/a").with_optional_applications(["x"]),
        app("c", "1", &["x"]),
    ]
    .into_iter()
    .collect();

    let err = resolve_registry(&[Goal::new("a"), Goal::new("c")], &registry, &[]).unwrap_err();
    assert!(matches!(err, RlxError::AppNotFound { ref name, vsn: None } if name == "x"));
}

#[test]
fn optional_dependency_found_on_disk_is_shared() {
    let libs = lib_dir();
    install_app(libs.path(), "x", "1.0", &[], &[]);
    let registry: AppRegistry = [
        AppDescriptor::new("a", "1", "/apps/a").with_optional_applications(["x"]),
        app("c", "1", &["x"]),
    ]
    .into_iter()
    .collect();

    let out = resolve(
        &[Goal::new("a"), Goal::new("c")],
        &registry,
        &[libs.path().to_path_buf()],
        false,
        &HashSet::new(),
        &NoSystemPath,
    )
    .unwrap();
    assert_eq!(names(&out), vec!["x", "a", "c"]);
}

#[test]
fn missing_required_dependency_fails() {
    let registry: AppRegistry = [app("a", "1", &["y"])].into_iter().collect();

    let err = resolve_registry(&[Goal::new("a")], &registry, &[]).unwrap_err();
    match err {
        RlxError::AppNotFound { name, vsn } => {
            assert_eq!(name, "y");
            assert_eq!(vsn, None);
        }
        other => panic!("expected AppNotFound, got {other:?}"),
    }
}

#[test]
fn missing_pinned_goal_reports_version() {
    let registry: AppRegistry = [app("a", "1.0", &[])].into_iter().collect();

    let err = resolve_registry(&[Goal::with_vsn("a", "2.0")], &registry, &[]).unwrap_err();
    assert!(
        matches!(err, RlxError::AppNotFound { ref name, ref vsn } if name == "a" && vsn.as_deref() == Some("2.0"))
    );
}

#[test]
fn optional_at_top_level_is_still_required() {
    let err = resolve_registry(&[Goal::new("ghost")], &AppRegistry::new(), &[]).unwrap_err();
    assert!(matches!(err, RlxError::AppNotFound { .. }));
}

// Excluding an app keeps its own dependencies in the output. Whether those
// should be excluded too is an open policy question; this pins the current
// behaviour.
#[test]
fn excluded_app_keeps_its_dependencies() {
    let registry: AppRegistry = [
        app("a", "1", &["b"]),
        app("b", "1", &["c"]),
        app("c", "1", &[]),
    ]
    .into_iter()
    .collect();

    let out = resolve_registry(&[Goal::new("a")], &registry, &["b"]).unwrap();
    assert_eq!(names(&out), vec!["c", "a"]);

    let out = resolve_registry(&[Goal::new("a")], &registry, &["a"]).unwrap();
    assert_eq!(names(&out), vec!["c", "b"]);
}

#[test]
fn pinned_goal_prefers_disk_over_stale_registry_entry() {
    let libs = lib_dir();
    let on_disk = install_app(libs.path(), "a", "2.0", &["b"], &[]);
    install_app(libs.path(), "b", "0.5", &[], &[]);
    let registry: AppRegistry = [app("a", "1.0", &[])].into_iter().collect();

    let out = resolve(
        &[Goal::with_vsn("a", "2.0")],
        &registry,
        &[libs.path().to_path_buf()],
        false,
        &HashSet::new(),
        &NoSystemPath,
    )
    .unwrap();
    assert_eq!(names(&out), vec!["b", "a"]);
    assert_eq!(out[1].vsn(), "2.0");
    assert_eq!(out[1].dir(), on_disk);
}

#[test]
fn system_libs_fill_in_what_lib_dirs_lack() {
    let root = lib_dir();
    install_app(&root.path().join("lib"), "kernel", "9.0", &[], &[]);
    install_app(&root.path().join("lib"), "stdlib", "5.0", &["kernel"], &[]);
    let registry: AppRegistry = [app("shop", "0.1", &["kernel", "stdlib"])]
        .into_iter()
        .collect();
    let system = RootLibDirs::new(root.path());

    let out = resolve(
        &[Goal::new("shop")],
        &registry,
        &[],
        true,
        &HashSet::new(),
        &system,
    )
    .unwrap();
    assert_eq!(names(&out), vec!["kernel", "stdlib", "shop"]);

    let err = resolve(
        &[Goal::new("shop")],
        &registry,
        &[],
        false,
        &HashSet::new(),
        &system,
    )
    .unwrap_err();
    assert!(matches!(err, RlxError::AppNotFound { ref name, .. } if name == "kernel"));
}
