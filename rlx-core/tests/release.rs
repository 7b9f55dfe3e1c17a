mod common;

use std::collections::HashSet;
use std::fs;

use common::{app, install_app, lib_dir, names};
use rlx_common::{AppRegistry, Config, Goal, ResolveInputs, RlxError};
use rlx_core::{resolve_release, NoSystemPath, RootLibDirs};

fn inputs(goals: Vec<Goal>) -> ResolveInputs {
    ResolveInputs {
        release_name: "shop".into(),
        release_vsn: "0.1.0".into(),
        goals,
        lib_dirs: Vec::new(),
        check_system_path: true,
        include_erts: false,
        exclude: HashSet::new(),
    }
}

#[test]
fn release_without_goals_is_rejected_before_lookup() {
    let err = resolve_release(&inputs(Vec::new()), &AppRegistry::new(), &NoSystemPath, None)
        .unwrap_err();
    match err {
        RlxError::NoGoalsSpecified {
            release_name,
            release_vsn,
        } => {
            assert_eq!(release_name, "shop");
            assert_eq!(release_vsn, "0.1.0");
        }
        other => panic!("expected NoGoalsSpecified, got {other:?}"),
    }
}

#[test]
fn release_from_config_end_to_end() {
    let root = lib_dir();
    fs::create_dir_all(root.path().join("erts-14.0")).unwrap();
    install_app(&root.path().join("lib"), "kernel", "9.0", &[], &[]);
    install_app(&root.path().join("lib"), "stdlib", "5.0", &["kernel"], &[]);
    install_app(&root.path().join("lib"), "sasl", "4.2", &["kernel", "stdlib"], &[]);

    let deps = lib_dir();
    install_app(deps.path(), "jsx", "3.1.0", &["kernel"], &[]);

    let config = Config::from_toml(&format!(
        r#"
        lib_dirs = [{deps:?}]
        exclude_apps = ["sasl"]

        [[release]]
        name = "shop"
        vsn = "0.1.0"
        goals = ["shop", "sasl"]
        "#,
        deps = deps.path().display().to_string(),
    ))
    .unwrap();
    let inputs = config.release_inputs("shop", None).unwrap();

    let registry: AppRegistry = [app("shop", "0.1.0", &["kernel", "stdlib", "jsx"])]
        .into_iter()
        .collect();
    let release = resolve_release(
        &inputs,
        &registry,
        &RootLibDirs::new(root.path()),
        Some(root.path()),
    )
    .unwrap();

    assert_eq!(
        names(&release.applications),
        vec!["kernel", "stdlib", "jsx", "shop"]
    );
    assert_eq!(release.erts.as_ref().map(|e| e.vsn.as_str()), Some("14.0"));

    let out = lib_dir();
    let rel_path = release.write_rel_file(out.path()).unwrap();
    assert_eq!(rel_path, out.path().join("shop.rel"));
    let written = fs::read_to_string(rel_path).unwrap();
    assert_eq!(
        written,
        "{release,{\"shop\",\"0.1.0\"},{erts,\"14.0\"},[{kernel,\"9.0\"},{stdlib,\"5.0\"},{jsx,\"3.1.0\"},{shop,\"0.1.0\"}]}.\n"
    );
}

#[test]
fn missing_runtime_is_reported_with_root() {
    let root = lib_dir();
    let registry: AppRegistry = [app("shop", "0.1.0", &[])].into_iter().collect();
    let mut with_erts = inputs(vec![Goal::new("shop")]);
    with_erts.include_erts = true;

    let err = resolve_release(&with_erts, &registry, &NoSystemPath, Some(root.path())).unwrap_err();
    assert!(matches!(err, RlxError::ReleaseRuntimeError(ref dir) if dir == root.path()));
}
