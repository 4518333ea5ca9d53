//! Grant seeding and permission lookup tests

use permsync::{
    clear_all, grants_for, has_permission, init, init_config_permissions, permissions_for,
    seed_grant_all, seed_grants, sync_controller_permissions, test_lock, ControllerDef,
    ControllerRegistry, DeclaredPermission, PermsyncError,
};
use std::collections::BTreeMap;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();
static mut TEST_DIR: Option<TempDir> = None;

fn setup() {
    INIT.call_once(|| {
        let dir = TempDir::new().unwrap();
        init(dir.path().to_str().unwrap()).unwrap();
        unsafe {
            TEST_DIR = Some(dir);
        }
    });
}

fn setup_clean() -> std::sync::MutexGuard<'static, ()> {
    let lock = test_lock();
    setup();
    clear_all().unwrap();
    lock
}

fn grants(principal: &str, names: &[&str]) -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    map.insert(
        principal.to_string(),
        names.iter().map(|n| n.to_string()).collect(),
    );
    map
}

#[test]
fn test_seeding_is_additive() {
    let _lock = setup_clean();

    seed_grants(&grants("1", &["p1"])).unwrap();
    seed_grants(&grants("1", &["p2"])).unwrap();

    let held = grants_for("1").unwrap();
    assert!(held.contains(&"p1".to_string()));
    assert!(held.contains(&"p2".to_string()));
    assert_eq!(held.len(), 2);
}

#[test]
fn test_seeding_is_idempotent() {
    let _lock = setup_clean();

    seed_grants(&grants("1", &["p1", "p2"])).unwrap();
    seed_grants(&grants("1", &["p1", "p2"])).unwrap();

    assert_eq!(grants_for("1").unwrap().len(), 2);
}

#[test]
fn test_grants_are_scoped_to_principal() {
    let _lock = setup_clean();

    seed_grants(&grants("1", &["p1"])).unwrap();
    seed_grants(&grants("10", &["p2"])).unwrap();

    // "1" must not pick up grants of "10" through prefix scanning
    assert_eq!(grants_for("1").unwrap(), vec!["p1"]);
    assert_eq!(grants_for("10").unwrap(), vec!["p2"]);
}

#[test]
fn test_wildcard_applies_to_everyone() {
    let _lock = setup_clean();

    seed_grant_all(&["announcements".to_string()]).unwrap();
    seed_grants(&grants("1", &["p1"])).unwrap();

    assert!(has_permission("1", "announcements").unwrap());
    assert!(has_permission("2", "announcements").unwrap());
    assert!(has_permission("1", "p1").unwrap());
    assert!(!has_permission("2", "p1").unwrap());
}

#[test]
fn test_collection_grant_expands_to_members() {
    let _lock = setup_clean();

    let mut registry = ControllerRegistry::new("app");
    registry
        .register(
            "app/controllers",
            ControllerDef::new("site", &["index", "create", "delete"]),
        )
        .unwrap();
    sync_controller_permissions(&registry, "app/controllers", None).unwrap();

    seed_grants(&grants("7", &["Access to controller site"])).unwrap();

    let held = permissions_for("7").unwrap();
    assert_eq!(held, vec!["site:index", "site:create", "site:delete"]);
    assert!(has_permission("7", "site:delete").unwrap());
    assert!(!has_permission("7", "other:index").unwrap());
}

#[test]
fn test_expansion_deduplicates() {
    let _lock = setup_clean();

    let mut registry = ControllerRegistry::new("app");
    registry
        .register("app/controllers", ControllerDef::new("site", &["index"]))
        .unwrap();
    sync_controller_permissions(&registry, "app/controllers", None).unwrap();

    // Direct grant and collection grant overlap on site:index
    seed_grants(&grants("7", &["site:index", "Access to controller site"])).unwrap();

    assert_eq!(permissions_for("7").unwrap(), vec!["site:index"]);
}

#[test]
fn test_config_declared_permissions() {
    let _lock = setup_clean();

    let declared = vec![
        DeclaredPermission {
            name: "choke_with_force".into(),
            comment: "Force choke capability".into(),
        },
        DeclaredPermission { name: "execute_order_66".into(), comment: String::new() },
    ];

    let mut outcomes = Vec::new();
    init_config_permissions(&declared, |p, saved| outcomes.push((p.name.clone(), saved)));

    assert_eq!(
        outcomes,
        vec![
            ("choke_with_force".to_string(), true),
            ("execute_order_66".to_string(), true),
        ]
    );
    let p = permsync::get_permission("choke_with_force").unwrap().unwrap();
    assert_eq!(p.module, None);
    assert_eq!(p.controller, None);
    assert_eq!(p.action, None);
    assert_eq!(p.comment, "Force choke capability");
}

#[test]
fn test_declared_failure_does_not_stop_the_rest() {
    let _lock = setup_clean();

    let declared = vec![
        DeclaredPermission { name: String::new(), comment: String::new() },
        DeclaredPermission { name: "ok".into(), comment: String::new() },
    ];

    let mut outcomes = Vec::new();
    init_config_permissions(&declared, |_, saved| outcomes.push(saved));

    assert_eq!(outcomes, vec![false, true]);
    assert!(permsync::get_permission("ok").unwrap().is_some());
}

#[test]
fn test_empty_principal_rejected() {
    let _lock = setup_clean();

    let err = seed_grants(&grants("", &["p1"])).unwrap_err();
    assert!(matches!(err, PermsyncError::Config(_)));
}
