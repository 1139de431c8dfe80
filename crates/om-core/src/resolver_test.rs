use super::*;
use crate::object::ObjectKind;
use crate::object_name::ObjectName;
use std::path::PathBuf;

fn object(name: &str, priority: u64, revisions: &[Version]) -> DatabaseObject {
    let mut obj = DatabaseObject::new(ObjectName::try_new(name).unwrap(), priority, ObjectKind::View);
    for rev in revisions {
        obj.add_revision(*rev, PathBuf::from(format!("{name}/{rev}.sql")))
            .unwrap();
    }
    obj
}

fn names(revisions: &[ObjectRevision<'_>]) -> Vec<(String, Version)> {
    revisions
        .iter()
        .map(|r| (r.object.name.to_string(), r.revision))
        .collect()
}

#[test]
fn test_policy_look_ahead_takes_max() {
    let revisions = [1, 3, 5, 2];
    assert_eq!(ResolutionPolicy::LookAhead.select(revisions, 3), Some(5));
    assert_eq!(ResolutionPolicy::LookAhead.select(revisions, 0), Some(5));
    assert_eq!(ResolutionPolicy::LookAhead.select(revisions, 6), None);
}

#[test]
fn test_policy_nearest_takes_min() {
    let revisions = [1, 3, 5, 2];
    assert_eq!(ResolutionPolicy::Nearest.select(revisions, 3), Some(3));
    assert_eq!(ResolutionPolicy::Nearest.select(revisions, 4), Some(5));
    assert_eq!(ResolutionPolicy::Nearest.select(revisions, 6), None);
}

#[test]
fn test_policies_agree_with_single_candidate() {
    let revisions = [1, 3, 5, 2];
    assert_eq!(
        ResolutionPolicy::LookAhead.select(revisions, 5),
        ResolutionPolicy::Nearest.select(revisions, 5)
    );
}

#[test]
fn test_policy_empty_revisions() {
    assert_eq!(ResolutionPolicy::LookAhead.select([], 1), None);
}

#[test]
fn test_files_for_step() {
    let catalog = ObjectCatalog::from_objects(vec![object("b", 2, &[3]), object("a", 1, &[2, 4])]);
    let resolver = Resolver::new(&catalog, ResolutionPolicy::LookAhead);

    let files = resolver.files_for_step(3);
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].object.name, "a");
    assert_eq!(files[0].path, Some(Path::new("a/4.sql")));
    assert_eq!(files[1].object.name, "b");
    assert_eq!(files[1].path, Some(Path::new("b/3.sql")));

    let files = resolver.files_for_step(4);
    assert_eq!(files[1].path, None);
}

#[test]
fn test_in_force_at() {
    let catalog = ObjectCatalog::from_objects(vec![object("a", 1, &[2, 4]), object("b", 2, &[3])]);
    let resolver = Resolver::new(&catalog, ResolutionPolicy::default());

    assert!(resolver.in_force_at(1).is_empty());
    assert_eq!(names(&resolver.in_force_at(2)), vec![("a".into(), 2)]);
    assert_eq!(
        names(&resolver.in_force_at(3)),
        vec![("a".into(), 2), ("b".into(), 3)]
    );
    assert_eq!(
        names(&resolver.in_force_at(4)),
        vec![("a".into(), 4), ("b".into(), 3)]
    );
}

#[test]
fn test_changed_at() {
    let catalog = ObjectCatalog::from_objects(vec![
        object("a", 1, &[2, 4]),
        object("b", 2, &[3, 4]),
        object("c", 3, &[1]),
    ]);
    let resolver = Resolver::new(&catalog, ResolutionPolicy::default());

    let changed: Vec<_> = resolver.changed_at(4).iter().map(|o| o.name.to_string()).collect();
    assert_eq!(changed, vec!["a", "b"]);
    assert!(resolver.changed_at(5).is_empty());
}

#[test]
fn test_current_uses_highest_revision() {
    let catalog = ObjectCatalog::from_objects(vec![object("a", 1, &[2, 4]), object("b", 2, &[3])]);
    let resolver = Resolver::new(&catalog, ResolutionPolicy::default());
    assert_eq!(
        names(&resolver.current()),
        vec![("a".into(), 4), ("b".into(), 3)]
    );
}
