use super::*;
use crate::resolver::ResolutionPolicy;
use tempfile::TempDir;

fn write_revision(root: &Path, dir: &str, file: &str, sql: &str) {
    let dir = root.join(dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(file), sql).unwrap();
}

fn setup(temp: &TempDir) -> Config {
    let objects = temp.path().join("objects");
    write_revision(&objects, "001_a", "0002.sql", "CREATE VIEW a AS SELECT 2 AS v");
    write_revision(&objects, "001_a", "0004.sql", "CREATE VIEW a AS SELECT 4 AS v;");
    write_revision(&objects, "002_b", "0003.sql", "CREATE VIEW b AS SELECT v FROM a");
    write_revision(&objects, "003_c", "0001.sql", "CREATE MACRO c(x) AS x * 2");
    write_revision(&objects, "003_c", "003_c.yml", "kind: macro\n");

    Config {
        migrations_path: temp.path().join("migrations"),
        objects_path: objects,
        db_source: ":memory:".to_string(),
        create_filename: temp.path().join("out/create.sql"),
        drop_filename: temp.path().join("out/drop.sql"),
        priority_pad: 3,
        version_pad: 4,
        resolution_policy: ResolutionPolicy::LookAhead,
    }
}

#[test]
fn test_create_script_uses_highest_revision_in_priority_order() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp);
    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();

    let sumfiles = render_sumfiles(&catalog, &config).unwrap();
    let create = &sumfiles.create_sql;

    assert!(create.contains("-- 001_a revision 0004 (view)\nCREATE VIEW a AS SELECT 4 AS v;"));
    assert!(!create.contains("SELECT 2 AS v"));
    assert!(create.contains("-- 003_c revision 0001 (macro)\nCREATE MACRO c(x) AS x * 2;"));

    let a = create.find("CREATE VIEW a").unwrap();
    let b = create.find("CREATE VIEW b").unwrap();
    let c = create.find("CREATE MACRO c").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_drop_script_reverse_priority() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp);
    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();

    let drop = drop_script(&catalog);
    let c = drop.find("DROP MACRO IF EXISTS c;").unwrap();
    let b = drop.find("DROP VIEW IF EXISTS b;").unwrap();
    let a = drop.find("DROP VIEW IF EXISTS a;").unwrap();
    assert!(c < b && b < a);
}

#[test]
fn test_create_objects_file_writes_both_files() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp);
    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();

    let sumfiles = create_objects_file(&catalog, &config).unwrap();
    assert_eq!(
        std::fs::read_to_string(&config.create_filename).unwrap(),
        sumfiles.create_sql
    );
    assert_eq!(
        std::fs::read_to_string(&config.drop_filename).unwrap(),
        sumfiles.drop_sql
    );
}

#[test]
fn test_create_objects_file_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp);
    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();

    create_objects_file(&catalog, &config).unwrap();
    let create_first = std::fs::read(&config.create_filename).unwrap();
    let drop_first = std::fs::read(&config.drop_filename).unwrap();

    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();
    create_objects_file(&catalog, &config).unwrap();
    assert_eq!(std::fs::read(&config.create_filename).unwrap(), create_first);
    assert_eq!(std::fs::read(&config.drop_filename).unwrap(), drop_first);
}

#[test]
fn test_overwrites_existing_files() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp);
    std::fs::create_dir_all(config.create_filename.parent().unwrap()).unwrap();
    std::fs::write(&config.create_filename, "stale contents that are much longer").unwrap();

    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();
    create_objects_file(&catalog, &config).unwrap();
    let written = std::fs::read_to_string(&config.create_filename).unwrap();
    assert!(!written.contains("stale"));
}

#[test]
fn test_checksum_changes_with_content() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp);
    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();
    let before = render_sumfiles(&catalog, &config).unwrap().create_sql;

    write_revision(&config.objects_path, "002_b", "0005.sql", "CREATE VIEW b AS SELECT 5 AS v");
    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();
    let after = render_sumfiles(&catalog, &config).unwrap().create_sql;

    let header = |s: &str| s.lines().find(|l| l.starts_with("-- checksum")).unwrap().to_string();
    assert_ne!(header(&before), header(&after));
}

#[test]
fn test_empty_catalog() {
    let temp = TempDir::new().unwrap();
    let mut config = setup(&temp);
    config.objects_path = temp.path().join("empty");
    std::fs::create_dir_all(&config.objects_path).unwrap();

    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();
    let sumfiles = render_sumfiles(&catalog, &config).unwrap();
    assert!(sumfiles.create_sql.contains("-- objects: 0"));
    assert!(!sumfiles.drop_sql.contains("DROP"));
}

#[test]
fn test_unwritable_destination() {
    let temp = TempDir::new().unwrap();
    let mut config = setup(&temp);
    // a regular file blocks directory creation
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    config.create_filename = blocker.join("create.sql");

    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();
    let err = create_objects_file(&catalog, &config).unwrap_err().to_string();
    assert!(err.contains("E015"), "got: {err}");
}

#[test]
fn test_create_script_header_layout() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp);
    let catalog = ObjectCatalog::scan(&config.objects_path).unwrap();

    let sumfiles = render_sumfiles(&catalog, &config).unwrap();
    let lines: Vec<&str> = sumfiles.create_sql.lines().collect();
    assert_eq!(lines[0], "-- objmigrate create script");
    assert_eq!(lines[1], "-- objects: 3");
    assert!(lines[2].starts_with("-- checksum: sha256:"));
    assert_eq!(lines[2].len(), "-- checksum: sha256:".len() + 64);
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "-- 001_a revision 0004 (view)");

    assert!(sumfiles
        .drop_sql
        .starts_with("-- objmigrate drop script\n-- objects: 3\n\nDROP MACRO IF EXISTS c;\n"));
}
